use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        color::HexColor,
        error::{AvatarError, AvatarResult},
    },
    model::selection::{Category, PartId, PartSelection},
};

/// Color block of a persisted avatar config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarColors {
    /// Skin tone.
    pub primary: HexColor,
    /// Hair color.
    #[serde(default)]
    pub secondary: Option<HexColor>,
    /// Facial hair color.
    #[serde(default)]
    pub accent: Option<HexColor>,
}

/// Flattened avatar description as stored against a user profile.
///
/// ```json
/// {"outfit": "shape-62", "hatType": "hair-72", "accessories": ["eyewear-3"],
///  "colors": {"primary": "#f3cfb0", "secondary": "#000000", "accent": null},
///  "imageUrl": "https://..."}
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarConfig {
    /// Body shape as `shape-<id>`.
    pub outfit: String,
    /// Hairstyle as `hair-<id>`, or null.
    #[serde(default)]
    pub hat_type: Option<String>,
    /// Every other populated category as `<categoryKey>-<id>`, back to front.
    #[serde(default)]
    pub accessories: Vec<String>,
    /// Shape, hair and facial hair colors.
    pub colors: AvatarColors,
    /// Colors of the accessory categories, keyed by category key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub part_colors: BTreeMap<String, HexColor>,
    /// Address of the uploaded snapshot, once exported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl AvatarConfig {
    /// Flatten a selection into the storage shape. `image_url` starts empty.
    pub fn from_selection(selection: &PartSelection) -> Self {
        let mut accessories = Vec::new();
        let mut part_colors = BTreeMap::new();
        for (category, part, color) in selection.populated() {
            if matches!(category, Category::Shape | Category::Hair) {
                continue;
            }
            accessories.push(tagged(category, part));
            if let Some(color) = color
                && category != Category::FacialHair
            {
                part_colors.insert(category.key().to_owned(), color.clone());
            }
        }

        Self {
            outfit: tagged(Category::Shape, &selection.shape),
            hat_type: selection.hair.as_ref().map(|p| tagged(Category::Hair, p)),
            accessories,
            colors: AvatarColors {
                primary: selection.shape_color.clone(),
                secondary: selection.hair_color.clone(),
                accent: selection.facial_hair_color.clone(),
            },
            part_colors,
            image_url: None,
        }
    }

    /// Rebuild the selection this config was flattened from.
    pub fn to_selection(&self) -> AvatarResult<PartSelection> {
        let (category, shape) = parse_tagged(&self.outfit)?;
        if category != Category::Shape {
            return Err(AvatarError::validation(format!(
                "outfit must be a shape part, got '{}'",
                self.outfit
            )));
        }
        let mut selection = PartSelection::new(shape, self.colors.primary.clone());

        if let Some(hat) = &self.hat_type {
            let (category, hair) = parse_tagged(hat)?;
            if category != Category::Hair {
                return Err(AvatarError::validation(format!(
                    "hatType must be a hair part, got '{hat}'"
                )));
            }
            selection.set(Category::Hair, Some(hair), self.colors.secondary.clone())?;
        }

        for accessory in &self.accessories {
            let (category, part) = parse_tagged(accessory)?;
            if matches!(category, Category::Shape | Category::Hair) {
                return Err(AvatarError::validation(format!(
                    "'{accessory}' cannot be listed as an accessory"
                )));
            }
            let color = match category {
                Category::FacialHair => self.colors.accent.clone(),
                _ => self.part_colors.get(category.key()).cloned(),
            };
            selection.set(category, Some(part), color)?;
        }

        for key in self.part_colors.keys() {
            if Category::from_key(key).is_none() {
                return Err(AvatarError::validation(format!(
                    "unknown category '{key}' in partColors"
                )));
            }
        }

        Ok(selection)
    }

    /// Copy with the uploaded snapshot address set.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

fn tagged(category: Category, part: &PartId) -> String {
    format!("{}-{part}", category.key())
}

fn parse_tagged(s: &str) -> AvatarResult<(Category, PartId)> {
    let (key, id) = s
        .split_once('-')
        .ok_or_else(|| AvatarError::validation(format!("expected '<category>-<id>', got '{s}'")))?;
    let category = Category::from_key(key)
        .ok_or_else(|| AvatarError::validation(format!("unknown category '{key}' in '{s}'")))?;
    Ok((category, PartId::parse(id)?))
}

#[cfg(test)]
#[path = "../../tests/unit/model/avatar_config.rs"]
mod tests;
