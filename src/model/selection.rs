use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::{
    color::HexColor,
    error::{AvatarError, AvatarResult},
};

/// One avatar slot. Declaration order is the back-to-front z-order used by the compositor.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// Body silhouette; always present.
    Shape,
    /// Footwear.
    Shoes,
    /// Clothing.
    Uniform,
    /// Beards and moustaches.
    FacialHair,
    /// Face paint and cosmetics.
    Makeup,
    /// Glasses.
    Eyewear,
    /// Hairstyles.
    Hair,
    /// Hats, caps and helmets.
    Headwear,
}

/// How a category's source colors are rewritten.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecolorPolicy {
    /// Single-tone parts: every colorable region takes the chosen color.
    RecolorAll,
    /// Multi-tone parts: known source tones are swapped for palette tones.
    Substitute,
}

impl Category {
    /// Back-to-front compositing order.
    pub const Z_ORDER: [Category; 8] = [
        Category::Shape,
        Category::Shoes,
        Category::Uniform,
        Category::FacialHair,
        Category::Makeup,
        Category::Eyewear,
        Category::Hair,
        Category::Headwear,
    ];

    /// Stable camelCase key, as used in persisted configs and layer tags.
    pub fn key(self) -> &'static str {
        match self {
            Category::Shape => "shape",
            Category::Shoes => "shoes",
            Category::Uniform => "uniform",
            Category::FacialHair => "facialHair",
            Category::Makeup => "makeup",
            Category::Eyewear => "eyewear",
            Category::Hair => "hair",
            Category::Headwear => "headwear",
        }
    }

    /// Inverse of [`Category::key`].
    pub fn from_key(key: &str) -> Option<Self> {
        Self::Z_ORDER.into_iter().find(|c| c.key() == key)
    }

    /// Recolor policy applied to parts of this category.
    pub fn recolor_policy(self) -> RecolorPolicy {
        match self {
            Category::Hair | Category::FacialHair => RecolorPolicy::Substitute,
            _ => RecolorPolicy::RecolorAll,
        }
    }

    /// Categories the live preview draws as `<use>` references into the shared sprite sheet.
    pub fn is_simple_sprite(self) -> bool {
        matches!(
            self,
            Category::Shoes
                | Category::Uniform
                | Category::Makeup
                | Category::Eyewear
                | Category::Headwear
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Identifier of one part within its category.
///
/// Deserializes from a number or a string; strings go through [`PartId::parse`], so `"62"`
/// and `62` are the same part.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum PartId {
    /// Numbered asset (`Hair 72.svg`).
    Number(u32),
    /// Named asset or sprite-sheet symbol.
    Symbol(String),
}

impl PartId {
    /// Parse a textual id: all-digit strings become [`PartId::Number`].
    pub fn parse(s: &str) -> AvatarResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AvatarError::validation("part id must be non-empty"));
        }
        if let Ok(n) = s.parse::<u32>() {
            return Ok(Self::Number(n));
        }
        let id = Self::Symbol(s.to_owned());
        id.validate()?;
        Ok(id)
    }

    /// Reject ids that could escape the asset directory or break markup attributes.
    pub fn validate(&self) -> AvatarResult<()> {
        let Self::Symbol(s) = self else {
            return Ok(());
        };
        if s.is_empty() {
            return Err(AvatarError::validation("part id must be non-empty"));
        }
        if s
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '"' | '<' | '>' | '&') || c.is_control())
            || s.contains("..")
        {
            return Err(AvatarError::validation(format!(
                "part id '{s}' contains forbidden characters"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartId::Number(n) => write!(f, "{n}"),
            PartId::Symbol(s) => f.write_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for PartId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(PartId::Number(n)),
            Raw::Text(s) => PartId::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

impl From<u32> for PartId {
    fn from(n: u32) -> Self {
        Self::Number(n)
    }
}

/// The user's sparse choice of parts, one optional part and color per category.
///
/// `shape` and its color are mandatory. A `None` color on any other category means
/// "keep the part's source colors".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartSelection {
    /// Body shape part.
    pub shape: PartId,
    /// Skin tone of the body shape.
    pub shape_color: HexColor,
    /// Hairstyle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair: Option<PartId>,
    /// Hair color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<HexColor>,
    /// Headwear.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headwear: Option<PartId>,
    /// Headwear color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headwear_color: Option<HexColor>,
    /// Uniform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uniform: Option<PartId>,
    /// Uniform color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uniform_color: Option<HexColor>,
    /// Shoes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shoes: Option<PartId>,
    /// Shoe color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shoes_color: Option<HexColor>,
    /// Eyewear.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eyewear: Option<PartId>,
    /// Eyewear color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eyewear_color: Option<HexColor>,
    /// Facial hair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facial_hair: Option<PartId>,
    /// Facial hair color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facial_hair_color: Option<HexColor>,
    /// Makeup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub makeup: Option<PartId>,
    /// Makeup color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub makeup_color: Option<HexColor>,
}

impl PartSelection {
    /// A selection with only the mandatory body shape.
    pub fn new(shape: impl Into<PartId>, shape_color: HexColor) -> Self {
        Self {
            shape: shape.into(),
            shape_color,
            hair: None,
            hair_color: None,
            headwear: None,
            headwear_color: None,
            uniform: None,
            uniform_color: None,
            shoes: None,
            shoes_color: None,
            eyewear: None,
            eyewear_color: None,
            facial_hair: None,
            facial_hair_color: None,
            makeup: None,
            makeup_color: None,
        }
    }

    /// Builder-style setter. For the shape, a `None` color keeps the current skin tone.
    pub fn with(
        mut self,
        category: Category,
        part: impl Into<PartId>,
        color: Option<HexColor>,
    ) -> Self {
        let part = part.into();
        match self.slot_mut(category) {
            Some((p, c)) => {
                *p = Some(part);
                *c = color;
            }
            None => {
                self.shape = part;
                if let Some(c) = color {
                    self.shape_color = c;
                }
            }
        }
        self
    }

    /// Set or clear one category. Clearing the shape is rejected.
    pub fn set(
        &mut self,
        category: Category,
        part: Option<PartId>,
        color: Option<HexColor>,
    ) -> AvatarResult<()> {
        if let Some(p) = &part {
            p.validate()?;
        }
        if let Some((p, c)) = self.slot_mut(category) {
            // An unset part carries no color either.
            *c = if part.is_some() { color } else { None };
            *p = part;
            return Ok(());
        }
        let part = part.ok_or_else(|| AvatarError::validation("shape cannot be unset"))?;
        let color = color.ok_or_else(|| AvatarError::validation("shape color cannot be unset"))?;
        self.shape = part;
        self.shape_color = color;
        Ok(())
    }

    /// Part selected for `category`, if any.
    pub fn part(&self, category: Category) -> Option<&PartId> {
        match category {
            Category::Shape => Some(&self.shape),
            Category::Hair => self.hair.as_ref(),
            Category::Headwear => self.headwear.as_ref(),
            Category::Uniform => self.uniform.as_ref(),
            Category::Shoes => self.shoes.as_ref(),
            Category::Eyewear => self.eyewear.as_ref(),
            Category::FacialHair => self.facial_hair.as_ref(),
            Category::Makeup => self.makeup.as_ref(),
        }
    }

    /// Color override for `category`, if any.
    pub fn color(&self, category: Category) -> Option<&HexColor> {
        match category {
            Category::Shape => Some(&self.shape_color),
            Category::Hair => self.hair_color.as_ref(),
            Category::Headwear => self.headwear_color.as_ref(),
            Category::Uniform => self.uniform_color.as_ref(),
            Category::Shoes => self.shoes_color.as_ref(),
            Category::Eyewear => self.eyewear_color.as_ref(),
            Category::FacialHair => self.facial_hair_color.as_ref(),
            Category::Makeup => self.makeup_color.as_ref(),
        }
    }

    /// Populated categories in back-to-front order.
    pub fn populated(&self) -> impl Iterator<Item = (Category, &PartId, Option<&HexColor>)> + '_ {
        Category::Z_ORDER
            .into_iter()
            .filter_map(|c| self.part(c).map(|p| (c, p, self.color(c))))
    }

    /// Check every part id; colors are validated on construction.
    pub fn validate(&self) -> AvatarResult<()> {
        for (_, part, _) in self.populated() {
            part.validate()?;
        }
        Ok(())
    }

    /// Optional slot for `category`; `None` for the mandatory shape.
    #[allow(clippy::type_complexity)]
    fn slot_mut(
        &mut self,
        category: Category,
    ) -> Option<(&mut Option<PartId>, &mut Option<HexColor>)> {
        Some(match category {
            Category::Shape => return None,
            Category::Hair => (&mut self.hair, &mut self.hair_color),
            Category::Headwear => (&mut self.headwear, &mut self.headwear_color),
            Category::Uniform => (&mut self.uniform, &mut self.uniform_color),
            Category::Shoes => (&mut self.shoes, &mut self.shoes_color),
            Category::Eyewear => (&mut self.eyewear, &mut self.eyewear_color),
            Category::FacialHair => (&mut self.facial_hair, &mut self.facial_hair_color),
            Category::Makeup => (&mut self.makeup, &mut self.makeup_color),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/selection.rs"]
mod tests;
