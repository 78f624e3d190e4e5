use std::{path::Path, sync::Arc, time::Duration};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    assets::{
        fs::DirAssetSource, http::HttpAssetSource, source::AssetSource,
        source::DEFAULT_SPRITE_SHEET,
    },
    compose::compositor::{CANVAS_SIZE, ComposeOptions},
    export::pipeline::ExportOptions,
    foundation::{
        color::HexColor,
        error::{AvatarError, AvatarResult},
    },
    palette::derive::DEFAULT_HAIR_COLOR,
    preview::tracker::LoadStateTracker,
    raster::render::{DEFAULT_JPEG_QUALITY, MAX_DIM, RasterFormat, RasterOptions},
};

/// Engine configuration, usually read from a JSON file. Every field has a default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory or `http(s)://` base URL holding the part tree.
    pub asset_root: String,
    /// Shared multi-symbol sheet, relative to `asset_root`.
    pub sprite_sheet: String,
    /// Logical canvas edge length.
    pub canvas_size: u32,
    /// Output bitmap edge length in pixels.
    pub output_size: u32,
    /// Output encoding.
    pub output_format: RasterFormat,
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
    /// Palette seed for hair and facial hair with no chosen color.
    pub default_hair_color: String,
    /// Delay between the body loading and sprite-sheet parts counting as loaded.
    pub sprite_reveal_delay_ms: u64,
    /// Endpoint exported images are POSTed to.
    pub upload_url: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            asset_root: "assets".to_owned(),
            sprite_sheet: DEFAULT_SPRITE_SHEET.to_owned(),
            canvas_size: CANVAS_SIZE,
            output_size: CANVAS_SIZE,
            output_format: RasterFormat::Png,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            default_hair_color: DEFAULT_HAIR_COLOR.to_owned(),
            sprite_reveal_delay_ms: 150,
            upload_url: None,
        }
    }
}

impl EngineConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: &Path) -> AvatarResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> AvatarResult<()> {
        if self.asset_root.trim().is_empty() {
            return Err(AvatarError::validation("asset_root must be non-empty"));
        }
        if self.sprite_sheet.trim().is_empty() {
            return Err(AvatarError::validation("sprite_sheet must be non-empty"));
        }
        if self.canvas_size == 0 {
            return Err(AvatarError::validation("canvas_size must be > 0"));
        }
        if self.output_size == 0 || self.output_size > MAX_DIM {
            return Err(AvatarError::validation(format!(
                "output_size must be within 1..={MAX_DIM}"
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(AvatarError::validation("jpeg_quality must be within 1..=100"));
        }
        HexColor::parse(&self.default_hair_color)?;
        if let Some(url) = &self.upload_url
            && !is_http_url(url)
        {
            return Err(AvatarError::validation(format!(
                "upload_url must be an http(s) URL, got '{url}'"
            )));
        }
        Ok(())
    }

    /// Asset source for `asset_root`: HTTP for URLs, the filesystem otherwise.
    pub fn asset_source(&self) -> Arc<dyn AssetSource> {
        if is_http_url(&self.asset_root) {
            Arc::new(HttpAssetSource::new(&self.asset_root).with_sprite_sheet(&self.sprite_sheet))
        } else {
            Arc::new(DirAssetSource::new(&self.asset_root).with_sprite_sheet(&self.sprite_sheet))
        }
    }

    /// Compose options derived from this config.
    pub fn compose_options(&self) -> AvatarResult<ComposeOptions> {
        Ok(ComposeOptions {
            canvas_size: self.canvas_size,
            default_hair_color: HexColor::parse(&self.default_hair_color)?,
        })
    }

    /// Raster options derived from this config.
    pub fn raster_options(&self) -> RasterOptions {
        RasterOptions {
            size: self.output_size,
            format: self.output_format,
            jpeg_quality: self.jpeg_quality,
        }
    }

    /// Export options derived from this config.
    pub fn export_options(&self) -> AvatarResult<ExportOptions> {
        Ok(ExportOptions {
            compose: self.compose_options()?,
            raster: self.raster_options(),
        })
    }

    /// Load-state tracker with the configured sprite reveal delay.
    pub fn load_state_tracker(&self) -> LoadStateTracker {
        LoadStateTracker::new(Duration::from_millis(self.sprite_reveal_delay_ms))
    }
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
