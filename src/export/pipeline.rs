use crate::{
    assets::source::AssetSource,
    compose::compositor::{ComposeOptions, compose_with},
    export::upload::Uploader,
    foundation::error::AvatarResult,
    model::{avatar_config::AvatarConfig, selection::PartSelection},
    raster::render::{RasterOptions, rasterize_with},
};

/// Settings for one export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    /// Canvas and default colors used while composing.
    pub compose: ComposeOptions,
    /// Output size and encoding.
    pub raster: RasterOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        let compose = ComposeOptions::default();
        let raster = RasterOptions::png(compose.canvas_size);
        Self { compose, raster }
    }
}

/// Compose, rasterize and upload `selection` with default options.
pub fn export_avatar(
    selection: &PartSelection,
    source: &dyn AssetSource,
    uploader: &dyn Uploader,
    token: &str,
) -> AvatarResult<AvatarConfig> {
    export_avatar_with(selection, source, uploader, token, &ExportOptions::default())
}

/// Compose, rasterize and upload `selection`, returning the config to persist.
///
/// Raster and upload failures propagate; the selection is only borrowed, so a failed export
/// leaves it as it was.
#[tracing::instrument(skip_all, fields(size = opts.raster.size))]
pub fn export_avatar_with(
    selection: &PartSelection,
    source: &dyn AssetSource,
    uploader: &dyn Uploader,
    token: &str,
    opts: &ExportOptions,
) -> AvatarResult<AvatarConfig> {
    let merged = compose_with(selection, source, &opts.compose)?;
    let image = rasterize_with(&merged, &opts.raster)?;
    let url = uploader.upload(&image, token)?;
    tracing::info!(layers = merged.layer_count(), %url, "avatar exported");
    Ok(AvatarConfig::from_selection(selection).with_image_url(url))
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
