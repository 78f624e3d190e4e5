use std::sync::Mutex;

use super::*;
use crate::{
    assets::memory::MemoryAssetSource,
    foundation::{color::HexColor, error::AvatarError},
    model::selection::Category,
    raster::render::ImageBlob,
};

const BODY: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 400"><rect width="200" height="400" fill="#e0ac69"/></svg>"##;

#[derive(Default)]
struct RecordingUploader {
    seen: Mutex<Vec<(usize, String)>>,
    fail: bool,
}

impl Uploader for RecordingUploader {
    fn upload(&self, image: &ImageBlob, token: &str) -> AvatarResult<String> {
        self.seen
            .lock()
            .unwrap()
            .push((image.bytes.len(), token.to_owned()));
        if self.fail {
            return Err(AvatarError::upload("status 503", true));
        }
        Ok(format!("https://img.example.com/{}x{}.png", image.width, image.height))
    }
}

fn selection() -> PartSelection {
    PartSelection::new(62u32, HexColor::parse("#f3cfb0").unwrap())
        .with(Category::Hair, 72u32, None)
}

#[test]
fn export_returns_config_with_image_url() {
    let source = MemoryAssetSource::new().with_document("shape/Shape 62.svg", BODY);
    let uploader = RecordingUploader::default();

    let cfg = export_avatar(&selection(), &source, &uploader, "tok").unwrap();
    assert_eq!(cfg.image_url.as_deref(), Some("https://img.example.com/400x400.png"));
    assert_eq!(cfg.outfit, "shape-62");
    assert_eq!(cfg.hat_type.as_deref(), Some("hair-72"));

    let seen = uploader.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].0 > 0);
    assert_eq!(seen[0].1, "tok");
}

#[test]
fn upload_failure_propagates_and_leaves_selection_intact() {
    let source = MemoryAssetSource::new().with_document("shape/Shape 62.svg", BODY);
    let uploader = RecordingUploader {
        fail: true,
        ..RecordingUploader::default()
    };
    let sel = selection();
    let before = sel.clone();

    let err = export_avatar(&sel, &source, &uploader, "tok").unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(sel, before);
}

#[test]
fn custom_raster_size_reaches_uploader() {
    let source = MemoryAssetSource::new().with_document("shape/Shape 62.svg", BODY);
    let uploader = RecordingUploader::default();
    let opts = ExportOptions {
        raster: RasterOptions::png(64),
        ..ExportOptions::default()
    };
    let cfg = export_avatar_with(&selection(), &source, &uploader, "tok", &opts).unwrap();
    assert_eq!(cfg.image_url.as_deref(), Some("https://img.example.com/64x64.png"));
}
