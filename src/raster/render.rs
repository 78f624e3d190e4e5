use std::io::Cursor;

use serde::{Deserialize, Serialize};

use crate::{
    compose::compositor::MergedDocument,
    foundation::error::{AvatarError, AvatarResult},
};

/// Largest accepted output edge in pixels.
pub const MAX_DIM: u32 = 16_384;

/// Quality used for JPEG output unless overridden.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encoded image container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    /// Lossless, alpha preserved.
    #[default]
    Png,
    /// Lossy, flattened onto white.
    Jpeg,
}

impl RasterFormat {
    /// MIME type of the encoded bytes.
    pub fn mime(self) -> &'static str {
        match self {
            RasterFormat::Png => "image/png",
            RasterFormat::Jpeg => "image/jpeg",
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Jpeg => "jpg",
        }
    }
}

/// Output settings for [`rasterize_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterOptions {
    /// Edge length of the square output in pixels.
    pub size: u32,
    /// Container format.
    pub format: RasterFormat,
    /// JPEG quality, 1..=100. Ignored for PNG.
    pub jpeg_quality: u8,
}

impl RasterOptions {
    /// PNG output of `size x size` pixels.
    pub fn png(size: u32) -> Self {
        Self {
            size,
            format: RasterFormat::Png,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// An encoded bitmap ready for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBlob {
    /// Encoded file bytes.
    pub bytes: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Container format of `bytes`.
    pub format: RasterFormat,
}

impl ImageBlob {
    /// MIME type of `bytes`.
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }
}

/// Rasterize a merged document to a `size x size` PNG.
pub fn rasterize(doc: &MergedDocument, size: u32) -> AvatarResult<ImageBlob> {
    rasterize_markup(&doc.markup, &RasterOptions::png(size))
}

/// Rasterize a merged document with explicit output settings.
pub fn rasterize_with(doc: &MergedDocument, opts: &RasterOptions) -> AvatarResult<ImageBlob> {
    rasterize_markup(&doc.markup, opts)
}

/// Render SVG markup into a square bitmap and encode it.
///
/// Every failure here is reported: an export that silently produced a blank image would be
/// worse than one that failed.
#[tracing::instrument(skip(markup), fields(bytes = markup.len()))]
pub fn rasterize_markup(markup: &str, opts: &RasterOptions) -> AvatarResult<ImageBlob> {
    if opts.size == 0 || opts.size > MAX_DIM {
        return Err(AvatarError::raster(format!(
            "output size must be within 1..={MAX_DIM}, got {}",
            opts.size
        )));
    }
    if opts.format == RasterFormat::Jpeg && !(1..=100).contains(&opts.jpeg_quality) {
        return Err(AvatarError::raster(format!(
            "jpeg quality must be within 1..=100, got {}",
            opts.jpeg_quality
        )));
    }

    let tree = usvg::Tree::from_str(markup, &usvg::Options::default())
        .map_err(|e| AvatarError::raster(format!("parse composite svg: {e}")))?;
    let rgba = render_tree(&tree, opts.size)?;

    let bytes = match opts.format {
        RasterFormat::Png => encode_png(rgba, opts.size)?,
        RasterFormat::Jpeg => encode_jpeg(&rgba, opts.size, opts.jpeg_quality)?,
    };
    tracing::debug!(encoded = bytes.len(), format = ?opts.format, "rasterized avatar");

    Ok(ImageBlob {
        bytes,
        width: opts.size,
        height: opts.size,
        format: opts.format,
    })
}

/// Straight (non-premultiplied) RGBA8 pixels of the tree scaled to `size x size`.
fn render_tree(tree: &usvg::Tree, size: u32) -> AvatarResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size)
        .ok_or_else(|| AvatarError::raster("failed to allocate pixmap"))?;

    let tree_size = tree.size();
    let sx = (size as f32) / tree_size.width();
    let sy = (size as f32) / tree_size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);
    resvg::render(tree, xform, &mut pixmap.as_mut());

    let mut data = pixmap.take();
    demultiply_rgba8_in_place(&mut data);
    Ok(data)
}

fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn encode_png(rgba: Vec<u8>, size: u32) -> AvatarResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(size, size, rgba)
        .ok_or_else(|| AvatarError::raster("pixel buffer does not match output size"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| AvatarError::raster(format!("encode png: {e}")))?;
    Ok(buf)
}

fn encode_jpeg(rgba: &[u8], size: u32, quality: u8) -> AvatarResult<Vec<u8>> {
    let rgb = flatten_on_white(rgba);
    let img = image::RgbImage::from_raw(size, size, rgb)
        .ok_or_else(|| AvatarError::raster("pixel buffer does not match output size"))?;
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(&img)
        .map_err(|e| AvatarError::raster(format!("encode jpeg: {e}")))?;
    Ok(buf)
}

fn flatten_on_white(rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = px[3] as u16;
        for &c in &px[..3] {
            out.push(((c as u16 * a + 255 * (255 - a) + 127) / 255) as u8);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/raster/render.rs"]
mod tests;
