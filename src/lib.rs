//! Avatar compositing engine.
//!
//! An avatar is a sparse [`PartSelection`]: one body shape plus optional hair, headwear,
//! uniform, shoes, eyewear, facial hair and makeup, each with an optional color. The engine:
//!
//! - fetches each part's SVG through an [`AssetSource`] (directory, HTTP, or in-memory)
//! - recolors it: single-tone parts via [`recolor_all_regions`], hair and facial hair via
//!   palette substitution ([`derive_palette`] + [`substitute_known_fills`])
//! - anchors every layer on a shared 400x400 canvas and merges them back to front
//!   ([`compose`])
//! - rasterizes the merged document ([`rasterize`]) and uploads it ([`export_avatar`])
//!
//! A missing or broken part never fails a compose; its layer is omitted and a warning logged.
//! Raster and upload failures are the errors callers must surface.
//!
//! For live previews, [`PreviewSession`] fetches layers in the background and exposes a
//! race-free `is_loading` signal backed by [`LoadStateTracker`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod catalog;
mod compose;
mod config;
mod export;
mod foundation;
mod model;
mod palette;
mod preview;
mod raster;
mod recolor;

pub use crate::foundation::color::HexColor;
pub use crate::foundation::error::{AvatarError, AvatarResult};

pub use crate::model::avatar_config::{AvatarColors, AvatarConfig};
pub use crate::model::selection::{Category, PartId, PartSelection, RecolorPolicy};

pub use crate::catalog::parts::{CatalogEntry, PartCatalog, part_path};
pub use crate::catalog::sprites::{
    BodySymbol, DEFAULT_BODY_VIEW_BOX, DEFAULT_VIEW_BOX, body_symbol, category_tag, symbol_id,
    view_box,
};

pub use crate::assets::fs::{DirAssetSource, normalize_rel_path};
pub use crate::assets::http::{HTTP_TIMEOUT, HttpAssetSource};
pub use crate::assets::memory::MemoryAssetSource;
pub use crate::assets::source::{AssetSource, DEFAULT_SPRITE_SHEET, SymbolFragment, extract_symbol};

pub use crate::palette::derive::{
    ColorPalette, DEFAULT_HAIR_COLOR, default_hair_color, default_hair_palette, derive_palette,
};
pub use crate::palette::hsl::Hsl;

pub use crate::recolor::document::{SvgDocument, XmlElement, XmlNode};
pub use crate::recolor::remap::{
    FACIAL_HAIR_SOURCE_SHADOW, FillMap, HAIR_SOURCE_BASE, HAIR_SOURCE_HIGHLIGHT, Recolored,
    is_structural_fill, recolor_all_regions, substitute_known_fills,
};
pub use crate::recolor::styles::ClassFills;

pub use crate::compose::anchors::Anchor;
pub use crate::compose::compositor::{
    CANVAS_SIZE, ComposeOptions, ComposedLayer, MergedDocument, compose, compose_with,
    recolor_layer,
};

pub use crate::raster::render::{
    DEFAULT_JPEG_QUALITY, ImageBlob, MAX_DIM, RasterFormat, RasterOptions, rasterize,
    rasterize_markup, rasterize_with,
};

pub use crate::preview::session::{PreviewLayer, PreviewSession};
pub use crate::preview::tracker::{
    DEFAULT_SPRITE_REVEAL_DELAY, LoadPhase, LoadStateTracker, Ticket, TrackedSlot,
};

pub use crate::export::pipeline::{ExportOptions, export_avatar, export_avatar_with};
pub use crate::export::upload::{HttpUploader, Uploader};

pub use crate::config::settings::EngineConfig;
