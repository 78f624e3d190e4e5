use rayon::prelude::*;

use crate::{
    assets::source::AssetSource,
    catalog::sprites,
    compose::anchors::Anchor,
    foundation::{
        color::HexColor,
        error::{AvatarError, AvatarResult},
    },
    model::selection::{Category, PartId, PartSelection, RecolorPolicy},
    palette::derive::{default_hair_color, derive_palette},
    recolor::{
        document::{SvgDocument, escape_attr},
        remap::{FillMap, Recolored, recolor_all_regions, substitute_known_fills},
    },
};

/// Logical edge length of the square composite canvas.
pub const CANVAS_SIZE: u32 = 400;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Knobs for one compose call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Canvas edge length in logical units.
    pub canvas_size: u32,
    /// Palette seed for hair and facial hair when the selection carries no color.
    pub default_hair_color: HexColor,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            canvas_size: CANVAS_SIZE,
            default_hair_color: default_hair_color(),
        }
    }
}

/// One layer that made it into the merged document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposedLayer {
    /// Category of the layer.
    pub category: Category,
    /// Selected part.
    pub part: PartId,
    /// Stable tag such as `shape-62`, written to `data-part`.
    pub tag: String,
    /// View box the part was drawn in.
    pub view_box: String,
}

/// The stacked, recolored, positioned avatar as one SVG document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedDocument {
    /// Self-contained SVG markup with a `0 0 N N` view box.
    pub markup: String,
    /// Canvas edge length in logical units.
    pub canvas_size: u32,
    /// Layers present, back to front.
    pub layers: Vec<ComposedLayer>,
}

impl MergedDocument {
    /// Number of layer groups in the document.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Whether `category` produced a layer.
    pub fn has_layer(&self, category: Category) -> bool {
        self.layers.iter().any(|l| l.category == category)
    }
}

/// Compose with the default canvas and hair color.
pub fn compose(selection: &PartSelection, source: &dyn AssetSource) -> AvatarResult<MergedDocument> {
    compose_with(selection, source, &ComposeOptions::default())
}

/// Fetch, recolor and place every populated category, then merge back to front.
///
/// Layers whose part is missing or unparsable are dropped with a warning; only an invalid
/// selection or options fail the call.
#[tracing::instrument(skip_all, fields(shape = %selection.shape))]
pub fn compose_with(
    selection: &PartSelection,
    source: &dyn AssetSource,
    opts: &ComposeOptions,
) -> AvatarResult<MergedDocument> {
    selection.validate()?;
    if opts.canvas_size == 0 {
        return Err(AvatarError::validation("canvas size must be > 0"));
    }

    let wanted: Vec<(Category, &PartId, Option<&HexColor>)> = selection.populated().collect();

    // Order of completion is irrelevant: `collect` keeps input order.
    let built: Vec<Option<(ComposedLayer, String)>> = wanted
        .par_iter()
        .map(|&(category, part, color)| build_layer(source, category, part, color, opts))
        .collect();

    let mut layers = Vec::with_capacity(built.len());
    let mut body = String::new();
    for (layer, markup) in built.into_iter().flatten() {
        body.push_str(&markup);
        layers.push(layer);
    }

    let n = opts.canvas_size;
    let markup = canvas_document(n, &body);
    tracing::debug!(layers = layers.len(), "composed avatar");
    Ok(MergedDocument {
        markup,
        canvas_size: n,
        layers,
    })
}

/// Apply the category's recolor policy to a parsed part.
///
/// Hair and facial hair swap their known source tones for a palette derived from `color`
/// (or `default_hair_color`); every other category recolors all colorable regions with the
/// raw color, or keeps the source colors when `color` is `None`.
pub fn recolor_layer(
    category: Category,
    doc: &SvgDocument,
    color: Option<&HexColor>,
    default_hair_color: &HexColor,
) -> Recolored {
    match category.recolor_policy() {
        RecolorPolicy::Substitute => {
            let palette = derive_palette(color.unwrap_or(default_hair_color));
            let map = if category == Category::FacialHair {
                FillMap::facial_hair(&palette)
            } else {
                FillMap::hair(&palette)
            };
            substitute_known_fills(doc, &map)
        }
        RecolorPolicy::RecolorAll => recolor_all_regions(doc, color),
    }
}

fn build_layer(
    source: &dyn AssetSource,
    category: Category,
    part: &PartId,
    color: Option<&HexColor>,
    opts: &ComposeOptions,
) -> Option<(ComposedLayer, String)> {
    let Some(doc) = source.fetch_part(category, part) else {
        tracing::warn!(%category, %part, "part unavailable; omitting layer");
        return None;
    };

    let scoped = doc.scoped(category.key());
    let recolored = recolor_layer(category, &scoped, color, &opts.default_hair_color);
    let tag = sprites::category_tag(&sprites::symbol_id(category, part), category);
    tracing::debug!(%category, %tag, view_box = %recolored.view_box, "layer recolored");

    let n = opts.canvas_size;
    let inner = format!(
        r#"<svg width="{n}" height="{n}" viewBox="{vb}" overflow="visible"{paint}>{content}</svg>"#,
        vb = escape_attr(&recolored.view_box),
        paint = recolored.root_paint_attrs(),
        content = recolored.content,
    );
    let markup = layer_group(category, &tag, &inner);

    Some((
        ComposedLayer {
            category,
            part: part.clone(),
            tag,
            view_box: recolored.view_box,
        },
        markup,
    ))
}

/// Anchored `<g>` wrapper shared by the composite and the live preview.
pub(crate) fn layer_group(category: Category, tag: &str, inner: &str) -> String {
    format!(
        r#"<g data-layer="{key}" data-part="{tag}" transform="{transform}">{inner}</g>"#,
        key = category.key(),
        tag = escape_attr(tag),
        transform = Anchor::for_category(category).transform_attr(),
    )
}

/// Root `<svg>` of a square canvas around already-serialized layers.
///
/// Layer bodies are children of their part's root, so the `xlink` prefix that root may have
/// declared is re-declared here.
pub(crate) fn canvas_document(size: u32, body: &str) -> String {
    format!(
        r#"<svg xmlns="{SVG_NS}" width="{size}" height="{size}" viewBox="0 0 {size} {size}" xmlns:xlink="{XLINK_NS}">{body}</svg>"#
    )
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
