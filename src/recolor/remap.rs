use std::sync::LazyLock;

use regex::Regex;

use crate::{
    catalog::sprites::DEFAULT_VIEW_BOX,
    foundation::color::HexColor,
    palette::derive::ColorPalette,
    recolor::{
        document::{SvgDocument, XmlElement, XmlNode, escape_attr},
        styles::{self, ClassFills},
    },
};

/// Source tones painted into every multi-tone hair asset.
pub const HAIR_SOURCE_BASE: &str = "#8b5a2b";
/// Lit source tone in hair and facial hair assets.
pub const HAIR_SOURCE_HIGHLIGHT: &str = "#a0703c";
/// Extra shading tone only facial hair assets use.
pub const FACIAL_HAIR_SOURCE_SHADOW: &str = "#6e4520";

static NEAR_BLACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#000(?:[0-3]{3})?$").expect("valid regex"));

/// Inheritable presentation attributes carried over from a part's root element.
const ROOT_PAINT_ATTRS: [&str; 12] = [
    "class",
    "style",
    "color",
    "fill",
    "fill-opacity",
    "fill-rule",
    "opacity",
    "stroke",
    "stroke-width",
    "stroke-opacity",
    "stroke-linecap",
    "stroke-linejoin",
];

/// Result of a recolor pass: the root's children as markup plus the geometry to place them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recolored {
    /// Inner markup of the part's root element.
    pub content: String,
    /// The part's `viewBox`, or the default view box when it declares none.
    pub view_box: String,
    /// Paint the root passed down to its children (`fill`, `class`, `style`, ...), already
    /// recolored. Whatever element replaces the root must carry these.
    pub root_paint: Vec<(String, String)>,
}

impl Recolored {
    fn from_document(doc: &SvgDocument) -> Self {
        let root_paint = doc
            .root
            .attrs
            .iter()
            .filter(|(k, _)| ROOT_PAINT_ATTRS.contains(&k.as_str()))
            .cloned()
            .collect();
        Self {
            content: doc.inner_markup(),
            view_box: doc.view_box().unwrap_or(DEFAULT_VIEW_BOX).to_owned(),
            root_paint,
        }
    }

    /// [`Recolored::root_paint`] as attribute text with a leading space per attribute.
    pub fn root_paint_attrs(&self) -> String {
        self.root_paint
            .iter()
            .map(|(k, v)| format!(r#" {k}="{}""#, escape_attr(v)))
            .collect()
    }
}

/// Fixed `source color -> palette tone` pairs for a substitution pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FillMap {
    pairs: Vec<(HexColor, HexColor)>,
}

impl FillMap {
    /// Map built from explicit pairs; later pairs win on duplicate sources.
    pub fn new(pairs: impl IntoIterator<Item = (HexColor, HexColor)>) -> Self {
        let mut out = Self::default();
        for (from, to) in pairs {
            out.pairs.retain(|(f, _)| *f != from);
            out.pairs.push((from, to));
        }
        out
    }

    /// Hair: base and highlight tones.
    pub fn hair(palette: &ColorPalette) -> Self {
        Self::new(source_pairs(&[
            (HAIR_SOURCE_BASE, &palette.base),
            (HAIR_SOURCE_HIGHLIGHT, &palette.highlight),
        ]))
    }

    /// Facial hair: like hair, but its shadow tone collapses onto the base, since beards show
    /// too few tone regions for a separate lowlight to read.
    pub fn facial_hair(palette: &ColorPalette) -> Self {
        Self::new(source_pairs(&[
            (HAIR_SOURCE_BASE, &palette.base),
            (HAIR_SOURCE_HIGHLIGHT, &palette.highlight),
            (FACIAL_HAIR_SOURCE_SHADOW, &palette.base),
        ]))
    }

    /// Replacement for a raw fill value, if it names a mapped color.
    pub fn lookup(&self, value: &str) -> Option<&HexColor> {
        let color = HexColor::parse(value).ok()?;
        self.pairs.iter().find(|(f, _)| *f == color).map(|(_, t)| t)
    }
}

fn source_pairs(pairs: &[(&str, &HexColor)]) -> Vec<(HexColor, HexColor)> {
    pairs
        .iter()
        .filter_map(|(src, to)| Some((HexColor::parse(src).ok()?, (*to).clone())))
        .collect()
}

/// Whether a resolved fill is structural linework rather than a colorable region.
///
/// Only `none`, `black` and `#000`..`#000333`-style values count; other dark colors are
/// treated as colorable.
pub fn is_structural_fill(fill: &str) -> bool {
    let f = fill.trim().to_ascii_lowercase();
    f == "none" || f == "black" || NEAR_BLACK_RE.is_match(&f)
}

/// Replace every fill whose value appears in `map`; all other fills are left byte-identical.
///
/// Covers `fill` attributes, inline `style` fills and `<style>` rules.
pub fn substitute_known_fills(doc: &SvgDocument, map: &FillMap) -> Recolored {
    let root = substitute_element(&doc.root, map);
    Recolored::from_document(&SvgDocument::from_element(root))
}

fn substitute_element(el: &XmlElement, map: &FillMap) -> XmlElement {
    let mut out = XmlElement::new(el.name.clone());
    for (k, v) in &el.attrs {
        let value = match k.as_str() {
            "fill" => map
                .lookup(v)
                .map(|c| c.as_str().to_owned())
                .unwrap_or_else(|| v.clone()),
            "style" => replace_mapped(v, map),
            _ => v.clone(),
        };
        out.attrs.push((k.clone(), value));
    }
    let is_style = el.local_name() == "style";
    out.children = el
        .children
        .iter()
        .map(|child| match child {
            XmlNode::Element(e) => XmlNode::Element(substitute_element(e, map)),
            XmlNode::Text(t) if is_style => XmlNode::Text(replace_mapped(t, map)),
            other => other.clone(),
        })
        .collect();
    out
}

fn replace_mapped(css: &str, map: &FillMap) -> String {
    styles::replace_fill_values(css, |v| map.lookup(v).map(|c| c.as_str().to_owned()))
}

/// Flatten class-driven coloring into inline fills, recoloring every colorable region.
///
/// `<style>` blocks are removed. With `target == None` class fills are inlined as declared and
/// everything else is untouched. With a target, every element whose original resolved fill is
/// colorable takes the target; structural fills are inlined as they were so outlines survive
/// the style removal. Classification always reads the source document, never a partially
/// rewritten one.
pub fn recolor_all_regions(doc: &SvgDocument, target: Option<&HexColor>) -> Recolored {
    let mut sheets = Vec::new();
    doc.root.walk(&mut |el| {
        if el.local_name() == "style" {
            sheets.push(el.text());
        }
    });
    let classes = ClassFills::from_stylesheets(sheets.iter().map(String::as_str));

    // The root is painted like any other element; its children inherit the result.
    let root = recolor_element(&doc.root, &classes, target);
    Recolored::from_document(&SvgDocument::from_element(root))
}

fn recolor_children(
    children: &[XmlNode],
    classes: &ClassFills,
    target: Option<&HexColor>,
) -> Vec<XmlNode> {
    children
        .iter()
        .filter_map(|child| match child {
            XmlNode::Element(e) if e.local_name() == "style" => None,
            XmlNode::Element(e) => Some(XmlNode::Element(recolor_element(e, classes, target))),
            other => Some(other.clone()),
        })
        .collect()
}

fn recolor_element(el: &XmlElement, classes: &ClassFills, target: Option<&HexColor>) -> XmlElement {
    let class_fill = el.attr("class").and_then(|c| classes.resolve(c));
    let style_fill = el.attr("style").and_then(styles::declared_fill);

    let mut out = XmlElement::new(el.name.clone());
    out.attrs = el.attrs.clone();
    out.children = recolor_children(&el.children, classes, target);

    match target {
        None => {
            if let Some(fill) = class_fill {
                out.set_attr("fill", fill);
                out.remove_attr("class");
            }
        }
        Some(color) => {
            // Inline style beats class rules, which beat the presentation attribute.
            let resolved = style_fill.or(class_fill).or_else(|| el.attr("fill"));
            if let Some(original) = resolved {
                let fill = if is_structural_fill(original) {
                    original.to_owned()
                } else {
                    color.as_str().to_owned()
                };
                out.set_attr("fill", fill);
                if class_fill.is_some() {
                    out.remove_attr("class");
                }
                if style_fill.is_some() {
                    match el.attr("style").and_then(styles::strip_fill_decl) {
                        Some(style) => out.set_attr("style", style),
                        None => {
                            out.remove_attr("style");
                        }
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/recolor/remap.rs"]
mod tests;
