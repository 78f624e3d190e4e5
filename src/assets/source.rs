use crate::{
    catalog::{parts::part_path, sprites},
    model::selection::{Category, PartId},
    recolor::document::{SvgDocument, XmlElement, XmlNode},
};

/// Sprite-sheet file name used when a config does not name one.
pub const DEFAULT_SPRITE_SHEET: &str = "sprites.svg";

/// One symbol cut out of the shared sprite sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolFragment {
    /// Serialized children of the symbol element.
    pub inner_markup: String,
    /// The symbol's own `viewBox`, or the catalog's entry for its id.
    pub view_box: String,
    /// The symbol as a standalone document, with the sheet's top-level `<style>` blocks
    /// prepended so class-driven fills still resolve.
    pub document: SvgDocument,
}

/// Read-only provider of raw part documents.
///
/// A missing or unreadable asset is `None`, never an error: callers drop the layer and carry
/// on. Implementations log the reason.
pub trait AssetSource: Send + Sync {
    /// Raw markup for `path`, relative to the source's root.
    fn fetch_part_document(&self, path: &str) -> Option<String>;

    /// Path of the shared multi-symbol sheet, relative to the root.
    fn sprite_sheet_path(&self) -> &str {
        DEFAULT_SPRITE_SHEET
    }

    /// Fetch and parse the part file for `(category, part)`.
    fn fetch_part(&self, category: Category, part: &PartId) -> Option<SvgDocument> {
        let path = part_path(category, part);
        let raw = self.fetch_part_document(&path)?;
        match SvgDocument::parse(&raw) {
            Ok(doc) => Some(doc),
            Err(err) => {
                tracing::warn!(%path, %err, "part document is not valid svg; omitting layer");
                None
            }
        }
    }

    /// Fetch and parse the shared sprite sheet.
    fn fetch_sprite_sheet(&self) -> Option<SvgDocument> {
        let sheet_path = self.sprite_sheet_path();
        let raw = self.fetch_part_document(sheet_path)?;
        match SvgDocument::parse(&raw) {
            Ok(doc) => Some(doc),
            Err(err) => {
                tracing::warn!(path = %sheet_path, %err, "sprite sheet is not valid svg");
                None
            }
        }
    }

    /// Look up `symbol_id` in the sprite sheet. The sheet is re-read on every call.
    fn fetch_symbol_fragment(&self, symbol_id: &str) -> Option<SymbolFragment> {
        let sheet = self.fetch_sprite_sheet()?;
        let fragment = extract_symbol(&sheet, symbol_id);
        if fragment.is_none() {
            tracing::warn!(%symbol_id, "symbol not found in sprite sheet");
        }
        fragment
    }
}

/// Cut `symbol_id` out of a parsed sheet.
pub fn extract_symbol(sheet: &SvgDocument, symbol_id: &str) -> Option<SymbolFragment> {
    let mut found: Option<&XmlElement> = None;
    sheet.root.walk(&mut |el| {
        if found.is_none() && el.attr("id") == Some(symbol_id) {
            found = Some(el);
        }
    });
    let symbol = found?;

    let view_box = symbol
        .attr("viewBox")
        .unwrap_or_else(|| sprites::view_box(symbol_id))
        .to_owned();

    let mut root = XmlElement::new("svg");
    if let Some(ns) = sheet.root.attr("xmlns") {
        root.set_attr("xmlns", ns);
    }
    root.set_attr("viewBox", view_box.clone());
    // Symbol paint is inherited by its children.
    for (k, v) in &symbol.attrs {
        if !matches!(k.as_str(), "id" | "viewBox" | "xmlns" | "preserveAspectRatio") {
            root.set_attr(k, v.clone());
        }
    }
    // Sheet-level styles live at the top or in a top-level <defs>.
    root.children = sheet
        .root
        .child_elements()
        .flat_map(|el| {
            if el.local_name() == "defs" {
                el.child_elements().collect::<Vec<_>>()
            } else {
                vec![el]
            }
        })
        .filter(|el| el.local_name() == "style")
        .map(|el| XmlNode::Element(el.clone()))
        .collect();
    root.children.extend(symbol.children.iter().cloned());

    let inner = SvgDocument::from_element(XmlElement {
        children: symbol.children.clone(),
        ..XmlElement::new("symbol")
    });

    Some(SymbolFragment {
        inner_markup: inner.inner_markup(),
        view_box,
        document: SvgDocument::from_element(root),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
