//! Geometry tables for sprite-sheet symbols and stable layer tags.
//!
//! The numbers here are hand-tuned against the shipped art; they are data, not layout.

use crate::model::selection::{Category, PartId};

/// View box used for any id that has no table entry.
pub const DEFAULT_VIEW_BOX: &str = "0 0 300 300";

/// View box shared by every `body-<n>` symbol not listed explicitly.
pub const DEFAULT_BODY_VIEW_BOX: &str = "0 0 200 400";

/// Display geometry of one body-shape symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BodySymbol {
    /// Rendered width in preview pixels.
    pub display_width: u32,
    /// Rendered height in preview pixels.
    pub display_height: u32,
    /// `minX minY width height` of the symbol.
    pub view_box: &'static str,
}

const DEFAULT_BODY: BodySymbol = BodySymbol {
    display_width: 200,
    display_height: 400,
    view_box: DEFAULT_BODY_VIEW_BOX,
};

static BODY_SYMBOLS: &[(&str, BodySymbol)] = &[
    (
        "body-1",
        BodySymbol {
            display_width: 180,
            display_height: 400,
            view_box: "0 0 180 400",
        },
    ),
    (
        "body-2",
        BodySymbol {
            display_width: 220,
            display_height: 400,
            view_box: "0 0 220 400",
        },
    ),
    (
        "body-3",
        BodySymbol {
            display_width: 240,
            display_height: 390,
            view_box: "-10 0 240 390",
        },
    ),
    (
        "body-4",
        BodySymbol {
            display_width: 200,
            display_height: 380,
            view_box: "0 10 200 380",
        },
    ),
    (
        "body-5",
        BodySymbol {
            display_width: 260,
            display_height: 400,
            view_box: "-20 0 260 400",
        },
    ),
];

static VIEW_BOXES: &[(&str, &str)] = &[
    ("hair-1", "0 0 320 260"),
    ("hair-2", "0 0 320 280"),
    ("hair-3", "-10 -10 340 300"),
    ("facial-hair-1", "0 0 160 120"),
    ("facial-hair-2", "0 0 160 140"),
    ("eyewear-1", "0 0 240 80"),
    ("eyewear-2", "0 0 240 90"),
    ("headwear-1", "0 0 320 200"),
    ("headwear-2", "0 0 340 220"),
    ("shoes-1", "0 0 200 80"),
    ("uniform-1", "0 0 250 260"),
    ("uniform-2", "0 0 250 280"),
    ("makeup-1", "0 0 160 160"),
];

/// View box for a symbol or part id. Never fails: unknown ids get a default.
pub fn view_box(id: &str) -> &'static str {
    if let Some(body) = BODY_SYMBOLS.iter().find(|(k, _)| *k == id) {
        return body.1.view_box;
    }
    if let Some((_, vb)) = VIEW_BOXES.iter().find(|(k, _)| *k == id) {
        return *vb;
    }
    if numeric_suffix(id, "body-").is_some() {
        return DEFAULT_BODY_VIEW_BOX;
    }
    DEFAULT_VIEW_BOX
}

/// Display geometry for a body symbol, falling back to the shared default.
pub fn body_symbol(id: &str) -> BodySymbol {
    BODY_SYMBOLS
        .iter()
        .find(|(k, _)| *k == id)
        .map(|(_, b)| *b)
        .unwrap_or(DEFAULT_BODY)
}

/// Sprite-sheet symbol naming prefix for a category.
pub fn symbol_prefix(category: Category) -> &'static str {
    match category {
        Category::Shape => "body-",
        Category::Shoes => "shoes-",
        Category::Uniform => "uniform-",
        Category::FacialHair => "facial-hair-",
        Category::Makeup => "makeup-",
        Category::Eyewear => "eyewear-",
        Category::Hair => "hair-",
        Category::Headwear => "headwear-",
    }
}

/// Sprite-sheet symbol id of a part (`7` in [`Category::Shape`] is `body-7`).
pub fn symbol_id(category: Category, part: &PartId) -> String {
    match part {
        PartId::Number(n) => format!("{}{n}", symbol_prefix(category)),
        PartId::Symbol(s) => s.clone(),
    }
}

/// Stable identifying tag for a rendered layer: `body-7` becomes `shape-07`.
///
/// Ids that do not follow the category's naming pattern are returned unchanged.
pub fn category_tag(id: &str, category: Category) -> String {
    match numeric_suffix(id, symbol_prefix(category)) {
        Some(n) => format!("{}-{n:02}", category.key()),
        None => id.to_owned(),
    }
}

fn numeric_suffix(id: &str, prefix: &str) -> Option<u32> {
    let digits = id.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/sprites.rs"]
mod tests;
