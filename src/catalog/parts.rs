use std::sync::LazyLock;

use crate::model::selection::{Category, PartId};

/// One selectable part as shipped in the static asset tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Identifier used in selections.
    pub asset_id: PartId,
    /// Label shown in pickers.
    pub display_name: String,
    /// Path relative to the asset root: `<category-dir>/<AssetNamePrefix> <id>.svg`.
    pub file_path: String,
}

/// Directory and file-name prefix for one category's asset files.
#[derive(Clone, Copy, Debug)]
struct CategoryLayout {
    category: Category,
    dir: &'static str,
    name_prefix: &'static str,
    count: u32,
}

static LAYOUTS: [CategoryLayout; 8] = [
    CategoryLayout {
        category: Category::Shape,
        dir: "shape",
        name_prefix: "Shape",
        count: 80,
    },
    CategoryLayout {
        category: Category::Shoes,
        dir: "shoes",
        name_prefix: "Shoes",
        count: 30,
    },
    CategoryLayout {
        category: Category::Uniform,
        dir: "uniform",
        name_prefix: "Uniform",
        count: 60,
    },
    CategoryLayout {
        category: Category::FacialHair,
        dir: "facial-hair",
        name_prefix: "Facial Hair",
        count: 25,
    },
    CategoryLayout {
        category: Category::Makeup,
        dir: "makeup",
        name_prefix: "Makeup",
        count: 15,
    },
    CategoryLayout {
        category: Category::Eyewear,
        dir: "eyewear",
        name_prefix: "Eyewear",
        count: 20,
    },
    CategoryLayout {
        category: Category::Hair,
        dir: "hair",
        name_prefix: "Hair",
        count: 90,
    },
    CategoryLayout {
        category: Category::Headwear,
        dir: "headwear",
        name_prefix: "Headwear",
        count: 40,
    },
];

fn layout(category: Category) -> &'static CategoryLayout {
    // Invariant: LAYOUTS has one row per category.
    LAYOUTS
        .iter()
        .find(|l| l.category == category)
        .unwrap_or(&LAYOUTS[0])
}

/// Relative asset path for any part id, listed in the catalog or not.
pub fn part_path(category: Category, part: &PartId) -> String {
    let l = layout(category);
    format!("{}/{} {part}.svg", l.dir, l.name_prefix)
}

/// Immutable per-category part listing, built once per process.
#[derive(Debug)]
pub struct PartCatalog {
    entries: Vec<(Category, Vec<CatalogEntry>)>,
}

static STANDARD: LazyLock<PartCatalog> = LazyLock::new(PartCatalog::build_standard);

impl PartCatalog {
    /// The shipped catalog.
    pub fn standard() -> &'static PartCatalog {
        &STANDARD
    }

    fn build_standard() -> Self {
        let entries = LAYOUTS
            .iter()
            .map(|l| {
                let parts = (1..=l.count)
                    .map(|n| {
                        let id = PartId::Number(n);
                        CatalogEntry {
                            display_name: format!("{} {n}", l.name_prefix),
                            file_path: part_path(l.category, &id),
                            asset_id: id,
                        }
                    })
                    .collect();
                (l.category, parts)
            })
            .collect();
        Self { entries }
    }

    /// All parts of `category`, in id order.
    pub fn entries(&self, category: Category) -> &[CatalogEntry] {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, e)| e.as_slice())
            .unwrap_or(&[])
    }

    /// Lookup of a single part.
    pub fn entry(&self, category: Category, id: &PartId) -> Option<&CatalogEntry> {
        self.entries(category).iter().find(|e| &e.asset_id == id)
    }

    /// Total number of parts across all categories.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, e)| e.len()).sum()
    }

    /// Whether the catalog lists no parts at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/parts.rs"]
mod tests;
