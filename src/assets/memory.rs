use std::collections::HashMap;

use crate::assets::source::{AssetSource, DEFAULT_SPRITE_SHEET};

/// In-memory asset source for embedding and tests.
#[derive(Clone, Debug)]
pub struct MemoryAssetSource {
    documents: HashMap<String, String>,
    sprite_sheet: String,
}

impl Default for MemoryAssetSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAssetSource {
    /// Empty source using the default sprite-sheet path.
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
            sprite_sheet: DEFAULT_SPRITE_SHEET.to_owned(),
        }
    }

    /// Builder-style [`MemoryAssetSource::insert`].
    pub fn with_document(mut self, path: impl Into<String>, markup: impl Into<String>) -> Self {
        self.insert(path, markup);
        self
    }

    /// Builder-style sprite sheet registration under the default path.
    pub fn with_sprite_sheet(mut self, markup: impl Into<String>) -> Self {
        let path = self.sprite_sheet.clone();
        self.insert(path, markup);
        self
    }

    /// Store `markup` under `path`, replacing any previous document.
    pub fn insert(&mut self, path: impl Into<String>, markup: impl Into<String>) {
        self.documents.insert(path.into(), markup.into());
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl AssetSource for MemoryAssetSource {
    fn fetch_part_document(&self, path: &str) -> Option<String> {
        let doc = self.documents.get(path).cloned();
        if doc.is_none() {
            tracing::warn!(%path, "asset not found");
        }
        doc
    }

    fn sprite_sheet_path(&self) -> &str {
        &self.sprite_sheet
    }
}
