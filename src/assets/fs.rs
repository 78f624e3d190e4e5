use std::path::{Path, PathBuf};

use crate::{
    assets::source::{AssetSource, DEFAULT_SPRITE_SHEET},
    foundation::error::{AvatarError, AvatarResult},
};

/// Normalize and validate asset paths relative to a source root.
///
/// The normalized result uses `/` separators, removes `.` segments and a leading `/`, and
/// rejects parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> AvatarResult<String> {
    let s = source.replace('\\', "/");
    if s.trim().is_empty() {
        return Err(AvatarError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(AvatarError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(AvatarError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Asset source over a static directory tree.
#[derive(Clone, Debug)]
pub struct DirAssetSource {
    root: PathBuf,
    sprite_sheet: String,
}

impl DirAssetSource {
    /// Source rooted at `root` with the default sprite-sheet name.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sprite_sheet: DEFAULT_SPRITE_SHEET.to_owned(),
        }
    }

    /// Override the sprite-sheet path (relative to the root).
    pub fn with_sprite_sheet(mut self, path: impl Into<String>) -> Self {
        self.sprite_sheet = path.into();
        self
    }

    /// Root directory used when resolving relative asset paths.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, path: &str) -> AvatarResult<String> {
        let norm = normalize_rel_path(path)?;
        let full = self.root.join(Path::new(&norm));
        std::fs::read_to_string(&full).map_err(|e| {
            AvatarError::asset(format!("read asset '{}': {e}", full.display()))
        })
    }
}

impl AssetSource for DirAssetSource {
    fn fetch_part_document(&self, path: &str) -> Option<String> {
        match self.read(path) {
            Ok(markup) => Some(markup),
            Err(err) => {
                tracing::warn!(%path, %err, "asset not found");
                None
            }
        }
    }

    fn sprite_sheet_path(&self) -> &str {
        &self.sprite_sheet
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fs.rs"]
mod tests;
