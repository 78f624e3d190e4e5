use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::{
    assets::{
        fs::normalize_rel_path,
        source::{AssetSource, DEFAULT_SPRITE_SHEET},
    },
    foundation::error::{AvatarError, AvatarResult},
};

/// Upper bound on one request, connect to last body byte.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Characters escaped inside one URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Asset source over a static HTTP(S) tree. Any non-2xx answer or transport failure is a miss.
#[derive(Debug)]
pub struct HttpAssetSource {
    base_url: String,
    sprite_sheet: String,
    agent: ureq::Agent,
}

impl HttpAssetSource {
    /// Source rooted at `base_url` (`https://cdn.example.com/avatars`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            sprite_sheet: DEFAULT_SPRITE_SHEET.to_owned(),
            agent: http_agent(),
        }
    }

    /// Override the sprite-sheet path (relative to the base URL).
    pub fn with_sprite_sheet(mut self, path: impl Into<String>) -> Self {
        self.sprite_sheet = path.into();
        self
    }

    /// Absolute URL for a relative asset path, with each segment percent-encoded.
    pub fn url_for(&self, path: &str) -> AvatarResult<String> {
        let norm = normalize_rel_path(path)?;
        let encoded: Vec<String> = norm
            .split('/')
            .map(|seg| utf8_percent_encode(seg, SEGMENT).to_string())
            .collect();
        Ok(format!("{}/{}", self.base_url, encoded.join("/")))
    }

    fn get(&self, path: &str) -> AvatarResult<String> {
        let url = self.url_for(path)?;
        let mut resp = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| AvatarError::asset(format!("GET {url}: {e}")))?;
        resp.body_mut()
            .read_to_string()
            .map_err(|e| AvatarError::asset(format!("read body of {url}: {e}")))
    }
}

impl AssetSource for HttpAssetSource {
    fn fetch_part_document(&self, path: &str) -> Option<String> {
        match self.get(path) {
            Ok(markup) => Some(markup),
            Err(err) => {
                tracing::warn!(%path, %err, "asset fetch failed");
                None
            }
        }
    }

    fn sprite_sheet_path(&self) -> &str {
        &self.sprite_sheet
    }
}

/// Blocking agent with a global timeout, shared by the HTTP source and uploader.
pub(crate) fn http_agent() -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(HTTP_TIMEOUT))
        .build();
    config.into()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/http.rs"]
mod tests;
