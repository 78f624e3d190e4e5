use serde::Deserialize;

use crate::{
    assets::http::http_agent,
    foundation::error::{AvatarError, AvatarResult},
    raster::render::ImageBlob,
};

/// Stores an exported image and returns its public address.
pub trait Uploader: Send + Sync {
    /// Upload `image` on behalf of the holder of `token`.
    fn upload(&self, image: &ImageBlob, token: &str) -> AvatarResult<String>;
}

/// Uploader that POSTs the encoded bytes to an HTTP endpoint.
///
/// The endpoint answers with JSON carrying either `url` or `imageUrl`.
#[derive(Debug)]
pub struct HttpUploader {
    endpoint: String,
    agent: ureq::Agent,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "imageUrl")]
    image_url: Option<String>,
}

impl HttpUploader {
    /// Uploader posting to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            agent: http_agent(),
        }
    }

    /// Target endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Uploader for HttpUploader {
    #[tracing::instrument(skip(self, image, token), fields(endpoint = %self.endpoint, bytes = image.bytes.len()))]
    fn upload(&self, image: &ImageBlob, token: &str) -> AvatarResult<String> {
        if token.trim().is_empty() {
            return Err(AvatarError::upload("missing bearer token", false));
        }

        let mut resp = self
            .agent
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", image.mime())
            .send(image.bytes.as_slice())
            .map_err(upload_error)?;

        let body = resp
            .body_mut()
            .read_to_string()
            .map_err(|e| AvatarError::upload(format!("read upload response: {e}"), true))?;
        image_url_from_response(&body)
    }
}

/// Pull the image address out of an upload response body.
pub fn image_url_from_response(body: &str) -> AvatarResult<String> {
    let parsed: UploadResponse = serde_json::from_str(body)
        .map_err(|e| AvatarError::upload(format!("upload response is not json: {e}"), false))?;
    parsed
        .url
        .or(parsed.image_url)
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AvatarError::upload("upload response carries no image url", false))
}

/// Server errors and throttling may clear up; other statuses will not.
pub fn status_is_retryable(status: u16) -> bool {
    status >= 500 || status == 429
}

fn upload_error(err: ureq::Error) -> AvatarError {
    match err {
        ureq::Error::StatusCode(status) => AvatarError::upload(
            format!("upload rejected with status {status}"),
            status_is_retryable(status),
        ),
        ureq::Error::BadUri(uri) => AvatarError::upload(format!("bad upload url '{uri}'"), false),
        other => AvatarError::upload(format!("upload transport failure: {other}"), true),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/upload.rs"]
mod tests;
