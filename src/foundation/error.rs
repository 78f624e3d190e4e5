/// Convenience result type used across the avatar engine.
pub type AvatarResult<T> = Result<T, AvatarError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Most part-level failures never reach this type: a missing or unparsable part is logged and
/// its layer omitted. The variants below are what callers actually have to handle.
#[derive(thiserror::Error, Debug)]
pub enum AvatarError {
    /// Invalid user-provided selection, color or config data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A part document or sprite sheet could not be read or parsed.
    #[error("asset error: {0}")]
    Asset(String),

    /// The merged document could not be rasterized or encoded.
    #[error("raster error: {0}")]
    Raster(String),

    /// The upload endpoint rejected the image or could not be reached.
    #[error("upload error: {message}")]
    Upload {
        /// Human readable failure description.
        message: String,
        /// Whether repeating the same upload may succeed.
        retryable: bool,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AvatarError {
    /// Build a [`AvatarError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`AvatarError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`AvatarError::Raster`] value.
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    /// Build a [`AvatarError::Upload`] value.
    pub fn upload(msg: impl Into<String>, retryable: bool) -> Self {
        Self::Upload {
            message: msg.into(),
            retryable,
        }
    }

    /// Build a [`AvatarError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the failed operation may succeed if repeated unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Upload {
                retryable: true,
                ..
            }
        )
    }
}

impl From<serde_json::Error> for AvatarError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
