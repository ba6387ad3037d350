use thiserror::Error;

/// Errors surfaced by the gallery engine and its API client.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("index {index} out of range for collection of {len} items")]
    OutOfRange { index: usize, len: usize },

    #[error("media not found: {0}")]
    NotFound(String),

    #[error("media collection is empty")]
    EmptyCollection,

    /// Server answered with `success: false`.
    #[error("{0}")]
    Api(String),

    #[error("server returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
