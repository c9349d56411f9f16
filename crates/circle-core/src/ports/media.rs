//! Media storage port - where uploaded images end up.

use async_trait::async_trait;

/// A file accepted by the media store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub file_name: String,
    pub url: String,
    pub size: usize,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Largest accepted payload in bytes.
    fn max_bytes(&self) -> usize;

    /// Persist an image and return where it can be fetched from.
    async fn store(&self, content_type: &str, bytes: Vec<u8>) -> Result<StoredMedia, MediaError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),

    #[error("File exceeds the {0} byte limit")]
    TooLarge(usize),

    #[error("Empty file")]
    Empty,

    #[error("Storage failed: {0}")]
    Io(String),
}
