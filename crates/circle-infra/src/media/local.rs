//! Images written to a directory on local disk and served from a public prefix.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use circle_core::ports::{MediaError, MediaStore, StoredMedia};

const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Directory uploads are written to.
    pub root: PathBuf,
    /// URL prefix the directory is served under.
    pub public_base_url: String,
    pub max_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("uploads"),
            public_base_url: "/uploads".to_string(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl MediaConfig {
    /// `UPLOAD_DIR`, `UPLOAD_PUBLIC_URL`, `UPLOAD_MAX_BYTES`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            root: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.root),
            public_base_url: std::env::var("UPLOAD_PUBLIC_URL")
                .unwrap_or(defaults.public_base_url),
            max_bytes: std::env::var("UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_bytes),
        }
    }
}

pub struct LocalMediaStore {
    config: MediaConfig,
}

impl LocalMediaStore {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }
}

/// File extension for an `image/*` content type, `None` for anything else.
fn image_extension(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let subtype = essence.strip_prefix("image/")?;

    Some(match subtype {
        "jpeg" | "jpg" | "pjpeg" => "jpg",
        "png" => "png",
        "gif" => "gif",
        "webp" => "webp",
        "svg+xml" => "svg",
        "bmp" => "bmp",
        "avif" => "avif",
        "" => return None,
        _ => "img",
    })
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    fn max_bytes(&self) -> usize {
        self.config.max_bytes
    }

    async fn store(&self, content_type: &str, bytes: Vec<u8>) -> Result<StoredMedia, MediaError> {
        let ext = image_extension(content_type)
            .ok_or_else(|| MediaError::UnsupportedType(content_type.to_string()))?;

        if bytes.is_empty() {
            return Err(MediaError::Empty);
        }
        if bytes.len() > self.config.max_bytes {
            return Err(MediaError::TooLarge(self.config.max_bytes));
        }

        fs::create_dir_all(&self.config.root)
            .await
            .map_err(|e| MediaError::Io(e.to_string()))?;

        let file_name = format!("{}.{ext}", Uuid::new_v4());
        let path = self.config.root.join(&file_name);
        fs::write(&path, &bytes)
            .await
            .map_err(|e| MediaError::Io(e.to_string()))?;

        tracing::debug!(file = %path.display(), size = bytes.len(), "Stored upload");

        Ok(StoredMedia {
            url: format!(
                "{}/{file_name}",
                self.config.public_base_url.trim_end_matches('/')
            ),
            file_name,
            size: bytes.len(),
        })
    }
}
