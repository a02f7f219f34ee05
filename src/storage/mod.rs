//! External media store boundary.
//!
//! Uploads short-circuit the enclosing mutation on failure; deletes are
//! best-effort and only logged.

use std::path::Path;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::Deserialize;
use thiserror::Error;

pub mod http;

pub use http::HttpMediaStore;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media store is not configured")]
    NotConfigured,

    #[error("Upload request failed: {0}")]
    UploadFailed(String),

    #[error("Delete request failed: {0}")]
    DeleteFailed(String),

    #[error("Could not read local file: {0}")]
    LocalFile(#[from] std::io::Error),
}

/// A stored asset as reported by the media store
#[derive(Debug, Clone, Deserialize)]
pub struct MediaAsset {
    pub url: String,
    pub public_id: String,
    /// Probed media duration in seconds, present for video uploads
    pub duration: Option<f64>,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, local_path: &Path) -> Result<MediaAsset, MediaError>;
    async fn delete(&self, public_id: &str) -> Result<(), MediaError>;
}

static STORE: Lazy<HttpMediaStore> = Lazy::new(HttpMediaStore::from_config);

/// Shared media store client
pub fn store() -> &'static dyn MediaStore {
    &*STORE
}

/// Delete an uploaded asset, logging failure instead of surfacing it
pub async fn delete_best_effort(public_id: &str) {
    if let Err(e) = store().delete(public_id).await {
        tracing::warn!("Failed to delete media asset {}: {}", public_id, e);
    }
}
