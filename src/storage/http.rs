use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;

use super::{MediaAsset, MediaError, MediaStore};

/// HTTP client for the external media store.
///
/// `POST {endpoint}/upload` with a multipart `file` part returns
/// `{url, public_id, duration?}`; `DELETE {endpoint}/assets/{public_id}`
/// removes an asset.
pub struct HttpMediaStore {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpMediaStore {
    pub fn from_config() -> Self {
        let media = &crate::config::config().media;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(media.request_timeout_secs))
            .build()
            .expect("reqwest client");
        Self { client, endpoint: media.endpoint.clone(), api_key: media.api_key.clone() }
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn upload(&self, local_path: &Path) -> Result<MediaAsset, MediaError> {
        if self.endpoint.is_empty() {
            return Err(MediaError::NotConfigured);
        }

        let bytes = tokio::fs::read(local_path).await?;
        let filename = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());

        let form = multipart::Form::new()
            .part("file", multipart::Part::bytes(bytes).file_name(filename));

        let response = self
            .client
            .post(format!("{}/upload", self.endpoint))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MediaError::UploadFailed(format!(
                "media store answered {}",
                response.status()
            )));
        }

        let asset = response
            .json::<MediaAsset>()
            .await
            .map_err(|e| MediaError::UploadFailed(e.to_string()))?;

        tracing::info!("Uploaded media asset {}", asset.public_id);
        Ok(asset)
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        if self.endpoint.is_empty() {
            return Err(MediaError::NotConfigured);
        }

        let response = self
            .client
            .delete(format!("{}/assets/{}", self.endpoint, public_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| MediaError::DeleteFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MediaError::DeleteFailed(format!(
                "media store answered {}",
                response.status()
            )));
        }

        Ok(())
    }
}
