use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::api::{ControlPlane, UploadError};
use crate::discover::ArtifactFile;

/// Bound on each control-plane and store call
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the TraceKit control plane.
///
/// Covers both control-plane operations of the handshake: requesting upload
/// slots and confirming completed transfers. Cheap to clone; the underlying
/// connection pool is shared.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api_key: String,
    app_id: String,
    base_url: String,
}

#[derive(Serialize)]
struct SlotRequest<'a> {
    release: &'a str,
    filename: &'a str,
    original_filename: &'a str,
    content_type: &'a str,
}

/// Server-issued, single-use destination for one artifact transfer.
///
/// `fields` must be submitted verbatim alongside the file content; the store
/// rejects a POST that omits or renames any of them. Slots expire server-side,
/// so an abandoned slot needs no cleanup call.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSlot {
    pub artifact_id: String,
    pub upload_url: String,
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

#[derive(Serialize)]
struct ConfirmRequest<'a> {
    artifact_id: &'a str,
    file_size_bytes: u64,
}

impl ApiClient {
    pub fn new(
        api_key: impl Into<String>,
        app_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            app_id: app_id.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

#[async_trait]
impl ControlPlane for ApiClient {
    async fn request_slot(
        &self,
        release: &str,
        file: &ArtifactFile,
    ) -> Result<UploadSlot, UploadError> {
        let url = format!("{}/apps/{}/artifacts/upload-url", self.base_url, self.app_id);

        let request = SlotRequest {
            release,
            filename: &file.name,
            original_filename: &file.logical_name,
            content_type: file.content_type(),
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&request)
            .send()
            .await
            .map_err(|e| UploadError::SlotRequest {
                status: None,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::SlotRequest {
                status: Some(status.as_u16()),
                reason: format!("status {}: {}", status.as_u16(), body),
            });
        }

        response.json().await.map_err(|e| UploadError::SlotRequest {
            status: None,
            reason: format!("invalid response body: {}", e),
        })
    }

    async fn confirm(&self, slot: &UploadSlot, byte_size: u64) -> Result<(), UploadError> {
        let url = format!("{}/apps/{}/artifacts/confirm", self.base_url, self.app_id);

        let request = ConfirmRequest {
            artifact_id: &slot.artifact_id,
            file_size_bytes: byte_size,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&request)
            .send()
            .await
            .map_err(|e| UploadError::Confirmation {
                status: None,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Confirmation {
                status: Some(status.as_u16()),
                reason: format!("status {}: {}", status.as_u16(), body),
            });
        }

        Ok(())
    }
}
