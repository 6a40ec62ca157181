use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart;

use crate::api::client::REQUEST_TIMEOUT;
use crate::api::{ArtifactStore, UploadError, UploadSlot};
use crate::discover::ArtifactFile;

/// HTTP client for the artifact store itself.
///
/// The store is an opaque endpoint: the slot tells us where to POST and which
/// form fields to attach. No credentials are sent here; authorization is baked
/// into the slot's fields by the control plane.
#[derive(Clone)]
pub struct StoreClient {
    client: reqwest::Client,
}

impl StoreClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ArtifactStore for StoreClient {
    async fn transfer(
        &self,
        slot: &UploadSlot,
        file: &ArtifactFile,
        bytes: Vec<u8>,
    ) -> Result<(), UploadError> {
        // The slot's fields go first; S3-style POST policies require the
        // file part to come last.
        let mut form = multipart::Form::new();
        for (name, value) in &slot.fields {
            form = form.text(name.clone(), value.clone());
        }

        let part = multipart::Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(file.content_type())
            .map_err(|e| UploadError::Transfer {
                status: None,
                reason: e.to_string(),
            })?;
        form = form.part("file", part);

        let response = self
            .client
            .post(&slot.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transfer {
                status: None,
                reason: e.to_string(),
            })?;

        // Any 2xx is success; S3-style stores answer 204 No Content
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Transfer {
                status: Some(status.as_u16()),
                reason: format!("status {}: {}", status.as_u16(), body),
            });
        }

        Ok(())
    }
}
