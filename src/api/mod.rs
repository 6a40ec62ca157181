pub mod client;
pub mod error;
pub mod store;

pub use client::{ApiClient, UploadSlot};
pub use error::UploadError;
pub use store::StoreClient;

use async_trait::async_trait;

use crate::discover::ArtifactFile;

/// Control-plane half of the upload handshake.
///
/// Issues single-use upload slots and finalizes artifacts once their bytes
/// have landed in the store. A slot is scoped to one (release, filename) pair
/// and must never be reused: after any failure the caller abandons it and a
/// retry starts over with a fresh slot.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Request an upload slot for one artifact.
    async fn request_slot(
        &self,
        release: &str,
        file: &ArtifactFile,
    ) -> Result<UploadSlot, UploadError>;

    /// Report a completed transfer so the artifact becomes visible.
    ///
    /// Must only be called after the transfer for `slot` succeeded.
    async fn confirm(&self, slot: &UploadSlot, byte_size: u64) -> Result<(), UploadError>;
}

/// Store half of the handshake: moves the actual bytes.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Submit the file content to the slot's destination, together with
    /// every field the slot demands.
    async fn transfer(
        &self,
        slot: &UploadSlot,
        file: &ArtifactFile,
        bytes: Vec<u8>,
    ) -> Result<(), UploadError>;
}
