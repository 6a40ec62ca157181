use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while pushing a single artifact through the upload pipeline
///
/// Each variant maps to one phase of the handshake, so the final report can
/// tell an operator how far a file got. A failed `Confirmation` means the
/// bytes reached the store but the artifact was never finalized; the control
/// plane treats such an upload as nonexistent.
#[derive(Error, Debug)]
pub enum UploadError {
    /// Local file could not be read
    #[error("failed to read {}: {}", path.display(), source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Control plane refused to issue an upload slot
    #[error("failed to get upload URL: {reason}")]
    SlotRequest { status: Option<u16>, reason: String },

    /// Byte transfer to the store failed
    #[error("failed to upload to store: {reason}")]
    Transfer { status: Option<u16>, reason: String },

    /// Transfer succeeded but the control plane did not finalize the artifact
    #[error("transferred but not confirmed: {reason}")]
    Confirmation { status: Option<u16>, reason: String },
}

impl UploadError {
    /// Pipeline phase this error belongs to, for logging
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Read { .. } => "read",
            Self::SlotRequest { .. } => "slot-request",
            Self::Transfer { .. } => "transfer",
            Self::Confirmation { .. } => "confirm",
        }
    }

    /// Remote HTTP status, where the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Read { .. } => None,
            Self::SlotRequest { status, .. }
            | Self::Transfer { status, .. }
            | Self::Confirmation { status, .. } => *status,
        }
    }
}
