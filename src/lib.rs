pub mod api;
pub mod config;
pub mod discover;
pub mod report;
pub mod upload;

pub use api::{ApiClient, ArtifactStore, ControlPlane, StoreClient, UploadError, UploadSlot};
pub use config::Config;
pub use discover::{ArtifactFile, discover};
pub use report::{UploadOutcome, UploadReport};
pub use upload::{DEFAULT_MAX_CONCURRENT, Uploader};
