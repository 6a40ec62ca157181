use anyhow::Result;
use futures::{StreamExt, stream};
use indicatif::ProgressBar;
use std::path::Path;
use tracing::{debug, error, info};

use crate::api::{ArtifactStore, ControlPlane, UploadError};
use crate::discover::{ArtifactFile, discover};
use crate::report::{UploadOutcome, UploadReport};

/// Default number of files in flight at once
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Drives the three-phase handshake for a batch of artifacts.
///
/// Each file runs its own pipeline: read bytes, request a slot, transfer,
/// confirm. The first failing phase ends that file's pipeline and is recorded
/// in the report; it never aborts the rest of the batch. Failed slots are
/// abandoned, so a rerun of the whole tool always starts from fresh slots.
pub struct Uploader<C, S> {
    control: C,
    store: S,
    max_concurrent: usize,
}

impl<C: ControlPlane, S: ArtifactStore> Uploader<C, S> {
    pub fn new(control: C, store: S) -> Self {
        Self {
            control,
            store,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Discover artifacts under `root` and upload them all.
    pub async fn run(
        &self,
        release: &str,
        root: &Path,
        suffix: &str,
        progress: Option<&ProgressBar>,
    ) -> Result<UploadReport> {
        let files = discover(root, suffix);
        if files.is_empty() {
            info!(
                "no artifacts matching '{}' under {}",
                suffix,
                root.display()
            );
        }

        self.upload_files(release, &files, progress).await
    }

    /// Upload an already-discovered set of artifacts.
    ///
    /// Outcomes are reported in the order of `files` regardless of which
    /// pipeline finishes first.
    pub async fn upload_files(
        &self,
        release: &str,
        files: &[ArtifactFile],
        progress: Option<&ProgressBar>,
    ) -> Result<UploadReport> {
        if release.trim().is_empty() {
            anyhow::bail!("release label cannot be empty");
        }

        if files.is_empty() {
            return Ok(UploadReport::default());
        }

        info!(
            "uploading {} artifact(s) for release '{}'",
            files.len(),
            release
        );

        // One result slot per discovery position keeps the report in
        // discovery order without any cross-pipeline coordination.
        let mut slots: Vec<Option<UploadOutcome>> = Vec::with_capacity(files.len());
        slots.resize_with(files.len(), || None);

        let mut pipelines = stream::iter(
            files
                .iter()
                .enumerate()
                .map(|(idx, file)| async move { (idx, self.upload_one(release, file).await) }),
        )
        .buffer_unordered(self.max_concurrent);

        while let Some((idx, outcome)) = pipelines.next().await {
            if let Some(pb) = progress {
                pb.inc(1);
            }
            slots[idx] = Some(outcome);
        }

        Ok(UploadReport::new(slots.into_iter().flatten().collect()))
    }

    async fn upload_one(&self, release: &str, file: &ArtifactFile) -> UploadOutcome {
        let bytes = match tokio::fs::read(&file.path).await {
            Ok(bytes) => bytes,
            Err(source) => {
                return self.fail(
                    file,
                    None,
                    UploadError::Read {
                        path: file.path.clone(),
                        source,
                    },
                );
            }
        };
        let byte_size = bytes.len() as u64;

        let slot = match self.control.request_slot(release, file).await {
            Ok(slot) => slot,
            Err(err) => return self.fail(file, None, err),
        };

        if let Err(err) = self.store.transfer(&slot, file, bytes).await {
            // The slot is abandoned here; it must never be confirmed or reused
            return self.fail(file, Some(slot.artifact_id), err);
        }

        if let Err(err) = self.control.confirm(&slot, byte_size).await {
            return self.fail(file, Some(slot.artifact_id), err);
        }

        debug!("uploaded {} as {}", file.name, slot.artifact_id);
        UploadOutcome::Uploaded {
            artifact: file.name.clone(),
            artifact_id: slot.artifact_id,
        }
    }

    fn fail(
        &self,
        file: &ArtifactFile,
        artifact_id: Option<String>,
        err: UploadError,
    ) -> UploadOutcome {
        error!("{} failed at {}: {}", file.name, err.phase(), err);
        UploadOutcome::Failed {
            artifact: file.name.clone(),
            artifact_id,
            error: err.to_string(),
        }
    }
}
