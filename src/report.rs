/// Terminal state of one artifact's upload pipeline.
///
/// `Failed` keeps the artifact id when the slot phase succeeded, so a
/// "transferred but not confirmed" file can be traced on the server side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded {
        artifact: String,
        artifact_id: String,
    },
    Failed {
        artifact: String,
        artifact_id: Option<String>,
        error: String,
    },
}

impl UploadOutcome {
    /// Display name of the artifact this outcome belongs to
    pub fn artifact(&self) -> &str {
        match self {
            Self::Uploaded { artifact, .. } | Self::Failed { artifact, .. } => artifact,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Uploaded { .. })
    }
}

/// Aggregate result of one upload batch, in discovery order.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub outcomes: Vec<UploadOutcome>,
}

impl UploadReport {
    pub fn new(outcomes: Vec<UploadOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Failed outcomes only, for the end-of-run enumeration
    pub fn failures(&self) -> impl Iterator<Item = &UploadOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// A run is clean when nothing failed; zero discovered files counts
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uploaded(name: &str) -> UploadOutcome {
        UploadOutcome::Uploaded {
            artifact: name.to_string(),
            artifact_id: format!("art_{name}"),
        }
    }

    fn failed(name: &str, error: &str) -> UploadOutcome {
        UploadOutcome::Failed {
            artifact: name.to_string(),
            artifact_id: None,
            error: error.to_string(),
        }
    }

    #[test]
    fn counts_partition_the_outcomes() {
        let report = UploadReport::new(vec![
            uploaded("app.js.map"),
            failed("vendor.js.map", "failed to get upload URL: status 403"),
            uploaded("chunk.js.map"),
        ]);

        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.total(), report.succeeded() + report.failed());
        assert!(!report.is_clean());
    }

    #[test]
    fn empty_report_is_clean() {
        let report = UploadReport::default();

        assert_eq!(report.total(), 0);
        assert_eq!(report.succeeded(), 0);
        assert_eq!(report.failed(), 0);
        assert!(report.is_clean());
    }

    #[test]
    fn failures_iterates_failed_outcomes_only() {
        let report = UploadReport::new(vec![
            uploaded("a.js.map"),
            failed("b.js.map", "failed to upload to store: status 500"),
        ]);

        let names: Vec<&str> = report.failures().map(|o| o.artifact()).collect();

        assert_eq!(names, vec!["b.js.map"]);
    }
}
