use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// A build-output file selected for upload.
///
/// Created by [`discover`] and read-only afterwards. `logical_name` is the
/// file name with the suffix stripped, i.e. the name of the build output the
/// artifact describes (`app.js.map` → `app.js`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub path: PathBuf,
    pub name: String,
    pub logical_name: String,
}

impl ArtifactFile {
    /// Content type declared to the control plane when requesting a slot
    pub fn content_type(&self) -> &'static str {
        if self.name.ends_with(".map") || self.name.ends_with(".json") {
            "application/json"
        } else {
            "application/octet-stream"
        }
    }
}

/// Recursively collect all regular files under `root` whose name ends with
/// `suffix`.
///
/// A missing or unreadable root is not an error: the walk logs a warning and
/// yields nothing, so a project that produced no artifacts still gets a clean
/// run. Order follows directory traversal and is stable for a fixed tree.
pub fn discover(root: &Path, suffix: &str) -> Vec<ArtifactFile> {
    if !root.is_dir() {
        warn!("artifact directory does not exist: {}", root.display());
        return Vec::new();
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let name = entry.file_name().to_string_lossy();
        if let Some(logical_name) = name.strip_suffix(suffix) {
            if logical_name.is_empty() {
                // A bare ".map" has no logical counterpart; skip it
                continue;
            }
            files.push(ArtifactFile {
                path: entry.path().to_path_buf(),
                name: name.to_string(),
                logical_name: logical_name.to_string(),
            });
        }
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"{}").unwrap();
    }

    #[test]
    fn finds_matching_files_recursively() {
        let root = TempDir::new().unwrap();
        touch(root.path(), "app.js.map");
        fs::create_dir_all(root.path().join("assets/js")).unwrap();
        touch(&root.path().join("assets/js"), "vendor.js.map");

        let mut names: Vec<String> = discover(root.path(), ".map")
            .into_iter()
            .map(|f| f.name)
            .collect();
        names.sort();

        assert_eq!(names, vec!["app.js.map", "vendor.js.map"]);
    }

    #[test]
    fn skips_non_matching_files_and_directories() {
        let root = TempDir::new().unwrap();
        touch(root.path(), "app.js");
        touch(root.path(), "styles.css");
        // A directory whose name matches the suffix must not be picked up
        fs::create_dir_all(root.path().join("old.map")).unwrap();
        touch(&root.path().join("old.map"), "inner.js.map");

        let files = discover(root.path(), ".map");

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "inner.js.map");
    }

    #[test]
    fn strips_suffix_for_logical_name() {
        let root = TempDir::new().unwrap();
        touch(root.path(), "chunk.7f3a.js.map");

        let files = discover(root.path(), ".map");

        assert_eq!(files[0].logical_name, "chunk.7f3a.js");
        assert_eq!(files[0].content_type(), "application/json");
    }

    #[test]
    fn ignores_bare_suffix_file() {
        let root = TempDir::new().unwrap();
        touch(root.path(), ".map");

        assert!(discover(root.path(), ".map").is_empty());
    }

    #[test]
    fn missing_root_yields_empty_set() {
        let root = TempDir::new().unwrap();
        let gone = root.path().join("does-not-exist");

        assert!(discover(&gone, ".map").is_empty());
    }

    #[test]
    fn content_type_falls_back_for_unknown_suffix() {
        let file = ArtifactFile {
            path: PathBuf::from("lib.so.dbg"),
            name: "lib.so.dbg".to_string(),
            logical_name: "lib.so".to_string(),
        };

        assert_eq!(file.content_type(), "application/octet-stream");
    }
}
