//! Implementation directory scanning

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::{ScanConfig, WorkflowError};

/// Finds implemented symbol names by listing implementation files
#[derive(Debug, Clone, Default)]
pub struct ImplementationScanner {
    config: ScanConfig,
}

impl ImplementationScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// File stems of every file carrying the configured extension
    ///
    /// A missing directory is logged and treated as implementing nothing.
    pub fn scan(&self, dir: impl AsRef<Path>) -> Result<BTreeSet<String>, WorkflowError> {
        let dir = dir.as_ref();
        if !dir.exists() {
            warn!(path = %dir.display(), "Implementation directory not found");
            return Ok(BTreeSet::new());
        }
        if !dir.is_dir() {
            return Err(WorkflowError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let extension = self.config.dotted_extension();
        let mut walker = WalkDir::new(dir).min_depth(1);
        if !self.config.recursive {
            walker = walker.max_depth(1);
        }

        let mut names = BTreeSet::new();
        for entry in walker {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            if let Some(stem) = file_name.strip_suffix(extension.as_str()) {
                if !stem.is_empty() {
                    names.insert(stem.to_string());
                }
            }
        }

        debug!(path = %dir.display(), count = names.len(), "Scanned implementations");
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        if let Some(parent) = dir.join(name).parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn test_scan_strips_extension() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "UserRegistrationProcessor.java");
        touch(dir.path(), "README.md");
        touch(dir.path(), "nested/AuditProcessor.java");
        touch(dir.path(), ".java");

        let names = ImplementationScanner::default().scan(dir.path()).unwrap();
        let names: Vec<_> = names.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["AuditProcessor", "UserRegistrationProcessor"]);
    }

    #[test]
    fn test_non_recursive_and_custom_extension() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "check.py");
        touch(dir.path(), "Other.java");
        touch(dir.path(), "sub/deep.py");

        let scanner = ImplementationScanner::new(
            ScanConfig::default().with_extension("py").with_recursive(false),
        );
        let names = scanner.scan(dir.path()).unwrap();
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["check".to_string()]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let names = ImplementationScanner::default()
            .scan(dir.path().join("absent"))
            .unwrap();
        assert!(names.is_empty());
    }
}
