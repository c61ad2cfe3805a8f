//! Artifact scanner - discovers and parses ABI artifacts from the filesystem

use std::path::{Path, PathBuf};
use std::time::Instant;

use walkdir::WalkDir;

use super::artifact::Artifact;
use crate::error::GenerateError;

/// Artifacts found under one or more roots
#[derive(Debug, Default)]
pub struct ArtifactSet {
    /// Loaded artifacts, one per contract name
    pub artifacts: Vec<Artifact>,
    /// Number of files scanned
    pub scanned_files: usize,
    /// Scan errors
    pub errors: Vec<String>,
    /// Scan duration in milliseconds
    pub scan_ms: u128,
}

impl ArtifactSet {
    /// Insert an artifact
    ///
    /// Note: First artifact for a given contract name wins (no overwrite)
    pub fn insert(&mut self, artifact: Artifact) {
        if let Some(existing) = self
            .artifacts
            .iter()
            .find(|a| a.contract.name == artifact.contract.name)
        {
            tracing::warn!(
                contract = %artifact.contract.name,
                kept = %existing.path.display(),
                skipped = %artifact.path.display(),
                "duplicate contract name"
            );
            return;
        }
        self.artifacts.push(artifact);
    }

    /// Merge another set into this one (first wins)
    pub fn merge(&mut self, other: Self) {
        self.scanned_files = self.scanned_files.saturating_add(other.scanned_files);
        self.errors.extend(other.errors);
        for artifact in other.artifacts {
            self.insert(artifact);
        }
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

/// ABI artifact scanner
pub struct ArtifactScanner;

impl ArtifactScanner {
    /// Largest artifact file considered
    const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

    /// Scan a single root directory for ABI artifacts
    pub fn scan(root: impl AsRef<Path>) -> ArtifactSet {
        let started = Instant::now();
        let root = root.as_ref();
        let mut set = ArtifactSet::default();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !Self::is_ignored_dir(e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    set.errors.push(err.to_string());
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !Self::is_candidate(path) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(meta) => meta,
                Err(err) => {
                    set.errors.push(format!("{}: {}", path.display(), err));
                    continue;
                }
            };
            if metadata.len() > Self::MAX_FILE_BYTES {
                continue;
            }

            set.scanned_files += 1;

            match Artifact::load(path) {
                Ok(artifact) => set.insert(artifact),
                // JSON files without an ABI are not artifacts; skip silently
                Err(GenerateError::MissingAbi(_)) => {}
                Err(err) => set.errors.push(err.to_string()),
            }
        }

        set.scan_ms = started.elapsed().as_millis();
        set
    }

    /// Collect artifacts from a mix of files and directories
    ///
    /// Explicit files must load; directories are scanned leniently.
    pub fn collect(inputs: &[PathBuf]) -> Result<ArtifactSet, GenerateError> {
        let started = Instant::now();
        let mut set = ArtifactSet::default();

        for input in inputs {
            if input.is_dir() {
                set.merge(Self::scan(input));
            } else {
                set.scanned_files += 1;
                set.insert(Artifact::load(input)?);
            }
        }

        set.scan_ms = started.elapsed().as_millis();
        Ok(set)
    }

    /// Check whether a file looks like an ABI artifact
    fn is_candidate(path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        // Hardhat writes a `.dbg.json` next to every artifact
        name.ends_with(".json") && !name.ends_with(".dbg.json")
    }

    /// Check if a path should be ignored
    fn is_ignored_dir(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| {
                matches!(
                    name,
                    ".git" | "target" | "node_modules" | "build-info" | "cache" | ".next" | "dist"
                )
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const ABI: &str = r#"[{"inputs": [], "name": "totalAllocPoint", "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view", "type": "function"}]"#;

    #[test]
    fn test_is_ignored_dir() {
        assert!(ArtifactScanner::is_ignored_dir(Path::new(".git")));
        assert!(ArtifactScanner::is_ignored_dir(Path::new("node_modules")));
        assert!(ArtifactScanner::is_ignored_dir(Path::new("build-info")));
        assert!(!ArtifactScanner::is_ignored_dir(Path::new("artifacts")));
        assert!(!ArtifactScanner::is_ignored_dir(Path::new("out")));
    }

    #[test]
    fn test_is_candidate() {
        assert!(ArtifactScanner::is_candidate(Path::new("out/Farm.json")));
        assert!(!ArtifactScanner::is_candidate(Path::new("out/Farm.dbg.json")));
        assert!(!ArtifactScanner::is_candidate(Path::new("src/Farm.sol")));
    }

    #[test]
    fn test_scan_collects_artifacts_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = dir.path().join("artifacts");
        fs::create_dir_all(artifacts.join("node_modules")).unwrap();
        fs::write(artifacts.join("Farm.json"), ABI).unwrap();
        fs::write(artifacts.join("Farm.dbg.json"), "{}").unwrap();
        fs::write(artifacts.join("package.json"), r#"{"name": "x"}"#).unwrap();
        fs::write(artifacts.join("Broken.json"), "[").unwrap();
        fs::write(artifacts.join("node_modules").join("Dep.json"), ABI).unwrap();

        let set = ArtifactScanner::scan(dir.path());

        assert_eq!(set.len(), 1);
        assert_eq!(set.artifacts[0].contract.name, "Farm");
        // Broken.json, Farm.json, package.json
        assert_eq!(set.scanned_files, 3);
        assert_eq!(set.errors.len(), 1);
        assert!(set.errors[0].contains("Broken.json"));
    }

    #[test]
    fn test_first_contract_name_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("a").join("Farm.json"), ABI).unwrap();
        fs::write(dir.path().join("b").join("Farm.json"), ABI).unwrap();

        let set = ArtifactScanner::scan(dir.path());

        assert_eq!(set.len(), 1);
        assert!(set.artifacts[0].path.starts_with(dir.path().join("a")));
    }

    #[test]
    fn test_collect_requires_explicit_files_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("Missing.json");
        assert!(ArtifactScanner::collect(&[missing]).is_err());
    }
}
