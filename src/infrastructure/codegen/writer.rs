//! Writing generated bindings to disk and checking them for staleness

use std::fs;
use std::path::{Path, PathBuf};

use super::GeneratedBinding;
use crate::error::GenerateError;

/// Why an on-disk binding does not match the generator's output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    Missing,
    Outdated,
}

/// A file `check_bindings` found out of date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleBinding {
    pub path: PathBuf,
    pub staleness: Staleness,
}

/// `mod.rs` declaring every generated module
pub fn module_index(bindings: &[GeneratedBinding]) -> String {
    let mut out = String::from("// @generated by kukugen. Do not edit.\n");
    for binding in bindings {
        out.push('\n');
        out.push_str("#[allow(dead_code, unused_imports, clippy::all)]\n");
        out.push_str(&format!("pub mod {};\n", binding.module_name));
    }
    out
}

/// Write each binding (and optionally `mod.rs`) into `out_dir`
///
/// Files whose content is unchanged are left untouched. Returns the paths
/// that were written.
pub fn write_bindings(
    bindings: &[GeneratedBinding],
    out_dir: &Path,
    with_index: bool,
) -> Result<Vec<PathBuf>, GenerateError> {
    fs::create_dir_all(out_dir).map_err(|source| GenerateError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    for (path, content) in expected_files(bindings, out_dir, with_index) {
        if fs::read_to_string(&path).ok().as_deref() == Some(content.as_str()) {
            tracing::debug!(path = %path.display(), "unchanged");
            continue;
        }
        fs::write(&path, &content).map_err(|source| GenerateError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "wrote bindings");
        written.push(path);
    }
    Ok(written)
}

/// Compare the generator's output with what is in `out_dir`
pub fn check_bindings(
    bindings: &[GeneratedBinding],
    out_dir: &Path,
    with_index: bool,
) -> Vec<StaleBinding> {
    expected_files(bindings, out_dir, with_index)
        .into_iter()
        .filter_map(|(path, content)| {
            let staleness = match fs::read_to_string(&path) {
                Ok(existing) if existing == content => return None,
                Ok(_) => Staleness::Outdated,
                Err(_) => Staleness::Missing,
            };
            Some(StaleBinding { path, staleness })
        })
        .collect()
}

fn expected_files(
    bindings: &[GeneratedBinding],
    out_dir: &Path,
    with_index: bool,
) -> Vec<(PathBuf, String)> {
    let mut files: Vec<(PathBuf, String)> = bindings
        .iter()
        .map(|binding| (out_dir.join(&binding.file_name), binding.source.clone()))
        .collect();
    if with_index {
        files.push((out_dir.join("mod.rs"), module_index(bindings)));
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(module: &str, source: &str) -> GeneratedBinding {
        GeneratedBinding {
            contract: module.to_string(),
            module_name: module.to_string(),
            file_name: format!("{module}.rs"),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_module_index() {
        let index = module_index(&[binding("i_kuku_farmer", ""), binding("safe_erc20", "")]);
        assert!(index.contains("pub mod i_kuku_farmer;\n"));
        assert!(index.contains("pub mod safe_erc20;\n"));
        assert_eq!(index.matches("#[allow(").count(), 2);
    }

    #[test]
    fn test_write_then_check() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("bindings");
        let bindings = vec![binding("farm", "// farm\n")];

        assert_eq!(check_bindings(&bindings, &out, true).len(), 2);

        let written = write_bindings(&bindings, &out, true).unwrap();
        assert_eq!(written.len(), 2);
        assert!(check_bindings(&bindings, &out, true).is_empty());

        // Second write is a no-op
        assert!(write_bindings(&bindings, &out, true).unwrap().is_empty());

        fs::write(out.join("farm.rs"), "// edited\n").unwrap();
        let stale = check_bindings(&bindings, &out, true);
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].staleness, Staleness::Outdated);
        assert_eq!(stale[0].path, out.join("farm.rs"));
    }
}
