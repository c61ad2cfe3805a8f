use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::infrastructure::codegen::{GeneratorOptions, DEFAULT_RUNTIME_PATH};

/// File name looked up in the working directory
pub const CONFIG_FILE: &str = "kukugen.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Artifact files or directories to generate bindings for
    pub artifacts: Vec<String>,

    /// Directory generated modules are written to
    pub out_dir: Option<String>,

    /// Rust path of the runtime module generated code imports from
    pub runtime_path: String,

    /// Emit deploy support for contracts that ship bytecode
    pub emit_bytecode: bool,

    /// Also write a `mod.rs` declaring every generated module
    pub index: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            artifacts: Vec::new(),
            out_dir: None,
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            emit_bytecode: true,
            index: true,
        }
    }
}

/// A config plus the file it came from
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Directory relative config paths are resolved against
    pub fn base_dir(&self) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn artifact_paths(&self) -> Vec<PathBuf> {
        let base = self.base_dir();
        self.config
            .artifacts
            .iter()
            .filter_map(|raw| expand_path(raw, &base))
            .collect()
    }

    pub fn out_dir(&self) -> Option<PathBuf> {
        let base = self.base_dir();
        self.config
            .out_dir
            .as_deref()
            .and_then(|raw| expand_path(raw, &base))
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            runtime_path: self.config.runtime_path.clone(),
            emit_bytecode: self.config.emit_bytecode,
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid kukugen config")
    }
}

/// Load the config: `explicit` path, then `$KUKUGEN_CONFIG`, then
/// `./kukugen.toml`, then the user config directory.
///
/// An explicitly named file must exist; the fallbacks are optional.
pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let Some((path, required)) = config_path(explicit) else {
        return Ok(LoadedConfig::default());
    };

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) if !required => {
            tracing::debug!(path = %path.display(), "no config file");
            return Ok(LoadedConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let config =
        Config::parse(&content).with_context(|| format!("Failed to load {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(LoadedConfig {
        config,
        path: Some(path),
    })
}

/// Config file to read, and whether it must exist
pub fn config_path(explicit: Option<&Path>) -> Option<(PathBuf, bool)> {
    if let Some(path) = explicit {
        return Some((path.to_path_buf(), true));
    }
    if let Some(path) = std::env::var_os("KUKUGEN_CONFIG").map(PathBuf::from) {
        return Some((path, true));
    }
    let local = PathBuf::from(CONFIG_FILE);
    if local.is_file() {
        return Some((local, true));
    }

    directories::ProjectDirs::from("io", "kukugen", "kukugen")
        .map(|dirs| (dirs.config_dir().join("config.toml"), false))
}

fn expand_path(path: &str, base: &Path) -> Option<PathBuf> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
            return Some(home.join(rest));
        }
    }

    let buf = PathBuf::from(trimmed);
    if buf.is_relative() {
        return Some(base.join(buf));
    }
    Some(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.runtime_path, "::kukugen::runtime");
        assert!(config.emit_bytecode);
        assert!(config.index);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::parse("abi_paths = []").is_err());
    }

    #[test]
    fn test_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kukugen.toml");
        fs::write(
            &path,
            r#"
artifacts = ["abi", "  ", "/abs/Farm.json"]
out_dir = "src/bindings"
runtime_path = "crate::runtime"
emit_bytecode = false
"#,
        )
        .unwrap();

        let loaded = load(Some(&path)).unwrap();

        assert_eq!(
            loaded.artifact_paths(),
            vec![dir.path().join("abi"), PathBuf::from("/abs/Farm.json")]
        );
        assert_eq!(loaded.out_dir(), Some(dir.path().join("src/bindings")));
        let options = loaded.generator_options();
        assert_eq!(options.runtime_path, "crate::runtime");
        assert!(!options.emit_bytecode);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
