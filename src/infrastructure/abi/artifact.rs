//! ABI artifact loading
//!
//! Accepts a raw ABI array, or an object with an `abi` field as written by
//! Hardhat, Truffle and Foundry. `bytecode` may be a hex string or a
//! Foundry-style `{ "object": "0x..." }`.

use std::fs;
use std::path::{Path, PathBuf};

use alloy_json_abi::JsonAbi;
use serde_json::Value;

use crate::domain::abi::ContractAbi;
use crate::error::GenerateError;

/// A contract ABI loaded from disk
#[derive(Debug, Clone)]
pub struct Artifact {
    /// File the artifact was read from
    pub path: PathBuf,
    pub contract: ContractAbi,
}

impl Artifact {
    /// Load a single artifact file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GenerateError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| GenerateError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let stem = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.split('.').next().unwrap_or(name))
            .unwrap_or("Contract");

        let contract = parse_artifact(path, stem, &content)?;
        tracing::debug!(path = %path.display(), contract = %contract.name, "loaded artifact");

        Ok(Self {
            path: path.to_path_buf(),
            contract,
        })
    }

    /// Parse artifact JSON; `name_hint` is used when it carries no `contractName`
    pub fn parse(name_hint: &str, json: &str) -> Result<ContractAbi, GenerateError> {
        parse_artifact(Path::new(name_hint), name_hint, json)
    }
}

fn parse_artifact(path: &Path, stem: &str, content: &str) -> Result<ContractAbi, GenerateError> {
    let value: Value = serde_json::from_str(content).map_err(|source| GenerateError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    // Try to extract ABI - either raw array or nested in "abi" field
    let (abi_value, name, bytecode) = match value {
        Value::Array(_) => (value, None, None),
        Value::Object(ref object) => {
            let abi = match object.get("abi") {
                // Truffle can store the ABI as an embedded JSON string
                Some(Value::String(raw)) => {
                    serde_json::from_str(raw).map_err(|source| GenerateError::Json {
                        path: path.to_path_buf(),
                        source,
                    })?
                }
                Some(abi) => abi.clone(),
                None => return Err(GenerateError::MissingAbi(path.to_path_buf())),
            };
            let name = object
                .get("contractName")
                .and_then(Value::as_str)
                .map(str::to_string);
            let bytecode = match object.get("bytecode") {
                Some(Value::String(code)) => Some(code.clone()),
                Some(Value::Object(code)) => code
                    .get("object")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            };
            (abi, name, bytecode)
        }
        _ => return Err(GenerateError::MissingAbi(path.to_path_buf())),
    };

    let name = name.unwrap_or_else(|| stem.to_string());
    let abi: JsonAbi =
        serde_json::from_value(abi_value).map_err(|err| GenerateError::InvalidAbi {
            contract: name.clone(),
            message: err.to_string(),
        })?;

    ContractAbi::new(name, abi, bytecode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TOTAL_ALLOC_POINT: &str = r#"{
        "inputs": [],
        "name": "totalAllocPoint",
        "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
        "stateMutability": "view",
        "type": "function"
    }"#;

    #[test]
    fn test_parse_raw_array() {
        let contract = Artifact::parse("IKukuFarmer", &format!("[{TOTAL_ALLOC_POINT}]")).unwrap();
        assert_eq!(contract.name, "IKukuFarmer");
        assert_eq!(contract.len(), 1);
        assert!(!contract.is_deployable());
    }

    #[test]
    fn test_parse_hardhat_object() {
        let json = format!(
            r#"{{"contractName": "Farm", "abi": [{TOTAL_ALLOC_POINT}], "bytecode": "0x6080"}}"#
        );
        let contract = Artifact::parse("ignored", &json).unwrap();
        assert_eq!(contract.name, "Farm");
        assert_eq!(contract.bytecode.as_deref(), Some("0x6080"));
    }

    #[test]
    fn test_parse_foundry_object() {
        let json = format!(r#"{{"abi": [{TOTAL_ALLOC_POINT}], "bytecode": {{"object": "0x"}}}}"#);
        let contract = Artifact::parse("Farm", &json).unwrap();
        assert_eq!(contract.name, "Farm");
        assert!(!contract.is_deployable());
    }

    #[test]
    fn test_missing_abi() {
        let err = Artifact::parse("Farm", r#"{"bytecode": "0x"}"#).unwrap_err();
        assert!(matches!(err, GenerateError::MissingAbi(_)));
    }

    #[test]
    fn test_load_uses_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Farm.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "[{TOTAL_ALLOC_POINT}]").unwrap();

        let artifact = Artifact::load(&path).unwrap();
        assert_eq!(artifact.contract.name, "Farm");
        assert_eq!(artifact.path, path);
    }
}
