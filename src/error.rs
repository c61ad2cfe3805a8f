//! Error types for binding generation and the contract runtime

use std::path::PathBuf;
use std::time::Duration;

use alloy_primitives::B256;
use thiserror::Error;

/// Errors raised while turning an ABI artifact into Rust bindings
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no ABI found in {}", .0.display())]
    MissingAbi(PathBuf),

    #[error("invalid ABI for `{contract}`: {message}")]
    InvalidAbi { contract: String, message: String },

    #[error("unsupported Solidity type `{ty}` in {context}")]
    UnsupportedType { ty: String, context: String },

    #[error("struct `{name}` is declared twice with different fields in `{contract}`")]
    StructConflict { contract: String, name: String },

    #[error("invalid bytecode for `{contract}`: {message}")]
    InvalidBytecode { contract: String, message: String },

    #[error("`{first}` and `{second}` in `{contract}` both map to Rust name `{name}`")]
    NameCollision {
        contract: String,
        name: String,
        first: String,
        second: String,
    },

    #[error("contracts `{first}` and `{second}` both map to module `{module}`")]
    DuplicateModule {
        module: String,
        first: String,
        second: String,
    },
}

/// Errors raised by generated bindings at runtime
#[derive(Debug, Error)]
pub enum BindingError {
    #[error("invalid ABI: {0}")]
    Abi(String),

    #[error("invalid Solidity type `{ty}`: {message}")]
    Type { ty: String, message: String },

    #[error("`{function}` takes {expected} argument(s), got {got}")]
    ArgumentCount {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error("failed to encode `{function}`: {message}")]
    Encode { function: String, message: String },

    #[error("failed to decode `{function}` output: {message}")]
    Decode { function: String, message: String },

    #[error("expected {expected}, got {got}")]
    Conversion {
        expected: &'static str,
        got: &'static str,
    },

    #[error("expected a tuple of {expected} field(s), got {got}")]
    TupleLength { expected: usize, got: usize },

    #[error("`{0}` is not payable but a value was attached")]
    NonPayableValue(String),

    #[error("contract handle has no signer or provider")]
    MissingClient,

    #[error("factory has no signer to deploy with")]
    MissingSigner,

    #[error("invalid bytecode: {0}")]
    Bytecode(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("transaction {0} reverted")]
    Reverted(B256),

    #[error("receipt for {0} carries no contract address")]
    NoContractAddress(B256),

    #[error("no receipt for {hash} after {waited:?}")]
    Timeout { hash: B256, waited: Duration },
}
