//! kukugen - typed Rust bindings from Solidity ABI artifacts
//!
//! The generator side (`domain`, `infrastructure`) turns an ABI artifact
//! into a Rust module with one interface trait, one typed handle and one
//! factory per contract. The `runtime` module (feature `runtime`, on by
//! default) is what that generated code calls at run time.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
#[cfg(feature = "runtime")]
pub mod runtime;

pub use domain::abi::ContractAbi;
pub use error::{BindingError, GenerateError};
pub use infrastructure::abi::{Artifact, ArtifactScanner};
pub use infrastructure::codegen::{GeneratedBinding, Generator, GeneratorOptions};
