//! Infrastructure layer - filesystem-facing parts of the generator
//!
//! - ABI artifact loading and directory scanning
//! - Rust source emission and writing

pub mod abi;
pub mod codegen;

pub use abi::{Artifact, ArtifactScanner, ArtifactSet};
pub use codegen::{GeneratedBinding, Generator, GeneratorOptions};
