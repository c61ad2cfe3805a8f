//! ABI infrastructure - artifact loading and discovery

mod artifact;
mod scanner;

pub use artifact::Artifact;
pub use scanner::{ArtifactScanner, ArtifactSet};
