//! Domain layer - the ABI model and the binding plan derived from it
//!
//! Nothing here touches the filesystem or the network.

pub mod abi;
pub mod binding;
