//! ABI domain models
//!
//! This module defines the contract ABI model the binding generator works
//! from, independent of the artifact format it was loaded from.

mod contract;

pub use contract::{compute_selector, mutability_str, AbiEntry, ContractAbi, ParamSpec};
