//! Binding domain - maps ABI entries onto Rust names and types

pub mod naming;
mod plan;
mod types;

pub use plan::{ArgPlan, BindingPlan, FieldPlan, MethodPlan, StructPlan};
pub use types::RustType;
