//! Code generation - ABI model in, Rust source out
//!
//! `Generator` plans and renders bindings in memory; the `writer` functions
//! put them on disk and compare them with what is already there.

mod emitter;
mod writer;

use std::collections::BTreeMap;

use crate::domain::abi::ContractAbi;
use crate::domain::binding::BindingPlan;
use crate::error::GenerateError;

pub use writer::{check_bindings, module_index, write_bindings, StaleBinding, Staleness};

/// Runtime path generated code imports from by default
pub const DEFAULT_RUNTIME_PATH: &str = "::kukugen::runtime";

/// Generator settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Rust path of the runtime module (e.g. `::kukugen::runtime`)
    pub runtime_path: String,
    /// Emit deploy support for contracts that ship bytecode
    pub emit_bytecode: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            emit_bytecode: true,
        }
    }
}

/// Rendered bindings for one contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBinding {
    pub contract: String,
    pub module_name: String,
    /// `<module_name>.rs`
    pub file_name: String,
    pub source: String,
}

/// ABI binding generator
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: GeneratorOptions,
}

impl Generator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Plan a contract's bindings without rendering them
    pub fn plan(&self, contract: &ContractAbi) -> Result<BindingPlan, GenerateError> {
        BindingPlan::new(contract, self.options.emit_bytecode)
    }

    /// Generate the bindings for one contract
    pub fn generate(&self, contract: &ContractAbi) -> Result<GeneratedBinding, GenerateError> {
        let plan = self.plan(contract)?;
        let abi_json = serde_json::to_string_pretty(contract.json_abi()).map_err(|err| {
            GenerateError::InvalidAbi {
                contract: contract.name.clone(),
                message: err.to_string(),
            }
        })?;

        let source = emitter::render(&plan, &abi_json, &self.options.runtime_path);
        tracing::debug!(
            contract = %contract.name,
            module = %plan.module_name,
            methods = plan.methods.len(),
            structs = plan.structs.len(),
            deployable = plan.is_deployable(),
            "generated bindings"
        );

        Ok(GeneratedBinding {
            contract: contract.name.clone(),
            file_name: format!("{}.rs", plan.module_name),
            module_name: plan.module_name,
            source,
        })
    }

    /// Generate bindings for several contracts, sorted by module name
    pub fn generate_all<'a>(
        &self,
        contracts: impl IntoIterator<Item = &'a ContractAbi>,
    ) -> Result<Vec<GeneratedBinding>, GenerateError> {
        let mut by_module: BTreeMap<String, GeneratedBinding> = BTreeMap::new();
        for contract in contracts {
            let binding = self.generate(contract)?;
            if let Some(existing) = by_module.get(&binding.module_name) {
                return Err(GenerateError::DuplicateModule {
                    module: binding.module_name,
                    first: existing.contract.clone(),
                    second: binding.contract,
                });
            }
            by_module.insert(binding.module_name.clone(), binding);
        }
        Ok(by_module.into_values().collect())
    }
}
