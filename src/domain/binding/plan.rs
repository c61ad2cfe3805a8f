//! Binding plan - what the emitter renders for one contract

use std::collections::BTreeMap;

use alloy_json_abi::StateMutability;

use super::naming::{dedupe, descriptor_name, is_keyword, method_name, module_name, param_name};
use super::types::RustType;
use crate::domain::abi::{AbiEntry, ContractAbi, ParamSpec};
use crate::error::GenerateError;

/// Names the generated module imports from the runtime; structs must not shadow them
const RESERVED_TYPE_NAMES: &[&str] = &[
    "AbiType",
    "Address",
    "Arc",
    "BindingError",
    "Box",
    "Bytes",
    "ContractFactory",
    "ContractHandle",
    "FixedBytes",
    "FunctionDescriptor",
    "I256",
    "JsonAbi",
    "Option",
    "Overrides",
    "Result",
    "SignerOrProvider",
    "StateMutability",
    "String",
    "TransactionCall",
    "TransactionRequest",
    "U256",
    "Vec",
    "ViewCall",
];

/// Module-level constants every generated module defines
const RESERVED_CONST_NAMES: &[&str] = &["ABI", "BYTECODE", "CONSTRUCTOR_INPUTS", "FUNCTIONS"];

/// Largest tuple the runtime converts
pub const MAX_TUPLE_ARITY: usize = 8;

/// A typed argument of a generated method or constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgPlan {
    pub name: String,
    pub ty: RustType,
    /// Canonical Solidity type the value is encoded as
    pub sol_type: String,
}

/// One field of a generated struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlan {
    pub name: String,
    pub ty: RustType,
}

/// A struct generated for a named Solidity tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructPlan {
    pub name: String,
    /// Name as declared in Solidity
    pub sol_name: String,
    /// Canonical tuple type, e.g. "(address,uint256)"
    pub sol_type: String,
    pub fields: Vec<FieldPlan>,
}

/// One interface method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodPlan {
    /// Rust method name (snake_case, overload suffix applied)
    pub name: String,
    /// Name of the `FunctionDescriptor` static
    pub descriptor: String,
    pub entry: AbiEntry,
    pub args: Vec<ArgPlan>,
    /// Decoded return type of a call
    pub output: RustType,
}

impl MethodPlan {
    /// Whether the method reads state (returns `ViewCall`) or sends a transaction
    pub fn is_view(&self) -> bool {
        self.entry.is_view()
    }

    pub fn is_payable(&self) -> bool {
        self.entry.mutability == StateMutability::Payable
    }
}

/// Everything the emitter needs to render one contract's bindings
#[derive(Debug, Clone)]
pub struct BindingPlan {
    /// Contract name as declared (e.g. "IKukuFarmer")
    pub contract: String,
    /// Rust type name of the typed handle
    pub handle_type: String,
    /// Interface trait name
    pub trait_name: String,
    /// Factory type name
    pub factory_type: String,
    /// Module / file stem (e.g. "i_kuku_farmer")
    pub module_name: String,
    pub structs: Vec<StructPlan>,
    pub methods: Vec<MethodPlan>,
    /// Constructor arguments; empty when the ABI declares none
    pub constructor: Vec<ArgPlan>,
    /// Bytecode when the factory can deploy
    pub bytecode: Option<String>,
}

impl BindingPlan {
    /// Plan the bindings for a contract
    pub fn new(contract: &ContractAbi, with_bytecode: bool) -> Result<Self, GenerateError> {
        let handle_type = type_ident(&contract.name);
        let trait_name = format!("{handle_type}Calls");
        let factory_type = format!("{handle_type}Factory");

        let mut structs = StructRegistry::new(
            &contract.name,
            [handle_type.as_str(), trait_name.as_str(), factory_type.as_str()],
        );

        let mut overloads: BTreeMap<&str, usize> = BTreeMap::new();
        for entry in &contract.entries {
            *overloads.entry(entry.name.as_str()).or_default() += 1;
        }

        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        let mut methods = Vec::with_capacity(contract.entries.len());
        for entry in &contract.entries {
            let context = format!("`{}.{}`", contract.name, entry.name);
            let mut name = method_name(&entry.name);
            let mut descriptor = descriptor_name(&entry.name);
            if overloads[entry.name.as_str()] > 1 {
                let index = seen.entry(entry.name.as_str()).or_default();
                name = format!("{name}_{index}");
                descriptor = format!("{descriptor}_{index}");
                *index += 1;
            }
            if RESERVED_CONST_NAMES.contains(&descriptor.as_str()) {
                descriptor.push_str("_FN");
            }

            let args = plan_args(&entry.inputs, "arg", &mut structs, &context)?;
            let outputs = entry
                .outputs
                .iter()
                .map(|output| structs.resolve(output, &context))
                .collect::<Result<Vec<_>, _>>()?;
            if outputs.len() > MAX_TUPLE_ARITY {
                return Err(GenerateError::UnsupportedType {
                    ty: format!("{} return values", outputs.len()),
                    context,
                });
            }

            methods.push(MethodPlan {
                name,
                descriptor,
                entry: entry.clone(),
                args,
                output: RustType::returns(outputs),
            });
        }

        check_unique(
            &contract.name,
            methods.iter().map(|m| (m.name.as_str(), m.entry.signature.as_str())),
        )?;
        check_unique(
            &contract.name,
            methods
                .iter()
                .map(|m| (m.descriptor.as_str(), m.entry.signature.as_str())),
        )?;

        let constructor = match &contract.constructor {
            Some(inputs) => plan_args(
                inputs,
                "arg",
                &mut structs,
                &format!("`{}` constructor", contract.name),
            )?,
            None => Vec::new(),
        };

        Ok(Self {
            contract: contract.name.clone(),
            module_name: module_name(&handle_type),
            handle_type,
            trait_name,
            factory_type,
            structs: structs.into_structs(),
            methods,
            constructor,
            bytecode: if with_bytecode {
                contract.bytecode.clone()
            } else {
                None
            },
        })
    }

    /// Whether the factory exposes deploy / attach / signer rebinding
    pub fn is_deployable(&self) -> bool {
        self.bytecode.is_some()
    }
}

fn plan_args(
    params: &[ParamSpec],
    fallback: &str,
    structs: &mut StructRegistry,
    context: &str,
) -> Result<Vec<ArgPlan>, GenerateError> {
    let mut names: Vec<String> = params
        .iter()
        .enumerate()
        .map(|(idx, param)| param_name(&param.name, fallback, idx))
        .collect();
    // `overrides` is the trailing argument of deploy methods
    for name in names.iter_mut() {
        if name == "overrides" {
            name.push('_');
        }
    }
    dedupe(&mut names);

    params
        .iter()
        .zip(names)
        .map(|(param, name)| {
            Ok(ArgPlan {
                name,
                ty: structs.resolve(param, context)?,
                sol_type: param.kind.clone(),
            })
        })
        .collect()
}

/// Make a contract or struct name a valid Rust type identifier
fn type_ident(name: &str) -> String {
    let ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    match ident.chars().next() {
        Some(c) if c.is_ascii_alphabetic() && is_keyword(&ident) => format!("{ident}_"),
        Some(c) if c.is_ascii_alphabetic() => ident,
        _ => format!("Contract{ident}"),
    }
}

/// Reject two functions that end up with the same Rust name
fn check_unique<'a>(
    contract: &str,
    names: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<(), GenerateError> {
    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
    for (name, signature) in names {
        if let Some(first) = seen.insert(name, signature) {
            return Err(GenerateError::NameCollision {
                contract: contract.to_string(),
                name: name.to_string(),
                first: first.to_string(),
                second: signature.to_string(),
            });
        }
    }
    Ok(())
}

/// Collects generated structs, keyed by Solidity struct name
struct StructRegistry {
    contract: String,
    reserved: Vec<String>,
    by_sol_name: BTreeMap<String, StructPlan>,
}

impl StructRegistry {
    fn new<'a>(contract: &str, reserved: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            contract: contract.to_string(),
            reserved: reserved.into_iter().map(str::to_string).collect(),
            by_sol_name: BTreeMap::new(),
        }
    }

    fn resolve(&mut self, param: &ParamSpec, context: &str) -> Result<RustType, GenerateError> {
        RustType::from_param(param, &mut |tuple| self.register(tuple, context), context)
    }

    /// Register the struct behind a tuple parameter, returning its Rust name
    fn register(
        &mut self,
        tuple: &ParamSpec,
        context: &str,
    ) -> Result<Option<String>, GenerateError> {
        let Some(sol_name) = tuple.struct_name.clone() else {
            return Ok(None);
        };

        let mut fields = Vec::with_capacity(tuple.components.len());
        let mut names: Vec<String> = tuple
            .components
            .iter()
            .enumerate()
            .map(|(idx, component)| param_name(&component.name, "field", idx))
            .collect();
        dedupe(&mut names);
        for (component, name) in tuple.components.iter().zip(names) {
            fields.push(FieldPlan {
                name,
                ty: self.resolve(component, context)?,
            });
        }

        let sol_type = tuple_base(&tuple.kind).to_string();
        if let Some(existing) = self.by_sol_name.get(&sol_name) {
            if existing.sol_type != sol_type {
                return Err(GenerateError::StructConflict {
                    contract: self.contract.clone(),
                    name: sol_name,
                });
            }
            return Ok(Some(existing.name.clone()));
        }

        let mut name = type_ident(&sol_name);
        if RESERVED_TYPE_NAMES.contains(&name.as_str()) || self.reserved.contains(&name) {
            name.push_str("Struct");
        }

        self.by_sol_name.insert(
            sol_name.clone(),
            StructPlan {
                name: name.clone(),
                sol_name,
                sol_type,
                fields,
            },
        );
        Ok(Some(name))
    }

    fn into_structs(self) -> Vec<StructPlan> {
        self.by_sol_name.into_values().collect()
    }
}

/// Strip array dimensions from a canonical tuple type: "(a,b)[][2]" -> "(a,b)"
fn tuple_base(kind: &str) -> &str {
    kind.rfind(')').map(|pos| &kind[..=pos]).unwrap_or(kind)
}
