//! Contract ABI model - functions indexed by name and selector

use alloy_dyn_abi::DynSolType;
use alloy_json_abi::{InternalType, JsonAbi, Param, StateMutability};
use alloy_primitives::keccak256;

use crate::error::GenerateError;

/// A function parameter specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name (may be empty)
    pub name: String,
    /// Canonical type used for encoding (e.g. "address", "(address,uint256)", "uint256[]")
    pub kind: String,
    /// Type exactly as written in the ABI (e.g. "tuple", "IERC20")
    pub abi_type: String,
    /// Struct name taken from `internalType`, for structs and struct arrays
    pub struct_name: Option<String>,
    /// Tuple components, empty for non-tuple types
    pub components: Vec<ParamSpec>,
}

impl ParamSpec {
    /// Whether this parameter is a tuple or an array of tuples
    pub fn is_tuple(&self) -> bool {
        !self.components.is_empty()
    }
}

/// One callable function of a contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiEntry {
    /// Function name
    pub name: String,
    /// Canonical signature used for the selector (e.g. "deposit(uint256,uint256)")
    pub signature: String,
    /// 4-byte function selector
    pub selector: [u8; 4],
    /// Input parameters, in declaration order
    pub inputs: Vec<ParamSpec>,
    /// Output parameters, in declaration order
    pub outputs: Vec<ParamSpec>,
    /// Mutability class
    pub mutability: StateMutability,
}

impl AbiEntry {
    /// Get selector as hex string
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }

    /// Whether calling this function reads state without a transaction
    pub fn is_view(&self) -> bool {
        matches!(
            self.mutability,
            StateMutability::View | StateMutability::Pure
        )
    }

    /// Mutability as written in the ABI
    pub fn mutability_str(&self) -> &'static str {
        mutability_str(self.mutability)
    }
}

/// A contract's parsed ABI plus optional deployment bytecode
#[derive(Debug, Clone)]
pub struct ContractAbi {
    /// Contract name
    pub name: String,
    /// Functions, ordered by name and then declaration order within overloads
    pub entries: Vec<AbiEntry>,
    /// Constructor inputs, if the ABI declares a constructor
    pub constructor: Option<Vec<ParamSpec>>,
    /// Deployment bytecode as a 0x-prefixed hex string
    pub bytecode: Option<String>,
    abi: JsonAbi,
}

impl ContractAbi {
    /// Build the model from a parsed JSON ABI
    pub fn new(
        name: impl Into<String>,
        abi: JsonAbi,
        bytecode: Option<String>,
    ) -> Result<Self, GenerateError> {
        let name = name.into();

        let mut entries = Vec::new();
        for function in abi.functions() {
            let context = format!("`{}.{}`", name, function.name);
            let inputs = function
                .inputs
                .iter()
                .map(|param| param_spec(param, &context))
                .collect::<Result<Vec<_>, _>>()?;
            let outputs = function
                .outputs
                .iter()
                .map(|param| param_spec(param, &context))
                .collect::<Result<Vec<_>, _>>()?;
            let signature = function.signature();

            entries.push(AbiEntry {
                name: function.name.clone(),
                selector: compute_selector(&signature),
                signature,
                inputs,
                outputs,
                mutability: function.state_mutability,
            });
        }

        let constructor = abi
            .constructor
            .as_ref()
            .map(|ctor| {
                let context = format!("`{name}` constructor");
                ctor.inputs
                    .iter()
                    .map(|param| param_spec(param, &context))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        let bytecode = bytecode
            .map(|code| normalize_bytecode(&name, &code))
            .transpose()?
            .flatten();

        tracing::debug!(
            contract = %name,
            functions = entries.len(),
            deployable = bytecode.is_some(),
            "parsed contract ABI"
        );

        Ok(Self {
            name,
            entries,
            constructor,
            bytecode,
            abi,
        })
    }

    /// The underlying JSON ABI
    pub fn json_abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// Whether the contract ships deployment bytecode
    pub fn is_deployable(&self) -> bool {
        self.bytecode.is_some()
    }

    /// Look up the first function with the given name
    pub fn entry(&self, name: &str) -> Option<&AbiEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Look up a function by selector
    pub fn lookup(&self, selector: [u8; 4]) -> Option<&AbiEntry> {
        self.entries.iter().find(|entry| entry.selector == selector)
    }

    /// Look up a function by selector hex string (e.g., "0xe2bbb158")
    pub fn lookup_hex(&self, selector_hex: &str) -> Option<&AbiEntry> {
        let normalized = selector_hex
            .strip_prefix("0x")
            .or_else(|| selector_hex.strip_prefix("0X"))
            .unwrap_or(selector_hex);

        if normalized.len() != 8 {
            return None;
        }

        let bytes = hex::decode(normalized).ok()?;
        let selector: [u8; 4] = bytes.try_into().ok()?;
        self.lookup(selector)
    }

    /// Number of functions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the contract exposes no functions
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute the 4-byte function selector from a signature
pub fn compute_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Mutability as written in the ABI
pub fn mutability_str(mutability: StateMutability) -> &'static str {
    match mutability {
        StateMutability::Pure => "pure",
        StateMutability::View => "view",
        StateMutability::NonPayable => "nonpayable",
        StateMutability::Payable => "payable",
    }
}

fn param_spec(param: &Param, context: &str) -> Result<ParamSpec, GenerateError> {
    let components = param
        .components
        .iter()
        .map(|component| param_spec(component, context))
        .collect::<Result<Vec<_>, _>>()?;

    let struct_name = match &param.internal_type {
        Some(InternalType::Struct { ty, .. }) => Some(strip_array_suffix(ty).to_string()),
        _ => None,
    };

    Ok(ParamSpec {
        name: param.name.clone(),
        kind: encoding_type(param, &components, context)?,
        abi_type: param.ty.clone(),
        struct_name,
        components,
    })
}

/// Resolve the type a parameter is encoded as.
///
/// Library ABIs name contract and enum parameters by their Solidity type
/// (`"type": "IERC20"`). The selector keeps that name, but the value is
/// encoded as an `address` or `uint8`.
fn encoding_type(
    param: &Param,
    components: &[ParamSpec],
    context: &str,
) -> Result<String, GenerateError> {
    if !components.is_empty() {
        let inner: Vec<&str> = components.iter().map(|c| c.kind.as_str()).collect();
        let suffix = param.ty.strip_prefix("tuple").unwrap_or("");
        return Ok(format!("({}){}", inner.join(","), suffix));
    }

    if param.ty.parse::<DynSolType>().is_ok() {
        return Ok(param.ty.clone());
    }

    let suffix = array_suffix(&param.ty);
    match &param.internal_type {
        Some(InternalType::Contract(_)) | Some(InternalType::AddressPayable(_)) => {
            Ok(format!("address{suffix}"))
        }
        Some(InternalType::Enum { .. }) => Ok(format!("uint8{suffix}")),
        _ => Err(GenerateError::UnsupportedType {
            ty: param.ty.clone(),
            context: context.to_string(),
        }),
    }
}

fn array_suffix(ty: &str) -> &str {
    ty.find('[').map(|pos| &ty[pos..]).unwrap_or("")
}

fn strip_array_suffix(ty: &str) -> &str {
    ty.find('[').map(|pos| &ty[..pos]).unwrap_or(ty)
}

/// Validate bytecode hex; empty bytecode ("0x") means not deployable
fn normalize_bytecode(contract: &str, code: &str) -> Result<Option<String>, GenerateError> {
    let trimmed = code.trim();
    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if payload.is_empty() {
        return Ok(None);
    }

    if payload.contains("__") {
        return Err(GenerateError::InvalidBytecode {
            contract: contract.to_string(),
            message: "bytecode contains unlinked library placeholders".to_string(),
        });
    }

    hex::decode(payload).map_err(|err| GenerateError::InvalidBytecode {
        contract: contract.to_string(),
        message: err.to_string(),
    })?;

    Ok(Some(format!("0x{}", payload.to_lowercase())))
}
