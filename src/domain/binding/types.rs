//! Mapping from Solidity types to Rust types

use std::fmt;

use alloy_dyn_abi::DynSolType;

use super::plan::MAX_TUPLE_ARITY;
use crate::domain::abi::ParamSpec;
use crate::error::GenerateError;

/// Rust type a Solidity value is exposed as in generated code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RustType {
    Address,
    Bool,
    String,
    Bytes,
    FixedBytes(usize),
    /// `uint8`..`uint64` with an exact native width
    NativeUint(usize),
    U256,
    /// `int8`..`int64` with an exact native width
    NativeInt(usize),
    I256,
    Vec(Box<RustType>),
    Tuple(Vec<RustType>),
    /// Generated struct, by Rust name
    Struct(String),
}

impl RustType {
    /// Resolve the Rust type of a parameter, registering struct names through `struct_name`
    pub fn from_param(
        param: &ParamSpec,
        struct_name: &mut dyn FnMut(&ParamSpec) -> Result<Option<String>, GenerateError>,
        context: &str,
    ) -> Result<Self, GenerateError> {
        if param.is_tuple() {
            if param.components.len() > MAX_TUPLE_ARITY && param.struct_name.is_none() {
                return Err(GenerateError::UnsupportedType {
                    ty: param.kind.clone(),
                    context: context.to_string(),
                });
            }
            let base = match struct_name(param)? {
                Some(name) => RustType::Struct(name),
                None => RustType::Tuple(
                    param
                        .components
                        .iter()
                        .map(|component| Self::from_param(component, struct_name, context))
                        .collect::<Result<Vec<_>, _>>()?,
                ),
            };
            let depth = param.abi_type.matches('[').count();
            return Ok((0..depth).fold(base, |ty, _| RustType::Vec(Box::new(ty))));
        }

        let parsed = param
            .kind
            .parse::<DynSolType>()
            .map_err(|_| GenerateError::UnsupportedType {
                ty: param.kind.clone(),
                context: context.to_string(),
            })?;
        Self::from_sol(&parsed, context)
    }

    fn from_sol(ty: &DynSolType, context: &str) -> Result<Self, GenerateError> {
        Ok(match ty {
            DynSolType::Address => RustType::Address,
            DynSolType::Bool => RustType::Bool,
            DynSolType::String => RustType::String,
            DynSolType::Bytes => RustType::Bytes,
            DynSolType::FixedBytes(size) => RustType::FixedBytes(*size),
            DynSolType::Uint(bits @ (8 | 16 | 32 | 64)) => RustType::NativeUint(*bits),
            DynSolType::Uint(_) => RustType::U256,
            DynSolType::Int(bits @ (8 | 16 | 32 | 64)) => RustType::NativeInt(*bits),
            DynSolType::Int(_) => RustType::I256,
            DynSolType::Array(inner) | DynSolType::FixedArray(inner, _) => {
                RustType::Vec(Box::new(Self::from_sol(inner, context)?))
            }
            DynSolType::Tuple(items) if items.len() <= MAX_TUPLE_ARITY => RustType::Tuple(
                items
                    .iter()
                    .map(|item| Self::from_sol(item, context))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            other => {
                return Err(GenerateError::UnsupportedType {
                    ty: format!("{other:?}"),
                    context: context.to_string(),
                })
            }
        })
    }

    /// Combined return type of a list of outputs: `()`, the single type, or a tuple
    pub fn returns(mut outputs: Vec<RustType>) -> Self {
        if outputs.len() == 1 {
            outputs.remove(0)
        } else {
            RustType::Tuple(outputs)
        }
    }
}

impl fmt::Display for RustType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RustType::Address => write!(f, "Address"),
            RustType::Bool => write!(f, "bool"),
            RustType::String => write!(f, "String"),
            RustType::Bytes => write!(f, "Bytes"),
            RustType::FixedBytes(size) => write!(f, "FixedBytes<{size}>"),
            RustType::NativeUint(bits) => write!(f, "u{bits}"),
            RustType::U256 => write!(f, "U256"),
            RustType::NativeInt(bits) => write!(f, "i{bits}"),
            RustType::I256 => write!(f, "I256"),
            RustType::Vec(inner) => write!(f, "Vec<{inner}>"),
            RustType::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0]),
            RustType::Tuple(items) => {
                write!(f, "(")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            RustType::Struct(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(kind: &str) -> ParamSpec {
        ParamSpec {
            name: String::new(),
            kind: kind.to_string(),
            abi_type: kind.to_string(),
            struct_name: None,
            components: Vec::new(),
        }
    }

    fn resolve(param: &ParamSpec) -> RustType {
        RustType::from_param(param, &mut |p| Ok(p.struct_name.clone()), "test").unwrap()
    }

    #[test]
    fn test_elementary_types() {
        assert_eq!(resolve(&param("uint256")).to_string(), "U256");
        assert_eq!(resolve(&param("uint8")).to_string(), "u8");
        assert_eq!(resolve(&param("uint24")).to_string(), "U256");
        assert_eq!(resolve(&param("int64")).to_string(), "i64");
        assert_eq!(resolve(&param("int128")).to_string(), "I256");
        assert_eq!(resolve(&param("address")).to_string(), "Address");
        assert_eq!(resolve(&param("bytes32")).to_string(), "FixedBytes<32>");
        assert_eq!(resolve(&param("bytes")).to_string(), "Bytes");
        assert_eq!(resolve(&param("address[]")).to_string(), "Vec<Address>");
        assert_eq!(resolve(&param("uint256[3]")).to_string(), "Vec<U256>");
    }

    #[test]
    fn test_tuple_types() {
        let mut tuple = param("(address,uint256)[]");
        tuple.abi_type = "tuple[]".to_string();
        tuple.components = vec![param("address"), param("uint256")];
        assert_eq!(resolve(&tuple).to_string(), "Vec<(Address, U256)>");

        tuple.struct_name = Some("PoolInfo".to_string());
        assert_eq!(resolve(&tuple).to_string(), "Vec<PoolInfo>");
    }

    #[test]
    fn test_returns() {
        assert_eq!(RustType::returns(vec![]).to_string(), "()");
        assert_eq!(RustType::returns(vec![RustType::U256]).to_string(), "U256");
        assert_eq!(
            RustType::returns(vec![RustType::U256, RustType::Bool]).to_string(),
            "(U256, bool)"
        );
    }
}
