//! Static function descriptors and argument encoding

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_json_abi::StateMutability;
use alloy_primitives::{Bytes, I256, U256};

use super::value::{kind, AbiType};
use crate::error::BindingError;

/// One contract function, as emitted into generated bindings
///
/// Types are canonical Solidity type strings; they are parsed when a call
/// is encoded, so building a handle never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub name: &'static str,
    /// Canonical signature the selector was computed from
    pub signature: &'static str,
    pub selector: [u8; 4],
    pub inputs: &'static [&'static str],
    pub outputs: &'static [&'static str],
    pub mutability: StateMutability,
}

impl FunctionDescriptor {
    /// Whether the function is `view` or `pure`
    pub fn is_view(&self) -> bool {
        matches!(
            self.mutability,
            StateMutability::View | StateMutability::Pure
        )
    }

    pub fn is_payable(&self) -> bool {
        self.mutability == StateMutability::Payable
    }

    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }

    /// Encode calldata: selector followed by the ABI-encoded arguments
    pub fn encode_input(&self, args: Vec<DynSolValue>) -> Result<Bytes, BindingError> {
        let values = encode_params(self.name, self.inputs, args)?;
        let params = DynSolValue::Tuple(values).abi_encode_params();

        let mut data = Vec::with_capacity(4 + params.len());
        data.extend_from_slice(&self.selector);
        data.extend_from_slice(&params);
        Ok(Bytes::from(data))
    }

    /// Decode return data into one value per output
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<DynSolValue>, BindingError> {
        let types = self
            .outputs
            .iter()
            .map(|ty| parse_type(ty))
            .collect::<Result<Vec<_>, _>>()?;

        let decoded = DynSolType::Tuple(types)
            .abi_decode_params(data)
            .map_err(|err| BindingError::Decode {
                function: self.name.to_string(),
                message: err.to_string(),
            })?;

        match decoded {
            DynSolValue::Tuple(values) => Ok(values),
            other => Ok(vec![other]),
        }
    }
}

/// Check and coerce arguments against their declared Solidity types
pub fn encode_params(
    function: &str,
    types: &[&str],
    args: Vec<DynSolValue>,
) -> Result<Vec<DynSolValue>, BindingError> {
    if types.len() != args.len() {
        return Err(BindingError::ArgumentCount {
            function: function.to_string(),
            expected: types.len(),
            got: args.len(),
        });
    }

    types
        .iter()
        .zip(args)
        .map(|(ty, arg)| {
            let ty = parse_type(ty)?;
            coerce(&ty, arg).map_err(|message| BindingError::Encode {
                function: function.to_string(),
                message,
            })
        })
        .collect()
}

/// Convert decoded outputs into the method's return type
///
/// A single output is converted directly; several become a tuple.
pub fn decode_returns<T: AbiType>(mut values: Vec<DynSolValue>) -> Result<T, BindingError> {
    if values.len() == 1 {
        if let Some(value) = values.pop() {
            return T::from_value(value);
        }
    }
    T::from_value(DynSolValue::Tuple(values))
}

fn parse_type(ty: &str) -> Result<DynSolType, BindingError> {
    ty.parse::<DynSolType>().map_err(|err| BindingError::Type {
        ty: ty.to_string(),
        message: err.to_string(),
    })
}

/// Fit a value to the declared type: integer widths, fixed sizes and array lengths
fn coerce(ty: &DynSolType, value: DynSolValue) -> Result<DynSolValue, String> {
    match (ty, value) {
        (DynSolType::Uint(bits), DynSolValue::Uint(v, _)) => {
            if v.bit_len() > *bits {
                return Err(format!("{v} does not fit in uint{bits}"));
            }
            Ok(DynSolValue::Uint(v, *bits))
        }
        (DynSolType::Int(bits), DynSolValue::Int(v, _)) => {
            if *bits < 256 {
                let max = I256::from_raw((U256::from(1) << (*bits - 1)) - U256::from(1));
                let min = -max - I256::ONE;
                if v > max || v < min {
                    return Err(format!("{v} does not fit in int{bits}"));
                }
            }
            Ok(DynSolValue::Int(v, *bits))
        }
        (DynSolType::FixedBytes(size), DynSolValue::FixedBytes(word, _)) => {
            if word.0[(*size).min(32)..].iter().any(|b| *b != 0) {
                return Err(format!("value does not fit in bytes{size}"));
            }
            Ok(DynSolValue::FixedBytes(word, *size))
        }
        (DynSolType::Array(inner), DynSolValue::Array(items)) => Ok(DynSolValue::Array(
            items
                .into_iter()
                .map(|item| coerce(inner, item))
                .collect::<Result<_, _>>()?,
        )),
        (
            DynSolType::FixedArray(inner, len),
            DynSolValue::Array(items) | DynSolValue::FixedArray(items),
        ) => {
            if items.len() != *len {
                return Err(format!("expected {len} element(s), got {}", items.len()));
            }
            Ok(DynSolValue::FixedArray(
                items
                    .into_iter()
                    .map(|item| coerce(inner, item))
                    .collect::<Result<_, _>>()?,
            ))
        }
        (DynSolType::Tuple(types), DynSolValue::Tuple(items)) => {
            if items.len() != types.len() {
                return Err(format!(
                    "expected a tuple of {} field(s), got {}",
                    types.len(),
                    items.len()
                ));
            }
            Ok(DynSolValue::Tuple(
                types
                    .iter()
                    .zip(items)
                    .map(|(ty, item)| coerce(ty, item))
                    .collect::<Result<_, _>>()?,
            ))
        }
        (ty, value) => {
            if ty.matches(&value) {
                Ok(value)
            } else {
                Err(format!("expected {}, got {}", ty.sol_type_name(), kind(&value)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, Address};

    static DEPOSIT: FunctionDescriptor = FunctionDescriptor {
        name: "deposit",
        signature: "deposit(uint256,uint256)",
        selector: [0xe2, 0xbb, 0xb1, 0x58],
        inputs: &["uint256", "uint256"],
        outputs: &[],
        mutability: StateMutability::NonPayable,
    };

    static SAFE_DECIMALS: FunctionDescriptor = FunctionDescriptor {
        name: "safeDecimals",
        signature: "safeDecimals(IERC20)",
        selector: [0x72, 0xa5, 0x8a, 0xe1],
        inputs: &["address"],
        outputs: &["uint8"],
        mutability: StateMutability::View,
    };

    #[test]
    fn test_encode_deposit() {
        let data = DEPOSIT
            .encode_input(vec![U256::from(1).into_value(), U256::from(2).into_value()])
            .unwrap();

        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[..4], &[0xe2, 0xbb, 0xb1, 0x58]);
        assert_eq!(data[35], 1);
        assert_eq!(data[67], 2);
    }

    #[test]
    fn test_argument_count_checked() {
        let err = DEPOSIT
            .encode_input(vec![U256::from(1).into_value()])
            .unwrap_err();
        assert!(matches!(
            err,
            BindingError::ArgumentCount {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let err = DEPOSIT
            .encode_input(vec![true.into_value(), U256::from(2).into_value()])
            .unwrap_err();
        assert!(matches!(err, BindingError::Encode { .. }));
    }

    #[test]
    fn test_uint_overflow_rejected() {
        let ty: DynSolType = "uint8".parse().unwrap();
        assert!(coerce(&ty, U256::from(256).into_value()).is_err());
        assert_eq!(
            coerce(&ty, U256::from(255).into_value()).unwrap(),
            DynSolValue::Uint(U256::from(255), 8)
        );
    }

    #[test]
    fn test_int_overflow_rejected() {
        let ty: DynSolType = "int128".parse().unwrap();
        assert!(coerce(&ty, I256::MAX.into_value()).is_err());
        assert!(coerce(&ty, I256::MIN.into_value()).is_err());

        let max = I256::from_raw((U256::from(1) << 127) - U256::from(1));
        let min = -max - I256::ONE;
        assert_eq!(coerce(&ty, max.into_value()).unwrap(), DynSolValue::Int(max, 128));
        assert_eq!(coerce(&ty, min.into_value()).unwrap(), DynSolValue::Int(min, 128));
        assert!(coerce(&ty, (max + I256::ONE).into_value()).is_err());
        assert!(coerce(&ty, (min - I256::ONE).into_value()).is_err());

        let int8: DynSolType = "int8".parse().unwrap();
        assert!(coerce(&int8, (-128i64).into_value()).is_ok());
        assert!(coerce(&int8, (-129i64).into_value()).is_err());
        assert!(coerce(&int8, 127i64.into_value()).is_ok());
        assert!(coerce(&int8, 128i64.into_value()).is_err());
    }

    #[test]
    fn test_int_argument_out_of_range_rejected() {
        static SET_DEBT: FunctionDescriptor = FunctionDescriptor {
            name: "setDebt",
            signature: "setDebt(int128)",
            selector: [0, 0, 0, 0],
            inputs: &["int128"],
            outputs: &[],
            mutability: StateMutability::NonPayable,
        };
        let err = SET_DEBT.encode_input(vec![I256::MAX.into_value()]).unwrap_err();
        assert!(matches!(err, BindingError::Encode { .. }));
        assert!(SET_DEBT.encode_input(vec![(-5i64).into_value()]).is_ok());
    }

    #[test]
    fn test_vec_coerced_to_fixed_array() {
        let ty: DynSolType = "uint256[2]".parse().unwrap();
        let value = vec![U256::from(1), U256::from(2)].into_value();
        assert!(matches!(coerce(&ty, value).unwrap(), DynSolValue::FixedArray(_)));

        let short = vec![U256::from(1)].into_value();
        assert!(coerce(&ty, short).is_err());
    }

    #[test]
    fn test_decode_single_output() {
        let mut word = [0u8; 32];
        word[31] = 18;
        let values = SAFE_DECIMALS.decode_output(&word).unwrap();
        assert_eq!(decode_returns::<u8>(values).unwrap(), 18);
    }

    #[test]
    fn test_decode_empty_output() {
        let values = DEPOSIT.decode_output(&[]).unwrap();
        assert!(values.is_empty());
        decode_returns::<()>(values).unwrap();
    }

    #[test]
    fn test_library_param_encodes_as_address() {
        let token: Address = address!("00000000000000000000000000000000000000aa");
        let data = SAFE_DECIMALS.encode_input(vec![token.into_value()]).unwrap();
        assert_eq!(SAFE_DECIMALS.selector_hex(), "0x72a58ae1");
        assert_eq!(&data[16..36], token.as_slice());
    }
}
