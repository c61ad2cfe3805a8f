//! Conversion between Rust values and dynamic ABI values

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes, FixedBytes, B256, I256, U256};

use crate::error::BindingError;

/// A Rust type that maps onto a Solidity type
///
/// Generated structs implement this through [`tuple_fields`].
pub trait AbiType: Sized {
    /// Convert into an ABI value
    fn into_value(self) -> DynSolValue;

    /// Convert from a decoded ABI value
    fn from_value(value: DynSolValue) -> Result<Self, BindingError>;
}

/// Split a tuple value into exactly `N` fields
pub fn tuple_fields<const N: usize>(value: DynSolValue) -> Result<[DynSolValue; N], BindingError> {
    match value {
        DynSolValue::Tuple(items) => items
            .try_into()
            .map_err(|items: Vec<DynSolValue>| BindingError::TupleLength {
                expected: N,
                got: items.len(),
            }),
        other => Err(mismatch("tuple", &other)),
    }
}

/// Short name of a value's kind, for error messages
#[allow(unreachable_patterns)]
pub(crate) fn kind(value: &DynSolValue) -> &'static str {
    match value {
        DynSolValue::Bool(_) => "bool",
        DynSolValue::Int(..) => "int",
        DynSolValue::Uint(..) => "uint",
        DynSolValue::FixedBytes(..) => "fixed bytes",
        DynSolValue::Address(_) => "address",
        DynSolValue::Function(_) => "function",
        DynSolValue::Bytes(_) => "bytes",
        DynSolValue::String(_) => "string",
        DynSolValue::Array(_) => "array",
        DynSolValue::FixedArray(_) => "fixed array",
        DynSolValue::Tuple(_) => "tuple",
        _ => "value",
    }
}

fn mismatch(expected: &'static str, got: &DynSolValue) -> BindingError {
    BindingError::Conversion {
        expected,
        got: kind(got),
    }
}

fn out_of_range(expected: &'static str) -> BindingError {
    BindingError::Conversion {
        expected,
        got: "out-of-range integer",
    }
}

impl AbiType for bool {
    fn into_value(self) -> DynSolValue {
        DynSolValue::Bool(self)
    }

    fn from_value(value: DynSolValue) -> Result<Self, BindingError> {
        match value {
            DynSolValue::Bool(b) => Ok(b),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl AbiType for Address {
    fn into_value(self) -> DynSolValue {
        DynSolValue::Address(self)
    }

    fn from_value(value: DynSolValue) -> Result<Self, BindingError> {
        match value {
            DynSolValue::Address(address) => Ok(address),
            other => Err(mismatch("address", &other)),
        }
    }
}

impl AbiType for U256 {
    fn into_value(self) -> DynSolValue {
        DynSolValue::Uint(self, 256)
    }

    fn from_value(value: DynSolValue) -> Result<Self, BindingError> {
        match value {
            DynSolValue::Uint(v, _) => Ok(v),
            other => Err(mismatch("uint", &other)),
        }
    }
}

impl AbiType for I256 {
    fn into_value(self) -> DynSolValue {
        DynSolValue::Int(self, 256)
    }

    fn from_value(value: DynSolValue) -> Result<Self, BindingError> {
        match value {
            DynSolValue::Int(v, _) => Ok(v),
            other => Err(mismatch("int", &other)),
        }
    }
}

macro_rules! impl_abi_uint {
    ($($t:ty => $bits:literal),* $(,)?) => {$(
        impl AbiType for $t {
            fn into_value(self) -> DynSolValue {
                DynSolValue::Uint(U256::from(self), $bits)
            }

            fn from_value(value: DynSolValue) -> Result<Self, BindingError> {
                match value {
                    DynSolValue::Uint(v, _) => {
                        <$t>::try_from(v).map_err(|_| out_of_range(stringify!($t)))
                    }
                    other => Err(mismatch(stringify!($t), &other)),
                }
            }
        }
    )*};
}

impl_abi_uint!(u8 => 8, u16 => 16, u32 => 32, u64 => 64);

macro_rules! impl_abi_int {
    ($($t:ty => $bits:literal),* $(,)?) => {$(
        impl AbiType for $t {
            fn into_value(self) -> DynSolValue {
                DynSolValue::Int(I256::unchecked_from(self), $bits)
            }

            fn from_value(value: DynSolValue) -> Result<Self, BindingError> {
                match value {
                    DynSolValue::Int(v, _) => {
                        <$t>::try_from(v).map_err(|_| out_of_range(stringify!($t)))
                    }
                    other => Err(mismatch(stringify!($t), &other)),
                }
            }
        }
    )*};
}

impl_abi_int!(i8 => 8, i16 => 16, i32 => 32, i64 => 64);

impl AbiType for String {
    fn into_value(self) -> DynSolValue {
        DynSolValue::String(self)
    }

    fn from_value(value: DynSolValue) -> Result<Self, BindingError> {
        match value {
            DynSolValue::String(s) => Ok(s),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl AbiType for Bytes {
    fn into_value(self) -> DynSolValue {
        DynSolValue::Bytes(self.to_vec())
    }

    fn from_value(value: DynSolValue) -> Result<Self, BindingError> {
        match value {
            DynSolValue::Bytes(bytes) => Ok(Bytes::from(bytes)),
            other => Err(mismatch("bytes", &other)),
        }
    }
}

impl<const N: usize> AbiType for FixedBytes<N> {
    fn into_value(self) -> DynSolValue {
        let len = N.min(32);
        let mut word = B256::ZERO;
        word.0[..len].copy_from_slice(&self.0[..len]);
        DynSolValue::FixedBytes(word, len)
    }

    fn from_value(value: DynSolValue) -> Result<Self, BindingError> {
        match value {
            DynSolValue::FixedBytes(word, size) if size == N && N <= 32 => {
                let mut out = [0u8; N];
                out.copy_from_slice(&word.0[..N]);
                Ok(FixedBytes(out))
            }
            other => Err(mismatch("fixed bytes", &other)),
        }
    }
}

impl<T: AbiType> AbiType for Vec<T> {
    fn into_value(self) -> DynSolValue {
        DynSolValue::Array(self.into_iter().map(AbiType::into_value).collect())
    }

    fn from_value(value: DynSolValue) -> Result<Self, BindingError> {
        match value {
            DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
                items.into_iter().map(T::from_value).collect()
            }
            other => Err(mismatch("array", &other)),
        }
    }
}

impl AbiType for () {
    fn into_value(self) -> DynSolValue {
        DynSolValue::Tuple(Vec::new())
    }

    fn from_value(value: DynSolValue) -> Result<Self, BindingError> {
        let [] = tuple_fields::<0>(value)?;
        Ok(())
    }
}

macro_rules! impl_abi_tuple {
    ($($len:literal; $($name:ident),+);* $(;)?) => {$(
        impl<$($name: AbiType),+> AbiType for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_value(self) -> DynSolValue {
                let ($($name,)+) = self;
                DynSolValue::Tuple(vec![$($name.into_value()),+])
            }

            #[allow(non_snake_case)]
            fn from_value(value: DynSolValue) -> Result<Self, BindingError> {
                let [$($name),+] = tuple_fields::<$len>(value)?;
                Ok(($($name::from_value($name)?,)+))
            }
        }
    )*};
}

impl_abi_tuple! {
    1; A;
    2; A, B;
    3; A, B, C;
    4; A, B, C, D;
    5; A, B, C, D, E;
    6; A, B, C, D, E, F;
    7; A, B, C, D, E, F, G;
    8; A, B, C, D, E, F, G, H;
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_native_uint_keeps_width() {
        assert_eq!(18u8.into_value(), DynSolValue::Uint(U256::from(18), 8));
        assert_eq!(u8::from_value(DynSolValue::Uint(U256::from(18), 8)).unwrap(), 18);
        assert!(u8::from_value(DynSolValue::Uint(U256::from(300), 256)).is_err());
    }

    #[test]
    fn test_native_int_round_trip() {
        for v in [-1i64, 0, 42, i64::MIN, i64::MAX] {
            assert_eq!(i64::from_value(v.into_value()).unwrap(), v);
        }
        assert_eq!(
            (-1i8).into_value(),
            DynSolValue::Int(I256::MINUS_ONE, 8)
        );
        assert!(i8::from_value(DynSolValue::Int(I256::unchecked_from(200i64), 256)).is_err());
    }

    #[test]
    fn test_fixed_bytes_padding() {
        let selector = FixedBytes::<4>([0xe2, 0xbb, 0xb1, 0x58]);
        let value = selector.into_value();
        match &value {
            DynSolValue::FixedBytes(word, 4) => {
                assert_eq!(&word.0[..4], &[0xe2, 0xbb, 0xb1, 0x58]);
                assert!(word.0[4..].iter().all(|b| *b == 0));
            }
            other => panic!("unexpected value {other:?}"),
        }
        assert_eq!(FixedBytes::<4>::from_value(value).unwrap(), selector);
    }

    #[test]
    fn test_tuple_and_vec() {
        let owner = address!("00000000000000000000000000000000000000aa");
        let value = (owner, U256::from(7), vec![true, false]).into_value();
        let (a, b, c) = <(Address, U256, Vec<bool>)>::from_value(value).unwrap();
        assert_eq!(a, owner);
        assert_eq!(b, U256::from(7));
        assert_eq!(c, vec![true, false]);
    }

    #[test]
    fn test_tuple_fields_length_mismatch() {
        let err = tuple_fields::<2>(DynSolValue::Tuple(vec![DynSolValue::Bool(true)])).unwrap_err();
        assert!(matches!(
            err,
            BindingError::TupleLength {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn test_conversion_error_names_kinds() {
        let err = Address::from_value(DynSolValue::Bool(true)).unwrap_err();
        assert_eq!(err.to_string(), "expected address, got bool");
    }
}
