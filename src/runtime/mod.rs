//! Contract runtime - everything generated bindings call into
//!
//! Generated modules import only from here, so the runtime path they use
//! (`::kukugen::runtime` by default) can be re-pointed at a re-export.
//!
//! - [`SignerOrProvider`]: the injected capability that talks to a node
//! - [`ContractHandle`]: an address plus a shared signer-or-provider
//! - [`ViewCall`] / [`TransactionCall`]: per-call builders
//! - [`ContractFactory`]: deployment of contracts that ship bytecode
//! - [`AbiType`]: conversion between Rust values and ABI values

mod call;
mod client;
mod factory;
mod function;
mod handle;
pub mod mock;
mod overrides;
mod provider;
mod value;

pub use alloy::rpc::types::{TransactionInput, TransactionRequest};
pub use alloy_dyn_abi::DynSolValue;
pub use alloy_json_abi::{JsonAbi, StateMutability};
pub use alloy_primitives::{Address, Bytes, FixedBytes, TxKind, B256, I256, U256};

pub use crate::error::BindingError;
pub use call::{PendingTransaction, TransactionCall, ViewCall};
pub use client::{ReceiptSummary, SignerOrProvider};
pub use factory::ContractFactory;
pub use function::{decode_returns, encode_params, FunctionDescriptor};
pub use handle::ContractHandle;
pub use overrides::Overrides;
pub use provider::{AlloyClient, ProviderConfig};
pub use value::{tuple_fields, AbiType};

/// Parse an embedded ABI JSON string
pub fn parse_abi(json: &str) -> Result<JsonAbi, BindingError> {
    serde_json::from_str(json).map_err(|err| BindingError::Abi(err.to_string()))
}
