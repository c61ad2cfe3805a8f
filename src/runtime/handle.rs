//! Contract handle - one address bound to one signer-or-provider

use std::fmt;
use std::sync::Arc;

use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes, TxKind};

use super::call::{TransactionCall, ViewCall};
use super::client::SignerOrProvider;
use super::function::FunctionDescriptor;
use super::value::AbiType;
use crate::error::BindingError;

/// Untyped contract handle; generated contract types wrap one
#[derive(Clone)]
pub struct ContractHandle {
    address: Address,
    client: Option<Arc<dyn SignerOrProvider>>,
}

impl ContractHandle {
    pub fn new(address: Address, client: Option<Arc<dyn SignerOrProvider>>) -> Self {
        Self { address, client }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn client(&self) -> Option<&Arc<dyn SignerOrProvider>> {
        self.client.as_ref()
    }

    /// Same address, different signer-or-provider
    pub fn with_client(&self, client: Arc<dyn SignerOrProvider>) -> Self {
        Self {
            address: self.address,
            client: Some(client),
        }
    }

    /// Same signer-or-provider, different address
    pub fn at(&self, address: Address) -> Self {
        Self {
            address,
            client: self.client.clone(),
        }
    }

    /// Build a read-only call
    pub fn view<T: AbiType>(
        &self,
        function: &'static FunctionDescriptor,
        args: Vec<DynSolValue>,
    ) -> ViewCall<T> {
        ViewCall::new(self.clone(), function, args)
    }

    /// Build a state-changing call
    pub fn transact<T: AbiType>(
        &self,
        function: &'static FunctionDescriptor,
        args: Vec<DynSolValue>,
    ) -> TransactionCall<T> {
        TransactionCall::new(self.clone(), function, args)
    }

    pub(crate) fn require_client(&self) -> Result<&Arc<dyn SignerOrProvider>, BindingError> {
        self.client.as_ref().ok_or(BindingError::MissingClient)
    }

    /// Base request addressed to this contract, sent from the signer if there is one
    pub(crate) fn call_request(&self, calldata: Bytes) -> TransactionRequest {
        TransactionRequest {
            from: self.client.as_ref().and_then(|c| c.signer_address()),
            to: Some(TxKind::Call(self.address)),
            input: TransactionInput::new(calldata),
            ..Default::default()
        }
    }
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("address", &self.address)
            .field(
                "client",
                &self.client.as_ref().map(|client| client.endpoint_name()),
            )
            .finish()
    }
}
