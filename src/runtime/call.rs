//! Call builders returned by generated methods

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use alloy::rpc::types::TransactionRequest;
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes, B256, U256};

use super::client::{ReceiptSummary, SignerOrProvider};
use super::function::{decode_returns, FunctionDescriptor};
use super::handle::ContractHandle;
use super::overrides::Overrides;
use super::value::AbiType;
use crate::error::BindingError;

/// A `view` / `pure` call decoding to `T`
#[must_use = "call builders do nothing until `call` is awaited"]
pub struct ViewCall<T> {
    handle: ContractHandle,
    function: &'static FunctionDescriptor,
    args: Vec<DynSolValue>,
    from: Option<Address>,
    _output: PhantomData<fn() -> T>,
}

impl<T: AbiType> ViewCall<T> {
    pub(crate) fn new(
        handle: ContractHandle,
        function: &'static FunctionDescriptor,
        args: Vec<DynSolValue>,
    ) -> Self {
        Self {
            handle,
            function,
            args,
            from: None,
            _output: PhantomData,
        }
    }

    /// Call as another account
    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn function(&self) -> &'static FunctionDescriptor {
        self.function
    }

    /// Encoded calldata
    pub fn calldata(&self) -> Result<Bytes, BindingError> {
        self.function.encode_input(self.args.clone())
    }

    /// The `eth_call` request this builder sends
    pub fn request(&self) -> Result<TransactionRequest, BindingError> {
        let mut request = self.handle.call_request(self.calldata()?);
        if let Some(from) = self.from {
            request.from = Some(from);
        }
        Ok(request)
    }

    /// Execute the call and decode the result
    pub async fn call(&self) -> Result<T, BindingError> {
        let client = self.handle.require_client()?;
        let request = self.request()?;
        tracing::debug!(
            function = self.function.signature,
            to = %self.handle.address(),
            "eth_call"
        );
        let data = client.call(request).await?;
        decode_returns(self.function.decode_output(&data)?)
    }
}

/// A `nonpayable` / `payable` call
///
/// `send` submits a transaction; `call` simulates it and decodes `T`.
#[must_use = "call builders do nothing until `send` or `call` is awaited"]
pub struct TransactionCall<T> {
    handle: ContractHandle,
    function: &'static FunctionDescriptor,
    args: Vec<DynSolValue>,
    overrides: Overrides,
    _output: PhantomData<fn() -> T>,
}

impl<T: AbiType> TransactionCall<T> {
    pub(crate) fn new(
        handle: ContractHandle,
        function: &'static FunctionDescriptor,
        args: Vec<DynSolValue>,
    ) -> Self {
        Self {
            handle,
            function,
            args,
            overrides: Overrides::default(),
            _output: PhantomData,
        }
    }

    /// Replace all overrides
    pub fn overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Attach ether; only valid for payable functions
    pub fn value(mut self, value: U256) -> Self {
        self.overrides.value = Some(value);
        self
    }

    pub fn from(mut self, from: Address) -> Self {
        self.overrides.from = Some(from);
        self
    }

    pub fn gas_limit(mut self, gas: u64) -> Self {
        self.overrides.gas_limit = Some(gas);
        self
    }

    pub fn function(&self) -> &'static FunctionDescriptor {
        self.function
    }

    pub fn calldata(&self) -> Result<Bytes, BindingError> {
        self.function.encode_input(self.args.clone())
    }

    /// The transaction request, with overrides applied
    pub fn request(&self) -> Result<TransactionRequest, BindingError> {
        if self.overrides.has_value() && !self.function.is_payable() {
            return Err(BindingError::NonPayableValue(self.function.signature.to_string()));
        }
        let request = self.handle.call_request(self.calldata()?);
        Ok(self.overrides.apply(request))
    }

    /// Simulate the transaction with `eth_call` and decode its return value
    pub async fn call(&self) -> Result<T, BindingError> {
        let client = self.handle.require_client()?;
        let data = client.call(self.request()?).await?;
        decode_returns(self.function.decode_output(&data)?)
    }

    pub async fn estimate_gas(&self) -> Result<u64, BindingError> {
        let client = self.handle.require_client()?;
        client.estimate_gas(self.request()?).await
    }

    /// Submit the transaction
    pub async fn send(&self) -> Result<PendingTransaction, BindingError> {
        let client = self.handle.require_client()?;
        let request = self.request()?;
        let hash = client.send_transaction(request).await?;
        tracing::info!(
            function = self.function.signature,
            to = %self.handle.address(),
            tx = %hash,
            "transaction sent"
        );
        Ok(PendingTransaction::new(hash, Arc::clone(client)))
    }
}

/// A submitted transaction
#[derive(Clone)]
pub struct PendingTransaction {
    hash: B256,
    client: Arc<dyn SignerOrProvider>,
}

impl PendingTransaction {
    pub fn new(hash: B256, client: Arc<dyn SignerOrProvider>) -> Self {
        Self { hash, client }
    }

    pub fn tx_hash(&self) -> B256 {
        self.hash
    }

    /// Current receipt, if the transaction is mined
    pub async fn receipt(&self) -> Result<Option<ReceiptSummary>, BindingError> {
        self.client.transaction_receipt(self.hash).await
    }

    /// Wait for the receipt until it shows up or `timeout` passes
    ///
    /// A reverted transaction still yields its receipt; check `status`.
    pub async fn wait(
        &self,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<ReceiptSummary, BindingError> {
        let receipt = self
            .client
            .wait_for_receipt(self.hash, poll_interval, timeout)
            .await?;
        tracing::debug!(tx = %self.hash, status = receipt.status, "receipt received");
        Ok(receipt)
    }
}

impl std::fmt::Debug for PendingTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingTransaction")
            .field("hash", &self.hash)
            .field("endpoint", &self.client.endpoint_name())
            .finish()
    }
}
