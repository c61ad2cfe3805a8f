//! Signer-or-provider abstraction

use std::time::Duration;

use alloy::rpc::types::TransactionRequest;
use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;

use crate::error::BindingError;

/// What a mined transaction left behind, as far as bindings care
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub transaction_hash: B256,
    /// `true` when the transaction succeeded
    pub status: bool,
    /// Address of the created contract, for deployments
    pub contract_address: Option<Address>,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// A transaction-signing identity or a read-only data source
///
/// Generated bindings hold it as `Arc<dyn SignerOrProvider>`; everything
/// they do on-chain goes through these methods.
#[async_trait]
pub trait SignerOrProvider: Send + Sync + 'static {
    /// Execute a call (eth_call)
    async fn call(&self, request: TransactionRequest) -> Result<Bytes, BindingError>;

    /// Estimate gas (eth_estimateGas)
    async fn estimate_gas(&self, request: TransactionRequest) -> Result<u64, BindingError>;

    /// Submit a transaction, returning its hash
    async fn send_transaction(&self, request: TransactionRequest) -> Result<B256, BindingError>;

    /// Get transaction receipt
    async fn transaction_receipt(&self, hash: B256)
        -> Result<Option<ReceiptSummary>, BindingError>;

    /// Wait until `hash` is mined, checking every `poll_interval`
    ///
    /// Fails with [`BindingError::Timeout`] once `timeout` has passed.
    async fn wait_for_receipt(
        &self,
        hash: B256,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<ReceiptSummary, BindingError>;

    /// Account transactions are sent from, if this is a signer
    fn signer_address(&self) -> Option<Address>;

    /// Get endpoint display name
    fn endpoint_name(&self) -> String;
}
