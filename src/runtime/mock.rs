//! In-memory signer-or-provider for tests
//!
//! Queue raw return data with [`MockClient::push_response`], then inspect
//! the requests bindings produced. Every sent transaction is mined at once
//! with a deterministic hash; waiting on any other hash runs out the
//! timeout.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use alloy::rpc::types::TransactionRequest;
use alloy_primitives::{keccak256, Address, Bytes, TxKind, B256};
use async_trait::async_trait;

use super::client::{ReceiptSummary, SignerOrProvider};
use crate::error::BindingError;

#[derive(Default)]
struct MockState {
    responses: VecDeque<Bytes>,
    calls: Vec<TransactionRequest>,
    sent: Vec<TransactionRequest>,
    receipts: HashMap<B256, ReceiptSummary>,
    fail_next: bool,
}

/// Recording mock of a node
pub struct MockClient {
    state: Mutex<MockState>,
    signer: Option<Address>,
    deploy_address: Address,
    gas_estimate: u64,
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            signer: None,
            deploy_address: Address::repeat_byte(0xc0),
            gas_estimate: 21_000,
        }
    }

    /// Act as a signer for `address`
    pub fn with_signer(mut self, address: Address) -> Self {
        self.signer = Some(address);
        self
    }

    /// Address reported for contract-creation receipts
    pub fn with_deploy_address(mut self, address: Address) -> Self {
        self.deploy_address = address;
        self
    }

    pub fn with_gas_estimate(mut self, gas: u64) -> Self {
        self.gas_estimate = gas;
        self
    }

    /// Queue the raw return data of the next `eth_call`
    pub fn push_response(&self, data: impl Into<Bytes>) {
        self.lock().responses.push_back(data.into());
    }

    /// Mine the next transaction with a failed status
    pub fn fail_next_transaction(&self) {
        self.lock().fail_next = true;
    }

    /// Requests passed to `call` and `estimate_gas`
    pub fn calls(&self) -> Vec<TransactionRequest> {
        self.lock().calls.clone()
    }

    /// Requests passed to `send_transaction`
    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.lock().sent.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SignerOrProvider for MockClient {
    async fn call(&self, request: TransactionRequest) -> Result<Bytes, BindingError> {
        let mut state = self.lock();
        state.calls.push(request);
        state
            .responses
            .pop_front()
            .ok_or_else(|| BindingError::Transport("no mock response queued".to_string()))
    }

    async fn estimate_gas(&self, request: TransactionRequest) -> Result<u64, BindingError> {
        self.lock().calls.push(request);
        Ok(self.gas_estimate)
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<B256, BindingError> {
        let mut state = self.lock();
        let index = state.sent.len() as u64;
        let hash = keccak256(index.to_be_bytes());

        let contract_address = match request.to {
            Some(TxKind::Create) => Some(self.deploy_address),
            _ => None,
        };
        let status = !std::mem::take(&mut state.fail_next);
        state.receipts.insert(
            hash,
            ReceiptSummary {
                transaction_hash: hash,
                status,
                contract_address,
                block_number: Some(index + 1),
                gas_used: self.gas_estimate,
            },
        );
        state.sent.push(request);
        Ok(hash)
    }

    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<ReceiptSummary>, BindingError> {
        Ok(self.lock().receipts.get(&hash).cloned())
    }

    async fn wait_for_receipt(
        &self,
        hash: B256,
        _poll_interval: Duration,
        timeout: Duration,
    ) -> Result<ReceiptSummary, BindingError> {
        let receipt = self.lock().receipts.get(&hash).cloned();
        match receipt {
            Some(receipt) => Ok(receipt),
            None => {
                tokio::time::sleep(timeout).await;
                Err(BindingError::Timeout {
                    hash,
                    waited: timeout,
                })
            }
        }
    }

    fn signer_address(&self) -> Option<Address> {
        self.signer
    }

    fn endpoint_name(&self) -> String {
        "mock".to_string()
    }
}
