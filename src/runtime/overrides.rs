//! Per-transaction overrides

use alloy::rpc::types::TransactionRequest;
use alloy_primitives::{Address, U256};

/// Transaction fields applied on top of the request a binding builds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub from: Option<Address>,
    pub value: Option<U256>,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub nonce: Option<u64>,
    pub chain_id: Option<u64>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    pub fn gas_limit(mut self, gas: u64) -> Self {
        self.gas_limit = Some(gas);
        self
    }

    pub fn gas_price(mut self, price: u128) -> Self {
        self.gas_price = Some(price);
        self
    }

    /// EIP-1559 fees
    pub fn eip1559_fees(mut self, max_fee: u128, max_priority_fee: u128) -> Self {
        self.max_fee_per_gas = Some(max_fee);
        self.max_priority_fee_per_gas = Some(max_priority_fee);
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Whether a non-zero value is attached
    pub fn has_value(&self) -> bool {
        self.value.is_some_and(|value| !value.is_zero())
    }

    /// Overwrite the request's fields with every override that is set
    pub fn apply(&self, mut request: TransactionRequest) -> TransactionRequest {
        if let Some(from) = self.from {
            request.from = Some(from);
        }
        if let Some(value) = self.value {
            request.value = Some(value);
        }
        if let Some(gas) = self.gas_limit {
            request.gas = Some(gas);
        }
        if let Some(price) = self.gas_price {
            request.gas_price = Some(price);
        }
        if let Some(fee) = self.max_fee_per_gas {
            request.max_fee_per_gas = Some(fee);
        }
        if let Some(fee) = self.max_priority_fee_per_gas {
            request.max_priority_fee_per_gas = Some(fee);
        }
        if let Some(nonce) = self.nonce {
            request.nonce = Some(nonce);
        }
        if let Some(chain_id) = self.chain_id {
            request.chain_id = Some(chain_id);
        }
        request
    }
}
