//! Contract factory - deployment of contracts that ship bytecode

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, Bytes, TxKind};

use super::call::PendingTransaction;
use super::client::SignerOrProvider;
use super::function::encode_params;
use super::handle::ContractHandle;
use super::overrides::Overrides;
use crate::error::BindingError;

/// Deploys one contract and hands out handles to it
#[derive(Clone)]
pub struct ContractFactory {
    abi: &'static str,
    bytecode: &'static str,
    constructor_inputs: &'static [&'static str],
    signer: Option<Arc<dyn SignerOrProvider>>,
    poll_interval: Duration,
    deploy_timeout: Duration,
}

impl ContractFactory {
    /// Default receipt poll interval while deploying
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
    /// Default time to wait for a deployment receipt
    pub const DEFAULT_DEPLOY_TIMEOUT: Duration = Duration::from_secs(300);

    pub fn new(
        abi: &'static str,
        bytecode: &'static str,
        constructor_inputs: &'static [&'static str],
        signer: Option<Arc<dyn SignerOrProvider>>,
    ) -> Self {
        Self {
            abi,
            bytecode,
            constructor_inputs,
            signer,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            deploy_timeout: Self::DEFAULT_DEPLOY_TIMEOUT,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_deploy_timeout(mut self, timeout: Duration) -> Self {
        self.deploy_timeout = timeout;
        self
    }

    /// The embedded ABI JSON
    pub fn abi_json(&self) -> &'static str {
        self.abi
    }

    pub fn abi(&self) -> Result<JsonAbi, BindingError> {
        super::parse_abi(self.abi)
    }

    pub fn bytecode(&self) -> &'static str {
        self.bytecode
    }

    pub fn constructor_inputs(&self) -> &'static [&'static str] {
        self.constructor_inputs
    }

    pub fn signer(&self) -> Option<&Arc<dyn SignerOrProvider>> {
        self.signer.as_ref()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn deploy_timeout(&self) -> Duration {
        self.deploy_timeout
    }

    /// The contract-creation request `deploy` would send
    pub fn deploy_transaction(
        &self,
        args: Vec<DynSolValue>,
        overrides: Overrides,
    ) -> Result<TransactionRequest, BindingError> {
        let code = self
            .bytecode
            .strip_prefix("0x")
            .unwrap_or(self.bytecode);
        let mut data = hex::decode(code).map_err(|err| BindingError::Bytecode(err.to_string()))?;
        if data.is_empty() {
            return Err(BindingError::Bytecode("bytecode is empty".to_string()));
        }

        let params = encode_params("constructor", self.constructor_inputs, args)?;
        data.extend_from_slice(&DynSolValue::Tuple(params).abi_encode_params());

        let request = TransactionRequest {
            from: self.signer.as_ref().and_then(|s| s.signer_address()),
            to: Some(TxKind::Create),
            input: TransactionInput::new(Bytes::from(data)),
            ..Default::default()
        };
        Ok(overrides.apply(request))
    }

    /// Deploy a new instance and wait for its receipt
    pub async fn deploy(
        &self,
        args: Vec<DynSolValue>,
        overrides: Overrides,
    ) -> Result<ContractHandle, BindingError> {
        let signer = self.signer.clone().ok_or(BindingError::MissingSigner)?;
        let request = self.deploy_transaction(args, overrides)?;

        let hash = signer.send_transaction(request).await?;
        tracing::info!(tx = %hash, endpoint = %signer.endpoint_name(), "deployment sent");

        let receipt = PendingTransaction::new(hash, Arc::clone(&signer))
            .wait(self.poll_interval, self.deploy_timeout)
            .await?;
        if !receipt.status {
            return Err(BindingError::Reverted(hash));
        }
        let address = receipt
            .contract_address
            .ok_or(BindingError::NoContractAddress(hash))?;

        tracing::info!(%address, tx = %hash, "contract deployed");
        Ok(ContractHandle::new(address, Some(signer)))
    }

    /// Handle to an already-deployed instance, using this factory's signer
    pub fn attach(&self, address: Address) -> ContractHandle {
        ContractHandle::new(address, self.signer.clone())
    }

    /// Same factory, bound to another signer
    pub fn connect_signer(&self, signer: Arc<dyn SignerOrProvider>) -> Self {
        Self {
            signer: Some(signer),
            ..self.clone()
        }
    }
}

impl fmt::Debug for ContractFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractFactory")
            .field("bytecode_len", &(self.bytecode.len().saturating_sub(2) / 2))
            .field("constructor_inputs", &self.constructor_inputs)
            .field(
                "signer",
                &self.signer.as_ref().map(|signer| signer.endpoint_name()),
            )
            .field("poll_interval", &self.poll_interval)
            .field("deploy_timeout", &self.deploy_timeout)
            .finish()
    }
}
