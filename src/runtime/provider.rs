//! Alloy-backed signer-or-provider

use std::path::PathBuf;
use std::time::Duration;

use alloy::network::Ethereum;
use alloy::providers::{
    fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
    Identity, PendingTransactionBuilder, PendingTransactionError, Provider, ProviderBuilder,
    RootProvider, WatchTxError,
};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;

use super::client::{ReceiptSummary, SignerOrProvider};
use crate::error::BindingError;

/// Provider configuration
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    /// HTTP JSON-RPC endpoint
    Http(String),
    /// WebSocket endpoint
    WebSocket(String),
    /// IPC socket path (Unix only)
    #[cfg(unix)]
    Ipc(PathBuf),
}

impl ProviderConfig {
    /// Guess the transport from an endpoint string
    pub fn parse(endpoint: &str) -> Self {
        if endpoint.starts_with("ws://") || endpoint.starts_with("wss://") {
            return ProviderConfig::WebSocket(endpoint.to_string());
        }
        #[cfg(unix)]
        if endpoint.ends_with(".ipc") {
            return ProviderConfig::Ipc(PathBuf::from(endpoint));
        }
        ProviderConfig::Http(endpoint.to_string())
    }

    /// Get display name for this endpoint
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::WebSocket(url) => url.clone(),
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => path.display().to_string(),
        }
    }
}

// Type aliases for the filled providers
type HttpFillProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

type WsFillProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

#[cfg(unix)]
type IpcFillProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

/// Enum-based provider that stores concrete types for each transport
enum AlloyProvider {
    Http(HttpFillProvider),
    WebSocket(WsFillProvider),
    #[cfg(unix)]
    Ipc(IpcFillProvider),
}

/// A node connection used as the signer-or-provider of generated bindings
///
/// Transactions are sent with `eth_sendTransaction`, so signing happens in
/// the node for the account set as `from`.
pub struct AlloyClient {
    provider: AlloyProvider,
    endpoint: String,
    from: Option<Address>,
}

impl AlloyClient {
    /// Connect to an endpoint; `from` is the node-managed sending account
    pub async fn connect(config: ProviderConfig, from: Option<Address>) -> Result<Self, BindingError> {
        let endpoint = config.display();
        let provider = match config {
            ProviderConfig::Http(url) => {
                let rpc_url = url
                    .parse()
                    .map_err(|err| BindingError::Transport(format!("invalid HTTP URL: {err}")))?;
                AlloyProvider::Http(ProviderBuilder::new().connect_http(rpc_url))
            }
            ProviderConfig::WebSocket(url) => {
                let provider = ProviderBuilder::new()
                    .connect(&url)
                    .await
                    .map_err(|err| BindingError::Transport(err.to_string()))?;
                AlloyProvider::WebSocket(provider)
            }
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => {
                use alloy::providers::IpcConnect;
                let ipc = IpcConnect::new(path.to_string_lossy().to_string());
                let provider = ProviderBuilder::new()
                    .connect_ipc(ipc)
                    .await
                    .map_err(|err| BindingError::Transport(err.to_string()))?;
                AlloyProvider::Ipc(provider)
            }
        };

        tracing::debug!(%endpoint, from = ?from, "connected provider");
        Ok(Self {
            provider,
            endpoint,
            from,
        })
    }

    /// Same connection, sending from another account
    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }
}

// Macro to reduce code duplication for provider method implementations
macro_rules! impl_provider_method {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        match &$self.provider {
            AlloyProvider::Http(provider) => provider.$method($($arg),*).await,
            AlloyProvider::WebSocket(provider) => provider.$method($($arg),*).await,
            #[cfg(unix)]
            AlloyProvider::Ipc(provider) => provider.$method($($arg),*).await,
        }
    };
}

fn transport<E: std::fmt::Display>(err: E) -> BindingError {
    BindingError::Transport(err.to_string())
}

/// Let alloy's heartbeat watch for `hash` instead of polling by hand
async fn wait_with<P: Provider>(
    provider: &P,
    hash: B256,
    poll_interval: Duration,
    timeout: Duration,
) -> Result<ReceiptSummary, BindingError> {
    provider.client().set_poll_interval(poll_interval);
    let receipt = PendingTransactionBuilder::new(provider.root().clone(), hash)
        .with_timeout(Some(timeout))
        .get_receipt()
        .await
        .map_err(|err| match err {
            PendingTransactionError::TxWatcher(WatchTxError::Timeout) => BindingError::Timeout {
                hash,
                waited: timeout,
            },
            other => transport(other),
        })?;
    Ok(summarize(&receipt))
}

fn summarize(receipt: &TransactionReceipt) -> ReceiptSummary {
    ReceiptSummary {
        transaction_hash: receipt.transaction_hash,
        status: receipt.status(),
        contract_address: receipt.contract_address,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
    }
}

#[async_trait]
impl SignerOrProvider for AlloyClient {
    async fn call(&self, request: TransactionRequest) -> Result<Bytes, BindingError> {
        impl_provider_method!(self, call, request).map_err(transport)
    }

    async fn estimate_gas(&self, request: TransactionRequest) -> Result<u64, BindingError> {
        impl_provider_method!(self, estimate_gas, request).map_err(transport)
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<B256, BindingError> {
        let pending = impl_provider_method!(self, send_transaction, request).map_err(transport)?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<ReceiptSummary>, BindingError> {
        let receipt = impl_provider_method!(self, get_transaction_receipt, hash).map_err(transport)?;
        Ok(receipt.as_ref().map(summarize))
    }

    async fn wait_for_receipt(
        &self,
        hash: B256,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<ReceiptSummary, BindingError> {
        match &self.provider {
            AlloyProvider::Http(provider) => wait_with(provider, hash, poll_interval, timeout).await,
            AlloyProvider::WebSocket(provider) => {
                wait_with(provider, hash, poll_interval, timeout).await
            }
            #[cfg(unix)]
            AlloyProvider::Ipc(provider) => wait_with(provider, hash, poll_interval, timeout).await,
        }
    }

    fn signer_address(&self) -> Option<Address> {
        self.from
    }

    fn endpoint_name(&self) -> String {
        self.endpoint.clone()
    }
}
