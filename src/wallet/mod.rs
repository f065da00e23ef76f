//! Wallet Provider Interface
//!
//! The dashboard talks to a wallet only through [`WalletProvider`].
//! Account and chain change notifications are not callbacks: whoever owns
//! the provider forwards them as [`WalletEvent`]s on the dashboard's inbound
//! channel.

mod static_wallet;

pub use static_wallet::StaticWallet;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::NetworkConfig;
use crate::contract::Address;

/// Request/response interface of a wallet
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Prompt the user for account access
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Accounts already authorized for this client, without prompting
    async fn accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Chain the wallet is currently on
    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Ask the wallet to select `chain_id`
    ///
    /// Returns [`WalletError::UnknownChain`] when the wallet has no record
    /// of the chain.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;

    /// Register a chain with the wallet
    async fn add_chain(&self, params: &ChainParams) -> Result<(), WalletError>;
}

/// Notifications emitted by a wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// Authorized account list changed; empty means disconnected
    AccountsChanged(Vec<Address>),
    /// Wallet switched to another chain
    ChainChanged(u64),
}

/// Errors reported by a wallet provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("User rejected the request")]
    Rejected,

    #[error("Chain {0} is not known to the wallet")]
    UnknownChain(u64),

    #[error("Wallet request failed: {0}")]
    Request(String),
}

/// Chain registration parameters (EIP-3085 `wallet_addEthereumChain` shape)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainParams {
    /// `0x`-prefixed hex chain id
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
    pub native_currency: NativeCurrency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl ChainParams {
    pub fn from_network(network: &NetworkConfig) -> Self {
        Self {
            chain_id: format!("0x{:x}", network.chain_id),
            chain_name: network.chain_name.clone(),
            rpc_urls: vec![network.rpc_url.clone()],
            block_explorer_urls: vec![network.explorer_url.clone()],
            native_currency: NativeCurrency {
                name: network.native_currency.name.clone(),
                symbol: network.native_currency.symbol.clone(),
                decimals: network.native_currency.decimals,
            },
        }
    }

    /// Numeric chain id, parsed back from the hex form
    pub fn numeric_chain_id(&self) -> Option<u64> {
        u64::from_str_radix(self.chain_id.trim_start_matches("0x"), 16).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_params_from_network() {
        let network = NetworkConfig::default();
        let params = ChainParams::from_network(&network);

        assert_eq!(params.chain_id, "0xaa36a7");
        assert_eq!(params.numeric_chain_id(), Some(11_155_111));
        assert_eq!(params.rpc_urls, vec![network.rpc_url.clone()]);
        assert_eq!(params.native_currency.decimals, 18);
    }

    #[test]
    fn test_chain_params_json_shape() {
        let params = ChainParams::from_network(&NetworkConfig::default());
        let json = serde_json::to_value(&params).unwrap();
        assert!(json.get("chainId").is_some());
        assert!(json.get("blockExplorerUrls").is_some());
        assert!(json.get("nativeCurrency").is_some());
    }
}
