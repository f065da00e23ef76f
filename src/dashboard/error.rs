//! Dashboard error types
//!
//! Every variant ends up as a message in the render state's error slot.

use thiserror::Error;

use crate::contract::RpcError;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// A contract read failed
    #[error("Failed to read fund contract: {0}")]
    Rpc(#[from] RpcError),

    /// Connect attempted without a wallet provider
    #[error("No wallet found. Install a wallet to connect.")]
    WalletUnavailable,

    /// User denied account access
    #[error("Wallet connection was rejected")]
    WalletRejected,

    /// Chain switch or registration failed
    #[error("Could not switch wallet to {chain}: {reason}")]
    ChainSwitchFailed { chain: String, reason: String },
}
