//! Fund Contract Access
//!
//! Read-only access to the fund contract over JSON-RPC.
//!
//! ## Architecture
//!
//! - **ContractReader**: one async getter per contract accessor
//! - **ContractClient**: `eth_call`-backed implementation bound to one
//!   contract address
//! - **abi**: selector constants and word/string codec
//! - **fixed_point**: 18-decimal integer to display conversion

pub mod abi;
mod client;
mod error;
pub mod fixed_point;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ContractClient, ContractClientConfig};
pub use error::{RpcError, RpcResult};
pub use fixed_point::{bps_to_percent, scale, FixedPoint, WAD};
pub use types::{Address, AddressError, NavEntry, PositionInfo};

use async_trait::async_trait;

/// Typed view of the fund contract's read interface
///
/// Every method is a single round-trip. Implementations must not retry.
#[async_trait]
pub trait ContractReader: Send + Sync {
    async fn name(&self) -> RpcResult<String>;

    async fn description(&self) -> RpcResult<String>;

    /// NAV per share
    async fn current_nav(&self) -> RpcResult<FixedPoint>;

    /// Total shares outstanding
    async fn total_supply(&self) -> RpcResult<FixedPoint>;

    /// Unix seconds
    async fn inception_date(&self) -> RpcResult<u64>;

    async fn nav_history_length(&self) -> RpcResult<u64>;

    async fn nav_history_at(&self, index: u64) -> RpcResult<NavEntry>;

    async fn whitelist_status(&self, address: &Address) -> RpcResult<bool>;

    /// Share balance
    async fn balance_of(&self, address: &Address) -> RpcResult<FixedPoint>;

    /// Current value of the address's shares
    async fn value_of(&self, address: &Address) -> RpcResult<FixedPoint>;

    /// Return since investment in basis points
    async fn return_of(&self, address: &Address) -> RpcResult<i128>;

    async fn position_info(&self, address: &Address) -> RpcResult<PositionInfo>;
}
