//! # Fundview
//!
//! Read-only dashboard for a tokenized investment fund. Fund accounting
//! (NAV per share, shares outstanding, NAV history, per-investor holdings)
//! lives in an on-chain contract; this crate reads it over JSON-RPC and
//! shapes it for display.
//!
//! ## Modules
//!
//! - [`contract`]: typed `eth_call` reads and fixed-point conversion
//! - [`loader`]: fund-level and per-investor data loaders
//! - [`wallet`]: wallet provider seam (accounts, chain switching)
//! - [`dashboard`]: render state and the wallet connection state machine
//! - [`view`]: display formatting of a render state
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fundview::{Config, ContractClient, ContractClientConfig, Dashboard, DashboardView};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     config.validate()?;
//!
//!     let client = ContractClient::new(ContractClientConfig {
//!         rpc_url: config.network.rpc_url.clone(),
//!         contract_address: config.network.contract_address,
//!         request_timeout_ms: config.rpc.request_timeout_ms,
//!     })?;
//!
//!     // Read-only: no wallet
//!     let mut dashboard = Dashboard::new(
//!         config.network.clone(),
//!         Arc::new(client),
//!         config.rpc.history_concurrency,
//!         None,
//!     );
//!     dashboard.mount().await;
//!
//!     println!("{}", DashboardView::from_state(dashboard.state(), &config.network));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod contract;
pub mod dashboard;
pub mod loader;
pub mod view;
pub mod wallet;

pub use config::{Config, ConfigError, LoggingConfig, NetworkConfig, RpcConfig};

pub use contract::{
    Address, ContractClient, ContractClientConfig, ContractReader, FixedPoint, RpcError,
    RpcResult,
};

pub use loader::{FundData, FundDataLoader, FundSnapshot, Holdings, NavHistoryPoint, Position, PositionLoader};

pub use dashboard::{ConnectionState, Dashboard, DashboardError, Inbound, LoadingState, RenderState};

pub use view::{ChartSeries, DashboardView, PositionPanel};

pub use wallet::{ChainParams, StaticWallet, WalletError, WalletEvent, WalletProvider};
