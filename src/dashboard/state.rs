//! Render State
//!
//! Snapshot of everything the presentation layer draws. Owned by the
//! [`Dashboard`](super::Dashboard) and only changed through its transitions.

use serde::Serialize;

use crate::contract::Address;
use crate::loader::{FundSnapshot, Holdings, NavHistoryPoint, Position};

/// Wallet connection status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "address", rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected(Address),
}

impl ConnectionState {
    pub fn address(&self) -> Option<Address> {
        match self {
            ConnectionState::Connected(address) => Some(*address),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }
}

/// In-flight work, tracked per loader
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadingState {
    pub fund: bool,
    pub position: bool,
}

impl LoadingState {
    pub fn any(&self) -> bool {
        self.fund || self.position
    }
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderState {
    pub fund: Option<FundSnapshot>,
    pub nav_history: Vec<NavHistoryPoint>,
    pub position: Option<Position>,
    pub connection: ConnectionState,
    /// Single banner slot; the most recent error wins
    pub error: Option<String>,
    pub loading: LoadingState,
}

impl RenderState {
    /// Holdings to show, only for a connected, whitelisted account
    pub fn visible_holdings(&self) -> Option<&Holdings> {
        if !self.connection.is_connected() {
            return None;
        }
        self.position
            .as_ref()
            .filter(|p| p.is_whitelisted)
            .and_then(|p| p.holdings.as_ref())
    }

    /// Whitelist flag of the connected account, if known
    pub fn whitelisted(&self) -> Option<bool> {
        self.position.as_ref().map(|p| p.is_whitelisted)
    }

    /// A position may only exist alongside a connected account, and
    /// holdings only alongside a positive whitelist flag
    pub fn is_consistent(&self) -> bool {
        let position_ok = self.position.is_none() || self.connection.is_connected();
        let holdings_ok = self
            .position
            .as_ref()
            .map(|p| p.holdings.is_none() || p.is_whitelisted)
            .unwrap_or(true);
        position_ok && holdings_ok
    }
}
