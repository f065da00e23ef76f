//! Inbound Messages
//!
//! Everything that can change the dashboard from outside: user actions and
//! wallet notifications.

use crate::wallet::WalletEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// User asked to connect a wallet
    Connect,
    /// User asked to disconnect
    Disconnect,
    /// Reload fund data
    Refresh,
    /// Clear the error banner
    DismissError,
    /// Notification from the wallet provider
    Wallet(WalletEvent),
    /// Stop the event loop
    Shutdown,
}

impl From<WalletEvent> for Inbound {
    fn from(event: WalletEvent) -> Self {
        Inbound::Wallet(event)
    }
}
