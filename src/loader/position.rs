//! Position Loader
//!
//! Fetches an address's whitelist status and, when whitelisted, its
//! holdings in the fund.

use serde::Serialize;
use std::sync::Arc;

use crate::contract::{bps_to_percent, Address, ContractReader, RpcResult};

/// An investor's standing in the fund
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub is_whitelisted: bool,
    /// Present only when whitelisted
    pub holdings: Option<Holdings>,
}

impl Position {
    pub fn not_whitelisted() -> Self {
        Self {
            is_whitelisted: false,
            holdings: None,
        }
    }
}

/// Numeric position fields, all computed by the contract
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holdings {
    pub shares: f64,
    /// Shares x current NAV
    pub value: f64,
    pub initial_investment: f64,
    /// Signed percent
    pub return_rate: f64,
    /// Unix seconds
    pub investment_date: u64,
}

impl Holdings {
    /// Absolute gain or loss against the initial investment
    pub fn profit(&self) -> f64 {
        self.value - self.initial_investment
    }
}

pub struct PositionLoader {
    reader: Arc<dyn ContractReader>,
}

impl PositionLoader {
    pub fn new(reader: Arc<dyn ContractReader>) -> Self {
        Self { reader }
    }

    /// Issue all five reads concurrently and compose the result
    ///
    /// When the whitelist read says `false` the other four results are
    /// discarded unread, including any errors they carry.
    pub async fn load_position(&self, address: &Address) -> RpcResult<Position> {
        let reader = self.reader.as_ref();
        let (whitelisted, shares, value, ret, info) = tokio::join!(
            reader.whitelist_status(address),
            reader.balance_of(address),
            reader.value_of(address),
            reader.return_of(address),
            reader.position_info(address),
        );

        if !whitelisted? {
            tracing::info!(address = %address, "Address is not whitelisted");
            return Ok(Position::not_whitelisted());
        }

        let info = info?;
        let holdings = Holdings {
            shares: shares?.to_display(),
            value: value?.to_display(),
            initial_investment: info.initial_investment.to_display(),
            return_rate: bps_to_percent(ret?),
            investment_date: info.investment_date,
        };

        tracing::info!(
            address = %address,
            shares = holdings.shares,
            value = holdings.value,
            "Position loaded"
        );

        Ok(Position {
            is_whitelisted: true,
            holdings: Some(holdings),
        })
    }
}
