//! Dashboard View Model
//!
//! Turns a [`RenderState`] into display-ready strings: the fund card, the
//! investor panel, the NAV chart, and the error banner. Purely derived;
//! nothing here touches the contract or the wallet.

mod chart;
pub mod format;

pub use chart::{ChartPoint, ChartSeries};
pub use format::{format_amount, format_date, format_nav, format_percent};

use serde::Serialize;
use std::fmt;

use crate::config::NetworkConfig;
use crate::contract::Address;
use crate::dashboard::{ConnectionState, RenderState};
use crate::loader::{FundSnapshot, Holdings};

/// Fund-level figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundCard {
    pub name: String,
    pub description: String,
    pub nav: String,
    pub return_since_inception: String,
    pub total_shares: String,
    pub assets_under_management: String,
    pub inception: String,
}

impl From<&FundSnapshot> for FundCard {
    fn from(fund: &FundSnapshot) -> Self {
        Self {
            name: fund.name.clone(),
            description: fund.description.clone(),
            nav: format_nav(fund.current_nav),
            return_since_inception: format_percent(fund.return_since_inception()),
            total_shares: format_amount(fund.total_shares),
            assets_under_management: format_amount(fund.assets_under_management()),
            inception: format_date(fund.inception_date),
        }
    }
}

/// Figures for a whitelisted investor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentCard {
    pub address: String,
    pub explorer_url: String,
    pub shares: String,
    pub value: String,
    pub initial_investment: String,
    pub profit: String,
    pub return_rate: String,
    pub investment_date: String,
}

impl InvestmentCard {
    fn new(address: &Address, holdings: &Holdings, network: &NetworkConfig) -> Self {
        Self {
            address: address.short(),
            explorer_url: network.explorer_address_url(address),
            shares: format_amount(holdings.shares),
            value: format_amount(holdings.value),
            initial_investment: format_amount(holdings.initial_investment),
            profit: format_amount(holdings.profit()),
            return_rate: format_percent(holdings.return_rate),
            investment_date: format_date(holdings.investment_date),
        }
    }
}

/// What the investor panel shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PositionPanel {
    /// No wallet connected
    Hidden,
    Loading,
    NotWhitelisted { address: String },
    /// Connected but the position could not be read
    Unavailable { address: String },
    Investment(InvestmentCard),
}

impl PositionPanel {
    fn from_state(state: &RenderState, network: &NetworkConfig) -> Self {
        let address = match state.connection {
            ConnectionState::Disconnected => return PositionPanel::Hidden,
            ConnectionState::Connecting => return PositionPanel::Loading,
            ConnectionState::Connected(address) => address,
        };

        if state.loading.position {
            return PositionPanel::Loading;
        }

        match &state.position {
            Some(position) if !position.is_whitelisted => PositionPanel::NotWhitelisted {
                address: address.short(),
            },
            Some(position) => match &position.holdings {
                Some(holdings) => {
                    PositionPanel::Investment(InvestmentCard::new(&address, holdings, network))
                }
                None => PositionPanel::Unavailable {
                    address: address.short(),
                },
            },
            None => PositionPanel::Unavailable {
                address: address.short(),
            },
        }
    }
}

/// Everything a frontend draws for one render state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub fund: Option<FundCard>,
    pub fund_loading: bool,
    pub connection: ConnectionState,
    pub position: PositionPanel,
    /// Omitted with fewer than two history points
    pub chart: Option<ChartSeries>,
    pub banner: Option<String>,
}

impl DashboardView {
    pub fn from_state(state: &RenderState, network: &NetworkConfig) -> Self {
        Self {
            fund: state.fund.as_ref().map(FundCard::from),
            fund_loading: state.loading.fund,
            connection: state.connection,
            position: PositionPanel::from_state(state, network),
            chart: ChartSeries::from_history(&state.nav_history),
            banner: state.error.clone(),
        }
    }
}

impl fmt::Display for FundCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f)?;
        writeln!(f, "  NAV per share:      {}", self.nav)?;
        writeln!(f, "  Since inception:    {}", self.return_since_inception)?;
        writeln!(f, "  Shares outstanding: {}", self.total_shares)?;
        writeln!(f, "  Fund value:         {}", self.assets_under_management)?;
        writeln!(f, "  Inception:          {}", self.inception)
    }
}

impl fmt::Display for PositionPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionPanel::Hidden => writeln!(f, "Connect a wallet to view your investment"),
            PositionPanel::Loading => writeln!(f, "Loading position..."),
            PositionPanel::NotWhitelisted { address } => {
                writeln!(f, "Wallet Not Whitelisted ({})", address)?;
                writeln!(f, "  This address is not approved to invest in the fund")
            }
            PositionPanel::Unavailable { address } => {
                writeln!(f, "Position for {} is unavailable", address)
            }
            PositionPanel::Investment(card) => {
                writeln!(f, "Your investment ({})", card.address)?;
                writeln!(f, "  Shares:             {}", card.shares)?;
                writeln!(f, "  Current value:      {}", card.value)?;
                writeln!(f, "  Initial investment: {}", card.initial_investment)?;
                writeln!(f, "  Profit:             {}", card.profit)?;
                writeln!(f, "  Return:             {}", card.return_rate)?;
                writeln!(f, "  Invested:           {}", card.investment_date)?;
                writeln!(f, "  {}", card.explorer_url)
            }
        }
    }
}

impl fmt::Display for ChartSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  NAV {} .. {}  {}  ({} - {})",
            format_nav(self.min),
            format_nav(self.max),
            self.sparkline(),
            self.first().label,
            self.last().label
        )
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(banner) = &self.banner {
            writeln!(f, "[!] {}", banner)?;
            writeln!(f)?;
        }

        match &self.fund {
            Some(fund) => write!(f, "{}", fund)?,
            None if self.fund_loading => writeln!(f, "Loading fund data...")?,
            None => writeln!(f, "Fund data unavailable")?,
        }

        if let Some(chart) = &self.chart {
            writeln!(f)?;
            write!(f, "{}", chart)?;
        }

        writeln!(f)?;
        write!(f, "{}", self.position)
    }
}
