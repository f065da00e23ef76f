//! Contract Data Loaders
//!
//! - **FundDataLoader**: fund snapshot and NAV history, no wallet needed
//! - **PositionLoader**: whitelist status and holdings for one address

mod fund;
mod position;

pub use fund::{FundData, FundDataLoader, FundSnapshot, NavHistoryPoint, INITIAL_NAV};
pub use position::{Holdings, Position, PositionLoader};
