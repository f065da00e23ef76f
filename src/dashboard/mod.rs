//! Dashboard State
//!
//! Explicit state container for the fund dashboard.
//!
//! ## Architecture
//!
//! - **Dashboard**: owns the [`RenderState`] and exposes the transition
//!   operations (mount, refresh, connect, disconnect, wallet events)
//! - **Inbound**: user actions and wallet notifications, consumed from an
//!   mpsc channel by [`Dashboard::run`]
//! - Published render states go out through a `watch` channel

mod container;
mod error;
mod messages;
mod state;

pub use container::{Dashboard, PositionOutcome};
pub use error::DashboardError;
pub use messages::Inbound;
pub use state::{ConnectionState, LoadingState, RenderState};
