//! Order Lifecycle Module
//!
//! Coordinates the full life of an order against the store and the
//! fan-out lanes:
//!
//! - **coordinator**: placement, transitions and table overrides
//! - **payment**: inbound settlement (gateway callback)
//! - **assignment**: exclusive staff claim and handover
//! - **lifecycle**: the transition rules
//! - **money**: decimal pricing helpers
//!
//! # Data Flow
//!
//! ```text
//! Request → Coordinator → validate (lifecycle/money)
//!                ↓
//!        guarded write (one store transaction:
//!        status + ledger + table release)
//!                ↓
//!        publish → order:{id} / table:{id} / kitchen:all
//! ```
//!
//! Every mutation is a conditional write arbitrated by the store. A lost
//! race comes back as a typed conflict; nothing in this module retries.

pub mod assignment;
pub mod coordinator;
pub mod error;
pub mod lifecycle;
pub mod money;
pub mod payment;

pub use coordinator::{LineSelection, OrderCoordinator, PlaceOrder};
pub use error::{FlowError, FlowResult};
