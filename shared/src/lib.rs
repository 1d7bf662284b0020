//! Shared types for the Mesa coordination service
//!
//! Domain vocabulary used by the server and by every client that renders
//! order state (diner view, staff dashboard, kitchen display, table board):
//!
//! - [`models`] - status enums and their transition rules, actor roles
//! - [`event`] - realtime topics and fan-out event payloads
//!
//! This crate stays free of database and framework dependencies so clients
//! can depend on it directly.

pub mod event;
pub mod models;

// Re-export common types
pub use event::{EventPayload, StreamEvent, Topic, TopicParseError};
pub use models::{Actor, OrderStatus, PaymentStatus, Role, TableStatus};
