//! Persistence models
//!
//! Entities as stored in SurrealDB. Ids follow the "table:key" convention
//! via [`surrealdb::RecordId`]; the serde helpers accept both the string
//! and native forms so the same structs serve storage and the API.

pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod serde_helpers;
pub mod status_history;

pub use dining_table::{DiningTable, DiningTableCreate};
pub use menu_item::{MenuItem, MenuItemCreate};
pub use order::{Order, OrderFilter, OrderLine};
pub use status_history::StatusHistoryEntry;
