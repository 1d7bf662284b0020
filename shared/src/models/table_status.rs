//! Table occupancy status
//!
//! Occupancy moves through store-guarded writes (`available -> occupied` at
//! placement, `occupied -> available` on terminal release). Staff may also
//! set any status manually; the server accepts every known value but logs
//! non-routine moves for the audit trail.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Table status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
    Cleaning,
}

impl TableStatus {
    /// Whether `target` follows `self` in the normal occupancy flow.
    ///
    /// Manual overrides outside this table are still accepted; callers use
    /// the answer to pick the log level, not to reject.
    pub fn is_routine_change(self, target: TableStatus) -> bool {
        use TableStatus::*;
        matches!(
            (self, target),
            (Available, Occupied)
                | (Occupied, Cleaning)
                | (Occupied, Available)
                | (Cleaning, Available)
                | (Available, Reserved)
                | (Reserved, Available)
                | (Reserved, Occupied)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Reserved => "reserved",
            Self::Cleaning => "cleaning",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
