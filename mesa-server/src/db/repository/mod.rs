//! Repository Module
//!
//! CRUD and guarded (conditional) writes over SurrealDB tables. Guarded
//! writes are the only mutual-exclusion mechanism in the crate: a mutation
//! carries the state the caller expects and fails when the store disagrees.

pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod status_history;

// Re-exports
pub use dining_table::DiningTableRepository;
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use status_history::StatusHistoryRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Guard mismatch or a lost commit race
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "order:abc".parse()?;
//   - 创建: let id = RecordId::from_table_key("order", "abc");
//   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Outcome of a BEGIN/COMMIT script carrying a THROWn guard marker
#[derive(Debug)]
pub(crate) enum ScriptOutcome {
    /// Transaction committed
    Committed,
    /// The script's own guard fired (marker found among the errors)
    GuardFailed,
    /// Storage-level failure
    Error(String),
}

/// Classify a transaction script response.
///
/// A THROW aborts the whole transaction and Surreal reports errors for
/// every statement, so the marker is searched across all of them. A commit
/// race detected by the storage engine surfaces as a conflict as well:
/// the caller re-reads and decides, exactly as for a guard miss.
pub(crate) fn classify_script(response: &mut surrealdb::Response, marker: &str) -> ScriptOutcome {
    let errors = response.take_errors();
    if errors.is_empty() {
        return ScriptOutcome::Committed;
    }
    let mut messages = Vec::with_capacity(errors.len());
    for err in errors.into_values() {
        let text = err.to_string();
        if text.contains(marker) {
            return ScriptOutcome::GuardFailed;
        }
        messages.push(text);
    }
    ScriptOutcome::Error(messages.join("; "))
}

/// Map a storage failure, surfacing engine-level commit races as conflicts
/// so callers handle them the same way as a guard miss (re-read, decide;
/// the coordinator never retries on its own).
pub(crate) fn storage_error(msg: String) -> RepoError {
    let lowered = msg.to_lowercase();
    if lowered.contains("conflict") || lowered.contains("resource busy") || lowered.contains("retry")
    {
        RepoError::Conflict(msg)
    } else {
        RepoError::Database(msg)
    }
}
