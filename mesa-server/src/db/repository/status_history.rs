//! Status History Repository
//!
//! Read side of the order ledger. Entries are appended inside the order
//! transition transaction (see the order repository); nothing here ever
//! updates or deletes a row.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::StatusHistoryEntry;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct StatusHistoryRepository {
    base: BaseRepository,
}

impl StatusHistoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Full ledger of one order, most recent first.
    pub async fn find_by_order(&self, order_id: &str) -> RepoResult<Vec<StatusHistoryEntry>> {
        // status_history.order 以原生 RecordId 存储
        let thing: RecordId = order_id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", order_id)))?;
        let entries: Vec<StatusHistoryEntry> = self
            .base
            .db()
            .query("SELECT * FROM status_history WHERE order = $order ORDER BY seq DESC")
            .bind(("order", thing))
            .await?
            .take(0)?;
        Ok(entries)
    }
}
