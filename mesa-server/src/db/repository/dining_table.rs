//! Dining Table Repository
//!
//! Reads, provisioning and the two status writes: `set_status_guarded`
//! names the status the caller expects and lets the store arbitrate
//! (of N concurrent callers on one table exactly one matches),
//! `set_status` is the unconditional staff override. Placement and
//! terminal release apply the same guard inside the order scripts.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{DiningTable, DiningTableCreate};
use shared::TableStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active dining tables
    pub async fn find_all(&self) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE is_active = true ORDER BY table_number")
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiningTable>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let table: Option<DiningTable> = self.base.db().select(thing).await?;
        Ok(table)
    }

    /// Find active table by the number printed on it (QR entry path)
    pub async fn find_by_number(&self, table_number: u32) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM dining_table WHERE table_number = $number AND is_active = true LIMIT 1",
            )
            .bind(("number", table_number))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Create a new dining table, available by default
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        // table_number is what diners scan; never two tables with one number
        if self.find_by_number(data.table_number).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Table number {} already exists",
                data.table_number
            )));
        }

        let now = chrono::Utc::now().timestamp_millis();
        let table = DiningTable {
            id: None,
            table_number: data.table_number,
            capacity: data.capacity.unwrap_or(4),
            status: TableStatus::Available,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let created: Option<DiningTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Conditional occupancy write: `expected -> target`, arbitrated by the
    /// store. Guard miss is classified by a follow-up read: missing row is
    /// `NotFound`, anything else `Conflict` naming the current status.
    pub async fn set_status_guarded(
        &self,
        id: &str,
        expected: TableStatus,
        target: TableStatus,
    ) -> RepoResult<DiningTable> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET status = $target, updated_at = $now WHERE status = $expected RETURN AFTER",
            )
            .bind(("thing", thing))
            .bind(("target", target))
            .bind(("expected", expected))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;
        let updated: Vec<DiningTable> = result.take(0)?;
        if let Some(table) = updated.into_iter().next() {
            return Ok(table);
        }

        match self.find_by_id(id).await? {
            None => Err(RepoError::NotFound(format!("Table {} not found", id))),
            Some(current) => Err(RepoError::Conflict(format!(
                "Table {} is {}",
                current.table_number, current.status
            ))),
        }
    }

    /// Unconditional status write (staff override). Returns the updated
    /// table and the status it replaced.
    pub async fn set_status(
        &self,
        id: &str,
        target: TableStatus,
    ) -> RepoResult<(DiningTable, TableStatus)> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;
        let previous = existing.status;

        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = $target, updated_at = $now RETURN AFTER")
            .bind(("thing", thing))
            .bind(("target", target))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;
        let updated: Vec<DiningTable> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .map(|table| (table, previous))
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))
    }
}
