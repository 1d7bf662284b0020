//! Menu Item Repository
//!
//! Menu items are the snapshot source for order lines: placement copies
//! name and unit price into the order, so edits here never rewrite an
//! existing order.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MenuItem, MenuItemCreate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Batch lookup for order placement. Missing ids simply produce a
    /// shorter result; the caller decides whether that is an error.
    pub async fn find_by_ids(&self, ids: &[String]) -> RepoResult<Vec<MenuItem>> {
        let mut things: Vec<RecordId> = Vec::with_capacity(ids.len());
        for id in ids {
            let thing: RecordId = id
                .parse()
                .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
            things.push(thing);
        }
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE id IN $ids")
            .bind(("ids", things))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Create a menu item
    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        let item = MenuItem {
            id: None,
            name: data.name,
            price: data.price,
            is_available: data.is_available.unwrap_or(true),
        };
        let created: Option<MenuItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }
}
