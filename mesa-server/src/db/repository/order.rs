//! Order Repository
//!
//! All lifecycle mutations are conditional writes arbitrated by the store.
//! Multi-record steps (reserve + create, status + ledger + release) run in
//! one transaction; a missed guard aborts it with a THROW marker that
//! `classify_script` picks back out of the response. There is no in-process
//! lock and no retry loop here. Losers get `Conflict` and re-read.

use super::{classify_script, storage_error, BaseRepository, RepoError, RepoResult, ScriptOutcome};
use crate::db::models::{DiningTable, Order, OrderFilter};
use shared::OrderStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use uuid::Uuid;

const TABLE: &str = "order";

/// THROW marker: placement found the table not `available`.
const TABLE_GUARD_MARKER: &str = "TABLE_UNAVAILABLE";
/// THROW marker: stored order status differed from the caller's expectation.
const STATUS_GUARD_MARKER: &str = "STATUS_GUARD_MISMATCH";

/// 预定餐桌 + 创建订单, 同一事务
///
/// The table flip carries the WHERE guard; of N concurrent placements on
/// one available table the store lets exactly one through.
const PLACE_ORDER_SCRIPT: &str = r#"
BEGIN TRANSACTION;
LET $t = UPDATE $table SET status = 'occupied', updated_at = $now WHERE status = 'available';
IF array::len($t) == 0 { THROW "TABLE_UNAVAILABLE" };
CREATE $order_id CONTENT $order;
COMMIT TRANSACTION;
"#;

/// 状态推进 + 流水追加, 同一事务
///
/// `seq` is computed inside the transaction, so ledger order is commit
/// order even when two transitions land in the same millisecond.
const TRANSITION_HEAD: &str = r#"
BEGIN TRANSACTION;
LET $o = UPDATE $order_id SET status = $target, updated_at = $now WHERE status = $expected RETURN AFTER;
IF array::len($o) == 0 { THROW "STATUS_GUARD_MISMATCH" };
LET $seq = array::len((SELECT VALUE id FROM status_history WHERE order = $order_id)) + 1;
CREATE status_history CONTENT { order: $order_id, status: $target, actor_id: $actor, note: $note, seq: $seq, created_at: $now };
"#;

/// Appended for terminal targets. No THROW: a table already moved away
/// from `occupied` (manual cleaning) makes the release a silent no-op.
const RELEASE_TABLE_CLAUSE: &str =
    "UPDATE $table SET status = 'available', updated_at = $now WHERE status = 'occupied';\n";

const COMMIT_CLAUSE: &str = "COMMIT TRANSACTION;";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Reserve the table and create the order atomically.
    ///
    /// `order.id` must be `None`; the key is generated here so the row can
    /// be re-read after commit. Guard miss is classified by a follow-up
    /// table read: `NotFound` for a missing table, `Conflict` naming the
    /// current status otherwise.
    pub async fn create_with_reservation(&self, order: Order) -> RepoResult<Order> {
        let table = order.table.clone();
        let order_id = RecordId::from_table_key(TABLE, Uuid::new_v4().simple().to_string());

        let mut response = self
            .base
            .db()
            .query(PLACE_ORDER_SCRIPT)
            .bind(("table", table.clone()))
            .bind(("order_id", order_id.clone()))
            .bind(("order", order))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;

        match classify_script(&mut response, TABLE_GUARD_MARKER) {
            ScriptOutcome::Committed => {
                let created: Option<Order> = self.base.db().select(order_id.clone()).await?;
                created.ok_or_else(|| {
                    RepoError::Database(format!("Order {} missing after commit", order_id))
                })
            }
            ScriptOutcome::GuardFailed => {
                let current: Option<DiningTable> = self.base.db().select(table.clone()).await?;
                match current {
                    None => Err(RepoError::NotFound(format!("Table {} not found", table))),
                    Some(t) => Err(RepoError::Conflict(format!(
                        "Table {} is {}",
                        t.table_number, t.status
                    ))),
                }
            }
            ScriptOutcome::Error(msg) => Err(storage_error(msg)),
        }
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Filtered listing, newest first.
    pub async fn find_all(&self, filter: OrderFilter) -> RepoResult<Vec<Order>> {
        let mut sql = String::from("SELECT * FROM order");
        let mut conditions: Vec<&str> = Vec::new();

        if filter.table_id.is_some() {
            // order.table 以字符串形式存储
            conditions.push("table = $table");
        }
        if filter.customer_id.is_some() {
            conditions.push("customer_id = $customer");
        }
        if filter.staff_id.is_some() {
            conditions.push("staff_id = $staff");
        }
        if filter.active {
            conditions.push("status NOT IN $terminal");
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = self.base.db().query(sql);
        if let Some(table) = filter.table_id {
            query = query.bind(("table", table));
        }
        if let Some(customer) = filter.customer_id {
            query = query.bind(("customer", customer));
        }
        if let Some(staff) = filter.staff_id {
            query = query.bind(("staff", staff));
        }
        if filter.active {
            query = query.bind((
                "terminal",
                vec![
                    OrderStatus::Delivered,
                    OrderStatus::Completed,
                    OrderStatus::Cancelled,
                ],
            ));
        }

        let orders: Vec<Order> = query.await?.take(0)?;
        Ok(orders)
    }

    /// Guarded status write plus ledger append; terminal targets also try
    /// to release the bound table, all in one transaction.
    ///
    /// Guard miss: `NotFound` for a missing order, otherwise `Conflict`
    /// naming the stored status. The caller re-reads and decides.
    pub async fn update_status_guarded(
        &self,
        id: &str,
        expected: OrderStatus,
        target: OrderStatus,
        actor_id: Option<String>,
        note: Option<String>,
        table: RecordId,
    ) -> RepoResult<Order> {
        let order_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut script = String::from(TRANSITION_HEAD);
        if target.is_terminal() {
            script.push_str(RELEASE_TABLE_CLAUSE);
        }
        script.push_str(COMMIT_CLAUSE);

        let mut response = self
            .base
            .db()
            .query(script)
            .bind(("order_id", order_id.clone()))
            .bind(("target", target))
            .bind(("expected", expected))
            .bind(("actor", actor_id))
            .bind(("note", note))
            .bind(("table", table))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;

        match classify_script(&mut response, STATUS_GUARD_MARKER) {
            ScriptOutcome::Committed => {
                let updated: Option<Order> = self.base.db().select(order_id.clone()).await?;
                updated.ok_or_else(|| {
                    RepoError::Database(format!("Order {} missing after commit", order_id))
                })
            }
            ScriptOutcome::GuardFailed => match self.find_by_id(id).await? {
                None => Err(RepoError::NotFound(format!("Order {} not found", id))),
                Some(current) => Err(RepoError::Conflict(format!(
                    "Order is {}, expected {}",
                    current.status, expected
                ))),
            },
            ScriptOutcome::Error(msg) => Err(storage_error(msg)),
        }
    }

    /// Conditional `unpaid -> paid` write, guarded on the order still being
    /// `pending`. Returns `None` on guard miss; the payment flow classifies
    /// with its own point read.
    pub async fn confirm_payment_guarded(
        &self,
        id: &str,
        payment_ref: &str,
    ) -> RepoResult<Option<Order>> {
        let order_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $order_id SET payment_status = 'paid', payment_ref = $payment_ref, updated_at = $now WHERE payment_status = 'unpaid' AND status = 'pending' RETURN AFTER",
            )
            .bind(("order_id", order_id))
            .bind(("payment_ref", payment_ref.to_string()))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;
        let updated: Vec<Order> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    /// First-claimer-wins assignment: guarded on `staff_id` being unset.
    /// Returns `None` on guard miss.
    pub async fn assign_staff_guarded(
        &self,
        id: &str,
        staff_id: &str,
    ) -> RepoResult<Option<Order>> {
        let order_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $order_id SET staff_id = $staff, updated_at = $now WHERE staff_id = NONE RETURN AFTER",
            )
            .bind(("order_id", order_id))
            .bind(("staff", staff_id.to_string()))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;
        let updated: Vec<Order> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Handover: move the assignment `from -> to`, guarded on the current
    /// assignee still being `from`. Returns `None` on guard miss.
    pub async fn reassign_staff_guarded(
        &self,
        id: &str,
        from: &str,
        to: &str,
    ) -> RepoResult<Option<Order>> {
        let order_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $order_id SET staff_id = $to, updated_at = $now WHERE staff_id = $from RETURN AFTER",
            )
            .bind(("order_id", order_id))
            .bind(("to", to.to_string()))
            .bind(("from", from.to_string()))
            .bind(("now", chrono::Utc::now().timestamp_millis()))
            .await?;
        let updated: Vec<Order> = result.take(0)?;
        Ok(updated.into_iter().next())
    }
}
