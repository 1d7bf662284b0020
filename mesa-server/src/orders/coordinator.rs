//! Order coordinator
//!
//! Drives every order mutation end to end: validate, guarded write,
//! fan-out. Reads here are advisory; the store guard is the arbiter, and
//! a lost race surfaces as a typed conflict for the caller to handle.
//! Payment and assignment flows hang off the same struct (see the
//! sibling modules).

use std::sync::Arc;

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::{debug, info, warn};

use shared::{Actor, EventPayload, OrderStatus, PaymentStatus, StreamEvent, TableStatus, Topic};

use super::error::{FlowError, FlowResult};
use super::{lifecycle, money};
use crate::db::models::{DiningTable, Order, OrderLine};
use crate::db::repository::{
    DiningTableRepository, MenuItemRepository, OrderRepository, RepoError,
};
use crate::notify::TopicNotifier;

/// Order placement input, already authenticated
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub table_id: String,
    pub lines: Vec<LineSelection>,
    pub customer_name: Option<String>,
    pub note: Option<String>,
}

/// One menu selection inside a placement
#[derive(Debug, Clone)]
pub struct LineSelection {
    pub menu_item_id: String,
    pub quantity: u32,
}

#[derive(Clone)]
pub struct OrderCoordinator {
    pub(super) orders: OrderRepository,
    pub(super) tables: DiningTableRepository,
    menu: MenuItemRepository,
    pub(super) notifier: Arc<TopicNotifier>,
}

impl OrderCoordinator {
    pub fn new(db: Surreal<Db>, notifier: Arc<TopicNotifier>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            tables: DiningTableRepository::new(db.clone()),
            menu: MenuItemRepository::new(db),
            notifier,
        }
    }

    /// Place an order: resolve menu snapshots, price the lines, then
    /// reserve the table and create the order in one store transaction.
    /// A table that is not `available` fails the whole placement.
    pub async fn place_order(&self, input: PlaceOrder, actor: &Actor) -> FlowResult<Order> {
        if input.lines.is_empty() {
            return Err(FlowError::Validation(
                "Order needs at least one line".to_string(),
            ));
        }

        let table = self
            .tables
            .find_by_id(&input.table_id)
            .await?
            .ok_or_else(|| FlowError::NotFound(format!("Table {} not found", input.table_id)))?;
        let table_thing = table
            .id
            .clone()
            .ok_or_else(|| FlowError::Storage("Table record has no id".to_string()))?;

        let lines = self.resolve_lines(&input.lines).await?;
        let total_amount = money::order_total(&lines);

        let now = chrono::Utc::now().timestamp_millis();
        let order = Order {
            id: None,
            table: table_thing.clone(),
            table_number: table.table_number,
            customer_id: actor.id.clone(),
            customer_name: input.customer_name,
            staff_id: None,
            lines,
            total_amount,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            payment_ref: None,
            note: input.note,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .orders
            .create_with_reservation(order)
            .await
            .map_err(|err| match err {
                RepoError::Conflict(msg) => {
                    debug!(table_id = %input.table_id, %msg, "Placement lost the table");
                    FlowError::AlreadyOccupied(msg)
                }
                other => other.into(),
            })?;

        info!(
            order_id = %created.id_string(),
            table_number = created.table_number,
            total = created.total_amount,
            customer = %actor.id,
            "Order placed"
        );

        self.notifier.publish(StreamEvent::new(
            Topic::order(record_key(created.id.as_ref())),
            EventPayload::OrderPlaced {
                order_id: created.id_string(),
                table_id: table_thing.to_string(),
                table_number: created.table_number,
                total_amount: created.total_amount,
                status: created.status,
            },
        ));
        self.notifier.publish(StreamEvent::new(
            Topic::table(table_thing.key().to_string()),
            EventPayload::TableStatusChanged {
                table_id: table_thing.to_string(),
                table_number: table.table_number,
                status: TableStatus::Occupied,
                previous: TableStatus::Available,
            },
        ));

        Ok(created)
    }

    /// Drive one lifecycle transition.
    ///
    /// `expected` is the caller's view of the current status; the store
    /// guard decides. On a terminal target the bound table is released in
    /// the same transaction and the outcome reported afterwards.
    pub async fn transition(
        &self,
        order_id: &str,
        target: OrderStatus,
        expected: OrderStatus,
        actor: Option<&Actor>,
        note: Option<String>,
    ) -> FlowResult<Order> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| FlowError::NotFound(format!("Order {} not found", order_id)))?;

        lifecycle::validate_transition(expected, target, order.payment_status)?;

        let actor_id = actor.map(|a| a.id.clone());
        let updated = self
            .orders
            .update_status_guarded(
                order_id,
                expected,
                target,
                actor_id.clone(),
                note.clone(),
                order.table.clone(),
            )
            .await
            .map_err(|err| match err {
                RepoError::Conflict(msg) => {
                    // 预期状态过时, 属正常并发
                    debug!(order_id = %order_id, %msg, "Transition lost its guard");
                    FlowError::Conflict(msg)
                }
                other => other.into(),
            })?;

        info!(
            order_id = %order_id,
            from = %expected,
            to = %target,
            actor = actor_id.as_deref().unwrap_or("system"),
            "Order status changed"
        );

        self.notifier.publish(StreamEvent::new(
            Topic::order(record_key(updated.id.as_ref())),
            EventPayload::OrderStatusChanged {
                order_id: updated.id_string(),
                status: target,
                previous: expected,
                actor_id,
                note,
            },
        ));

        if target.is_terminal() {
            self.report_release(&updated).await;
        }

        Ok(updated)
    }

    /// Manual staff override of a table status. Accepted for any known
    /// status; non-routine moves are logged at warn with the actor so
    /// audits can reconstruct them.
    pub async fn set_table_status(
        &self,
        table_id: &str,
        target: TableStatus,
        actor: &Actor,
    ) -> FlowResult<DiningTable> {
        let (updated, previous) = self.tables.set_status(table_id, target).await?;

        if previous.is_routine_change(target) {
            info!(
                table_number = updated.table_number,
                from = %previous,
                to = %target,
                actor = %actor.id,
                "Table status changed"
            );
        } else {
            warn!(
                table_number = updated.table_number,
                from = %previous,
                to = %target,
                actor = %actor.id,
                "Manual table override"
            );
        }

        if previous != target {
            self.notifier.publish(StreamEvent::new(
                Topic::table(record_key(updated.id.as_ref())),
                EventPayload::TableStatusChanged {
                    table_id: updated.id_string(),
                    table_number: updated.table_number,
                    status: target,
                    previous,
                },
            ));
        }

        Ok(updated)
    }

    /// Check what the terminal release did and tell the table watchers.
    /// The transition is already committed; failures here only log.
    async fn report_release(&self, order: &Order) {
        let table_id = order.table.to_string();
        match self.tables.find_by_id(&table_id).await {
            Ok(Some(table)) if table.status == TableStatus::Available => {
                info!(
                    table_number = table.table_number,
                    order_id = %order.id_string(),
                    "Table released"
                );
                self.notifier.publish(StreamEvent::new(
                    Topic::table(record_key(table.id.as_ref())),
                    EventPayload::TableStatusChanged {
                        table_id,
                        table_number: table.table_number,
                        status: TableStatus::Available,
                        previous: TableStatus::Occupied,
                    },
                ));
            }
            Ok(Some(table)) => {
                warn!(
                    table_number = table.table_number,
                    status = %table.status,
                    order_id = %order.id_string(),
                    "Automatic release skipped, table was moved manually"
                );
            }
            Ok(None) => warn!(table_id = %table_id, "Released table no longer exists"),
            Err(err) => {
                warn!(table_id = %table_id, error = %err, "Could not read table after release")
            }
        }
    }

    async fn resolve_lines(&self, selections: &[LineSelection]) -> FlowResult<Vec<OrderLine>> {
        let ids: Vec<String> = selections.iter().map(|s| s.menu_item_id.clone()).collect();
        let items = self.menu.find_by_ids(&ids).await?;

        let mut lines = Vec::with_capacity(selections.len());
        for selection in selections {
            let item = items
                .iter()
                .find(|item| item.id_string() == selection.menu_item_id && item.is_available)
                .ok_or_else(|| {
                    FlowError::Validation(format!(
                        "Unknown or unavailable menu item: {}",
                        selection.menu_item_id
                    ))
                })?;
            money::validate_line(item.price, selection.quantity)?;
            // 下单时快照名称与单价, 菜单编辑不回写历史
            lines.push(OrderLine {
                menu_item_id: selection.menu_item_id.clone(),
                name: item.name.clone(),
                unit_price: item.price,
                quantity: selection.quantity,
            });
        }
        Ok(lines)
    }
}

/// Record key without the table prefix, for topic addressing
pub(super) fn record_key(id: Option<&RecordId>) -> String {
    id.map(|id| id.key().to_string()).unwrap_or_default()
}
