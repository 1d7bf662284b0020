//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use shared::TableStatus;

use crate::api::extract::CurrentActor;
use crate::core::ServerState;
use crate::db::models::DiningTable;
use crate::utils::error::{AppError, AppResult};

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state.tables.find_all().await?;
    Ok(Json(tables))
}

/// GET /api/tables/:id - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    let table = state
        .tables
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {} not found", id)))?;
    Ok(Json(table))
}

/// GET /api/tables/by-number/:number - 二维码入口, 桌号换桌台
pub async fn get_by_number(
    State(state): State<ServerState>,
    Path(number): Path<u32>,
) -> AppResult<Json<DiningTable>> {
    let table = state
        .tables
        .find_by_number(number)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table number {} not found", number)))?;
    Ok(Json(table))
}

/// Status override request
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: TableStatus,
}

/// PUT /api/tables/:id/status - 人工调整桌台状态 (员工)
pub async fn set_status(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<String>,
    Json(payload): Json<SetStatusRequest>,
) -> AppResult<Json<DiningTable>> {
    let actor = actor.require_order_manager()?;
    let table = state
        .coordinator
        .set_table_status(&id, payload.status, actor)
        .await?;
    Ok(Json(table))
}
