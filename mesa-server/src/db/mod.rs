//! 数据库模块
//!
//! Embedded SurrealDB: RocksDB on disk for the server, in-memory for
//! tests. Schema is schemaless apart from the indexes declared here;
//! both declarations are idempotent so startup can run them every time.

pub mod models;
pub mod repository;

use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::Surreal;

pub const NAMESPACE: &str = "mesa";
pub const DATABASE: &str = "mesa";

/// Open the on-disk database at `path` and prepare the schema.
pub async fn connect(path: &str) -> Result<Surreal<Db>, surrealdb::Error> {
    let db = Surreal::new::<RocksDb>(path).await?;
    prepare(&db).await?;
    tracing::info!(path = %path, "Database ready");
    Ok(db)
}

/// In-memory database for tests and demos. Fresh and empty every call.
pub async fn connect_memory() -> Result<Surreal<Db>, surrealdb::Error> {
    let db = Surreal::new::<Mem>(()).await?;
    prepare(&db).await?;
    Ok(db)
}

async fn prepare(db: &Surreal<Db>) -> Result<(), surrealdb::Error> {
    db.use_ns(NAMESPACE).use_db(DATABASE).await?;
    // table_number 是二维码入口, 必须唯一
    db.query(
        "DEFINE INDEX IF NOT EXISTS idx_dining_table_number ON TABLE dining_table COLUMNS table_number UNIQUE",
    )
    .await?
    .check()?;
    db.query(
        "DEFINE INDEX IF NOT EXISTS idx_status_history_order ON TABLE status_history COLUMNS order",
    )
    .await?
    .check()?;
    Ok(())
}
