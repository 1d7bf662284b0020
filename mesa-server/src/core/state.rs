use std::path::PathBuf;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db;
use crate::db::repository::{
    DiningTableRepository, MenuItemRepository, OrderRepository, StatusHistoryRepository,
};
use crate::notify::TopicNotifier;
use crate::orders::OrderCoordinator;

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是进程的核心数据结构, 浅拷贝成本极低,
/// 每个请求处理器拿到的都是同一组底层资源。
///
/// # Components
///
/// | Field | Type | Purpose |
/// |-------|------|---------|
/// | config | Config | Immutable configuration |
/// | db | Surreal<Db> | Embedded database |
/// | notifier | Arc<TopicNotifier> | Topic fan-out for event streams |
/// | coordinator | OrderCoordinator | Order and table mutation flows |
/// | tables | DiningTableRepository | Table reads and admin writes |
/// | orders | OrderRepository | Order reads |
/// | history | StatusHistoryRepository | Transition ledger reads |
/// | menu | MenuItemRepository | Menu reads and admin writes |
///
/// # Example
///
/// ```ignore
/// let db = state.get_db();
/// let order = state.orders.find_by_id(&id).await?;
/// state.coordinator.confirm_payment(&id, "pay_1").await?;
/// ```
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 话题广播器
    pub notifier: Arc<TopicNotifier>,
    /// 订单与餐桌流程协调器
    pub coordinator: OrderCoordinator,
    /// 餐桌仓库
    pub tables: DiningTableRepository,
    /// 订单仓库
    pub orders: OrderRepository,
    /// 状态流水仓库
    pub history: StatusHistoryRepository,
    /// 菜单仓库
    pub menu: MenuItemRepository,
}

impl ServerState {
    /// Wire the state from an already-open database
    ///
    /// [`initialize()`](Self::initialize) is the usual entry point; this
    /// constructor exists for tests that bring their own database.
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        let notifier = Arc::new(TopicNotifier::new(config.channel_capacity));
        let coordinator = OrderCoordinator::new(db.clone(), notifier.clone());
        Self {
            config,
            notifier,
            coordinator,
            tables: DiningTableRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            history: StatusHistoryRepository::new(db.clone()),
            menu: MenuItemRepository::new(db.clone()),
            db,
        }
    }

    /// Initialize the server state
    ///
    /// In order:
    /// 1. Working directory layout (work_dir/database)
    /// 2. Database (work_dir/database/mesa.db)
    /// 3. Notifier, coordinator and repositories
    ///
    /// # Panics
    ///
    /// Panics when the working directory cannot be created or the
    /// database fails to open.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("mesa.db");
        let db = db::connect(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        Self::new(config.clone(), db)
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }
}
