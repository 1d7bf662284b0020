//! Mesa Server - 餐厅订单生命周期与桌台占用协调服务
//!
//! # 架构概述
//!
//! 本模块是协调服务的主入口，提供以下核心功能：
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储, 条件写仲裁并发
//! - **订单域** (`orders`): 生命周期状态机、支付确认、员工认领
//! - **实时推送** (`notify`): 话题广播与 SSE 订阅
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! mesa-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── orders/        # 订单域流程
//! ├── notify/        # 话题广播
//! ├── db/            # 数据库层
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use notify::TopicNotifier;
pub use orders::{FlowError, FlowResult, OrderCoordinator};
pub use utils::error::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 环境准备: dotenv + 日志
///
/// 在读取 [`Config`] 之前调用一次。`.env` 缺失不算错误。
pub fn setup_environment() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ____ ___  ___  _________ _
  / __ `__ \/ _ \/ ___/ __ `/
 / / / / / /  __(__  ) /_/ /
/_/ /_/ /_/\___/____/\__,_/
    "#
    );
}
