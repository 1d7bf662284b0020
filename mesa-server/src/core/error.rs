use thiserror::Error;

/// Errors raised while bringing the server up or tearing it down
///
/// Request-level failures use [`crate::utils::error::AppError`]; this type
/// only covers the bootstrap path (config, storage, listener).
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("监听失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result 别名, 服务器启动路径专用
pub type Result<T> = std::result::Result<T, ServerError>;
