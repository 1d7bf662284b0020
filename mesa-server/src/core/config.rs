/// Server configuration
///
/// # Environment variables
///
/// Every field can be overridden through the environment:
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | MESA_HOST | 0.0.0.0 | Bind address |
/// | MESA_HTTP_PORT | 8080 | HTTP API port |
/// | MESA_WORK_DIR | ./work_dir | Working directory (database, state) |
/// | MESA_LOG_LEVEL | info | Log filter level |
/// | MESA_LOG_DIR | (unset) | Daily-rolling log files, stdout when unset |
/// | MESA_CHANNEL_CAPACITY | 256 | Broadcast buffer per event topic |
///
/// # Example
///
/// ```ignore
/// MESA_WORK_DIR=/data/mesa MESA_HTTP_PORT=9000 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address for the HTTP listener
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
    /// 工作目录, 存放嵌入式数据库
    pub work_dir: String,
    /// Log filter level: trace | debug | info | warn | error
    pub log_level: String,
    /// Log directory; file logging is enabled only when set
    pub log_dir: Option<String>,
    /// Per-topic broadcast capacity; slow consumers past this lag miss events
    pub channel_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable values fall back to the defaults above.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("MESA_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            http_port: std::env::var("MESA_HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            work_dir: std::env::var("MESA_WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            log_level: std::env::var("MESA_LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("MESA_LOG_DIR").ok(),
            channel_capacity: std::env::var("MESA_CHANNEL_CAPACITY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(256),
        }
    }

    /// Override the filesystem- and port-sensitive fields
    ///
    /// 测试场景常用
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Socket address string the listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// Directory holding the embedded database files
    pub fn database_dir(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("database")
    }

    /// Create the working directory layout if it is missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
