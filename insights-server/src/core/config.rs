/// 服务器配置 - 销售统计服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATA_DIR | ./data | CSV 数据表目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | API_USERNAME | (空) | 共享凭证用户名 |
/// | API_PASSWORD | (空) | 共享凭证密码 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志文件目录，不设置则仅输出到控制台 |
///
/// # 示例
///
/// ```ignore
/// DATA_DIR=/srv/sales HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// CSV 数据表目录 (dishes.csv, dishes_toppings.csv)
    pub data_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 共享凭证用户名 (HTTP Basic)
    pub api_username: String,
    /// 共享凭证密码 (HTTP Basic)
    pub api_password: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 日志文件目录 (可选)
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值。凭证没有默认值：
    /// 未设置时所有 API 请求都会被拒绝 (fail closed)。
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            api_username: std::env::var("API_USERNAME").unwrap_or_default(),
            api_password: std::env::var("API_PASSWORD").unwrap_or_default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(data_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.data_dir = data_dir.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
