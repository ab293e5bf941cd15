//! Restaurant Sales Insights Server - 只读销售统计 API
//!
//! # 架构概述
//!
//! 本模块是 Insights Server 的主入口，提供以下核心功能：
//!
//! - **数据表** (`dataset`): CSV 订单/配料表，reload-on-change 快照缓存
//! - **聚合查询** (`reports`): 日期窗口过滤 + 六个销售统计查询
//! - **认证** (`auth`): HTTP Basic 共享凭证，常量时间比较
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! insights-server/src/
//! ├── core/      # 配置、状态、服务器
//! ├── auth/      # Basic 凭证、认证中间件
//! ├── api/       # HTTP 路由和处理器
//! ├── dataset/   # CSV 数据表 (模型、加载、缓存)
//! ├── reports/   # 聚合查询核心
//! └── utils/     # 错误、日志、金额、日期工具
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod dataset;
pub mod reports;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use dataset::{DatasetService, OrderLine, ToppingLine};
pub use reports::{DateRange, IncomeSummary};
pub use utils::{AppError, AppResult, ErrorResponse};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ____           _       __    __
   /  _/___  _____(_)___ _/ /_  / /______
   / // __ \/ ___/ / __ `/ __ \/ __/ ___/
 _/ // / / (__  ) / /_/ / / / / /_(__  )
/___/_/ /_/____/_/\__, /_/ /_/\__/____/
                 /____/
    "#
    );
}

/// 设置运行环境 (dotenv + 日志)
///
/// 必须在 [`Config::from_env`] 之前调用，否则 `.env` 里的变量不生效。
pub fn setup_environment() -> anyhow::Result<()> {
    // 1. Load .env if present (missing file is fine)
    dotenv::dotenv().ok();

    // 2. Initialize logging; production gets JSON output
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let json_format = std::env::var("ENVIRONMENT")
        .map(|e| e == "production")
        .unwrap_or(false);
    let log_dir = std::env::var("LOG_DIR").ok();

    init_logger_with_file(&level, json_format, log_dir.as_deref())?;

    Ok(())
}
