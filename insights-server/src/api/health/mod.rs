//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | / | GET | 欢迎页 | 无 |
//! | /health | GET | 简单健康检查 | 无 |
//! | /health/detailed | GET | 详细健康检查 (逐表加载延迟) | 无 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "version": "0.1.0"
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::time::{Instant, SystemTime};

use crate::core::ServerState;
use crate::dataset::{DISHES_TABLE, TOPPINGS_TABLE};
use crate::utils::AppResult;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
}

/// 欢迎页响应
#[derive(Serialize)]
pub struct WelcomeResponse {
    message: &'static str,
    version: &'static str,
}

/// 简单健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    /// 状态 (healthy | degraded)
    status: &'static str,
    /// 版本号
    version: &'static str,
}

/// 详细健康检查响应
#[derive(Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    /// 运行时间 (秒)
    uptime_seconds: u64,
    /// 各数据表检查结果
    checks: HealthChecks,
}

/// 健康检查详情
#[derive(Serialize)]
pub struct HealthChecks {
    /// 订单行表 (dishes.csv)
    order_lines: CheckResult,
    /// 配料行表 (dishes_toppings.csv)
    topping_lines: CheckResult,
}

/// 单项检查结果
#[derive(Serialize)]
pub struct CheckResult {
    /// 状态 (ok | error)
    status: &'static str,
    /// 加载延迟 (毫秒)
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    /// 表行数
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<usize>,
    /// 错误信息
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl CheckResult {
    fn ok_with_latency(latency_ms: u64, rows: usize) -> Self {
        Self {
            status: "ok",
            latency_ms: Some(latency_ms),
            rows: Some(rows),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            latency_ms: None,
            rows: None,
            message: Some(message.into()),
        }
    }
}

// 服务器启动时间 (懒加载静态变量)
static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

fn get_uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// 欢迎页 - API 的根路径
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Restaurant Sales Insights API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// 基础健康检查
///
/// 只确认进程存活，不触碰数据表
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn check_table(load: impl FnOnce() -> AppResult<usize>, table: &str) -> CheckResult {
    let start = Instant::now();
    match load() {
        Ok(rows) => CheckResult::ok_with_latency(start.elapsed().as_millis() as u64, rows),
        Err(e) => CheckResult::error(format!("{}: {}", table, e)),
    }
}

/// 包含逐表状态的详细健康检查
///
/// 触发一次快照加载 (未变化的文件命中缓存，延迟接近零)
pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let order_check = check_table(
        || state.dataset.order_lines().map(|rows| rows.len()),
        DISHES_TABLE,
    );
    let topping_check = check_table(
        || state.dataset.topping_lines().map(|rows| rows.len()),
        TOPPINGS_TABLE,
    );

    let all_ok = order_check.status == "ok" && topping_check.status == "ok";

    Json(DetailedHealthResponse {
        status: if all_ok { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: get_uptime_seconds(),
        checks: HealthChecks {
            order_lines: order_check,
            topping_lines: topping_check,
        },
    })
}
