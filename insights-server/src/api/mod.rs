//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 欢迎页、健康检查 (公开)
//! - [`reports`] - 销售报表接口 (需 Basic 认证)

pub mod health;
pub mod reports;
