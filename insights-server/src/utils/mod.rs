//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResult`] - 应用错误类型
//! - [`ErrorResponse`] - 错误响应结构
//! - 日志、金额舍入、日期解析

pub mod error;
pub mod logger;
pub mod money;
pub mod time;

pub use error::{AppError, AppResult, ErrorResponse};
