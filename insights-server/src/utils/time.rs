//! 时间工具函数 — 日期解析
//!
//! 查询参数与 CSV 单元格使用不同的解析规则：
//! - 参数：严格 `YYYY-MM-DD`，失败返回 400
//! - 单元格：宽松，接受日期或日期时间，截断到日历日期

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析 CSV 日期单元格，截断到日历日期
///
/// 接受的格式：
/// - `YYYY-MM-DD`
/// - `YYYY-MM-DD HH:MM:SS[.frac]`
/// - `YYYY-MM-DDTHH:MM:SS[.frac]`
/// - RFC 3339 (带 `Z` 或 `±hh:mm` 偏移，偏移被丢弃)
///
/// 无法解析时返回 `None`，由调用方决定如何报错。
pub fn parse_date_cell(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();

    if let Ok(date) = NaiveDate::parse_from_str(cell, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(cell, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(cell) {
        return Some(dt.date_naive());
    }

    None
}
