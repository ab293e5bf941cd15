//! 统一错误处理
//!
//! 提供应用级错误类型和错误响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`ErrorResponse`] - 错误响应 JSON 结构
//!
//! # 错误码规范
//!
//! | 错误码 | HTTP | 说明 |
//! |--------|------|------|
//! | E3001 | 401 | 缺少凭证 |
//! | E3002 | 401 | 凭证错误 |
//! | E0002 | 400 | 参数验证失败 |
//! | E0003 | 404 | 资源不存在 |
//! | E0005 | 422 | 聚合窗口为空 |
//! | E9002 | 500 | 数据表加载失败 |
//! | E9001 | 500 | 内部错误 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::validation("Invalid date format: 2023-13-01"))
//!
//! // 返回成功响应 (handler 直接返回数据体)
//! Ok(Json(response))
//! ```

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// 错误响应结构
///
/// ```json
/// {
///   "code": "E0002",
///   "message": "Invalid date format: 2023-13-01"
/// }
/// ```
///
/// 成功响应不走该结构 (handler 直接序列化数据体)，
/// 因此客户端可以通过 HTTP 状态码或 `code` 字段区分成败。
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// 错误码 (见模块文档的错误码表)
    pub code: String,
    /// 人类可读的错误消息
    pub message: String,
}

/// 应用错误枚举
///
/// # 错误分类
///
/// | 分类 | 说明 |
/// |------|------|
/// | 认证错误 | 缺少凭证、凭证错误 |
/// | 业务逻辑错误 | 参数验证失败、路由不存在、聚合窗口为空 |
/// | 系统错误 | 数据表加载失败、内部错误 |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 认证错误 (401) ==========
    #[error("Authentication required")]
    /// 缺少凭证 (401)
    Unauthorized,

    #[error("Invalid username or password")]
    /// 凭证错误 (401)
    InvalidCredentials,

    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Validation failed: {0}")]
    /// 参数验证失败 (400)
    Validation(String),

    #[error("Empty aggregation window: {0}")]
    /// 聚合窗口内无数据，均值/最大值无定义 (422)
    EmptyRange(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Dataset error: {0}")]
    /// 数据表缺失、损坏或列缺失 (500)
    Dataset(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "E3001",
                "Authentication required".to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "E3002",
                "Invalid username or password".to_string(),
            ),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),

            // Empty aggregation window (422)
            AppError::EmptyRange(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.clone()),

            // Dataset errors (500)
            AppError::Dataset(msg) => {
                error!(target: "dataset", error = %msg, "Dataset error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Dataset error".to_string(),
                )
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code.to_string(),
            message,
        });

        let mut response = (status, body).into_response();
        // Basic auth challenge so clients know how to authenticate
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Basic"));
        }
        response
    }
}

// ========== Helper Constructors ==========

impl AppError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an empty aggregation window error
    pub fn empty_range(msg: impl Into<String>) -> Self {
        Self::EmptyRange(msg.into())
    }

    /// Create a dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// 处理器的 Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
