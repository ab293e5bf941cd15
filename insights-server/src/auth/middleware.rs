//! 认证中间件
//!
//! 为 HTTP Basic 认证提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::parse_basic_header;
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// 认证中间件 - 要求共享凭证
///
/// 从 `Authorization: Basic <base64>` 头提取凭证对并与配置的共享凭证比较。
/// 认证发生在任何数据表读取之前。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (`/`, `/health` 公开)
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无/畸形 Authorization 头 | 401 + `WWW-Authenticate: Basic` |
/// | 凭证错误 | 401 + `WWW-Authenticate: Basic` |
pub async fn require_auth(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let presented = match auth_header {
        Some(header) => match parse_basic_header(header) {
            Some(credentials) => credentials,
            None => {
                security_log!(WARN, "auth_malformed", uri = format!("{:?}", req.uri()));
                return Err(AppError::Unauthorized);
            }
        },
        None => {
            security_log!(WARN, "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::Unauthorized);
        }
    };

    if !state
        .credentials()
        .verify(&presented.username, &presented.password)
    {
        security_log!(
            WARN,
            "auth_failed",
            username = presented.username,
            uri = format!("{:?}", req.uri())
        );
        return Err(AppError::InvalidCredentials);
    }

    Ok(next.run(req).await)
}
