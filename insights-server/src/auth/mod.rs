//! HTTP Basic 认证
//!
//! [`Credentials`] 保存配置的共享凭证对；[`require_auth`] 中间件在路由层
//! 强制认证，处理器永远看不到未认证的请求。

pub mod basic;
pub mod middleware;

pub use basic::{BasicCredentials, Credentials, parse_basic_header};
pub use middleware::require_auth;
