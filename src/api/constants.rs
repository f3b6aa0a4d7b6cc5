//! API 模块常量定义

use actix_web::http::header::HeaderName;

/// Session cookie 名称
pub const SESSION_COOKIE_NAME: &str = "linkhub_session";

/// 限流剩余次数响应头
pub const RATE_LIMIT_REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// 请求 ID 请求/响应头
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// 客户端自带请求 ID 的最大长度，超出则重新生成
pub const MAX_REQUEST_ID_LEN: usize = 64;
