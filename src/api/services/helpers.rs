//! API 帮助函数：统一错误响应、限流头、Cookie

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::http::header::HeaderValue;
use actix_web::{HttpResponse, ResponseError, web};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, warn};

use crate::api::constants;
use crate::errors::{LinkhubError, Result};
use crate::validation::FieldError;

const JSON_BODY_LIMIT: usize = 64 * 1024;

/// `{error, errors?}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            errors: None,
        }
    }
}

/// `{success: true}`
#[derive(Debug, Serialize)]
pub struct SuccessBody {
    pub success: bool,
}

impl SuccessBody {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// 从 LinkhubError 构建错误响应；4xx 记 warn，5xx 记 error
pub fn error_response(err: &LinkhubError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("{} [{}]: {}", err.error_type(), err.code(), err.message());
    } else {
        warn!("{} [{}]: {}", err.error_type(), err.code(), err.message());
    }

    let body = ErrorBody {
        error: err.public_message().to_string(),
        errors: err.field_errors().map(<[FieldError]>::to_vec),
    };

    let mut builder = HttpResponse::build(status);
    if matches!(err, LinkhubError::RateLimited(_)) {
        builder.insert_header((constants::RATE_LIMIT_REMAINING_HEADER, "0"));
    }
    builder.json(body)
}

impl ResponseError for LinkhubError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        error_response(self)
    }
}

/// 统一 Result → HttpResponse 转换
pub fn respond<T: Serialize>(status: StatusCode, result: Result<T>) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::build(status).json(data),
        Err(e) => error_response(&e),
    }
}

/// 准入之后的每个响应都带上剩余额度
pub fn with_remaining(mut response: HttpResponse, remaining: u32) -> HttpResponse {
    if let Ok(value) = HeaderValue::from_str(&remaining.to_string()) {
        response
            .headers_mut()
            .insert(constants::RATE_LIMIT_REMAINING_HEADER, value);
    }
    response
}

/// JSON body 解析失败统一返回 400 "Invalid request body"
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, req| {
            warn!("Malformed JSON body on {}: {}", req.path(), err);
            LinkhubError::malformed_request("Invalid request body").into()
        })
}

/// 先准入后解析的接口用原始 body，大小上限与 JSON 提取器一致
pub fn payload_config() -> web::PayloadConfig {
    web::PayloadConfig::new(JSON_BODY_LIMIT)
}

/// 解析已读取的 JSON body，失败统一为 400 "Invalid request body"
pub fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        warn!("Malformed JSON body: {}", e);
        LinkhubError::malformed_request("Invalid request body")
    })
}

/// 路径参数解析失败（理论上只有编码错误）
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        LinkhubError::malformed_request(format!("Invalid path: {}", err)).into()
    })
}

/// Session cookie 构建器
pub struct CookieBuilder {
    secure: bool,
    session_days: u64,
}

impl CookieBuilder {
    pub fn new(secure: bool, session_days: u64) -> Self {
        Self {
            secure,
            session_days,
        }
    }

    pub fn from_config() -> Self {
        let config = crate::config::get_config();
        Self::new(config.auth.cookie_secure, config.auth.session_days)
    }

    fn build_cookie_base(
        &self,
        value: String,
        max_age: actix_web::cookie::time::Duration,
    ) -> Cookie<'static> {
        let mut cookie = Cookie::new(constants::SESSION_COOKIE_NAME, value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(SameSite::Strict);
        cookie.set_max_age(max_age);
        cookie
    }

    pub fn build_session_cookie(&self, token: String) -> Cookie<'static> {
        self.build_cookie_base(
            token,
            actix_web::cookie::time::Duration::days(self.session_days as i64),
        )
    }

    pub fn build_expired_session_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(String::new(), actix_web::cookie::time::Duration::ZERO)
    }
}
