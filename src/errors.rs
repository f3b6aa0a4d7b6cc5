use std::fmt;

use actix_web::http::StatusCode;

use crate::validation::FieldError;

#[derive(Debug, Clone)]
pub enum LinkhubError {
    Unauthorized(String),
    Validation(Vec<FieldError>),
    MalformedRequest(String),
    RateLimited(String),
    NotFound(String),
    Conflict(String),
    PositionConflict(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Internal(String),
}

impl LinkhubError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkhubError::Unauthorized(_) => "E001",
            LinkhubError::Validation(_) => "E002",
            LinkhubError::MalformedRequest(_) => "E003",
            LinkhubError::RateLimited(_) => "E004",
            LinkhubError::NotFound(_) => "E005",
            LinkhubError::Conflict(_) => "E006",
            LinkhubError::PositionConflict(_) => "E007",
            LinkhubError::DatabaseConfig(_) => "E008",
            LinkhubError::DatabaseConnection(_) => "E009",
            LinkhubError::DatabaseOperation(_) => "E010",
            LinkhubError::Internal(_) => "E011",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkhubError::Unauthorized(_) => "Unauthorized",
            LinkhubError::Validation(_) => "Validation Error",
            LinkhubError::MalformedRequest(_) => "Malformed Request",
            LinkhubError::RateLimited(_) => "Rate Limited",
            LinkhubError::NotFound(_) => "Resource Not Found",
            LinkhubError::Conflict(_) => "Conflict",
            LinkhubError::PositionConflict(_) => "Position Conflict",
            LinkhubError::DatabaseConfig(_) => "Database Configuration Error",
            LinkhubError::DatabaseConnection(_) => "Database Connection Error",
            LinkhubError::DatabaseOperation(_) => "Database Operation Error",
            LinkhubError::Internal(_) => "Internal Error",
        }
    }

    /// 获取错误详情
    ///
    /// Validation 的详情在 `field_errors()` 中，这里只返回概括信息。
    pub fn message(&self) -> &str {
        match self {
            LinkhubError::Validation(_) => "Validation failed",
            LinkhubError::Unauthorized(msg)
            | LinkhubError::MalformedRequest(msg)
            | LinkhubError::RateLimited(msg)
            | LinkhubError::NotFound(msg)
            | LinkhubError::Conflict(msg)
            | LinkhubError::PositionConflict(msg)
            | LinkhubError::DatabaseConfig(msg)
            | LinkhubError::DatabaseConnection(msg)
            | LinkhubError::DatabaseOperation(msg)
            | LinkhubError::Internal(msg) => msg,
        }
    }

    /// 字段级错误（仅 Validation 有值）
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            LinkhubError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            LinkhubError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            LinkhubError::Validation(_) | LinkhubError::MalformedRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            LinkhubError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            LinkhubError::NotFound(_) => StatusCode::NOT_FOUND,
            LinkhubError::Conflict(_) => StatusCode::CONFLICT,
            LinkhubError::PositionConflict(_)
            | LinkhubError::DatabaseConfig(_)
            | LinkhubError::DatabaseConnection(_)
            | LinkhubError::DatabaseOperation(_)
            | LinkhubError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 对外暴露的错误信息
    ///
    /// Internal 的详情只写日志，不返回给客户端；存储错误原样透传。
    pub fn public_message(&self) -> &str {
        match self {
            LinkhubError::Internal(_) => "Internal server error",
            other => other.message(),
        }
    }

    /// 格式化为彩色输出（用于 Server 模式启动失败）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.format_detail().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.format_detail())
    }

    fn format_detail(&self) -> String {
        match self {
            LinkhubError::Validation(errors) => errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join("; "),
            other => other.message().to_string(),
        }
    }
}

impl fmt::Display for LinkhubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkhubError {}

// 便捷的构造函数
impl LinkhubError {
    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        LinkhubError::Unauthorized(msg.into())
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        LinkhubError::Validation(errors)
    }

    pub fn malformed_request<T: Into<String>>(msg: T) -> Self {
        LinkhubError::MalformedRequest(msg.into())
    }

    pub fn rate_limited() -> Self {
        LinkhubError::RateLimited("Too many requests".to_string())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkhubError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        LinkhubError::Conflict(msg.into())
    }

    pub fn position_conflict<T: Into<String>>(msg: T) -> Self {
        LinkhubError::PositionConflict(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinkhubError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkhubError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkhubError::DatabaseOperation(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        LinkhubError::Internal(msg.into())
    }
}

impl From<sea_orm::DbErr> for LinkhubError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkhubError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkhubError {
    fn from(err: serde_json::Error) -> Self {
        LinkhubError::MalformedRequest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkhubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            LinkhubError::unauthorized("x").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            LinkhubError::validation(vec![]).http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LinkhubError::malformed_request("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LinkhubError::rate_limited().http_status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            LinkhubError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            LinkhubError::conflict("x").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            LinkhubError::position_conflict("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            LinkhubError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_not_public() {
        let err = LinkhubError::internal("stack overflow in handler");
        assert_eq!(err.public_message(), "Internal server error");
        assert_eq!(err.message(), "stack overflow in handler");
    }

    #[test]
    fn test_store_message_passes_through() {
        let err = LinkhubError::database_operation("disk I/O error");
        assert_eq!(err.public_message(), "disk I/O error");
    }

    #[test]
    fn test_validation_format_lists_fields() {
        let err = LinkhubError::validation(vec![
            FieldError::new("title", "Title is required"),
            FieldError::new("url", "Invalid URL format"),
        ]);
        assert_eq!(err.message(), "Validation failed");
        assert_eq!(err.field_errors().map(|e| e.len()), Some(2));
        assert_eq!(
            err.format_simple(),
            "Validation Error: title: Title is required; url: Invalid URL format"
        );
    }

    #[test]
    fn test_db_err_conversion() {
        let err: LinkhubError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, LinkhubError::DatabaseOperation(_)));
        assert_eq!(err.code(), "E010");
    }
}
