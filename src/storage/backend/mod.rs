//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod accounts;
mod connection;
mod converters;
mod links;
pub mod retry;
mod social;

use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use tracing::{error, warn};

use crate::config::DatabaseConfig;
use crate::errors::{LinkhubError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_link, model_to_profile, model_to_social_link, model_to_user};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(LinkhubError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 上下文只进日志，对外的错误信息保持数据库原文
pub(crate) fn db_error(context: &str, err: DbErr) -> LinkhubError {
    error!("{}: {}", context, err);
    LinkhubError::database_operation(err.to_string())
}

/// 唯一约束冲突判断（跨数据库）
pub fn is_unique_violation(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }
    // 回退到字符串匹配
    let msg = err.to_string().to_lowercase();
    msg.contains("unique constraint") || msg.contains("duplicate entry") || msg.contains("duplicate key")
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(
        database_url: &str,
        backend_name: &str,
        config: &DatabaseConfig,
    ) -> Result<Self> {
        if database_url.is_empty() {
            return Err(LinkhubError::database_config("DATABASE_URL is not set"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name, config.pool_size).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config: retry::RetryConfig::from(config),
        };

        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 健康检查：只查 count，不加载全表
    pub async fn count_links(&self) -> Result<u64> {
        use sea_orm::{EntityTrait, PaginatorTrait};

        migration::entities::link::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| LinkhubError::database_operation(format!("Health check failed: {}", e)))
    }

    pub async fn close(&self) -> Result<()> {
        self.db
            .clone()
            .close()
            .await
            .map_err(|e| LinkhubError::database_connection(format!("Failed to close: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("sqlite://a.db?mode=rwc").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("sqlite::memory:").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("data/links.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("mysql://u:p@h/db").unwrap(), "mysql");
        assert_eq!(infer_backend_from_url("mariadb://u:p@h/db").unwrap(), "mysql");
        assert_eq!(infer_backend_from_url("postgres://u@h/db").unwrap(), "postgres");
        assert!(infer_backend_from_url("redis://h").is_err());
    }

    #[test]
    fn test_unique_violation_message_fallback() {
        let err = DbErr::Custom("UNIQUE constraint failed: links.user_id, links.position".into());
        assert!(is_unique_violation(&err));
        let err = DbErr::Custom("no such table: links".into());
        assert!(!is_unique_violation(&err));
    }

    #[test]
    fn test_db_error_keeps_store_message() {
        let err = db_error("Failed to insert link", DbErr::Custom("disk I/O error".into()));
        assert!(matches!(err, LinkhubError::DatabaseOperation(_)));
        assert!(err.message().contains("disk I/O error"));
        assert!(!err.message().contains("Failed to insert link"));
    }
}
