//! PostgreSQL 连接管理
//!
//! 提供带重试的连接池创建；表结构的同步由各服务的存储实现负责。

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::FatalError;
use crate::retry::{self, RetryPolicy};

/// 按重试策略建立连接池；预算内始终连不上即为致命错误
pub async fn connect_with_retry(
    config: &DatabaseConfig,
    policy: &RetryPolicy,
) -> Result<PgPool, FatalError> {
    let url = config.url();

    let pool = retry::retry(policy, "database connection", || async {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&url)
            .await?;

        // 连接测试
        sqlx::query("SELECT 1").execute(&pool).await?;

        Ok::<_, sqlx::Error>(pool)
    })
    .await
    .map_err(|err| FatalError::DatabaseUnavailable {
        attempts: err.attempts,
        source: err.source,
    })?;

    info!("database connection pool created");
    Ok(pool)
}
