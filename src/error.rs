//! 错误类型定义
//!
//! 启动期的失败统一收敛为 `FatalError`，一路传递到 cmd/main.rs，
//! 由最外层决定进程退出码；其余代码不直接终止进程。

use std::net::SocketAddr;

use thiserror::Error;
use tonic::Status;

use crate::lifecycle::InvalidTransition;
use crate::registry::RegistryError;

/// 致命启动错误：生命周期状态机进入 Fatal 态的所有边
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("invalid configuration: {0}")]
    Config(String),

    /// 重试预算耗尽仍未连上数据库
    #[error("could not connect to database after {attempts} attempts: {source}")]
    DatabaseUnavailable {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },

    #[error("schema synchronization failed: {0}")]
    SchemaSync(#[source] sqlx::Error),

    /// 端口占用等本地非瞬态错误，不重试
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// 注册失败视同启动失败，不存在注册不上但继续运行的状态
    #[error("service registration failed: {0}")]
    Registration(#[from] RegistryError),

    #[error("rpc server terminated abnormally: {0}")]
    Serve(#[source] tonic::transport::Error),

    #[error(transparent)]
    Lifecycle(#[from] InvalidTransition),
}

/// 单次请求内的存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("datastore error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Database(other),
        }
    }
}

impl StoreError {
    /// 映射为 gRPC 状态；底层错误文本原样透出，重试与否由调用方决定
    pub fn into_status(self) -> Status {
        match self {
            StoreError::NotFound => Status::not_found("record not found"),
            StoreError::Database(err) => Status::unavailable(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use tonic::Code;

    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::NotFound));
        assert_eq!(err.into_status().code(), Code::NotFound);
    }

    #[test]
    fn other_store_errors_map_to_unavailable() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Database(_)));
        assert_eq!(err.into_status().code(), Code::Unavailable);
    }
}
