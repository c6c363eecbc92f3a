//! Bazaar 用户服务
//!
//! 对外暴露 CreateUser / GetUser 两个 RPC，记录落在 PostgreSQL，
//! 启动时向注册中心注册自身及健康检查。

pub mod domain;
pub mod infrastructure;
pub mod interface;
pub mod service;

pub use service::bootstrap::ApplicationBootstrap;
