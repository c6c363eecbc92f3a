//! Bazaar 服务公共库
//!
//! 为各业务服务提供统一的配置加载、启动生命周期、健康上报与服务注册能力

pub mod config;
pub mod db;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod registry;
pub mod retry;
pub mod server;
pub mod tracing;

pub use config::{
    AppConfig, BootstrapConfig, DatabaseConfig, LoggingConfig, ServiceConfig, load_config,
};
pub use error::{FatalError, StoreError};
pub use health::{HealthService, HealthState};
pub use lifecycle::{Lifecycle, Phase};
pub use registry::{ConsulRegistrant, RegistryConfig, RegistryError, ServiceIdentity};
pub use retry::RetryPolicy;
pub use server::BoundListener;
