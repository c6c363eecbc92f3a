//! 应用启动器 - 按生命周期状态机的顺序完成依赖装配和服务启动

use std::sync::Arc;

use bazaar_core::server::BoundListener;
use bazaar_core::{
    AppConfig, ConsulRegistrant, FatalError, HealthService, Lifecycle, ServiceIdentity, db, server,
};
use bazaar_proto::products::product_service_server::ProductServiceServer;
use tonic::transport::Server;
use tracing::{info, warn};

use crate::infrastructure::persistence::postgres::PostgresProductStore;
use crate::interface::grpc::handler::ProductHandler;
use crate::interface::grpc::server::ProductGrpcServer;
use crate::service::registry::ServiceRegistrar;

/// 应用启动器
pub struct ApplicationBootstrap;

impl ApplicationBootstrap {
    /// 运行应用的主入口点；返回的错误由 cmd/main.rs 决定退出码
    pub async fn run(config: &'static AppConfig) -> Result<(), FatalError> {
        let mut lifecycle = Lifecycle::new();
        let result = Self::run_lifecycle(config, &mut lifecycle).await;
        if result.is_err() {
            lifecycle.fail();
        }
        result
    }

    async fn run_lifecycle(
        config: &AppConfig,
        lifecycle: &mut Lifecycle,
    ) -> Result<(), FatalError> {
        // 等待依赖的数据库完成自身冷启动
        let settle = config.bootstrap.settle_delay();
        if !settle.is_zero() {
            info!(delay_secs = settle.as_secs(), "waiting for dependencies");
            tokio::time::sleep(settle).await;
        }

        lifecycle.db_connecting()?;
        let pool =
            db::connect_with_retry(&config.database, &config.bootstrap.retry_policy()).await?;
        lifecycle.db_ready()?;

        // 同步表结构
        let store = Arc::new(PostgresProductStore::new(pool));
        store.sync_schema().await.map_err(FatalError::SchemaSync)?;

        // 装配 RPC 处理器与健康上报
        let handler = Arc::new(ProductHandler::new(store));
        let grpc_server = ProductGrpcServer::from_handler(handler);
        let health = HealthService::new(lifecycle.health());

        // 先绑定端口；绑定成功即对外可用，健康状态先于注册置为 SERVING
        let listener =
            BoundListener::bind(&config.service.bind_address, config.service.port).await?;
        lifecycle.listener_bound()?;

        let router = Server::builder()
            .add_service(ProductServiceServer::new(grpc_server))
            .add_service(health.into_server());

        // 注册到注册中心；失败直接致命，不降级运行
        let (registrant, identity) = ServiceRegistrar::register_service(config).await?;
        lifecycle.registered()?;

        info!(addr = %listener.local_addr(), "products service listening");
        lifecycle.serving()?;
        let result = server::serve(router, listener).await;

        // 优雅停机
        Self::graceful_shutdown(&registrant, &identity).await;

        info!("products service stopped");
        result
    }

    /// 优雅停机处理：主动注销注册记录
    async fn graceful_shutdown(registrant: &ConsulRegistrant, identity: &ServiceIdentity) {
        if let Err(err) = registrant.deregister(&identity.name).await {
            warn!(error = %err, "failed to unregister service");
        } else {
            info!("service unregistered successfully");
        }
    }
}
