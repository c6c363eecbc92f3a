//! 服务注册器

use bazaar_core::{AppConfig, ConsulRegistrant, RegistryError, ServiceIdentity};

pub struct ServiceRegistrar;

impl ServiceRegistrar {
    /// 向注册中心注册本服务；失败由调用方按致命处理
    pub async fn register_service(
        config: &AppConfig,
    ) -> Result<(ConsulRegistrant, ServiceIdentity), RegistryError> {
        let identity = ServiceIdentity {
            name: config.service.name.clone(),
            address: config.service.address.clone(),
            port: config.service.port,
        };

        let registrant = ConsulRegistrant::new(config.registry.clone());
        registrant.register(&identity).await?;

        Ok((registrant, identity))
    }
}
