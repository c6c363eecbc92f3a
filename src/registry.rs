//! 服务注册发现模块
//!
//! 通过 Consul agent HTTP API 完成一次性注册，注册记录携带 gRPC 主动
//! 健康检查描述；持续 critical 之后的摘除由注册中心负责。与数据库
//! 连接不同，注册失败不做本地重试，由调用方按致命处理。

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// 注册中心地址的环境变量覆盖
pub const CONSUL_ADDR_ENV: &str = "CONSUL_HTTP_ADDR";

const DEFAULT_CONSUL_ADDR: &str = "http://127.0.0.1:8500";

/// 注册中心配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// agent 地址；`CONSUL_HTTP_ADDR` 优先
    pub address: String,
    /// 主动检查间隔
    pub check_interval: String,
    /// 持续 critical 超过该时长后由注册中心摘除注册记录
    pub deregister_after: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_CONSUL_ADDR.to_string(),
            check_interval: "10s".to_string(),
            deregister_after: "30s".to_string(),
        }
    }
}

/// 服务身份，进程生命周期内不变
#[derive(Debug, Clone)]
pub struct ServiceIdentity {
    /// 逻辑服务名，同时作为注册记录的 ID
    pub name: String,
    /// 广播给注册中心的地址（容器网络内通常就是服务名）
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("registry rejected request: {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

// Consul agent API 的数据模型，字段名与其规范一致
#[derive(Debug, Serialize)]
struct AgentServiceRegistration<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Address")]
    address: &'a str,
    #[serde(rename = "Port")]
    port: u16,
    #[serde(rename = "Check")]
    check: AgentServiceCheck,
}

#[derive(Debug, Serialize)]
struct AgentServiceCheck {
    #[serde(rename = "GRPC")]
    grpc: String,
    #[serde(rename = "Interval")]
    interval: String,
    #[serde(rename = "DeregisterCriticalServiceAfter")]
    deregister_critical_service_after: String,
}

/// 注册中心客户端
pub struct ConsulRegistrant {
    client: reqwest::Client,
    base_url: String,
    config: RegistryConfig,
}

impl ConsulRegistrant {
    pub fn new(config: RegistryConfig) -> Self {
        let base_url = normalize_address(&config.address);
        Self {
            client: reqwest::Client::new(),
            base_url,
            config,
        }
    }

    /// 注册服务及其 gRPC 健康检查
    pub async fn register(&self, identity: &ServiceIdentity) -> Result<(), RegistryError> {
        let registration = AgentServiceRegistration {
            id: &identity.name,
            name: &identity.name,
            address: &identity.address,
            port: identity.port,
            check: AgentServiceCheck {
                grpc: format!("{}:{}", identity.address, identity.port),
                interval: self.config.check_interval.clone(),
                deregister_critical_service_after: self.config.deregister_after.clone(),
            },
        };

        let url = format!("{}/v1/agent/service/register", self.base_url);
        let response = self.client.put(&url).json(&registration).send().await?;
        ensure_success(response).await?;

        info!(
            service = %identity.name,
            address = %identity.address,
            port = identity.port,
            "service registered"
        );
        Ok(())
    }

    /// 注销服务（优雅停机路径；崩溃的进程由注册中心按 critical 超时摘除）
    pub async fn deregister(&self, service_id: &str) -> Result<(), RegistryError> {
        let url = format!("{}/v1/agent/service/deregister/{service_id}", self.base_url);
        let response = self.client.put(&url).send().await?;
        ensure_success(response).await
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<(), RegistryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(RegistryError::Rejected { status, body })
}

/// 允许 `host:port` 形式的地址，缺省补全 http 协议头
fn normalize_address(address: &str) -> String {
    let trimmed = address.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn registration_matches_consul_wire_shape() {
        let config = RegistryConfig::default();
        let identity = ServiceIdentity {
            name: "users-service".to_string(),
            address: "users-service".to_string(),
            port: 50051,
        };

        let registration = AgentServiceRegistration {
            id: &identity.name,
            name: &identity.name,
            address: &identity.address,
            port: identity.port,
            check: AgentServiceCheck {
                grpc: format!("{}:{}", identity.address, identity.port),
                interval: config.check_interval.clone(),
                deregister_critical_service_after: config.deregister_after.clone(),
            },
        };

        let value = serde_json::to_value(&registration).unwrap();
        assert_eq!(
            value,
            json!({
                "ID": "users-service",
                "Name": "users-service",
                "Address": "users-service",
                "Port": 50051,
                "Check": {
                    "GRPC": "users-service:50051",
                    "Interval": "10s",
                    "DeregisterCriticalServiceAfter": "30s",
                }
            })
        );
    }

    #[test]
    fn bare_host_port_gets_http_scheme() {
        assert_eq!(normalize_address("consul:8500"), "http://consul:8500");
        assert_eq!(
            normalize_address("http://127.0.0.1:8500/"),
            "http://127.0.0.1:8500"
        );
        assert_eq!(
            normalize_address("https://consul.internal:8501"),
            "https://consul.internal:8501"
        );
    }

    #[test]
    fn default_registry_config_points_at_local_agent() {
        let config = RegistryConfig::default();
        assert_eq!(config.address, "http://127.0.0.1:8500");
        assert_eq!(config.check_interval, "10s");
        assert_eq!(config.deregister_after, "30s");
    }
}
