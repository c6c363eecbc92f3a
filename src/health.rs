//! 健康状态上报
//!
//! 实现标准 grpc.health.v1 协议，注册中心按固定间隔主动探测 `Check`。
//! 健康标志由生命周期状态机独占写入，本模块只读。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};

use bazaar_proto::health::health_check_response::ServingStatus;
use bazaar_proto::health::health_server::{Health, HealthServer};
use bazaar_proto::health::{HealthCheckRequest, HealthCheckResponse};

/// 进程级健康标志
#[derive(Debug, Default)]
pub struct HealthState {
    serving: AtomicBool,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            serving: AtomicBool::new(false),
        }
    }

    pub(crate) fn set_serving(&self) {
        self.serving.store(true, Ordering::Release);
    }

    pub(crate) fn set_not_serving(&self) {
        self.serving.store(false, Ordering::Release);
    }

    pub fn is_serving(&self) -> bool {
        self.serving.load(Ordering::Acquire)
    }
}

/// grpc.health.v1 实现
pub struct HealthService {
    state: Arc<HealthState>,
}

impl HealthService {
    pub fn new(state: Arc<HealthState>) -> Self {
        Self { state }
    }

    pub fn into_server(self) -> HealthServer<HealthService> {
        HealthServer::new(self)
    }
}

#[tonic::async_trait]
impl Health for HealthService {
    async fn check(
        &self,
        _request: Request<HealthCheckRequest>,
    ) -> std::result::Result<Response<HealthCheckResponse>, Status> {
        // 健康状态是进程级的，不区分请求里的服务名
        let status = if self.state.is_serving() {
            ServingStatus::Serving
        } else {
            ServingStatus::NotServing
        };

        Ok(Response::new(HealthCheckResponse {
            status: status.into(),
        }))
    }

    type WatchStream = ReceiverStream<std::result::Result<HealthCheckResponse, Status>>;

    async fn watch(
        &self,
        _request: Request<HealthCheckRequest>,
    ) -> std::result::Result<Response<Self::WatchStream>, Status> {
        // 注册中心的探测走 Check，进程内没有 Watch 的消费者
        Err(Status::unimplemented("health watch is not supported"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn check_reports_not_serving_before_startup_completes() {
        let state = Arc::new(HealthState::new());
        let service = HealthService::new(Arc::clone(&state));

        let response = service
            .check(Request::new(HealthCheckRequest::default()))
            .await
            .unwrap();

        assert_eq!(
            response.into_inner().status,
            i32::from(ServingStatus::NotServing)
        );
    }

    #[tokio::test]
    async fn check_reports_serving_once_flag_is_set() {
        let state = Arc::new(HealthState::new());
        let service = HealthService::new(Arc::clone(&state));

        state.set_serving();
        let response = service
            .check(Request::new(HealthCheckRequest::default()))
            .await
            .unwrap();
        assert_eq!(
            response.into_inner().status,
            i32::from(ServingStatus::Serving)
        );

        state.set_not_serving();
        let response = service
            .check(Request::new(HealthCheckRequest::default()))
            .await
            .unwrap();
        assert_eq!(
            response.into_inner().status,
            i32::from(ServingStatus::NotServing)
        );
    }

    #[tokio::test]
    async fn watch_is_unimplemented() {
        let service = HealthService::new(Arc::new(HealthState::new()));

        let status = service
            .watch(Request::new(HealthCheckRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unimplemented);
    }
}
