use std::sync::Arc;

use bazaar_proto::users::user_service_server::UserService;
use bazaar_proto::users::{CreateUserRequest, GetUserRequest, UserResponse};
use tonic::{Request, Response, Status};

use crate::interface::grpc::handler::UserHandler;

#[derive(Clone)]
pub struct UserGrpcServer {
    handler: Arc<UserHandler>,
}

impl UserGrpcServer {
    /// 从已有的 handler 创建服务器（用于 bootstrap）
    pub fn from_handler(handler: Arc<UserHandler>) -> Self {
        Self { handler }
    }
}

#[tonic::async_trait]
impl UserService for UserGrpcServer {
    async fn create_user(
        &self,
        request: Request<CreateUserRequest>,
    ) -> std::result::Result<Response<UserResponse>, Status> {
        self.handler.handle_create_user(request).await
    }

    async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> std::result::Result<Response<UserResponse>, Status> {
        self.handler.handle_get_user(request).await
    }
}
