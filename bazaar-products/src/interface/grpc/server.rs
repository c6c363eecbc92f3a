use std::sync::Arc;

use bazaar_proto::products::product_service_server::ProductService;
use bazaar_proto::products::{CreateProductRequest, GetProductRequest, ProductResponse};
use tonic::{Request, Response, Status};

use crate::interface::grpc::handler::ProductHandler;

#[derive(Clone)]
pub struct ProductGrpcServer {
    handler: Arc<ProductHandler>,
}

impl ProductGrpcServer {
    /// 从已有的 handler 创建服务器（用于 bootstrap）
    pub fn from_handler(handler: Arc<ProductHandler>) -> Self {
        Self { handler }
    }
}

#[tonic::async_trait]
impl ProductService for ProductGrpcServer {
    async fn create_product(
        &self,
        request: Request<CreateProductRequest>,
    ) -> std::result::Result<Response<ProductResponse>, Status> {
        self.handler.handle_create_product(request).await
    }

    async fn get_product(
        &self,
        request: Request<GetProductRequest>,
    ) -> std::result::Result<Response<ProductResponse>, Status> {
        self.handler.handle_get_product(request).await
    }
}
