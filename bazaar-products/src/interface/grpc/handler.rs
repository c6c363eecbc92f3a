//! 商品 RPC 处理器
//!
//! 在 wire 请求与存储调用之间做无状态转换，不做缓存、不做幂等去重。

use tonic::{Request, Response, Status};

use bazaar_proto::products::{
    CreateProductRequest, GetProductRequest, Product as WireProduct, ProductResponse,
};

use crate::domain::model::{NewProduct, Product};
use crate::domain::repository::ProductRepositoryRef;

pub struct ProductHandler {
    repository: ProductRepositoryRef,
}

impl ProductHandler {
    pub fn new(repository: ProductRepositoryRef) -> Self {
        Self { repository }
    }

    /// 每次调用恰好写入一条记录；语义上重复的请求也各自成为新记录
    pub async fn handle_create_product(
        &self,
        request: Request<CreateProductRequest>,
    ) -> Result<Response<ProductResponse>, Status> {
        let req = request.into_inner();
        let product = NewProduct {
            name: req.name,
            price: req.price,
        };

        let created = self
            .repository
            .create(product)
            .await
            .map_err(|err| err.into_status())?;

        Ok(Response::new(to_response(created)))
    }

    pub async fn handle_get_product(
        &self,
        request: Request<GetProductRequest>,
    ) -> Result<Response<ProductResponse>, Status> {
        let req = request.into_inner();
        let id: i64 = req
            .id
            .parse()
            .map_err(|_| Status::invalid_argument(format!("invalid product id: {}", req.id)))?;

        let product = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|err| err.into_status())?;

        Ok(Response::new(to_response(product)))
    }
}

fn to_response(product: Product) -> ProductResponse {
    ProductResponse {
        product: Some(WireProduct {
            id: product.id.to_string(),
            name: product.name,
            price: product.price,
        }),
    }
}
