//! 用户 RPC 处理器
//!
//! 在 wire 请求与存储调用之间做无状态转换，不做缓存、不做幂等去重。

use tonic::{Request, Response, Status};

use bazaar_proto::users::{CreateUserRequest, GetUserRequest, User as WireUser, UserResponse};

use crate::domain::model::{NewUser, User};
use crate::domain::repository::UserRepositoryRef;

pub struct UserHandler {
    repository: UserRepositoryRef,
}

impl UserHandler {
    pub fn new(repository: UserRepositoryRef) -> Self {
        Self { repository }
    }

    /// 每次调用恰好写入一条记录；语义上重复的请求也各自成为新记录
    pub async fn handle_create_user(
        &self,
        request: Request<CreateUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let req = request.into_inner();
        let user = NewUser {
            name: req.name,
            email: req.email,
        };

        let created = self
            .repository
            .create(user)
            .await
            .map_err(|err| err.into_status())?;

        Ok(Response::new(to_response(created)))
    }

    pub async fn handle_get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let req = request.into_inner();
        let id: i64 = req
            .id
            .parse()
            .map_err(|_| Status::invalid_argument(format!("invalid user id: {}", req.id)))?;

        let user = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|err| err.into_status())?;

        Ok(Response::new(to_response(user)))
    }
}

fn to_response(user: User) -> UserResponse {
    UserResponse {
        user: Some(WireUser {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
        }),
    }
}
