//! 用户存储接口

use std::sync::Arc;

use async_trait::async_trait;
use bazaar_core::StoreError;

use crate::domain::model::{NewUser, User};

/// 用户存储，实现必须对并发调用安全
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 写入一条新记录，返回含已分配标识符的完整记录
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<User, StoreError>;
}

pub type UserRepositoryRef = Arc<dyn UserRepository>;
