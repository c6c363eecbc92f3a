//! 用户领域模型

use chrono::{DateTime, Utc};

/// 用户记录；标识符只由存储层分配
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 待创建的用户，尚无标识符
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}
