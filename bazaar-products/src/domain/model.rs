//! 商品领域模型

use chrono::{DateTime, Utc};

/// 商品记录；标识符只由存储层分配
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 待创建的商品，尚无标识符
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
}
