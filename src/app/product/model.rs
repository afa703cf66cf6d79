//! 产品数据模型

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// 价格，以最小货币单位计
    pub price: i32,
}

impl Product {
    /// 以新生成的 ID 构造产品
    pub fn new(name: String, price: i32) -> Self {
        Self {
            id: new_product_id(),
            name,
            price,
        }
    }
}

/// 生成产品 ID
///
/// 使用 UUID v7，全局唯一且按创建时间有序。
pub fn new_product_id() -> String {
    Uuid::now_v7().to_string()
}

/// 创建产品请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: i32,
}

/// 删除产品响应
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedProduct {
    pub id: String,
}
