//! 产品数据访问层
//!
//! `Queries` 抽象出对 `products` 表的四种操作，PostgreSQL 与内存实现
//! 都在 `infrastructure` 中。每个操作只执行一条语句。

use async_trait::async_trait;
use thiserror::Error;

use super::model::Product;

/// 数据访问错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("产品不存在: {0}")]
    NotFound(String),
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("存储错误: {0}")]
    Storage(String),
}

/// 产品查询接口
#[async_trait]
pub trait Queries: Send + Sync {
    /// 查询全部产品，顺序由存储决定
    async fn query_all(&self) -> Result<Vec<Product>, StoreError>;

    /// 按 ID 查询单个产品
    async fn query_row(&self, id: &str) -> Result<Product, StoreError>;

    /// 生成新 ID 并插入产品
    async fn create_row(&self, name: &str, price: i32) -> Result<Product, StoreError>;

    /// 按 ID 删除产品，不存在时同样返回该 ID
    async fn delete_row(&self, id: &str) -> Result<String, StoreError>;
}
