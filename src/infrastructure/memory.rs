//! 内存产品存储
//! 不依赖数据库，按插入顺序保存产品，用于测试和 MODE=MEMORY

use async_trait::async_trait;
use std::sync::RwLock;

use crate::app::product::model::Product;
use crate::app::product::store::{Queries, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    products: RwLock<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Storage("内存存储锁已损坏".to_string())
}

#[async_trait]
impl Queries for MemoryStore {
    async fn query_all(&self) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(poisoned)?;
        Ok(products.clone())
    }

    async fn query_row(&self, id: &str) -> Result<Product, StoreError> {
        let products = self.products.read().map_err(poisoned)?;
        products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create_row(&self, name: &str, price: i32) -> Result<Product, StoreError> {
        let product = Product::new(name.to_string(), price);
        let mut products = self.products.write().map_err(poisoned)?;

        // 主键约束
        if products.iter().any(|p| p.id == product.id) {
            return Err(StoreError::Storage(format!("重复的产品 ID: {}", product.id)));
        }

        products.push(product.clone());
        Ok(product)
    }

    async fn delete_row(&self, id: &str) -> Result<String, StoreError> {
        let mut products = self.products.write().map_err(poisoned)?;
        products.retain(|p| p.id != id);
        Ok(id.to_string())
    }
}
