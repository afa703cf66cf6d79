//! 数据库基础设施

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::app::product::model::Product;
use crate::app::product::store::{Queries, StoreError};
use crate::config::{ConfigError, DatabaseConfig};

/// 解析数据库连接串
///
/// 解析失败属于配置错误，启动阶段直接终止。
pub fn parse_database_url(url: &str) -> Result<PgConnectOptions, ConfigError> {
    PgConnectOptions::from_str(url).map_err(ConfigError::InvalidDatabaseUrl)
}

/// PostgreSQL 产品存储
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(
        options: PgConnectOptions,
        config: &DatabaseConfig,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect_with(options)
            .await?;

        info!("数据库连接池已建立，最大连接数: {}", config.max_connections);
        Ok(Self { pool })
    }

    /// 创建 products 表（若不存在）
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                price INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("products 表已就绪");
        Ok(())
    }

    /// 关闭连接池
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Queries for PgStore {
    async fn query_all(&self) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>("SELECT id, name, price FROM products")
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn query_row(&self, id: &str) -> Result<Product, StoreError> {
        sqlx::query_as::<_, Product>("SELECT id, name, price FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create_row(&self, name: &str, price: i32) -> Result<Product, StoreError> {
        let product = Product::new(name.to_string(), price);

        sqlx::query("INSERT INTO products (id, name, price) VALUES ($1, $2, $3)")
            .bind(&product.id)
            .bind(&product.name)
            .bind(product.price)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("插入产品失败: {}", e);
                e
            })?;

        Ok(product)
    }

    async fn delete_row(&self, id: &str) -> Result<String, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!("删除产品 {}，影响行数: {}", id, result.rows_affected());
        Ok(id.to_string())
    }
}
