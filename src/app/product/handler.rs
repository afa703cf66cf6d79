//! 产品处理器

use axum::response::Response;
use tracing::info;
use validator::Validate;

use super::model::{CreateProductRequest, DeletedProduct};
use crate::core::{context::RequestContext, error::AppError};

/// GET /products
pub async fn list_products(ctx: RequestContext) -> Result<Response, AppError> {
    let products = ctx.db.query_all().await?;
    ctx.json(&products)
}

/// GET /products/:id
pub async fn get_product(ctx: RequestContext) -> Result<Response, AppError> {
    let id = ctx.param("id")?;
    let product = ctx.db.query_row(id).await?;
    ctx.json(&product)
}

/// POST /products
pub async fn create_product(ctx: RequestContext) -> Result<Response, AppError> {
    let payload: CreateProductRequest = ctx.body_json()?;
    payload.validate()?;

    let product = ctx.db.create_row(&payload.name, payload.price).await?;
    info!("创建产品: {} ({})", product.name, product.id);

    ctx.json(&product)
}

/// DELETE /products/:id
pub async fn delete_product(ctx: RequestContext) -> Result<Response, AppError> {
    let id = ctx.db.delete_row(ctx.param("id")?).await?;
    info!("删除产品: {}", id);

    ctx.json(&DeletedProduct { id })
}

/// GET /health
pub async fn health_check(ctx: RequestContext) -> Result<Response, AppError> {
    ctx.json(&serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
