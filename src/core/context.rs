//! 请求上下文
//!
//! 每个请求构造一次，携带请求内容、路径参数和共享的产品存储。

use axum::{
    body::Bytes,
    http::{request::Parts, Method, StatusCode, Uri},
    response::Response,
};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::error::AppError;
use super::response::json_response;
use crate::app::product::store::Queries;

pub struct RequestContext {
    parts: Parts,
    body: Bytes,
    params: HashMap<String, String>,
    pub db: Arc<dyn Queries>,
}

impl RequestContext {
    pub fn new(
        parts: Parts,
        body: Bytes,
        params: HashMap<String, String>,
        db: Arc<dyn Queries>,
    ) -> Self {
        Self {
            parts,
            body,
            params,
            db,
        }
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// 路径参数，如 `/products/:id` 中的 `id`
    pub fn param(&self, name: &str) -> Result<&str, AppError> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AppError::BadRequest(format!("Missing path parameter: {}", name)))
    }

    /// 解析 JSON 请求体
    pub fn body_json<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))
    }

    /// 200 JSON 响应
    pub fn json<T: Serialize + ?Sized>(&self, data: &T) -> Result<Response, AppError> {
        json_response(StatusCode::OK, data)
    }

    pub fn json_with_status<T: Serialize + ?Sized>(
        &self,
        status: StatusCode,
        data: &T,
    ) -> Result<Response, AppError> {
        json_response(status, data)
    }
}
