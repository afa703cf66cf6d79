//! 核心错误处理模块
//!
//! 处理器返回 `AppError`，路由分发时记录服务端日志并转换为 HTTP 响应，
//! 单个请求的错误不会终止服务进程。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::app::product::store::StoreError;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("请求无效: {0}")]
    BadRequest(String),
    #[error("资源不存在: {0}")]
    NotFound(String),
    #[error("请求体过大: 上限 {0} 字节")]
    PayloadTooLarge(usize),
    #[error("存储错误: {0}")]
    Storage(String),
    #[error("JSON 编码错误: {0}")]
    Encoding(String),
    #[error("内部错误: {0}")]
    Internal(String),
}

/// 错误响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Storage(_) | AppError::Encoding(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 返回给客户端的错误码与消息，5xx 不暴露内部细节
    fn client_view(&self) -> (&'static str, String) {
        match self {
            AppError::BadRequest(msg) => ("BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::PayloadTooLarge(limit) => (
                "PAYLOAD_TOO_LARGE",
                format!("Request body exceeds {} bytes", limit),
            ),
            AppError::Storage(_) => ("STORAGE_ERROR", "Storage error".to_string()),
            AppError::Encoding(_) => ("ENCODING_ERROR", "Failed to encode response".to_string()),
            AppError::Internal(_) => ("INTERNAL_SERVER_ERROR", "Internal server error".to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, message) = self.client_view();

        let error_response = ErrorResponse {
            error: error.to_string(),
            message,
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, axum::Json(error_response)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(_, errors)| {
                errors.iter().map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| "Validation error".to_string())
                })
            })
            .collect();

        AppError::BadRequest(messages.join(", "))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Encoding(err.to_string())
    }
}
