//! 核心响应处理模块

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use serde::Serialize;

use super::error::AppError;

/// 序列化为 JSON 响应，Content-Type 为 application/json
pub fn json_response<T: Serialize + ?Sized>(
    status: StatusCode,
    data: &T,
) -> Result<Response, AppError> {
    let bytes = serde_json::to_vec(data)?;

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// 纯文本响应
pub fn text_response(status: StatusCode, text: &'static str) -> Response {
    let mut response = Response::new(Body::from(text));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
