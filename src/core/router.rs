//! 路由表与请求分发
//!
//! 路由按注册顺序保存，分发时线性扫描，方法与路径都匹配的第一条生效。
//! 路径逐字节比较；`:name` 段匹配一个非空段，百分号解码后作为路径参数捕获。
//! 没有匹配时返回 405，不调用任何处理器。

use axum::{
    body,
    extract::Request,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use http_body_util::LengthLimitError;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::context::RequestContext;
use super::error::AppError;
use super::response::text_response;
use crate::app::product::store::Queries;

/// 请求体大小上限
const MAX_BODY_BYTES: usize = 1024 * 1024;

pub type HandlerFuture = BoxFuture<'static, Result<Response, AppError>>;

/// 路由处理器
pub type Handler = Arc<dyn Fn(RequestContext) -> HandlerFuture + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// 路由路径模式
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    /// 不含参数段时为 None，直接整串比较
    segments: Option<Vec<Segment>>,
}

impl PathPattern {
    pub fn parse(path: &str) -> Self {
        let has_params = path.split('/').any(|s| s.len() > 1 && s.starts_with(':'));
        let segments = has_params.then(|| {
            path.split('/')
                .map(|s| match s.strip_prefix(':') {
                    Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                    _ => Segment::Static(s.to_string()),
                })
                .collect()
        });

        Self {
            raw: path.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// 匹配成功时返回捕获的参数
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let Some(segments) = &self.segments else {
            return (self.raw == path).then(HashMap::new);
        };

        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() != segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in segments.iter().zip(parts) {
            match segment {
                Segment::Static(s) if s == part => {}
                Segment::Param(name) if !part.is_empty() => {
                    let value = percent_decode_str(part).decode_utf8_lossy();
                    params.insert(name.clone(), value.into_owned());
                }
                _ => return None,
            }
        }
        Some(params)
    }
}

struct Route {
    method: Method,
    pattern: PathPattern,
    handler: Handler,
}

#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册路由，追加到路由表末尾
    pub fn route<F, Fut>(&mut self, method: Method, path: &str, handler: F)
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, AppError>> + Send + 'static,
    {
        let handler: Handler =
            Arc::new(move |ctx: RequestContext| -> HandlerFuture { Box::pin(handler(ctx)) });
        self.routes.push(Route {
            method,
            pattern: PathPattern::parse(path),
            handler,
        });
    }

    pub fn get<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, AppError>> + Send + 'static,
    {
        self.route(Method::GET, path, handler);
    }

    pub fn post<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, AppError>> + Send + 'static,
    {
        self.route(Method::POST, path, handler);
    }

    pub fn put<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, AppError>> + Send + 'static,
    {
        self.route(Method::PUT, path, handler);
    }

    pub fn delete<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, AppError>> + Send + 'static,
    {
        self.route(Method::DELETE, path, handler);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// 按注册顺序查找第一条匹配的路由
    fn find(&self, method: &Method, path: &str) -> Option<(&Route, HashMap<String, String>)> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| route.pattern.matches(path).map(|params| (route, params)))
    }

    /// 分发请求
    ///
    /// 处理器错误只影响当前请求：记录日志后转换为对应状态码的响应。
    pub async fn dispatch(&self, req: Request, db: Arc<dyn Queries>) -> Response {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let Some((route, params)) = self.find(&method, &path) else {
            warn!("method not allowed: {} {}", method, path);
            return text_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
        };

        debug!("匹配路由: {} {}", route.method, route.pattern.as_str());

        let (parts, body) = req.into_parts();
        let body = match body::to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("读取请求体失败: {} {}: {}", method, path, e);
                let err = if e.into_inner().is::<LengthLimitError>() {
                    AppError::PayloadTooLarge(MAX_BODY_BYTES)
                } else {
                    AppError::BadRequest("Unable to read request body".to_string())
                };
                return err.into_response();
            }
        };

        let ctx = RequestContext::new(parts, body, params, db);
        match (route.handler)(ctx).await {
            Ok(response) => response,
            Err(err) => {
                if err.status().is_server_error() {
                    error!("处理请求失败: {} {}: {}", method, path, err);
                } else {
                    warn!("请求被拒绝: {} {}: {}", method, path, err);
                }
                err.into_response()
            }
        }
    }
}
