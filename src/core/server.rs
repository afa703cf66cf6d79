//! HTTP 服务器
//!
//! 所有请求进入同一个入口处理器，由自定义路由表分发。

use axum::{
    extract::{Request, State},
    middleware,
    response::Response,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::context::RequestContext;
use super::error::AppError;
use super::middleware::request_logging_middleware;
use super::router::Router;
use crate::app::product::store::Queries;
use crate::config::Config;
use crate::infrastructure::open_store;

#[derive(Clone)]
struct AppState {
    router: Arc<Router>,
    store: Arc<dyn Queries>,
}

#[derive(Default)]
pub struct Server {
    router: Router,
}

impl Server {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, AppError>> + Send + 'static,
    {
        self.router.get(path, handler);
    }

    pub fn post<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, AppError>> + Send + 'static,
    {
        self.router.post(path, handler);
    }

    pub fn put<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, AppError>> + Send + 'static,
    {
        self.router.put(path, handler);
    }

    pub fn delete<F, Fut>(&mut self, path: &str, handler: F)
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, AppError>> + Send + 'static,
    {
        self.router.delete(path, handler);
    }

    /// 组装 axum 应用，路由表此后只读
    pub fn into_router(self, store: Arc<dyn Queries>) -> axum::Router {
        let state = AppState {
            router: Arc::new(self.router),
            store,
        };

        axum::Router::new()
            .fallback(handle_request)
            .layer(middleware::from_fn(request_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// 打开存储并开始服务，直到收到退出信号或监听出错
    pub async fn run(self, config: &Config) -> anyhow::Result<()> {
        let store = open_store(config).await?;
        self.serve(&config.listen_addr(), store).await
    }

    /// 使用已打开的存储开始服务
    pub async fn serve(self, addr: &str, store: Arc<dyn Queries>) -> anyhow::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let app = self.into_router(store);

        info!("🚀 服务器运行在 http://{}", local_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("服务器已停止");
        Ok(())
    }
}

/// 入口处理器：每个请求构造新的上下文并交给路由表
async fn handle_request(State(state): State<AppState>, req: Request) -> Response {
    state.router.dispatch(req, state.store.clone()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("监听 Ctrl-C 失败: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("监听 SIGTERM 失败: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("收到退出信号，开始优雅关闭");
}
