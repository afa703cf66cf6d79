//! 核心层：路由、请求上下文、错误与中间件

pub mod context;
pub mod error;
pub mod middleware;
pub mod response;
pub mod router;
pub mod server;
