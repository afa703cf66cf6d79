//! # 产品服务
//!
//! 基于自定义路由表的产品 CRUD HTTP 服务：
//! - `core`：路由分发、请求上下文、错误处理、中间件、服务器
//! - `app`：产品模型、数据访问接口与处理器
//! - `infrastructure`：PostgreSQL / 内存存储与日志
//! - `config`：环境变量与配置文件

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use crate::app::product::model::Product;
pub use crate::app::product::store::{Queries, StoreError};
pub use crate::config::{Config, ConfigError};
pub use crate::core::error::AppError;
pub use crate::core::server::Server;
