//! 日志基础设施

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

pub struct Logger;

impl Logger {
    /// 初始化全局日志，RUST_LOG 优先于配置中的级别
    pub fn init(config: &LoggingConfig) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

        let registry = tracing_subscriber::registry().with(filter);

        // 重复初始化（如测试中）时忽略错误
        if config.compact {
            let _ = registry.with(fmt::layer().compact().with_target(false)).try_init();
        } else {
            let _ = registry.with(fmt::layer().with_thread_names(true)).try_init();
        }
    }
}
