//! 基础设施层：存储后端与日志

pub mod database;
pub mod logger;
pub mod memory;

use std::sync::Arc;
use tracing::{error, info};

use crate::app::product::store::{Queries, StoreError};
use crate::config::{Config, ConfigError};
use database::{parse_database_url, PgStore};
use memory::MemoryStore;

/// 打开存储失败
#[derive(Debug, thiserror::Error)]
pub enum OpenStoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 按运行模式打开产品存储
///
/// 连接串先解析，解析失败不会尝试连接。建表失败时连接池在返回前关闭。
pub async fn open_store(config: &Config) -> Result<Arc<dyn Queries>, OpenStoreError> {
    let Some(var) = config.mode.database_url_var() else {
        info!("MODE=MEMORY，使用内存存储");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let url = config
        .database
        .url
        .as_deref()
        .ok_or(ConfigError::MissingVar(var))?;
    let options = parse_database_url(url)?;

    let store = PgStore::connect(options, &config.database).await?;
    if config.database.auto_migrate {
        if let Err(e) = store.ensure_schema().await {
            error!("初始化数据表失败: {}", e);
            store.close().await;
            return Err(e.into());
        }
    }

    Ok(Arc::new(store))
}
