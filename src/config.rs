//! 服务配置
//!
//! 加载顺序：默认值 → 配置文件（`CONFIG_FILE` 或 `./config/config.toml`）→ 环境变量。
//! 数据库连接串由 `MODE` 决定读取哪个环境变量。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "./config/config.toml";

/// 运行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// 本地开发，读取 DATABASE_DEV_URL
    Dev,
    /// docker-compose 内部网络，读取 DATABASE_DOCKER_URL
    Docker,
    /// 不连接数据库，使用内存存储
    Memory,
}

impl Mode {
    pub fn from_env_value(value: &str) -> Self {
        match value {
            "DOCKER" => Mode::Docker,
            "MEMORY" => Mode::Memory,
            _ => Mode::Dev,
        }
    }

    /// 该模式下存放连接串的环境变量
    pub fn database_url_var(&self) -> Option<&'static str> {
        match self {
            Mode::Docker => Some("DATABASE_DOCKER_URL"),
            Mode::Dev => Some("DATABASE_DEV_URL"),
            Mode::Memory => None,
        }
    }
}

/// 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// 端口
    pub port: u16,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 连接串，通常来自环境变量而不是文件
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    /// 启动时自动建表
    pub auto_migrate: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
    pub compact: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Dev,
            http: HttpConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 20,
            acquire_timeout_seconds: 8,
            auto_migrate: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            compact: true,
        }
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("缺少环境变量: {0}")]
    MissingVar(&'static str),
    #[error("环境变量 {name} 的值无效: {value}")]
    InvalidVar { name: &'static str, value: String },
    #[error("无效的数据库连接串: {0}")]
    InvalidDatabaseUrl(#[source] sqlx::Error),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 从进程环境加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var("CONFIG_FILE").ok();
        Self::load_base(explicit.as_deref())?.with_env(|key| std::env::var(key).ok())
    }

    /// 读取基础配置
    ///
    /// 显式指定的文件必须存在；默认路径不存在时使用默认值。
    fn load_base(explicit: Option<&str>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load_from_file(DEFAULT_CONFIG_PATH)
            }
            None => Ok(Self::default()),
        }
    }

    /// 用环境变量覆盖配置
    ///
    /// `lookup` 返回变量值，测试中可替换为固定表。
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("MODE") {
            self.mode = Mode::from_env_value(&mode);
        }

        if let Some(var) = self.mode.database_url_var() {
            match lookup(var) {
                Some(url) if !url.is_empty() => self.database.url = Some(url),
                _ if self.database.url.is_some() => {}
                _ => return Err(ConfigError::MissingVar(var)),
            }
        }

        if let Some(port) = lookup("PORT") {
            self.http.port = parse_var("PORT", &port)?;
        }
        if let Some(max) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("DATABASE_MAX_CONNECTIONS", &max)?;
        }
        if let Some(flag) = lookup("AUTO_MIGRATE") {
            self.database.auto_migrate = parse_var("AUTO_MIGRATE", &flag)?;
        }

        self.validate()?;
        Ok(self)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation("数据库连接数必须大于0".to_string()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }

    /// 监听地址，如 0.0.0.0:8080
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.http.bind_address, self.http.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidVar {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.mode, Mode::Dev);
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.database.max_connections, 20);
        assert!(config.database.auto_migrate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_docker_mode_reads_docker_url() {
        let config = Config::default()
            .with_env(env(&[
                ("MODE", "DOCKER"),
                ("DATABASE_DOCKER_URL", "postgres://db:5432/app"),
                ("DATABASE_DEV_URL", "postgres://localhost:5432/app"),
            ]))
            .unwrap();

        assert_eq!(config.mode, Mode::Docker);
        assert_eq!(config.database.url.as_deref(), Some("postgres://db:5432/app"));
    }

    #[test]
    fn test_other_modes_read_dev_url() {
        for mode in [None, Some("dev"), Some("docker"), Some("PROD")] {
            let mut pairs = vec![("DATABASE_DEV_URL", "postgres://localhost:5432/app")];
            if let Some(m) = mode {
                pairs.push(("MODE", m));
            }
            let config = Config::default().with_env(env(&pairs)).unwrap();
            assert_eq!(config.mode, Mode::Dev);
            assert_eq!(
                config.database.url.as_deref(),
                Some("postgres://localhost:5432/app")
            );
        }
    }

    #[test]
    fn test_missing_database_url() {
        let err = Config::default().with_env(env(&[("MODE", "DOCKER")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("DATABASE_DOCKER_URL")));
    }

    #[test]
    fn test_memory_mode_needs_no_url() {
        let config = Config::default().with_env(env(&[("MODE", "MEMORY")])).unwrap();
        assert_eq!(config.mode, Mode::Memory);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::default()
            .with_env(env(&[("MODE", "MEMORY"), ("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name: "PORT", .. }));

        let err = Config::default()
            .with_env(env(&[("MODE", "MEMORY"), ("PORT", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");

        let err = Config::load_base(missing.to_str()).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_)));
    }

    #[test]
    fn test_missing_default_file_falls_back() {
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            return;
        }
        let config = Config::load_base(None).unwrap();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.mode, Mode::Dev);
    }

    #[test]
    fn test_explicit_config_file_is_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "mode = \"memory\"\n[http]\nport = 9100\n").unwrap();

        let config = Config::load_base(path.to_str()).unwrap();
        assert_eq!(config.mode, Mode::Memory);
        assert_eq!(config.http.port, 9100);
    }

    #[test]
    fn test_config_file_then_env() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [http]
            port = 9000

            [database]
            url = "postgres://file-host/app"
            max_connections = 5

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        let config = Config::load_from_file(&path)
            .unwrap()
            .with_env(env(&[("AUTO_MIGRATE", "false")]))
            .unwrap();

        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.bind_address, "0.0.0.0");
        assert_eq!(config.database.url.as_deref(), Some("postgres://file-host/app"));
        assert_eq!(config.database.max_connections, 5);
        assert!(!config.database.auto_migrate);
        assert_eq!(config.logging.level, "debug");
    }
}
