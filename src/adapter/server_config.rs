use crate::adapter::config::{parse_or, string_or, ConfigError, ConfigSource, EnvSource};
use crate::adapter::driven::parse_log_level;
use crate::application::service::DEFAULT_MAX_MOVEMENT_ATTEMPTS;
use crate::domain::port::LogLevel;

/// 在庫の保存先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MySql,
    /// プロセス内のみ（再起動で消える）
    Memory,
}

impl StorageBackend {
    pub fn from_string(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(StorageBackend::MySql),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::InvalidValue(format!(
                "Invalid SOCK_STORE: {} (expected mysql or memory)",
                other
            ))),
        }
    }
}

/// HTTPサーバーと在庫サービスの設定
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub max_movement_attempts: u32,
    pub log_level: LogLevel,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&EnvSource)
    }

    pub fn from_source(source: &dyn ConfigSource) -> Result<Self, ConfigError> {
        let storage = match source.get("SOCK_STORE") {
            Some(value) => StorageBackend::from_string(&value)?,
            None => StorageBackend::MySql,
        };

        let max_movement_attempts =
            parse_or(source, "MOVEMENT_MAX_ATTEMPTS", DEFAULT_MAX_MOVEMENT_ATTEMPTS)?;
        if max_movement_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "MOVEMENT_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        let log_level = match source.get("LOG_LEVEL") {
            Some(value) => parse_log_level(&value).ok_or_else(|| {
                ConfigError::InvalidValue(format!("Invalid LOG_LEVEL: {}", value))
            })?,
            None => LogLevel::Info,
        };

        Ok(Self {
            host: string_or(source, "SERVER_HOST", "0.0.0.0"),
            port: parse_or(source, "SERVER_PORT", 8080u16)?,
            storage,
            max_movement_attempts,
            log_level,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
