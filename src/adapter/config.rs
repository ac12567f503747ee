use std::str::FromStr;

/// 設定エラー
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// 設定値を読み出す関数
/// 本番では環境変数、テストではHashMapを渡す
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// プロセスの環境変数
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for std::collections::HashMap<&str, &str> {
    fn get(&self, key: &str) -> Option<String> {
        std::collections::HashMap::get(self, key).map(|value| value.to_string())
    }
}

/// 未設定なら既定値を返す
pub(crate) fn string_or(source: &dyn ConfigSource, key: &str, default: &str) -> String {
    source.get(key).unwrap_or_else(|| default.to_string())
}

/// 未設定なら既定値、設定されていれば型変換して返す
pub(crate) fn parse_or<T>(source: &dyn ConfigSource, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match source.get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(format!("Invalid {}: {}", key, e))),
    }
}
