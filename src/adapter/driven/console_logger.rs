use crate::domain::port::{LogLevel, Logger};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// ログエントリ
/// 在庫台帳の1行分の構造化ログ
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub component: String,
    pub message: String,
    pub correlation_id: Option<Uuid>,
    // 出力順を安定させるためにキー順で保持する
    pub context: BTreeMap<String, String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, component: &str, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            component: component.to_string(),
            message: message.to_string(),
            correlation_id: None,
            context: BTreeMap::new(),
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: Option<Uuid>) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    pub fn with_context(mut self, context: Option<HashMap<String, String>>) -> Self {
        if let Some(context) = context {
            self.context.extend(context);
        }
        self
    }

    /// 1行の文字列に整形する
    /// 例: `[2024-01-01 00:00:00.000 UTC] [INFO] [InventoryApplicationService] 入庫を確定しました [color=white, quantity=5]`
    pub fn format(&self) -> String {
        let mut line = format!(
            "[{}] [{}] [{}]",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f UTC"),
            level_label(self.level),
            self.component
        );

        if let Some(correlation_id) = self.correlation_id {
            line.push_str(&format!(" [correlation_id: {}]", correlation_id));
        }

        line.push(' ');
        line.push_str(&self.message);

        if !self.context.is_empty() {
            let pairs = self
                .context
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect::<Vec<_>>()
                .join(", ");
            line.push_str(&format!(" [{}]", pairs));
        }

        line
    }
}

fn level_label(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "DEBUG",
        LogLevel::Info => "INFO",
        LogLevel::Warning => "WARN",
        LogLevel::Error => "ERROR",
    }
}

fn severity(level: LogLevel) -> u8 {
    match level {
        LogLevel::Debug => 0,
        LogLevel::Info => 1,
        LogLevel::Warning => 2,
        LogLevel::Error => 3,
    }
}

/// ログレベル名を解釈する（大文字小文字は区別しない）
pub fn parse_log_level(value: &str) -> Option<LogLevel> {
    match value.trim().to_ascii_lowercase().as_str() {
        "debug" => Some(LogLevel::Debug),
        "info" => Some(LogLevel::Info),
        "warn" | "warning" => Some(LogLevel::Warning),
        "error" => Some(LogLevel::Error),
        _ => None,
    }
}

/// コンソールログ実装
/// WARN以下は標準出力、ERRORは標準エラー出力に書き出す
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Debug,
        }
    }

    /// 指定したレベル未満のログを捨てる
    pub fn with_min_level(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        severity(level) >= severity(self.min_level)
    }

    fn emit(
        &self,
        level: LogLevel,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    ) {
        if !self.is_enabled(level) {
            return;
        }

        let line = LogEntry::new(level, component, message)
            .with_correlation_id(correlation_id)
            .with_context(context)
            .format();

        match level {
            LogLevel::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for ConsoleLogger {
    fn debug(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    ) {
        self.emit(LogLevel::Debug, component, message, correlation_id, context);
    }

    fn info(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    ) {
        self.emit(LogLevel::Info, component, message, correlation_id, context);
    }

    fn warn(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    ) {
        self.emit(LogLevel::Warning, component, message, correlation_id, context);
    }

    fn error(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    ) {
        self.emit(LogLevel::Error, component, message, correlation_id, context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entry_format() {
        let correlation_id = Uuid::new_v4();
        let mut context = HashMap::new();
        context.insert("quantity".to_string(), "5".to_string());
        context.insert("color".to_string(), "white".to_string());

        let formatted = LogEntry::new(LogLevel::Info, "InventoryApplicationService", "入庫を確定しました")
            .with_correlation_id(Some(correlation_id))
            .with_context(Some(context))
            .format();

        assert!(formatted.contains("[INFO]"));
        assert!(formatted.contains("[InventoryApplicationService]"));
        assert!(formatted.contains(&format!("[correlation_id: {}]", correlation_id)));
        assert!(formatted.contains("入庫を確定しました"));
        assert!(formatted.ends_with("[color=white, quantity=5]"));
    }

    #[test]
    fn test_log_entry_without_context() {
        let formatted = LogEntry::new(LogLevel::Warning, "SockMatcher", "not found").format();

        assert!(formatted.contains("[WARN] [SockMatcher] not found"));
        assert!(!formatted.contains("correlation_id"));
    }

    #[test]
    fn test_min_level_filter() {
        let logger = ConsoleLogger::with_min_level(LogLevel::Warning);

        assert!(!logger.is_enabled(LogLevel::Debug));
        assert!(!logger.is_enabled(LogLevel::Info));
        assert!(logger.is_enabled(LogLevel::Warning));
        assert!(logger.is_enabled(LogLevel::Error));
        assert!(ConsoleLogger::new().is_enabled(LogLevel::Debug));
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level(" info "), Some(LogLevel::Info));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_console_logger_emits_all_levels() {
        let logger = ConsoleLogger::new();
        logger.debug("TestComponent", "debug", None, None);
        logger.info("TestComponent", "info", Some(Uuid::new_v4()), None);
        logger.warn("TestComponent", "warn", None, Some(HashMap::new()));
        logger.error("TestComponent", "error", None, None);
    }
}
