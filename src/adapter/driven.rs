// 駆動される側アダプター（リポジトリ実装、ロガーなど）

mod console_logger;
mod in_memory_store;
mod sock_repository;
mod trading_action_journal;

pub use console_logger::{parse_log_level, ConsoleLogger, LogEntry};
pub use in_memory_store::InMemorySockStore;
pub use sock_repository::MySqlSockRepository;
pub use trading_action_journal::MySqlTradingActionJournal;
