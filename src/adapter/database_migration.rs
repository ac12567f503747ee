use crate::adapter::database_error::DatabaseError;
use crate::domain::port::Logger;
use sqlx::{MySql, Pool};
use std::sync::Arc;

const COMPONENT: &str = "DatabaseMigration";

/// 適用順に並べたマイグレーション
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_create_socks_table",
        include_str!("../../migrations/001_create_socks_table.sql"),
    ),
    (
        "002_create_trading_actions_table",
        include_str!("../../migrations/002_create_trading_actions_table.sql"),
    ),
];

/// データベースマイグレーションを管理する構造体
pub struct DatabaseMigration {
    pool: Pool<MySql>,
    logger: Arc<dyn Logger>,
}

impl DatabaseMigration {
    pub fn new(pool: Pool<MySql>, logger: Arc<dyn Logger>) -> Self {
        Self { pool, logger }
    }

    /// マイグレーションを実行
    /// CREATE TABLE IF NOT EXISTS のみなので何度実行してもよい
    pub async fn run(&self) -> Result<(), DatabaseError> {
        for (name, sql) in MIGRATIONS {
            self.logger
                .debug(COMPONENT, &format!("Running migration {}", name), None, None);
            sqlx::query(sql).execute(&self.pool).await.map_err(|e| {
                DatabaseError::MigrationError(format!("Migration {} failed: {}", name, e))
            })?;
        }

        self.logger.info(
            COMPONENT,
            &format!("{} migrations applied", MIGRATIONS.len()),
            None,
            None,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered() {
        let names: Vec<&str> = MIGRATIONS.iter().map(|(name, _)| *name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_socks_table_enforces_unique_key() {
        let (_, socks) = MIGRATIONS[0];
        assert!(socks.contains("CREATE TABLE IF NOT EXISTS socks"));
        assert!(socks.contains("UNIQUE KEY uk_socks_color_cotton_part (color, cotton_part)"));
        assert!(socks.contains("version"));
    }

    #[test]
    fn test_trading_actions_table_has_no_cascade() {
        let (_, trading_actions) = MIGRATIONS[1];
        assert!(trading_actions.contains("CREATE TABLE IF NOT EXISTS trading_actions"));
        assert!(!trading_actions.contains("ON DELETE CASCADE"));
    }
}
