use crate::domain::port::RepositoryError;

/// データベースエラー型
/// データベース操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatabaseError {
    /// データベース接続エラー
    #[error("Database connection error: {0}")]
    ConnectionError(String),
    /// SQLクエリエラー
    #[error("Database query error: {0}")]
    QueryError(String),
    /// 一意制約違反
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),
    /// トランザクションの開始・確定に失敗
    #[error("Database transaction error: {0}")]
    TransactionError(String),
    /// マイグレーションエラー
    #[error("Migration error: {0}")]
    MigrationError(String),
}

impl DatabaseError {
    /// sqlxのエラーを文脈付きで分類する
    pub fn from_sqlx(context: &str, err: sqlx::Error) -> Self {
        let message = format!("{}: {}", context, err);
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DatabaseError::UniqueViolation(message)
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => DatabaseError::ConnectionError(message),
            _ => DatabaseError::QueryError(message),
        }
    }
}

/// DatabaseErrorからRepositoryErrorへの変換
impl From<DatabaseError> for RepositoryError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ConnectionError(msg) => RepositoryError::ConnectionFailed(msg),
            DatabaseError::QueryError(msg) => RepositoryError::OperationFailed(msg),
            DatabaseError::UniqueViolation(msg) => RepositoryError::Conflict(msg),
            DatabaseError::TransactionError(msg) => RepositoryError::OperationFailed(msg),
            DatabaseError::MigrationError(msg) => RepositoryError::OperationFailed(msg),
        }
    }
}
