use crate::domain::error::DomainError;
use crate::domain::port::RepositoryError;

/// アプリケーション層のエラー型
/// ドメインエラーとリポジトリエラーをラップする
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApplicationError {
    /// ドメインエラー（ビジネスルール違反）
    #[error("Domain error: {0}")]
    DomainError(#[from] DomainError),
    /// リポジトリエラー（永続化の失敗）
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

impl ApplicationError {
    /// 同時更新の競合かどうか
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ApplicationError::RepositoryError(RepositoryError::Conflict(_))
        )
    }
}
