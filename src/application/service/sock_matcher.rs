use crate::application::ApplicationError;
use crate::domain::model::{Color, CottonPercentage, Sock};
use crate::domain::port::SockRepository;
use crate::domain::service::select_unique_sock;
use std::sync::Arc;

/// 靴下マッチャー
/// 色と綿混率の組から、入出庫の対象となる靴下を一意に特定する
pub struct SockMatcher {
    sock_repository: Arc<dyn SockRepository>,
}

impl SockMatcher {
    pub fn new(sock_repository: Arc<dyn SockRepository>) -> Self {
        Self { sock_repository }
    }

    /// 色と綿混率が一致する靴下を1件だけ取得する
    ///
    /// # Returns
    /// * `Ok(Sock)` - 一致する靴下がちょうど1件
    /// * `Err(ApplicationError::DomainError(NotFound))` - 一致する靴下がない
    /// * `Err(ApplicationError::DomainError(DuplicateSocks))` - 一致する靴下が複数ある
    /// * `Err(ApplicationError::RepositoryError)` - 検索失敗
    pub async fn find_unique_sock(
        &self,
        color: &Color,
        cotton_percentage: CottonPercentage,
    ) -> Result<Sock, ApplicationError> {
        let candidates = self
            .sock_repository
            .find_by_color_and_cotton(color, cotton_percentage)
            .await?;
        Ok(select_unique_sock(candidates, color, cotton_percentage)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::driven::InMemorySockStore;
    use crate::domain::error::DomainError;
    use crate::domain::model::{Quantity, SockId};

    fn sock(color: &str, cotton: i32, stock: i64) -> Sock {
        Sock::new(
            SockId::new(),
            Color::new(color).unwrap(),
            CottonPercentage::new(cotton).unwrap(),
            Quantity::new(stock).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_find_unique_sock_found() {
        let store = Arc::new(InMemorySockStore::new());
        let white = sock("white", 40, 10);
        store.insert(&white).await.unwrap();
        store.insert(&sock("white", 41, 1)).await.unwrap();
        store.insert(&sock("red", 40, 1)).await.unwrap();

        let matcher = SockMatcher::new(store);
        let found = matcher
            .find_unique_sock(white.color(), white.cotton_percentage())
            .await
            .unwrap();
        assert_eq!(found.id(), white.id());
    }

    #[tokio::test]
    async fn test_find_unique_sock_not_found() {
        let store = Arc::new(InMemorySockStore::new());
        let matcher = SockMatcher::new(store);
        let result = matcher
            .find_unique_sock(&Color::new("blue").unwrap(), CottonPercentage::new(60).unwrap())
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::DomainError(DomainError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_find_unique_sock_duplicates() {
        let store = Arc::new(InMemorySockStore::new());
        store.insert(&sock("white", 40, 10)).await.unwrap();
        store.insert(&sock("white", 40, 2)).await.unwrap();

        let matcher = SockMatcher::new(store);
        let result = matcher
            .find_unique_sock(&Color::new("white").unwrap(), CottonPercentage::new(40).unwrap())
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::DomainError(DomainError::DuplicateSocks(_)))
        ));
    }
}
