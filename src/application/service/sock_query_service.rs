use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::{Sock, SockId, TradingAction};
use crate::domain::port::{SockRepository, TradingActionJournal};
use std::sync::Arc;

/// 靴下クエリサービス
/// 読み取り専用の靴下・取引履歴の参照を提供する
pub struct SockQueryService {
    sock_repository: Arc<dyn SockRepository>,
    journal: Arc<dyn TradingActionJournal>,
}

impl SockQueryService {
    /// 新しい靴下クエリサービスを作成
    ///
    /// # Arguments
    /// * `sock_repository` - 靴下リポジトリ
    /// * `journal` - 取引記録ジャーナル
    pub fn new(
        sock_repository: Arc<dyn SockRepository>,
        journal: Arc<dyn TradingActionJournal>,
    ) -> Self {
        Self {
            sock_repository,
            journal,
        }
    }

    /// 靴下IDで靴下を取得
    ///
    /// # Returns
    /// * `Ok(Sock)` - 靴下が見つかった
    /// * `Err(ApplicationError)` - 見つからない（NotFound）または取得失敗
    pub async fn get_sock_by_id(&self, id: SockId) -> Result<Sock, ApplicationError> {
        self.sock_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("靴下が見つかりません: {}", id)).into()
            })
    }

    /// 靴下の取引履歴を取引日時の昇順で取得
    /// 削除済みの靴下でも履歴があれば返す
    ///
    /// # Returns
    /// * `Ok(Vec<TradingAction>)` - 取引履歴（靴下が存在し取引がない場合は空）
    /// * `Err(ApplicationError)` - 靴下も履歴も存在しない（NotFound）または取得失敗
    pub async fn get_trading_history(
        &self,
        sock_id: SockId,
    ) -> Result<Vec<TradingAction>, ApplicationError> {
        let history = self.journal.find_by_sock_id(sock_id).await?;
        if history.is_empty() && self.sock_repository.find_by_id(sock_id).await?.is_none() {
            return Err(DomainError::NotFound(format!(
                "靴下が見つかりません: {}",
                sock_id
            ))
            .into());
        }
        Ok(history)
    }
}
