use crate::domain::model::{Color, CottonComparison, CottonPercentage, Sock, SockId, TradingAction};
use crate::domain::port::{
    RepositoryError, SockRepository, StockMovementUnitOfWork, TradingActionJournal,
};
use async_trait::async_trait;
use tokio::sync::Mutex;

#[derive(Default)]
struct StoreState {
    // 登録順を保持する
    socks: Vec<Sock>,
    trading_actions: Vec<TradingAction>,
}

impl StoreState {
    /// 読み取り時のバージョンのまま残っている靴下の位置を返す
    fn checked_index(&self, sock: &Sock) -> Result<usize, RepositoryError> {
        let index = self
            .socks
            .iter()
            .position(|stored| stored.id() == sock.id())
            .ok_or_else(|| {
                RepositoryError::Conflict(format!("靴下が削除されています: {}", sock.id()))
            })?;
        let stored_version = self.socks[index].version();
        if stored_version != sock.version() {
            return Err(RepositoryError::Conflict(format!(
                "靴下が他の処理で更新されています: {} (expected version {}, actual {})",
                sock.id(),
                sock.version(),
                stored_version
            )));
        }
        Ok(index)
    }
}

/// インメモリ在庫ストア
/// 靴下リポジトリ・取引記録ジャーナル・入出庫確定の3つのポートを
/// 1つのロックの下で実装する
///
/// 色と綿混率の一意性はストア側では強制しない
pub struct InMemorySockStore {
    state: Mutex<StoreState>,
}

impl InMemorySockStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
        }
    }

    /// 追記済みのすべての取引記録を取得
    pub async fn all_trading_actions(&self) -> Vec<TradingAction> {
        self.state.lock().await.trading_actions.clone()
    }
}

impl Default for InMemorySockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SockRepository for InMemorySockStore {
    async fn find_all(&self) -> Result<Vec<Sock>, RepositoryError> {
        Ok(self.state.lock().await.socks.clone())
    }

    async fn find_by_id(&self, id: SockId) -> Result<Option<Sock>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.socks.iter().find(|sock| sock.id() == id).cloned())
    }

    async fn find_by_color_and_cotton(
        &self,
        color: &Color,
        cotton_percentage: CottonPercentage,
    ) -> Result<Vec<Sock>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .socks
            .iter()
            .filter(|sock| sock.has_key(color, cotton_percentage))
            .cloned()
            .collect())
    }

    async fn find_by_color_and_cotton_compare(
        &self,
        color: &Color,
        cotton_percentage: CottonPercentage,
        comparison: CottonComparison,
    ) -> Result<Vec<Sock>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .socks
            .iter()
            .filter(|sock| {
                sock.color() == color
                    && comparison.matches(sock.cotton_percentage(), cotton_percentage)
            })
            .cloned()
            .collect())
    }

    async fn insert(&self, sock: &Sock) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        if state.socks.iter().any(|stored| stored.id() == sock.id()) {
            return Err(RepositoryError::Conflict(format!(
                "同じIDの靴下が既に存在します: {}",
                sock.id()
            )));
        }
        state.socks.push(sock.clone());
        Ok(())
    }

    async fn update(&self, sock: &Sock) -> Result<Sock, RepositoryError> {
        let mut state = self.state.lock().await;
        let index = state.checked_index(sock)?;
        let updated = sock.with_next_version();
        state.socks[index] = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, sock: &Sock) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        state.socks.retain(|stored| stored.id() != sock.id());
        Ok(())
    }

    fn next_identity(&self) -> SockId {
        SockId::new()
    }
}

#[async_trait]
impl TradingActionJournal for InMemorySockStore {
    async fn append(&self, action: &TradingAction) -> Result<(), RepositoryError> {
        self.state.lock().await.trading_actions.push(action.clone());
        Ok(())
    }

    async fn find_by_sock_id(&self, sock_id: SockId) -> Result<Vec<TradingAction>, RepositoryError> {
        let state = self.state.lock().await;
        let mut history: Vec<TradingAction> = state
            .trading_actions
            .iter()
            .filter(|action| action.sock_id() == sock_id)
            .cloned()
            .collect();
        history.sort_by_key(|action| action.operation_time());
        Ok(history)
    }
}

#[async_trait]
impl StockMovementUnitOfWork for InMemorySockStore {
    async fn commit_movement(
        &self,
        sock: &Sock,
        action: &TradingAction,
    ) -> Result<Sock, RepositoryError> {
        let mut state = self.state.lock().await;
        let index = state.checked_index(sock)?;

        let committed = sock.with_next_version();
        state.socks[index] = committed.clone();
        state.trading_actions.push(action.clone());
        Ok(committed)
    }
}
