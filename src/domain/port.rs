// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::model::{Color, CottonComparison, CottonPercentage, Sock, SockId, TradingAction};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// ロガートレイト
/// ログ出力を抽象化するポート
pub trait Logger: Send + Sync {
    /// デバッグレベルのログを出力
    fn debug(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 情報レベルのログを出力
    fn info(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 警告レベルのログを出力
    fn warn(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// エラーレベルのログを出力
    fn error(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );
}

/// リポジトリエラー型
/// リポジトリ操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::enum_variant_names)]
pub enum RepositoryError {
    /// データベース接続に失敗
    ConnectionFailed(String),
    /// 操作に失敗
    OperationFailed(String),
    /// データの取得に失敗
    FetchFailed(String),
    /// 同時更新の競合（読み取り後に他の更新が確定した、または一意制約違反）
    Conflict(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            RepositoryError::OperationFailed(msg) => write!(f, "Operation failed: {}", msg),
            RepositoryError::FetchFailed(msg) => write!(f, "Fetch failed: {}", msg),
            RepositoryError::Conflict(msg) => write!(f, "Conflict: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// 靴下リポジトリトレイト
/// 靴下集約の永続化を抽象化する
#[async_trait]
pub trait SockRepository: Send + Sync {
    /// すべての靴下を取得する（順序は保証しない）
    async fn find_all(&self) -> Result<Vec<Sock>, RepositoryError>;

    /// 靴下IDで靴下を検索する
    ///
    /// # Returns
    /// * `Ok(Some(Sock))` - 靴下が見つかった
    /// * `Ok(None)` - 靴下が見つからなかった
    /// * `Err(RepositoryError)` - 検索失敗
    async fn find_by_id(&self, id: SockId) -> Result<Option<Sock>, RepositoryError>;

    /// 色と綿混率が完全一致する靴下をすべて取得する
    /// 正常なデータでは0件または1件になる
    async fn find_by_color_and_cotton(
        &self,
        color: &Color,
        cotton_percentage: CottonPercentage,
    ) -> Result<Vec<Sock>, RepositoryError>;

    /// 指定色で、綿混率が閾値より大きい（または小さい）靴下を取得する
    ///
    /// # Arguments
    /// * `color` - 色
    /// * `cotton_percentage` - 閾値（境界値は含まない）
    /// * `comparison` - 比較方向
    async fn find_by_color_and_cotton_compare(
        &self,
        color: &Color,
        cotton_percentage: CottonPercentage,
        comparison: CottonComparison,
    ) -> Result<Vec<Sock>, RepositoryError>;

    /// 新しい靴下を登録する
    /// 既存行を上書きすることはない
    ///
    /// # Returns
    /// * `Ok(())` - 登録成功
    /// * `Err(RepositoryError::Conflict)` - 同じIDの靴下が既に存在する
    ///   （一意制約を持つストアでは色と綿混率の組の重複も含む）
    async fn insert(&self, sock: &Sock) -> Result<(), RepositoryError>;

    /// 既存の靴下の全項目を上書きする
    ///
    /// 保存済みのバージョンが `sock.version()` と一致する場合のみ更新し、
    /// バージョンを1つ進める
    ///
    /// # Returns
    /// * `Ok(Sock)` - 更新後の靴下（新しいバージョン）
    /// * `Err(RepositoryError::Conflict)` - 読み取り後に他の更新が確定していた、
    ///   または靴下が削除されていた
    async fn update(&self, sock: &Sock) -> Result<Sock, RepositoryError>;

    /// 靴下を削除する
    /// 取引記録は削除しない
    async fn delete(&self, sock: &Sock) -> Result<(), RepositoryError>;

    /// 新しい一意の靴下IDを生成する
    fn next_identity(&self) -> SockId;
}

/// 取引記録ジャーナルトレイト
/// 追記専用。記録の更新・削除は提供しない
///
/// 入出庫に伴う記録は `StockMovementUnitOfWork::commit_movement` が在庫更新と
/// 同時に書き込む。`append` は在庫を伴わない単独の記録（データ移行など）用
#[async_trait]
pub trait TradingActionJournal: Send + Sync {
    /// 取引記録を追記する
    async fn append(&self, action: &TradingAction) -> Result<(), RepositoryError>;

    /// 指定された靴下の取引記録を取引日時の昇順で取得する
    /// 靴下が削除済みでも履歴は返す
    async fn find_by_sock_id(&self, sock_id: SockId) -> Result<Vec<TradingAction>, RepositoryError>;
}

/// 入出庫の確定を一つのトランザクションで行うポート
/// 在庫の更新と取引記録の追記は、両方確定するかどちらも確定しないかのいずれか
#[async_trait]
pub trait StockMovementUnitOfWork: Send + Sync {
    /// 在庫を更新した靴下と取引記録を同時に確定する
    ///
    /// 保存済みのバージョンが `sock.version()` と一致する場合のみ更新し、
    /// バージョンを1つ進める
    ///
    /// # Returns
    /// * `Ok(Sock)` - 確定後の靴下（新しいバージョン）
    /// * `Err(RepositoryError::Conflict)` - 読み取り後に他の更新が確定していた
    /// * `Err(RepositoryError)` - その他の失敗（何も確定しない）
    async fn commit_movement(
        &self,
        sock: &Sock,
        action: &TradingAction,
    ) -> Result<Sock, RepositoryError>;
}
