mod sock_matcher;
mod sock_query_service;

pub use sock_matcher::SockMatcher;
pub use sock_query_service::SockQueryService;

use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::{
    Color, CottonComparison, CottonPercentage, OperationType, Quantity, Sock, SockId,
    TradingAction,
};
use crate::domain::port::{Logger, RepositoryError, SockRepository, StockMovementUnitOfWork};
use crate::domain::service::total_stock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 同時更新の競合時に入出庫・更新を試行する回数の既定値
pub const DEFAULT_MAX_MOVEMENT_ATTEMPTS: u32 = 3;

const COMPONENT: &str = "InventoryApplicationService";

/// 靴下の更新内容
/// `None` の項目は変更しない
#[derive(Debug, Clone, Default)]
pub struct SockChanges {
    pub color: Option<String>,
    pub cotton_percentage: Option<i32>,
    pub stock: Option<i64>,
}

/// 入出庫の結果
/// 確定後の靴下と、同じトランザクションで追記された取引記録
#[derive(Debug, Clone, PartialEq)]
pub struct StockMovementReceipt {
    sock: Sock,
    trading_action: TradingAction,
}

impl StockMovementReceipt {
    pub fn sock(&self) -> &Sock {
        &self.sock
    }

    pub fn trading_action(&self) -> &TradingAction {
        &self.trading_action
    }

    /// 適用した数量
    pub fn quantity(&self) -> u32 {
        self.trading_action.quantity()
    }
}

/// 在庫アプリケーションサービス
/// 入庫・出庫・登録・更新・削除・集計の窓口
pub struct InventoryApplicationService {
    sock_repository: Arc<dyn SockRepository>,
    unit_of_work: Arc<dyn StockMovementUnitOfWork>,
    matcher: SockMatcher,
    logger: Arc<dyn Logger>,
    max_movement_attempts: u32,
}

impl InventoryApplicationService {
    /// 新しい在庫アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `sock_repository` - 靴下リポジトリ
    /// * `unit_of_work` - 在庫更新と取引記録を同時に確定するポート
    /// * `logger` - ロガー
    pub fn new(
        sock_repository: Arc<dyn SockRepository>,
        unit_of_work: Arc<dyn StockMovementUnitOfWork>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            matcher: SockMatcher::new(sock_repository.clone()),
            sock_repository,
            unit_of_work,
            logger,
            max_movement_attempts: DEFAULT_MAX_MOVEMENT_ATTEMPTS,
        }
    }

    /// 競合時の試行回数を設定（最低1回）
    pub fn with_max_movement_attempts(mut self, attempts: u32) -> Self {
        self.max_movement_attempts = attempts.max(1);
        self
    }

    /// すべての靴下を取得
    pub async fn list_all(&self) -> Result<Vec<Sock>, ApplicationError> {
        let correlation_id = Uuid::new_v4();
        let result = self
            .sock_repository
            .find_all()
            .await
            .map_err(ApplicationError::from);
        self.report("list_all", correlation_id, result)
    }

    /// 指定色で綿混率が閾値より大きい（または小さい）靴下の在庫数を合計する
    ///
    /// # Arguments
    /// * `color` - 色
    /// * `operation` - 比較演算子名（"moreThan" または "lessThan"）
    /// * `cotton_percentage` - 閾値（0〜100）
    ///
    /// # Returns
    /// * `Ok(u64)` - 在庫数の合計
    /// * `Err(ApplicationError)` - 閾値が範囲外、演算子が不正（InvalidArgument）、
    ///   該当する靴下がない（NotFound）
    pub async fn count_by_filter(
        &self,
        color: &str,
        operation: &str,
        cotton_percentage: i32,
    ) -> Result<u64, ApplicationError> {
        let correlation_id = Uuid::new_v4();
        let result = self
            .try_count_by_filter(color, operation, cotton_percentage)
            .await;
        self.report("count_by_filter", correlation_id, result)
    }

    async fn try_count_by_filter(
        &self,
        color: &str,
        operation: &str,
        cotton_percentage: i32,
    ) -> Result<u64, ApplicationError> {
        let threshold = CottonPercentage::new(cotton_percentage)?;
        let comparison = CottonComparison::from_string(operation)?;
        let color = Color::new(color)?;

        let socks = self
            .sock_repository
            .find_by_color_and_cotton_compare(&color, threshold, comparison)
            .await?;
        if socks.is_empty() {
            return Err(DomainError::NotFound(format!(
                "条件に一致する靴下がありません: color={}, operation={}, cottonPart={}",
                color,
                comparison.as_str(),
                threshold.value()
            ))
            .into());
        }
        Ok(total_stock(&socks))
    }

    /// 入庫を登録する
    /// 対象の靴下が未登録の場合は作成せずNotFoundを返す
    pub async fn income(
        &self,
        color: &str,
        cotton_percentage: i32,
        quantity: i64,
    ) -> Result<StockMovementReceipt, ApplicationError> {
        let correlation_id = Uuid::new_v4();
        let result = self
            .handle_movement(
                color,
                cotton_percentage,
                quantity,
                OperationType::Income,
                correlation_id,
            )
            .await;
        self.report("income", correlation_id, result)
    }

    /// 出庫を登録する
    pub async fn outcome(
        &self,
        color: &str,
        cotton_percentage: i32,
        quantity: i64,
    ) -> Result<StockMovementReceipt, ApplicationError> {
        let correlation_id = Uuid::new_v4();
        let result = self
            .handle_movement(
                color,
                cotton_percentage,
                quantity,
                OperationType::Outcome,
                correlation_id,
            )
            .await;
        self.report("outcome", correlation_id, result)
    }

    async fn handle_movement(
        &self,
        color: &str,
        cotton_percentage: i32,
        quantity: i64,
        operation_type: OperationType,
        correlation_id: Uuid,
    ) -> Result<StockMovementReceipt, ApplicationError> {
        let color = Color::new(color)?;
        let cotton_percentage = CottonPercentage::new(cotton_percentage)?;
        let quantity = Quantity::new(quantity)?;

        let mut attempt = 1;
        loop {
            let mut sock = self
                .matcher
                .find_unique_sock(&color, cotton_percentage)
                .await?;
            sock.apply_movement(quantity, operation_type)?;
            let trading_action = TradingAction::record(&sock, quantity, operation_type);

            match self
                .unit_of_work
                .commit_movement(&sock, &trading_action)
                .await
            {
                Ok(committed) => {
                    self.logger.info(
                        COMPONENT,
                        &format!("{} committed", operation_type),
                        Some(correlation_id),
                        Some(movement_context(&committed, &trading_action)),
                    );
                    return Ok(StockMovementReceipt {
                        sock: committed,
                        trading_action,
                    });
                }
                Err(RepositoryError::Conflict(msg)) if attempt < self.max_movement_attempts => {
                    self.logger.debug(
                        COMPONENT,
                        &format!("Concurrent update detected, retrying: {}", msg),
                        Some(correlation_id),
                        Some(HashMap::from([
                            ("sock_id".to_string(), sock.id().to_string()),
                            ("attempt".to_string(), attempt.to_string()),
                        ])),
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// 新しい種類の靴下を登録する
    ///
    /// # Arguments
    /// * `id` - 靴下ID（省略時はストアが採番）
    /// * `color` - 色
    /// * `cotton_percentage` - 綿混率（0〜100）
    /// * `stock` - 初期在庫数
    ///
    /// # Returns
    /// * `Ok(Sock)` - 登録した靴下
    /// * `Err(ApplicationError)` - 入力が不正（InvalidArgument）、
    ///   IDまたは色と綿混率の組が既に存在する（AlreadyExists）
    pub async fn create_sock(
        &self,
        id: Option<SockId>,
        color: &str,
        cotton_percentage: i32,
        stock: i64,
    ) -> Result<Sock, ApplicationError> {
        let correlation_id = Uuid::new_v4();
        let result = self
            .try_create_sock(id, color, cotton_percentage, stock)
            .await;
        if let Ok(sock) = &result {
            self.logger.info(
                COMPONENT,
                "Sock created",
                Some(correlation_id),
                Some(sock_context(sock)),
            );
        }
        self.report("create_sock", correlation_id, result)
    }

    async fn try_create_sock(
        &self,
        id: Option<SockId>,
        color: &str,
        cotton_percentage: i32,
        stock: i64,
    ) -> Result<Sock, ApplicationError> {
        let color = Color::new(color)?;
        let cotton_percentage = CottonPercentage::new(cotton_percentage)?;
        let stock = Quantity::new(stock)?;

        if let Some(id) = id {
            if self.sock_repository.find_by_id(id).await?.is_some() {
                return Err(DomainError::AlreadyExists(format!(
                    "このIDの靴下は既に存在します: {}",
                    id
                ))
                .into());
            }
        }
        self.ensure_key_available(&color, cotton_percentage, None)
            .await?;

        let id = id.unwrap_or_else(|| self.sock_repository.next_identity());
        let sock = Sock::new(id, color, cotton_percentage, stock);
        // 確認後に同じIDや組が登録された場合もストアが挿入を拒否する
        match self.sock_repository.insert(&sock).await {
            Ok(()) => Ok(sock),
            Err(RepositoryError::Conflict(msg)) => Err(DomainError::AlreadyExists(format!(
                "靴下は既に登録されています: {} ({})",
                sock.id(),
                msg
            ))
            .into()),
            Err(err) => Err(err.into()),
        }
    }

    /// 靴下の色・綿混率・在庫数を更新する
    pub async fn update_sock(
        &self,
        id: SockId,
        changes: SockChanges,
    ) -> Result<Sock, ApplicationError> {
        let correlation_id = Uuid::new_v4();
        let result = self.try_update_sock(id, changes, correlation_id).await;
        if let Ok(sock) = &result {
            self.logger.info(
                COMPONENT,
                "Sock updated",
                Some(correlation_id),
                Some(sock_context(sock)),
            );
        }
        self.report("update_sock", correlation_id, result)
    }

    async fn try_update_sock(
        &self,
        id: SockId,
        changes: SockChanges,
        correlation_id: Uuid,
    ) -> Result<Sock, ApplicationError> {
        let color = changes.color.as_deref().map(Color::new).transpose()?;
        let cotton_percentage = changes
            .cotton_percentage
            .map(CottonPercentage::new)
            .transpose()?;
        let stock = changes.stock.map(Quantity::new).transpose()?;

        let mut attempt = 1;
        loop {
            let mut sock = self.find_existing(id).await?;
            let key_changed = color.as_ref().is_some_and(|c| c != sock.color())
                || cotton_percentage.is_some_and(|c| c != sock.cotton_percentage());

            if let Some(color) = &color {
                sock.change_color(color.clone());
            }
            if let Some(cotton_percentage) = cotton_percentage {
                sock.change_cotton_percentage(cotton_percentage);
            }
            if let Some(stock) = stock {
                sock.change_stock(stock);
            }

            if key_changed {
                self.ensure_key_available(sock.color(), sock.cotton_percentage(), Some(id))
                    .await?;
            }

            // 読み取り後に入出庫が確定していれば書き込まずに読み直す
            match self.sock_repository.update(&sock).await {
                Ok(updated) => return Ok(updated),
                Err(RepositoryError::Conflict(msg)) if attempt < self.max_movement_attempts => {
                    self.logger.debug(
                        COMPONENT,
                        &format!("Concurrent update detected, retrying: {}", msg),
                        Some(correlation_id),
                        Some(HashMap::from([
                            ("sock_id".to_string(), id.to_string()),
                            ("attempt".to_string(), attempt.to_string()),
                        ])),
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// 靴下を削除する
    /// 取引記録は残す
    ///
    /// # Returns
    /// * `Ok(Sock)` - 削除した靴下の最後の状態
    /// * `Err(ApplicationError)` - 靴下が見つからない（NotFound）
    pub async fn delete_sock(&self, id: SockId) -> Result<Sock, ApplicationError> {
        let correlation_id = Uuid::new_v4();
        let result = self.try_delete_sock(id).await;
        if let Ok(sock) = &result {
            self.logger.info(
                COMPONENT,
                "Sock deleted",
                Some(correlation_id),
                Some(sock_context(sock)),
            );
        }
        self.report("delete_sock", correlation_id, result)
    }

    async fn try_delete_sock(&self, id: SockId) -> Result<Sock, ApplicationError> {
        let sock = self.find_existing(id).await?;
        self.sock_repository.delete(&sock).await?;
        Ok(sock)
    }

    async fn find_existing(&self, id: SockId) -> Result<Sock, ApplicationError> {
        self.sock_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("靴下が見つかりません: {}", id)).into()
            })
    }

    /// 色と綿混率の組が他の靴下に使われていないことを確認する
    async fn ensure_key_available(
        &self,
        color: &Color,
        cotton_percentage: CottonPercentage,
        except: Option<SockId>,
    ) -> Result<(), ApplicationError> {
        let taken = self
            .sock_repository
            .find_by_color_and_cotton(color, cotton_percentage)
            .await?
            .iter()
            .any(|sock| Some(sock.id()) != except);
        if taken {
            return Err(DomainError::AlreadyExists(format!(
                "同じ色と綿混率の靴下が既に存在します: color={}, cottonPart={}",
                color,
                cotton_percentage.value()
            ))
            .into());
        }
        Ok(())
    }

    /// 失敗をログに残して結果をそのまま返す
    fn report<T>(
        &self,
        operation: &str,
        correlation_id: Uuid,
        result: Result<T, ApplicationError>,
    ) -> Result<T, ApplicationError> {
        if let Err(err) = &result {
            let context = HashMap::from([("operation".to_string(), operation.to_string())]);
            // 競合は再試行を使い切った結果なので警告扱い
            if matches!(err, ApplicationError::DomainError(_)) || err.is_conflict() {
                self.logger
                    .warn(COMPONENT, &err.to_string(), Some(correlation_id), Some(context));
            } else {
                self.logger
                    .error(COMPONENT, &err.to_string(), Some(correlation_id), Some(context));
            }
        }
        result
    }
}

fn sock_context(sock: &Sock) -> HashMap<String, String> {
    HashMap::from([
        ("sock_id".to_string(), sock.id().to_string()),
        ("color".to_string(), sock.color().to_string()),
        (
            "cotton_part".to_string(),
            sock.cotton_percentage().value().to_string(),
        ),
        ("stock".to_string(), sock.stock().to_string()),
    ])
}

fn movement_context(sock: &Sock, action: &TradingAction) -> HashMap<String, String> {
    let mut context = sock_context(sock);
    context.insert("trading_action_id".to_string(), action.id().to_string());
    context.insert("quantity".to_string(), action.quantity().to_string());
    context
}
