use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{OperationType, SockId, TradingAction, TradingActionId};
use crate::domain::port::{RepositoryError, TradingActionJournal};
use async_trait::async_trait;

use sqlx::mysql::MySqlRow;
use sqlx::{Executor, MySql, Pool, Row};

/// MySQL取引記録ジャーナル
/// trading_actionsテーブルへの追記専用ログ
#[derive(Clone)]
pub struct MySqlTradingActionJournal {
    pool: Pool<MySql>,
}

impl MySqlTradingActionJournal {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

/// 取引記録を1件挿入する
/// 入出庫のトランザクション内からも呼ばれる
pub(crate) async fn insert_trading_action<'e, E>(
    executor: E,
    action: &TradingAction,
) -> Result<(), DatabaseError>
where
    E: Executor<'e, Database = MySql>,
{
    sqlx::query(
        r#"
        INSERT INTO trading_actions (id, operation_time, operation_type, quantity, sock_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(action.id().to_string())
    .bind(action.operation_time())
    .bind(action.operation_type().to_string())
    .bind(action.quantity())
    .bind(action.sock_id().to_string())
    .execute(executor)
    .await
    .map_err(|e| DatabaseError::from_sqlx("取引記録の追記に失敗しました", e))?;

    Ok(())
}

fn trading_action_from_row(row: &MySqlRow) -> Result<TradingAction, RepositoryError> {
    let fetch_failed = |e: sqlx::Error| {
        RepositoryError::FetchFailed(format!("取引記録の読み取りに失敗しました: {}", e))
    };

    let id: String = row.try_get("id").map_err(fetch_failed)?;
    let id = TradingActionId::from_string(&id)
        .map_err(|e| RepositoryError::FetchFailed(format!("取引IDの解析に失敗しました: {}", e)))?;
    let operation_type: String = row.try_get("operation_type").map_err(fetch_failed)?;
    let operation_type = OperationType::from_string(&operation_type)
        .map_err(|e| RepositoryError::FetchFailed(e.to_string()))?;
    let sock_id: String = row.try_get("sock_id").map_err(fetch_failed)?;
    let sock_id = SockId::from_string(&sock_id)
        .map_err(|e| RepositoryError::FetchFailed(format!("靴下IDの解析に失敗しました: {}", e)))?;

    Ok(TradingAction::reconstruct(
        id,
        row.try_get("operation_time").map_err(fetch_failed)?,
        operation_type,
        row.try_get("quantity").map_err(fetch_failed)?,
        sock_id,
    ))
}

#[async_trait]
impl TradingActionJournal for MySqlTradingActionJournal {
    async fn append(&self, action: &TradingAction) -> Result<(), RepositoryError> {
        insert_trading_action(&self.pool, action).await?;
        Ok(())
    }

    async fn find_by_sock_id(&self, sock_id: SockId) -> Result<Vec<TradingAction>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, operation_time, operation_type, quantity, sock_id
            FROM trading_actions
            WHERE sock_id = ?
            ORDER BY operation_time ASC
            "#,
        )
        .bind(sock_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx("取引履歴の取得に失敗しました", e))?;

        rows.iter().map(trading_action_from_row).collect()
    }
}
