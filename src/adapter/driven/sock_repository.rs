use crate::adapter::database_error::DatabaseError;
use crate::adapter::driven::trading_action_journal::insert_trading_action;
use crate::domain::model::{
    Color, CottonComparison, CottonPercentage, Sock, SockId, TradingAction,
};
use crate::domain::port::{RepositoryError, SockRepository, StockMovementUnitOfWork};
use async_trait::async_trait;

use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::{MySql, Pool, Row};

const SOCK_COLUMNS: &str = "id, color, cotton_part, stock, version";

/// MySQL靴下リポジトリ
/// socksテーブルへの永続化と、入出庫のトランザクション確定を担う
#[derive(Clone)]
pub struct MySqlSockRepository {
    pool: Pool<MySql>,
}

impl MySqlSockRepository {
    /// 新しいMySQL靴下リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

/// バージョンが一致する行だけを上書きし、バージョンを1つ進めるUPDATE文
fn sock_update_query(sock: &Sock) -> Query<'_, MySql, MySqlArguments> {
    sqlx::query(
        r#"
        UPDATE socks
        SET color = ?, cotton_part = ?, stock = ?, version = version + 1
        WHERE id = ? AND version = ?
        "#,
    )
    .bind(sock.color().as_str())
    .bind(sock.cotton_percentage().value())
    .bind(sock.stock())
    .bind(sock.id().to_string())
    .bind(sock.version())
}

fn stale_version(sock: &Sock) -> RepositoryError {
    RepositoryError::Conflict(format!(
        "靴下が他の処理で更新または削除されています: {} (version {})",
        sock.id(),
        sock.version()
    ))
}

fn sock_from_row(row: &MySqlRow) -> Result<Sock, RepositoryError> {
    let fetch_failed = |e: sqlx::Error| RepositoryError::FetchFailed(format!("靴下行の読み取りに失敗しました: {}", e));

    let id: String = row.try_get("id").map_err(fetch_failed)?;
    let id = SockId::from_string(&id)
        .map_err(|e| RepositoryError::FetchFailed(format!("靴下IDの解析に失敗しました: {}", e)))?;
    let color: String = row.try_get("color").map_err(fetch_failed)?;
    let color = Color::new(&color).map_err(|e| RepositoryError::FetchFailed(e.to_string()))?;
    let cotton_part: u8 = row.try_get("cotton_part").map_err(fetch_failed)?;
    let cotton_percentage = CottonPercentage::new(i32::from(cotton_part))
        .map_err(|e| RepositoryError::FetchFailed(e.to_string()))?;
    let stock: u32 = row.try_get("stock").map_err(fetch_failed)?;
    let version: u32 = row.try_get("version").map_err(fetch_failed)?;

    Ok(Sock::reconstruct(id, color, cotton_percentage, stock, version))
}

#[async_trait]
impl SockRepository for MySqlSockRepository {
    async fn find_all(&self) -> Result<Vec<Sock>, RepositoryError> {
        let sql = format!("SELECT {} FROM socks ORDER BY color ASC, cotton_part ASC", SOCK_COLUMNS);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx("靴下一覧の取得に失敗しました", e))?;

        rows.iter().map(sock_from_row).collect()
    }

    async fn find_by_id(&self, id: SockId) -> Result<Option<Sock>, RepositoryError> {
        let sql = format!("SELECT {} FROM socks WHERE id = ?", SOCK_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx("靴下の取得に失敗しました", e))?;

        row.as_ref().map(sock_from_row).transpose()
    }

    async fn find_by_color_and_cotton(
        &self,
        color: &Color,
        cotton_percentage: CottonPercentage,
    ) -> Result<Vec<Sock>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM socks WHERE color = ? AND cotton_part = ?",
            SOCK_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(color.as_str())
            .bind(cotton_percentage.value())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx("靴下の検索に失敗しました", e))?;

        rows.iter().map(sock_from_row).collect()
    }

    async fn find_by_color_and_cotton_compare(
        &self,
        color: &Color,
        cotton_percentage: CottonPercentage,
        comparison: CottonComparison,
    ) -> Result<Vec<Sock>, RepositoryError> {
        // 比較演算子は列挙型からのみ決まる
        let operator = match comparison {
            CottonComparison::GreaterThan => ">",
            CottonComparison::LessThan => "<",
        };
        let sql = format!(
            "SELECT {} FROM socks WHERE color = ? AND cotton_part {} ?",
            SOCK_COLUMNS, operator
        );
        let rows = sqlx::query(&sql)
            .bind(color.as_str())
            .bind(cotton_percentage.value())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx("靴下の集計対象の取得に失敗しました", e))?;

        rows.iter().map(sock_from_row).collect()
    }

    async fn insert(&self, sock: &Sock) -> Result<(), RepositoryError> {
        // 主キーまたは (color, cotton_part) の重複は一意制約違反 → Conflict になる
        sqlx::query(
            "INSERT INTO socks (id, color, cotton_part, stock, version) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(sock.id().to_string())
        .bind(sock.color().as_str())
        .bind(sock.cotton_percentage().value())
        .bind(sock.stock())
        .bind(sock.version())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx("靴下の登録に失敗しました", e))?;

        Ok(())
    }

    async fn update(&self, sock: &Sock) -> Result<Sock, RepositoryError> {
        // 読み取り時のバージョンと一致する場合だけ書き換える
        let updated = sock_update_query(sock)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx("靴下の更新に失敗しました", e))?;

        if updated.rows_affected() == 0 {
            return Err(stale_version(sock));
        }
        Ok(sock.with_next_version())
    }

    async fn delete(&self, sock: &Sock) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM socks WHERE id = ?")
            .bind(sock.id().to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx("靴下の削除に失敗しました", e))?;
        Ok(())
    }

    fn next_identity(&self) -> SockId {
        SockId::new()
    }
}

#[async_trait]
impl StockMovementUnitOfWork for MySqlSockRepository {
    async fn commit_movement(
        &self,
        sock: &Sock,
        action: &TradingAction,
    ) -> Result<Sock, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionError(format!("トランザクションの開始に失敗しました: {}", e)))?;

        let updated = sock_update_query(sock)
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::from_sqlx("在庫の更新に失敗しました", e))?;

        if updated.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| DatabaseError::TransactionError(format!("ロールバックに失敗しました: {}", e)))?;
            return Err(stale_version(sock));
        }

        insert_trading_action(&mut *tx, action).await?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionError(format!("入出庫の確定に失敗しました: {}", e)))?;

        Ok(sock.with_next_version())
    }
}
