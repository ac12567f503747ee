// ドメインサービス
// 単一の集約に属さない在庫台帳のルールを実装

use crate::domain::error::DomainError;
use crate::domain::model::{Color, CottonPercentage, Sock};

/// 色と綿混率で検索した候補から、対象の靴下を一意に決定する
///
/// # Arguments
/// * `candidates` - ストアから取得した候補
/// * `color` - 検索した色
/// * `cotton_percentage` - 検索した綿混率
///
/// # Returns
/// * `Ok(Sock)` - 候補がちょうど1件
/// * `Err(DomainError::NotFound)` - 候補が0件
/// * `Err(DomainError::DuplicateSocks)` - 候補が複数件（自動で統合はしない）
pub fn select_unique_sock(
    mut candidates: Vec<Sock>,
    color: &Color,
    cotton_percentage: CottonPercentage,
) -> Result<Sock, DomainError> {
    match candidates.len() {
        0 => Err(DomainError::NotFound(format!(
            "靴下が見つかりません: color={}, cottonPart={}",
            color,
            cotton_percentage.value()
        ))),
        1 => Ok(candidates.remove(0)),
        n => Err(DomainError::DuplicateSocks(format!(
            "同じ色と綿混率の靴下が{}件登録されています: color={}, cottonPart={}",
            n,
            color,
            cotton_percentage.value()
        ))),
    }
}

/// 集計対象の在庫数を合計する
pub fn total_stock(socks: &[Sock]) -> u64 {
    socks.iter().map(|sock| u64::from(sock.stock())).sum()
}
