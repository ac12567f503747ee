// 入力値の検証
// ストアへのアクセス前に実行される副作用のないチェック

use crate::domain::error::DomainError;

/// 綿混率の最小値
pub const MIN_COTTON_PERCENTAGE: i32 = 0;
/// 綿混率の最大値
pub const MAX_COTTON_PERCENTAGE: i32 = 100;

/// 綿混率が0〜100の範囲内かチェックする
///
/// # Returns
/// * `Ok(u8)` - 範囲内の綿混率
/// * `Err(DomainError::InvalidArgument)` - 範囲外
pub fn validate_cotton_percentage(value: i32) -> Result<u8, DomainError> {
    if !(MIN_COTTON_PERCENTAGE..=MAX_COTTON_PERCENTAGE).contains(&value) {
        return Err(DomainError::InvalidArgument(format!(
            "綿混率は{}から{}の範囲で指定してください: {}",
            MIN_COTTON_PERCENTAGE, MAX_COTTON_PERCENTAGE, value
        )));
    }
    Ok(value as u8)
}

/// 数量が0以上かチェックする
/// 0は有効（在庫は変化しないが取引として記録される）
///
/// # Returns
/// * `Ok(u32)` - 有効な数量
/// * `Err(DomainError::InvalidArgument)` - 負の値、または在庫として表現できない値
pub fn validate_quantity(value: i64) -> Result<u32, DomainError> {
    if value < 0 {
        return Err(DomainError::InvalidArgument(format!(
            "数量は0以上である必要があります: {}",
            value
        )));
    }
    u32::try_from(value).map_err(|_| {
        DomainError::InvalidArgument(format!("数量が大きすぎます: {}", value))
    })
}

/// 色が空でないかチェックする
pub fn validate_color(value: &str) -> Result<String, DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidArgument(
            "色は空にできません".to_string(),
        ));
    }
    Ok(value.to_string())
}
