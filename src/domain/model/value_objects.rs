use crate::domain::error::DomainError;
use crate::domain::validation::{validate_color, validate_cotton_percentage, validate_quantity};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// 靴下の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SockId(Uuid);

impl SockId {
    /// 新しい一意のSockIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから SockId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からSockIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for SockId {
    fn default() -> Self {
        Self::new()
    }
}

/// 取引記録の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingActionId(Uuid);

impl TradingActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TradingActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for TradingActionId {
    fn default() -> Self {
        Self::new()
    }
}

/// 靴下の色を表す値オブジェクト
/// 空文字は許可しない
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    pub fn new(value: &str) -> Result<Self, DomainError> {
        Ok(Self(validate_color(value)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 綿混率（0〜100）を表す値オブジェクト
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CottonPercentage(u8);

impl CottonPercentage {
    /// 範囲を検証して作成
    pub fn new(value: i32) -> Result<Self, DomainError> {
        Ok(Self(validate_cotton_percentage(value)?))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for CottonPercentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// 入出庫の数量を表す値オブジェクト
/// 0は有効な数量として扱う
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: i64) -> Result<Self, DomainError> {
        Ok(Self(validate_quantity(value)?))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

/// 取引の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    /// 入庫
    Income,
    /// 出庫
    Outcome,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_str = match self {
            OperationType::Income => "INCOME",
            OperationType::Outcome => "OUTCOME",
        };
        write!(f, "{}", type_str)
    }
}

impl OperationType {
    /// 文字列からOperationTypeを作成
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        match s {
            "INCOME" => Ok(OperationType::Income),
            "OUTCOME" => Ok(OperationType::Outcome),
            _ => Err(DomainError::InvalidArgument(format!(
                "無効な取引種別: {}",
                s
            ))),
        }
    }
}

/// 集計時の綿混率の比較方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CottonComparison {
    /// 指定値より大きい（"moreThan"）
    GreaterThan,
    /// 指定値より小さい（"lessThan"）
    LessThan,
}

impl CottonComparison {
    /// クエリパラメータの演算子名から作成
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        match s {
            "moreThan" => Ok(CottonComparison::GreaterThan),
            "lessThan" => Ok(CottonComparison::LessThan),
            _ => Err(DomainError::InvalidArgument(format!(
                "無効な比較演算子: {}（moreThan または lessThan を指定してください）",
                s
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CottonComparison::GreaterThan => "moreThan",
            CottonComparison::LessThan => "lessThan",
        }
    }

    /// 綿混率が閾値に対して条件を満たすか（境界値は含まない）
    pub fn matches(&self, candidate: CottonPercentage, threshold: CottonPercentage) -> bool {
        match self {
            CottonComparison::GreaterThan => candidate > threshold,
            CottonComparison::LessThan => candidate < threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sock_id_creation() {
        let id1 = SockId::new();
        let id2 = SockId::new();
        assert_ne!(id1, id2, "Each SockId should be unique");
    }

    #[test]
    fn test_sock_id_from_string_round_trip() {
        let id = SockId::new();
        let parsed = SockId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert!(SockId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_cotton_percentage_range() {
        assert!(CottonPercentage::new(0).is_ok());
        assert!(CottonPercentage::new(100).is_ok());
        assert!(CottonPercentage::new(-1).is_err());
        assert!(CottonPercentage::new(101).is_err());
    }

    #[test]
    fn test_quantity_rejects_negative() {
        assert_eq!(Quantity::new(0).unwrap().value(), 0);
        assert!(matches!(
            Quantity::new(-5),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_color_must_not_be_empty() {
        assert!(Color::new("").is_err());
        assert_eq!(Color::new("red").unwrap().as_str(), "red");
    }

    #[test]
    fn test_operation_type_from_string() {
        assert_eq!(OperationType::from_string("INCOME"), Ok(OperationType::Income));
        assert_eq!(OperationType::from_string("OUTCOME"), Ok(OperationType::Outcome));
        assert!(OperationType::from_string("income").is_err());
        assert_eq!(
            OperationType::from_string(&OperationType::Outcome.to_string()),
            Ok(OperationType::Outcome)
        );
    }

    #[test]
    fn test_cotton_comparison_from_string() {
        assert_eq!(
            CottonComparison::from_string("moreThan"),
            Ok(CottonComparison::GreaterThan)
        );
        assert_eq!(
            CottonComparison::from_string("lessThan"),
            Ok(CottonComparison::LessThan)
        );
        assert!(matches!(
            CottonComparison::from_string("equal"),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_cotton_comparison_is_strict() {
        let forty = CottonPercentage::new(40).unwrap();
        let fifty = CottonPercentage::new(50).unwrap();
        assert!(CottonComparison::GreaterThan.matches(fifty, forty));
        assert!(!CottonComparison::GreaterThan.matches(forty, forty));
        assert!(CottonComparison::LessThan.matches(forty, fifty));
        assert!(!CottonComparison::LessThan.matches(fifty, fifty));
    }
}
