use chrono::{DateTime, Utc};

use crate::domain::model::{OperationType, Quantity, Sock, SockId, TradingActionId};

/// 取引記録
/// 在庫を変更した入出庫1件ごとの監査ログ。作成後は変更されない
#[derive(Debug, Clone, PartialEq)]
pub struct TradingAction {
    id: TradingActionId,
    operation_time: DateTime<Utc>,
    operation_type: OperationType,
    quantity: u32,
    sock_id: SockId,
}

impl TradingAction {
    /// 適用済みの入出庫から取引記録を作成
    /// 検証は行わない（呼び出し時点で入出庫は正当と判断済み）
    ///
    /// # Arguments
    /// * `sock` - 在庫を更新した靴下
    /// * `quantity` - 入出庫した数量
    /// * `operation_type` - 入庫または出庫
    pub fn record(sock: &Sock, quantity: Quantity, operation_type: OperationType) -> Self {
        Self {
            id: TradingActionId::new(),
            operation_time: Utc::now(),
            operation_type,
            quantity: quantity.value(),
            sock_id: sock.id(),
        }
    }

    /// データベースから取得したデータで取引記録を再構築
    pub fn reconstruct(
        id: TradingActionId,
        operation_time: DateTime<Utc>,
        operation_type: OperationType,
        quantity: u32,
        sock_id: SockId,
    ) -> Self {
        Self {
            id,
            operation_time,
            operation_type,
            quantity,
            sock_id,
        }
    }

    pub fn id(&self) -> TradingActionId {
        self.id
    }

    pub fn operation_time(&self) -> DateTime<Utc> {
        self.operation_time
    }

    pub fn operation_type(&self) -> OperationType {
        self.operation_type
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn sock_id(&self) -> SockId {
        self.sock_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Color, CottonPercentage};

    #[test]
    fn test_record_references_sock() {
        let sock = Sock::new(
            SockId::new(),
            Color::new("black").unwrap(),
            CottonPercentage::new(80).unwrap(),
            Quantity::new(3).unwrap(),
        );
        let before = Utc::now();
        let action = TradingAction::record(&sock, Quantity::new(3).unwrap(), OperationType::Outcome);

        assert_eq!(action.sock_id(), sock.id());
        assert_eq!(action.quantity(), 3);
        assert_eq!(action.operation_type(), OperationType::Outcome);
        assert!(action.operation_time() >= before);
    }

    #[test]
    fn test_each_record_has_unique_id() {
        let sock = Sock::new(
            SockId::new(),
            Color::new("black").unwrap(),
            CottonPercentage::new(80).unwrap(),
            Quantity::new(0).unwrap(),
        );
        let a = TradingAction::record(&sock, Quantity::new(0).unwrap(), OperationType::Income);
        let b = TradingAction::record(&sock, Quantity::new(0).unwrap(), OperationType::Income);
        assert_ne!(a.id(), b.id());
    }
}
