use crate::application::service::StockMovementReceipt;
use crate::domain::model::{Sock, TradingAction};
use serde::{Deserialize, Serialize};

/// 靴下用のレスポンスDTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SockResponse {
    pub id: String,
    pub color: String,
    pub cotton_part: u8,
    pub stock: u32,
}

/// 入庫・出庫結果用のレスポンスDTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SockQuantityResponse {
    pub id: String,
    pub color: String,
    pub cotton_part: u8,
    /// 今回適用した数量
    pub quantity: u32,
    /// 適用後の在庫数
    pub stock: u32,
}

/// 取引記録用のレスポンスDTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingActionResponse {
    pub id: String,
    /// RFC 3339形式（UTC）
    pub operation_time: String,
    pub operation_type: String,
    pub quantity: u32,
    pub sock_id: String,
}

impl SockResponse {
    pub fn from_sock(sock: &Sock) -> Self {
        Self {
            id: sock.id().to_string(),
            color: sock.color().to_string(),
            cotton_part: sock.cotton_percentage().value(),
            stock: sock.stock(),
        }
    }
}

impl SockQuantityResponse {
    pub fn from_receipt(receipt: &StockMovementReceipt) -> Self {
        let sock = receipt.sock();
        Self {
            id: sock.id().to_string(),
            color: sock.color().to_string(),
            cotton_part: sock.cotton_percentage().value(),
            quantity: receipt.quantity(),
            stock: sock.stock(),
        }
    }
}

impl TradingActionResponse {
    pub fn from_trading_action(action: &TradingAction) -> Self {
        Self {
            id: action.id().to_string(),
            operation_time: action.operation_time().to_rfc3339(),
            operation_type: action.operation_type().to_string(),
            quantity: action.quantity(),
            sock_id: action.sock_id().to_string(),
        }
    }
}
