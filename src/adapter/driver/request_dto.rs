use crate::application::service::SockChanges;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 入庫・出庫用のリクエストDTO
/// 数量は負の値もそのまま受け取り、検証はサービス側で行う
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SockQuantityRequest {
    pub color: String,
    pub cotton_part: i32,
    pub quantity: i64,
}

/// 靴下登録用のリクエストDTO
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSockRequest {
    /// 省略時はストアが採番する
    pub id: Option<Uuid>,
    pub color: String,
    pub cotton_part: i32,
    pub stock: i64,
}

/// 靴下更新用のリクエストDTO
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSockRequest {
    pub id: Uuid,
    pub color: Option<String>,
    pub cotton_part: Option<i32>,
    pub stock: Option<i64>,
}

impl UpdateSockRequest {
    pub fn changes(self) -> SockChanges {
        SockChanges {
            color: self.color,
            cotton_percentage: self.cotton_part,
            stock: self.stock,
        }
    }
}

/// 在庫集計用のクエリパラメータ
/// 例: `?color=white&operation=moreThan&cottonPart=40`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountQueryParams {
    pub color: String,
    pub operation: String,
    pub cotton_part: i32,
}
