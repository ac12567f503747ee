use crate::domain::error::DomainError;
use crate::domain::model::{Color, CottonPercentage, OperationType, Quantity, SockId};

/// 靴下集約
/// 色と綿混率で識別される靴下の種類と、その在庫数を管理する
#[derive(Debug, Clone, PartialEq)]
pub struct Sock {
    id: SockId,
    color: Color,
    cotton_percentage: CottonPercentage,
    stock: u32,
    version: u32,
}

impl Sock {
    /// 新しい靴下を作成
    ///
    /// # Arguments
    /// * `id` - 靴下ID
    /// * `color` - 色
    /// * `cotton_percentage` - 綿混率
    /// * `stock` - 初期在庫数
    pub fn new(
        id: SockId,
        color: Color,
        cotton_percentage: CottonPercentage,
        stock: Quantity,
    ) -> Self {
        Self {
            id,
            color,
            cotton_percentage,
            stock: stock.value(),
            version: 0,
        }
    }

    /// データベースから取得したデータで靴下を再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(
        id: SockId,
        color: Color,
        cotton_percentage: CottonPercentage,
        stock: u32,
        version: u32,
    ) -> Self {
        Self {
            id,
            color,
            cotton_percentage,
            stock,
            version,
        }
    }

    /// 靴下IDを取得
    pub fn id(&self) -> SockId {
        self.id
    }

    /// 色を取得
    pub fn color(&self) -> &Color {
        &self.color
    }

    /// 綿混率を取得
    pub fn cotton_percentage(&self) -> CottonPercentage {
        self.cotton_percentage
    }

    /// 在庫数を取得
    pub fn stock(&self) -> u32 {
        self.stock
    }

    /// 楽観的排他制御用のバージョンを取得
    pub fn version(&self) -> u32 {
        self.version
    }

    /// 色と綿混率が一致するか
    pub fn has_key(&self, color: &Color, cotton_percentage: CottonPercentage) -> bool {
        &self.color == color && self.cotton_percentage == cotton_percentage
    }

    /// 入出庫を在庫に適用する
    ///
    /// # Arguments
    /// * `quantity` - 検証済みの数量
    /// * `operation_type` - 入庫または出庫
    ///
    /// # Returns
    /// * `Ok(())` - 適用成功
    /// * `Err(DomainError::NegativeStock)` - 出庫数が在庫数を超える
    /// * `Err(DomainError::InvalidArgument)` - 入庫により在庫数が上限を超える
    pub fn apply_movement(
        &mut self,
        quantity: Quantity,
        operation_type: OperationType,
    ) -> Result<(), DomainError> {
        match operation_type {
            OperationType::Income => {
                self.stock = self.stock.checked_add(quantity.value()).ok_or_else(|| {
                    DomainError::InvalidArgument(format!(
                        "在庫数が上限を超えます: {} + {}",
                        self.stock,
                        quantity.value()
                    ))
                })?;
            }
            OperationType::Outcome => {
                if !self.has_available_stock(quantity) {
                    return Err(DomainError::NegativeStock(format!(
                        "出庫数が在庫数を超えています: 在庫 {}, 出庫 {}",
                        self.stock,
                        quantity.value()
                    )));
                }
                self.stock -= quantity.value();
            }
        }
        Ok(())
    }

    /// 指定された数量の在庫が利用可能かチェック
    pub fn has_available_stock(&self, quantity: Quantity) -> bool {
        self.stock >= quantity.value()
    }

    /// 色を変更
    pub fn change_color(&mut self, color: Color) {
        self.color = color;
    }

    /// 綿混率を変更
    pub fn change_cotton_percentage(&mut self, cotton_percentage: CottonPercentage) {
        self.cotton_percentage = cotton_percentage;
    }

    /// 在庫数を直接設定（棚卸しなどの修正用）
    pub fn change_stock(&mut self, stock: Quantity) {
        self.stock = stock.value();
    }

    /// 永続化後のバージョンを持つコピーを返す
    pub fn with_next_version(&self) -> Self {
        Self {
            version: self.version.wrapping_add(1),
            ..self.clone()
        }
    }
}
