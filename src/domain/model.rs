// ドメインモデル（エンティティと値オブジェクト）

mod value_objects;
mod sock;
mod trading_action;

pub use value_objects::{
    SockId, TradingActionId,
    Color, CottonPercentage, Quantity,
    OperationType,
    CottonComparison,
};

pub use sock::Sock;
pub use trading_action::TradingAction;
