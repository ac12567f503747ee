/// ドメイン層のエラー型
/// 在庫台帳のビジネスルール違反を表現する
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 無効な引数（例: 綿混率が0〜100の範囲外、負の数量）
    InvalidArgument(String),
    /// 対象の靴下が見つからない
    NotFound(String),
    /// 同じ色・綿混率の靴下が複数存在する（データ整合性違反）
    DuplicateSocks(String),
    /// 既に存在する（例: IDの重複）
    AlreadyExists(String),
    /// 出庫により在庫がマイナスになる
    NegativeStock(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DomainError::DuplicateSocks(msg) => write!(f, "Duplicate socks: {}", msg),
            DomainError::AlreadyExists(msg) => write!(f, "Already exists: {}", msg),
            DomainError::NegativeStock(msg) => write!(f, "Negative stock: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl DomainError {
    /// エラー本体のメッセージを取得
    pub fn message(&self) -> &str {
        match self {
            DomainError::InvalidArgument(msg)
            | DomainError::NotFound(msg)
            | DomainError::DuplicateSocks(msg)
            | DomainError::AlreadyExists(msg)
            | DomainError::NegativeStock(msg) => msg,
        }
    }
}
