use proptest::prelude::*;
use std::sync::Arc;
use warehouse_sock_ledger::adapter::driven::{ConsoleLogger, InMemorySockStore};
use warehouse_sock_ledger::application::service::InventoryApplicationService;
use warehouse_sock_ledger::domain::error::DomainError;
use warehouse_sock_ledger::domain::model::{
    Color, CottonPercentage, OperationType, Quantity, Sock, SockId,
};
use warehouse_sock_ledger::domain::port::{LogLevel, SockRepository};

fn sock_with_stock(stock: u32) -> Sock {
    Sock::new(
        SockId::new(),
        Color::new("white").unwrap(),
        CottonPercentage::new(40).unwrap(),
        Quantity::new(i64::from(stock)).unwrap(),
    )
}

// 靴下の在庫変動のプロパティベーステスト
proptest! {
    /// 入庫で在庫数が減ることはない
    #[test]
    fn test_income_never_decreases_stock(
        stock in 0u32..1_000_000,
        quantity in 0i64..1_000_000,
    ) {
        let mut sock = sock_with_stock(stock);
        sock.apply_movement(Quantity::new(quantity).unwrap(), OperationType::Income).unwrap();

        prop_assert!(sock.stock() >= stock);
        prop_assert_eq!(i64::from(sock.stock()), i64::from(stock) + quantity);
    }

    /// 出庫は数量が在庫数を超えるときだけ失敗し、失敗しても在庫は変わらない
    #[test]
    fn test_outcome_fails_exactly_when_quantity_exceeds_stock(
        stock in 0u32..10_000,
        quantity in 0i64..20_000,
    ) {
        let mut sock = sock_with_stock(stock);
        let result = sock.apply_movement(Quantity::new(quantity).unwrap(), OperationType::Outcome);

        if quantity > i64::from(stock) {
            prop_assert!(matches!(result, Err(DomainError::NegativeStock(_))));
            prop_assert_eq!(sock.stock(), stock);
        } else {
            prop_assert!(result.is_ok());
            prop_assert_eq!(i64::from(sock.stock()), i64::from(stock) - quantity);
        }
    }

    /// 0〜100の綿混率だけが受け付けられる
    #[test]
    fn test_cotton_percentage_range(value in -1_000i32..1_000) {
        let result = CottonPercentage::new(value);
        if (0..=100).contains(&value) {
            prop_assert_eq!(i32::from(result.unwrap().value()), value);
        } else {
            prop_assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
        }
    }

    /// 負の数量は常に拒否される
    #[test]
    fn test_negative_quantity_is_rejected(value in i64::MIN..0) {
        prop_assert!(matches!(Quantity::new(value), Err(DomainError::InvalidArgument(_))));
    }

    /// 更新がなければ集計結果は何度呼んでも同じ
    #[test]
    fn test_count_by_filter_is_idempotent(
        stocks in proptest::collection::vec(0u32..1_000, 1..10),
        threshold in 0i32..=100,
        more_than in any::<bool>(),
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let store = Arc::new(InMemorySockStore::new());
            for (index, stock) in stocks.iter().enumerate() {
                let sock = Sock::new(
                    SockId::new(),
                    Color::new("white").unwrap(),
                    CottonPercentage::new(index as i32 * 10).unwrap(),
                    Quantity::new(i64::from(*stock)).unwrap(),
                );
                store.insert(&sock).await.unwrap();
            }
            let service = InventoryApplicationService::new(
                store.clone(),
                store,
                Arc::new(ConsoleLogger::with_min_level(LogLevel::Error)),
            );
            let operation = if more_than { "moreThan" } else { "lessThan" };

            let first = service.count_by_filter("white", operation, threshold).await;
            let second = service.count_by_filter("white", operation, threshold).await;
            assert_eq!(first, second);
        });
    }
}

#[test]
fn test_cotton_percentage_boundaries() {
    assert_eq!(CottonPercentage::new(0).unwrap().value(), 0);
    assert_eq!(CottonPercentage::new(100).unwrap().value(), 100);
    assert!(matches!(CottonPercentage::new(-1), Err(DomainError::InvalidArgument(_))));
    assert!(matches!(CottonPercentage::new(101), Err(DomainError::InvalidArgument(_))));
}
