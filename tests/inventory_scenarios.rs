// 在庫台帳の業務シナリオの統合テスト
// インメモリストアを使ってサービス層を通しで検証する

use std::sync::Arc;
use warehouse_sock_ledger::adapter::driven::{ConsoleLogger, InMemorySockStore};
use warehouse_sock_ledger::application::service::{
    InventoryApplicationService, SockChanges, SockQueryService,
};
use warehouse_sock_ledger::application::ApplicationError;
use warehouse_sock_ledger::domain::error::DomainError;
use warehouse_sock_ledger::domain::model::{
    Color, CottonPercentage, OperationType, Quantity, Sock, SockId,
};
use warehouse_sock_ledger::domain::port::{LogLevel, SockRepository};

struct Ledger {
    store: Arc<InMemorySockStore>,
    inventory: Arc<InventoryApplicationService>,
    queries: SockQueryService,
}

fn ledger() -> Ledger {
    let store = Arc::new(InMemorySockStore::new());
    let logger = Arc::new(ConsoleLogger::with_min_level(LogLevel::Warning));
    Ledger {
        inventory: Arc::new(InventoryApplicationService::new(
            store.clone(),
            store.clone(),
            logger,
        )),
        queries: SockQueryService::new(store.clone(), store.clone()),
        store,
    }
}

/// 一意制約を迂回して直接ストアに書き込む
async fn seed(store: &InMemorySockStore, color: &str, cotton: i32, stock: i64) -> Sock {
    let sock = Sock::new(
        SockId::new(),
        Color::new(color).unwrap(),
        CottonPercentage::new(cotton).unwrap(),
        Quantity::new(stock).unwrap(),
    );
    store.insert(&sock).await.unwrap();
    sock
}

fn domain_error<T: std::fmt::Debug>(result: Result<T, ApplicationError>) -> DomainError {
    match result {
        Err(ApplicationError::DomainError(err)) => err,
        other => panic!("expected domain error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_outcome_beyond_stock_is_rejected() {
    let ledger = ledger();
    let sock = seed(&ledger.store, "white", 40, 10).await;

    let err = domain_error(ledger.inventory.outcome("white", 40, 11).await);

    assert!(matches!(err, DomainError::NegativeStock(_)));
    assert_eq!(ledger.queries.get_sock_by_id(sock.id()).await.unwrap().stock(), 10);
    assert!(ledger.store.all_trading_actions().await.is_empty());
}

#[tokio::test]
async fn test_income_adds_stock_and_records_one_action() {
    let ledger = ledger();
    let sock = seed(&ledger.store, "white", 40, 10).await;

    let receipt = ledger.inventory.income("white", 40, 5).await.unwrap();
    assert_eq!(receipt.sock().stock(), 15);

    let history = ledger.queries.get_trading_history(sock.id()).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].operation_type(), OperationType::Income);
    assert_eq!(history[0].quantity(), 5);
    assert_eq!(history[0].sock_id(), sock.id());
}

#[tokio::test]
async fn test_duplicate_socks_block_movements() {
    let ledger = ledger();
    let first = seed(&ledger.store, "white", 40, 10).await;
    let second = seed(&ledger.store, "white", 40, 4).await;

    let income = domain_error(ledger.inventory.income("white", 40, 1).await);
    let outcome = domain_error(ledger.inventory.outcome("white", 40, 1).await);

    assert!(matches!(income, DomainError::DuplicateSocks(_)));
    assert!(matches!(outcome, DomainError::DuplicateSocks(_)));
    assert_eq!(ledger.queries.get_sock_by_id(first.id()).await.unwrap().stock(), 10);
    assert_eq!(ledger.queries.get_sock_by_id(second.id()).await.unwrap().stock(), 4);
    assert!(ledger.store.all_trading_actions().await.is_empty());
}

#[tokio::test]
async fn test_count_more_than_threshold_for_one_color() {
    let ledger = ledger();
    seed(&ledger.store, "white", 50, 10).await;
    seed(&ledger.store, "white", 20, 5).await;
    seed(&ledger.store, "red", 50, 20).await;

    assert_eq!(
        ledger.inventory.count_by_filter("white", "moreThan", 40).await,
        Ok(10)
    );
    assert_eq!(
        ledger.inventory.count_by_filter("white", "lessThan", 40).await,
        Ok(5)
    );
    // 閾値と同じ綿混率は含まない
    assert!(matches!(
        domain_error(ledger.inventory.count_by_filter("white", "moreThan", 50).await),
        DomainError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_create_list_update_delete_round_trip() {
    let ledger = ledger();

    let created = ledger
        .inventory
        .create_sock(None, "black", 80, 3)
        .await
        .unwrap();
    let listed = ledger.inventory.list_all().await.unwrap();
    assert!(listed.iter().any(|sock| sock.id() == created.id()));

    let updated = ledger
        .inventory
        .update_sock(
            created.id(),
            SockChanges {
                stock: Some(9),
                ..SockChanges::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.stock(), 9);
    assert_eq!(updated.color().as_str(), "black");

    ledger.inventory.delete_sock(created.id()).await.unwrap();
    let listed = ledger.inventory.list_all().await.unwrap();
    assert!(listed.iter().all(|sock| sock.id() != created.id()));
    assert!(matches!(
        domain_error(ledger.queries.get_sock_by_id(created.id()).await),
        DomainError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_history_outlives_deleted_sock() {
    let ledger = ledger();
    let sock = ledger
        .inventory
        .create_sock(None, "green", 30, 10)
        .await
        .unwrap();
    ledger.inventory.outcome("green", 30, 4).await.unwrap();
    ledger.inventory.income("green", 30, 2).await.unwrap();
    ledger.inventory.delete_sock(sock.id()).await.unwrap();

    let history = ledger.queries.get_trading_history(sock.id()).await.unwrap();
    let kinds: Vec<(OperationType, u32)> = history
        .iter()
        .map(|action| (action.operation_type(), action.quantity()))
        .collect();
    assert_eq!(
        kinds,
        vec![(OperationType::Outcome, 4), (OperationType::Income, 2)]
    );
}

#[tokio::test]
async fn test_concurrent_movements_keep_ledger_consistent() {
    let ledger = ledger();
    let sock = seed(&ledger.store, "white", 40, 100).await;
    let inventory = ledger.inventory.clone();

    let mut handles = Vec::new();
    for i in 0..20 {
        let inventory = inventory.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                inventory.income("white", 40, 3).await
            } else {
                inventory.outcome("white", 40, 2).await
            }
        }));
    }

    let mut committed = Vec::new();
    for handle in handles {
        if let Ok(receipt) = handle.await.unwrap() {
            committed.push(receipt.trading_action().clone());
        }
    }

    // 確定した取引だけが在庫に反映されている
    let expected: i64 = committed.iter().fold(100, |stock, action| {
        match action.operation_type() {
            OperationType::Income => stock + i64::from(action.quantity()),
            OperationType::Outcome => stock - i64::from(action.quantity()),
        }
    });
    let stored = ledger.queries.get_sock_by_id(sock.id()).await.unwrap();
    assert_eq!(i64::from(stored.stock()), expected);
    assert_eq!(
        ledger.queries.get_trading_history(sock.id()).await.unwrap().len(),
        committed.len()
    );
}
