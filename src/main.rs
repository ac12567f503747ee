use warehouse_sock_ledger::adapter::driven::{
    ConsoleLogger, InMemorySockStore, MySqlSockRepository, MySqlTradingActionJournal,
};
use warehouse_sock_ledger::adapter::driver::rest_api::{create_router, AppStateInner};
use warehouse_sock_ledger::adapter::{DatabaseConfig, DatabaseMigration, ServerConfig, StorageBackend};
use warehouse_sock_ledger::application::service::{InventoryApplicationService, SockQueryService};
use warehouse_sock_ledger::domain::port::{
    Logger, SockRepository, StockMovementUnitOfWork, TradingActionJournal,
};

use sqlx::mysql::MySqlPoolOptions;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

const COMPONENT: &str = "main";

/// 選択した保存先に応じた3つのポート実装
struct Stores {
    sock_repository: Arc<dyn SockRepository>,
    unit_of_work: Arc<dyn StockMovementUnitOfWork>,
    journal: Arc<dyn TradingActionJournal>,
}

async fn build_stores(
    storage: StorageBackend,
    logger: Arc<dyn Logger>,
) -> Result<Stores, Box<dyn std::error::Error>> {
    match storage {
        StorageBackend::Memory => {
            logger.warn(
                COMPONENT,
                "インメモリストアを使用します（再起動で在庫は失われます）",
                None,
                None,
            );
            let store = Arc::new(InMemorySockStore::new());
            Ok(Stores {
                sock_repository: store.clone(),
                unit_of_work: store.clone(),
                journal: store,
            })
        }
        StorageBackend::MySql => {
            let config = DatabaseConfig::from_env()?;
            logger.info(
                COMPONENT,
                "データベース設定を読み込みました",
                None,
                Some(HashMap::from([
                    ("host".to_string(), config.host.clone()),
                    ("port".to_string(), config.port.to_string()),
                    ("database".to_string(), config.database.clone()),
                ])),
            );

            let pool = MySqlPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.connection_string())
                .await?;

            DatabaseMigration::new(pool.clone(), logger.clone())
                .run()
                .await?;

            let repository = Arc::new(MySqlSockRepository::new(pool.clone()));
            Ok(Stores {
                sock_repository: repository.clone(),
                unit_of_work: repository,
                journal: Arc::new(MySqlTradingActionJournal::new(pool)),
            })
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    let server_config = ServerConfig::from_env()?;
    let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::with_min_level(server_config.log_level));

    let stores = build_stores(server_config.storage, logger.clone()).await?;

    let inventory_service = InventoryApplicationService::new(
        stores.sock_repository.clone(),
        stores.unit_of_work,
        logger.clone(),
    )
    .with_max_movement_attempts(server_config.max_movement_attempts);
    let sock_query_service = SockQueryService::new(stores.sock_repository, stores.journal);

    let app_state = AppStateInner {
        inventory_service: Arc::new(inventory_service),
        sock_query_service: Arc::new(sock_query_service),
    };

    let app = create_router()
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(app_state);

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    logger.info(
        COMPONENT,
        &format!("REST APIサーバーが起動しました: http://{}", address),
        None,
        Some(HashMap::from([(
            "storage".to_string(),
            format!("{:?}", server_config.storage),
        )])),
    );

    axum::serve(listener, app).await?;

    Ok(())
}
