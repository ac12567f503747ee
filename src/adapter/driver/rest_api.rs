use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    routing::{get, patch},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::adapter::driver::request_dto::{
    CountQueryParams, CreateSockRequest, SockQuantityRequest, UpdateSockRequest,
};
use crate::adapter::driver::response_dto::{
    SockQuantityResponse, SockResponse, TradingActionResponse,
};
use crate::application::service::{InventoryApplicationService, SockQueryService};
use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::SockId;
use crate::domain::port::RepositoryError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

// アプリケーションサービスを含む状態
pub type AppState = AppStateInner;

#[derive(Clone)]
pub struct AppStateInner {
    pub inventory_service: Arc<InventoryApplicationService>,
    pub sock_query_service: Arc<SockQueryService>,
}

// REST APIルーターを作成
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/socks",
            get(count_socks).post(create_sock).patch(update_sock),
        )
        .route("/api/socks/all", get(list_socks))
        .route("/api/socks/income", patch(register_income))
        .route("/api/socks/outcome", patch(register_outcome))
        .route("/api/socks/:id", get(get_sock).delete(delete_sock))
        .route("/api/socks/:id/trading-actions", get(get_trading_actions))
}

// ヘルスチェックエンドポイント
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// 靴下一覧取得エンドポイント
async fn list_socks(State(state): State<AppState>) -> ApiResult<Json<Vec<SockResponse>>> {
    let socks = state
        .inventory_service
        .list_all()
        .await
        .map_err(map_application_error)?;

    Ok(Json(socks.iter().map(SockResponse::from_sock).collect()))
}

// 在庫集計エンドポイント
async fn count_socks(
    State(state): State<AppState>,
    query: Result<Query<CountQueryParams>, QueryRejection>,
) -> ApiResult<Json<u64>> {
    let Query(params) = query.map_err(|rejection| bad_request(rejection.body_text()))?;

    let total = state
        .inventory_service
        .count_by_filter(&params.color, &params.operation, params.cotton_part)
        .await
        .map_err(map_application_error)?;

    Ok(Json(total))
}

// 入庫エンドポイント
async fn register_income(
    State(state): State<AppState>,
    body: Result<Json<SockQuantityRequest>, JsonRejection>,
) -> ApiResult<Json<SockQuantityResponse>> {
    let Json(request) = body.map_err(|rejection| bad_request(rejection.body_text()))?;

    let receipt = state
        .inventory_service
        .income(&request.color, request.cotton_part, request.quantity)
        .await
        .map_err(map_application_error)?;

    Ok(Json(SockQuantityResponse::from_receipt(&receipt)))
}

// 出庫エンドポイント
async fn register_outcome(
    State(state): State<AppState>,
    body: Result<Json<SockQuantityRequest>, JsonRejection>,
) -> ApiResult<Json<SockQuantityResponse>> {
    let Json(request) = body.map_err(|rejection| bad_request(rejection.body_text()))?;

    let receipt = state
        .inventory_service
        .outcome(&request.color, request.cotton_part, request.quantity)
        .await
        .map_err(map_application_error)?;

    Ok(Json(SockQuantityResponse::from_receipt(&receipt)))
}

// 靴下登録エンドポイント
async fn create_sock(
    State(state): State<AppState>,
    body: Result<Json<CreateSockRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SockResponse>)> {
    let Json(request) = body.map_err(|rejection| bad_request(rejection.body_text()))?;

    let sock = state
        .inventory_service
        .create_sock(
            request.id.map(SockId::from_uuid),
            &request.color,
            request.cotton_part,
            request.stock,
        )
        .await
        .map_err(map_application_error)?;

    Ok((StatusCode::CREATED, Json(SockResponse::from_sock(&sock))))
}

// 靴下更新エンドポイント
async fn update_sock(
    State(state): State<AppState>,
    body: Result<Json<UpdateSockRequest>, JsonRejection>,
) -> ApiResult<Json<SockResponse>> {
    let Json(request) = body.map_err(|rejection| bad_request(rejection.body_text()))?;
    let id = SockId::from_uuid(request.id);

    let sock = state
        .inventory_service
        .update_sock(id, request.changes())
        .await
        .map_err(map_application_error)?;

    Ok(Json(SockResponse::from_sock(&sock)))
}

// 靴下削除エンドポイント
async fn delete_sock(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<SockResponse>> {
    let id = parse_sock_id(id)?;

    let sock = state
        .inventory_service
        .delete_sock(id)
        .await
        .map_err(map_application_error)?;

    Ok(Json(SockResponse::from_sock(&sock)))
}

// 靴下詳細取得エンドポイント
async fn get_sock(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<SockResponse>> {
    let id = parse_sock_id(id)?;

    let sock = state
        .sock_query_service
        .get_sock_by_id(id)
        .await
        .map_err(map_application_error)?;

    Ok(Json(SockResponse::from_sock(&sock)))
}

// 取引履歴取得エンドポイント
async fn get_trading_actions(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Vec<TradingActionResponse>>> {
    let id = parse_sock_id(id)?;

    let history = state
        .sock_query_service
        .get_trading_history(id)
        .await
        .map_err(map_application_error)?;

    Ok(Json(
        history
            .iter()
            .map(TradingActionResponse::from_trading_action)
            .collect(),
    ))
}

fn parse_sock_id(path: Result<Path<Uuid>, PathRejection>) -> ApiResult<SockId> {
    let Path(id) = path.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "無効な靴下ID形式です".to_string(),
                code: "INVALID_UUID".to_string(),
            }),
        )
    })?;
    Ok(SockId::from_uuid(id))
}

fn bad_request(message: String) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            error: message,
            code: "INVALID_REQUEST".to_string(),
        }),
    )
}

// アプリケーションエラーをHTTPエラーにマッピング
fn map_application_error(err: ApplicationError) -> (StatusCode, Json<ApiError>) {
    match err {
        ApplicationError::DomainError(domain_err) => map_domain_error(domain_err),
        ApplicationError::RepositoryError(RepositoryError::Conflict(msg)) => (
            StatusCode::CONFLICT,
            Json(ApiError {
                error: msg,
                code: "CONFLICT".to_string(),
            }),
        ),
        ApplicationError::RepositoryError(repo_err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError {
                error: repo_err.to_string(),
                code: "REPOSITORY_ERROR".to_string(),
            }),
        ),
    }
}

// ドメインエラーを適切なHTTPステータスコードとエラーコードにマッピング
fn map_domain_error(domain_err: DomainError) -> (StatusCode, Json<ApiError>) {
    let (status, code) = match &domain_err {
        DomainError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
        DomainError::NegativeStock(_) => (StatusCode::BAD_REQUEST, "NEGATIVE_STOCK"),
        DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        DomainError::AlreadyExists(_) => (StatusCode::CONFLICT, "ALREADY_EXISTS"),
        DomainError::DuplicateSocks(_) => (StatusCode::CONFLICT, "DUPLICATE_SOCKS"),
    };

    (
        status,
        Json(ApiError {
            error: domain_err.message().to_string(),
            code: code.to_string(),
        }),
    )
}
