//! HTTP gateway
//!
//! Routes:
//! - `POST /api/transfers` executes a transfer
//! - `GET  /health` liveness and database reachability
//! - `GET  /api/docs/openapi.json` generated API document

pub mod dto;
pub mod handlers;
pub mod openapi;
pub mod state;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use utoipa::OpenApi;

use openapi::ApiDoc;
use state::AppState;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/transfers", post(handlers::create_transfer))
        .route("/health", get(handlers::health_check))
        .route("/api/docs/openapi.json", get(openapi_json))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MemoryAccountStore;
    use crate::ledger::MemoryLedger;
    use crate::payee::MemoryPayeeRegistry;
    use crate::seed;
    use crate::transfer::{LoggingSettlementGateway, TransferEngine};

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    fn test_router() -> Router {
        let accounts = Arc::new(MemoryAccountStore::new());
        let payees = Arc::new(MemoryPayeeRegistry::new());
        seed::seed_demo_data(&accounts, &payees);

        let engine = Arc::new(TransferEngine::new(
            accounts,
            payees,
            Arc::new(MemoryLedger::new()),
            Arc::new(LoggingSettlementGateway::new()),
            seed::DEMO_BANK_CODE,
        ));
        build_router(Arc::new(AppState::new(engine, None)))
    }

    async fn post_transfer(router: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(
                Request::post("/api/transfers")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_post_transfer_success() {
        let body = r#"{
            "requestId": "0b38fc21-5b4f-4c95-9e55-6fb3c1f4a27d",
            "payerAccNumber": "123456",
            "payeeAccNumber": "978654",
            "payeeBankCode": "A00001",
            "amount": "100.00",
            "currency": "GBP"
        }"#;
        let (status, json) = post_transfer(test_router(), body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "SUCCESS");
        assert_eq!(json["balance"], "900.00");
        assert_eq!(json["transferType"], "IntraBankTransfer");
        assert_eq!(json["duplicate"], false);
    }

    #[tokio::test]
    async fn test_post_transfer_insufficient_funds() {
        let body = r#"{
            "requestId": "19bc2b58-17d0-47b5-a1a9-d9e0d4232af3",
            "payerAccNumber": "123456",
            "payeeAccNumber": "978654",
            "payeeBankCode": "A00001",
            "amount": "5000.00",
            "currency": "GBP"
        }"#;
        let (status, json) = post_transfer(test_router(), body).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], "INSUFFICIENT_FUNDS");
        assert_eq!(json["requestId"], "19bc2b58-17d0-47b5-a1a9-d9e0d4232af3");
    }

    #[tokio::test]
    async fn test_post_transfer_bad_bank_code() {
        let body = r#"{
            "requestId": "3e2c1a54-8d7c-40f6-b1f7-1d0f3a9d6be1",
            "payerAccNumber": "123456",
            "payeeAccNumber": "978654",
            "payeeBankCode": "A1",
            "amount": "10.00",
            "currency": "GBP"
        }"#;
        let (status, json) = post_transfer(test_router(), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_health_without_database() {
        let response = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_openapi_endpoint_serves_document() {
        let response = test_router()
            .oneshot(
                Request::get("/api/docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
