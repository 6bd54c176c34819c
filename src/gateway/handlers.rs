//! HTTP handlers for the transfer API

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::transfer::TransferError;

use super::dto::{ErrorResponseDto, TransferRequestDto, TransferResponseDto};
use super::state::AppState;

fn error_response(status: StatusCode, body: ErrorResponseDto) -> axum::response::Response {
    (status, Json(body)).into_response()
}

fn transfer_error_response(e: &TransferError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error_response(status, ErrorResponseDto::from(e))
}

/// Execute a money transfer
///
/// POST /api/transfers
///
/// Retrying with the same requestId replays the recorded outcome with
/// `duplicate: true` instead of moving money again.
#[utoipa::path(
    post,
    path = "/api/transfers",
    request_body = TransferRequestDto,
    responses(
        (status = 200, description = "Transfer executed or replayed", body = TransferResponseDto),
        (status = 400, description = "Malformed request", body = ErrorResponseDto),
        (status = 404, description = "Unknown account or unregistered payee", body = ErrorResponseDto),
        (status = 409, description = "Request id is being processed concurrently", body = ErrorResponseDto),
        (status = 422, description = "Insufficient funds", body = ErrorResponseDto),
        (status = 500, description = "Transfer failed while processing", body = ErrorResponseDto)
    ),
    tag = "Transfers"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Json(dto): Json<TransferRequestDto>,
) -> axum::response::Response {
    let request_id = dto.request_id;

    let request = match dto.into_domain() {
        Ok(request) => request,
        Err(reason) => {
            tracing::warn!(request_id = %request_id, %reason, "rejected malformed transfer request");
            return error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponseDto::new("INVALID_REQUEST", reason, Some(request_id)),
            );
        }
    };

    match state.engine.execute(request).await {
        Ok(response) => (StatusCode::OK, Json(TransferResponseDto::from(response))).into_response(),
        Err(e) => {
            tracing::warn!(request_id = %request_id, code = e.code(), "transfer rejected: {e}");
            transfer_error_response(&e)
        }
    }
}

/// Health check response data
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    pub timestamp: chrono::DateTime<Utc>,
}

/// Health check endpoint
///
/// Pings the database when one is configured; in-memory deployments are
/// always healthy.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = ErrorResponseDto)
    ),
    tag = "System"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> axum::response::Response {
    if let Some(ref db) = state.db {
        if let Err(e) = db.health_check().await {
            tracing::error!("health check failed: {e}");
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponseDto::new("SERVICE_UNAVAILABLE", "database unreachable", None),
            );
        }
    }
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            timestamp: Utc::now(),
        }),
    )
        .into_response()
}
