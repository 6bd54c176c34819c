//! OpenAPI 3.0 documentation
//!
//! The generated document is served at `/api/docs/openapi.json`.

use utoipa::OpenApi;

use crate::gateway::dto::{ErrorResponseDto, TransferRequestDto, TransferResponseDto};
use crate::gateway::handlers::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FundFlow Transfer API",
        version = "1.0.0",
        description = "Idempotent money transfer execution between bank accounts, \
                       with intra-bank and inter-bank routing."
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::create_transfer,
        crate::gateway::handlers::health_check,
    ),
    components(
        schemas(
            TransferRequestDto,
            TransferResponseDto,
            ErrorResponseDto,
            HealthResponse,
        )
    ),
    tags(
        (name = "Transfers", description = "Money transfer execution"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_includes_transfer_path() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().unwrap();
        assert!(json.contains("/api/transfers"));
        assert!(json.contains("TransferRequestDto"));
    }
}
