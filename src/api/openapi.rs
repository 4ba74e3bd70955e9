//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, requests};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Asset Requests API",
        version = "1.0.0",
        description = "Equipment request tracking REST API"
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Requests
        requests::submit_request,
        requests::list_requests,
        requests::update_request_status,
        requests::delete_requests,
        requests::clear_requests,
    ),
    components(
        schemas(
            crate::models::asset_request::AssetRequest,
            crate::models::asset_request::AssetType,
            crate::models::asset_request::RequestStatus,
            crate::models::asset_request::SubmitAssetRequest,
            crate::models::asset_request::UpdateRequestStatus,
            crate::models::asset_request::DeleteRequests,
            crate::models::asset_request::AssetRequestQuery,
            requests::RequestResponse,
            requests::DeleteResponse,
            requests::MessageResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "requests", description = "Asset request submission and review")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
