//! Asset request endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::asset_request::{
        AssetRequest, AssetRequestQuery, DeleteRequests, SubmitAssetRequest, UpdateRequestStatus,
    },
    AppState,
};

use super::{ApiJson, ApiPath};

/// Response carrying a single request
#[derive(Serialize, ToSchema)]
pub struct RequestResponse {
    pub message: String,
    pub request: AssetRequest,
}

/// Bulk delete response
#[derive(Serialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
    /// Number of requests actually removed
    pub deleted: u64,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Submit a new asset request
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    request_body = SubmitAssetRequest,
    responses(
        (status = 201, description = "Request submitted", body = RequestResponse),
        (status = 400, description = "Invalid or duplicate request", body = crate::error::ErrorResponse)
    )
)]
pub async fn submit_request(
    State(state): State<AppState>,
    ApiJson(data): ApiJson<SubmitAssetRequest>,
) -> AppResult<(StatusCode, Json<RequestResponse>)> {
    let request = state.services.requests.submit(data).await?;
    Ok((
        StatusCode::CREATED,
        Json(RequestResponse {
            message: "Request submitted successfully".to_string(),
            request,
        }),
    ))
}

/// List asset requests
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    params(AssetRequestQuery),
    responses(
        (status = 200, description = "Matching requests", body = Vec<AssetRequest>)
    )
)]
pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<AssetRequestQuery>,
) -> AppResult<Json<Vec<AssetRequest>>> {
    let requests = state.services.requests.list(&query).await?;
    Ok(Json(requests))
}

/// Approve or reject a request
#[utoipa::path(
    put,
    path = "/requests/{id}",
    tag = "requests",
    params(("id" = i32, Path, description = "Request ID")),
    request_body = UpdateRequestStatus,
    responses(
        (status = 200, description = "Status updated", body = RequestResponse),
        (status = 400, description = "Invalid status", body = crate::error::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_request_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(data): ApiJson<UpdateRequestStatus>,
) -> AppResult<Json<RequestResponse>> {
    let request = state.services.requests.update_status(id, &data).await?;
    Ok(Json(RequestResponse {
        message: format!("Request {} successfully", request.status.as_str().to_lowercase()),
        request,
    }))
}

/// Delete selected requests
#[utoipa::path(
    delete,
    path = "/requests",
    tag = "requests",
    request_body = DeleteRequests,
    responses(
        (status = 200, description = "Requests deleted", body = DeleteResponse),
        (status = 400, description = "No request IDs provided", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_requests(
    State(state): State<AppState>,
    body: Option<ApiJson<DeleteRequests>>,
) -> AppResult<Json<DeleteResponse>> {
    // A missing or malformed body is treated as an empty selection
    let data = body
        .map(|ApiJson(data)| data)
        .unwrap_or(DeleteRequests { ids: None });

    let deleted = state.services.requests.delete_selected(&data).await?;
    Ok(Json(DeleteResponse {
        message: format!("{} request(s) deleted successfully", deleted),
        deleted,
    }))
}

/// Delete every request
#[utoipa::path(
    delete,
    path = "/requests/clear",
    tag = "requests",
    responses(
        (status = 200, description = "All requests cleared", body = MessageResponse)
    )
)]
pub async fn clear_requests(State(state): State<AppState>) -> AppResult<Json<MessageResponse>> {
    state.services.requests.clear_all().await?;
    Ok(Json(MessageResponse {
        message: "All requests cleared successfully".to_string(),
    }))
}
