//! Asset requests service

use chrono::Local;

use crate::{
    error::{AppError, AppResult},
    models::asset_request::{
        AssetRequest, AssetRequestQuery, DeleteRequests, RequestStatus, SubmitAssetRequest,
        UpdateRequestStatus,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Validate and store a new request. The request date window starts at
    /// the server's local date.
    pub async fn submit(&self, data: SubmitAssetRequest) -> AppResult<AssetRequest> {
        let new = data.into_new_request(Local::now().date_naive())?;

        if self.repository.requests.exists_duplicate(&new).await? {
            return Err(new.duplicate_error());
        }

        let request = self.repository.requests.create(&new).await?;
        tracing::info!(
            id = request.id,
            employee_id = %request.employee_id,
            asset = new.asset_label(),
            "Asset request submitted"
        );
        Ok(request)
    }

    /// List requests matching the query filters
    pub async fn list(&self, query: &AssetRequestQuery) -> AppResult<Vec<AssetRequest>> {
        self.repository
            .requests
            .list(query.status_filter(), query.search_filter())
            .await
    }

    /// Approve or reject a request
    pub async fn update_status(&self, id: i32, data: &UpdateRequestStatus) -> AppResult<AssetRequest> {
        let status = RequestStatus::parse_decision(data.status.as_deref().unwrap_or_default())?;

        let request = self.repository.requests.update_status(id, status).await?;
        tracing::info!(id, status = %status, "Asset request status updated");
        Ok(request)
    }

    /// Delete the selected requests, returning how many were removed
    pub async fn delete_selected(&self, data: &DeleteRequests) -> AppResult<u64> {
        let ids = match data.ids.as_deref() {
            Some(ids) if !ids.is_empty() => ids,
            _ => return Err(AppError::Validation("No request IDs provided".to_string())),
        };

        let deleted = self.repository.requests.delete_many(ids).await?;
        tracing::info!(requested = ids.len(), deleted, "Asset requests deleted");
        Ok(deleted)
    }

    /// Delete every request
    pub async fn clear_all(&self) -> AppResult<u64> {
        let deleted = self.repository.requests.clear().await?;
        tracing::info!(deleted, "All asset requests cleared");
        Ok(deleted)
    }
}
