//! Business logic services

pub mod requests;

use crate::{error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub requests: requests::RequestsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            requests: requests::RequestsService::new(repository.clone()),
            repository,
        }
    }

    /// Check that the database is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
