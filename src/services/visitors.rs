//! Visitor management service

use crate::{
    error::AppResult,
    models::visitor::{CreateVisitor, Visitor, VisitorDetails},
    repository::Repository,
};

#[derive(Clone)]
pub struct VisitorsService {
    repository: Repository,
}

impl VisitorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a new visitor
    pub async fn create(&self, visitor: CreateVisitor, created_by: i32) -> AppResult<Visitor> {
        self.repository.visitors.create(&visitor, created_by).await
    }

    /// Get visitor by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Visitor> {
        self.repository.visitors.get_by_id(id).await
    }

    /// List all visitors with creator details
    pub async fn list(&self) -> AppResult<Vec<VisitorDetails>> {
        self.repository.visitors.list().await
    }
}
