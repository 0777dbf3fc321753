// ==========================================
// CRM Sales Reconciliation - Order Archive Repository Trait
// ==========================================
// Responsibility: data access contract for the historical order archive
// Red line: repository contains no business rules, only data access;
// the archive is insert-only for this pipeline
// ==========================================

use crate::domain::HistoricalOrder;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::collections::HashSet;

// ==========================================
// OrderArchiveRepository Trait
// ==========================================
// Implementor: OrderArchiveRepositoryImpl (rusqlite)
#[async_trait]
pub trait OrderArchiveRepository: Send + Sync {
    /// Bulk existence lookup over the archive.
    ///
    /// # Arguments
    /// - project_id: project scope
    /// - provider: source system tag
    /// - transaction_ids: all transaction ids parsed from the file
    ///
    /// # Returns
    /// - Ok(HashSet<String>): the subset already archived
    async fn fetch_existing_transaction_ids(
        &self,
        project_id: &str,
        provider: &str,
        transaction_ids: &[String],
    ) -> RepositoryResult<HashSet<String>>;

    /// Insert one historical order.
    ///
    /// # Returns
    /// - Err(RepositoryError::AlreadyExists): the (project, provider,
    ///   transaction) key is already archived - benign for the caller
    async fn insert_historical_order(&self, order: HistoricalOrder) -> RepositoryResult<()>;

    /// Count archived orders for a project (test/reporting support).
    async fn count_orders(&self, project_id: &str) -> RepositoryResult<usize>;
}
