// ==========================================
// CRM Sales Reconciliation - Audit Ledger Repository Trait
// ==========================================
// Responsibility: data access contract for the audit ledger
// Red line: repository contains no business rules; the net_value > 0 gate
// lives in the dispatcher, never here
// ==========================================

use crate::domain::LedgerRecord;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::collections::HashSet;

// ==========================================
// AuditLedgerRepository Trait
// ==========================================
// Implementor: AuditLedgerRepositoryImpl (rusqlite)
#[async_trait]
pub trait AuditLedgerRepository: Send + Sync {
    /// Bulk existence lookup over the ledger.
    ///
    /// # Returns
    /// - Ok(HashSet<String>): the subset of transaction ids already recorded
    async fn fetch_existing_transaction_ids(
        &self,
        project_id: &str,
        transaction_ids: &[String],
    ) -> RepositoryResult<HashSet<String>>;

    /// Insert one ledger record.
    ///
    /// # Returns
    /// - Err(RepositoryError::AlreadyExists): the (project, transaction) key
    ///   is already recorded - benign for the caller
    async fn insert_ledger_record(&self, record: LedgerRecord) -> RepositoryResult<()>;

    /// Count ledger records for a project (test/reporting support).
    async fn count_records(&self, project_id: &str) -> RepositoryResult<usize>;
}
