// ==========================================
// CRM Sales Reconciliation - Repository Layer
// ==========================================
// Responsibility: data access to the three target stores
// Red line: repositories contain no business rules, only CRUD; every
// insert-vs-skip decision belongs to the dispatcher
// ==========================================

pub mod audit_ledger_repo;
pub mod audit_ledger_repo_impl;
pub mod contact_repo;
pub mod contact_repo_impl;
pub mod error;
pub mod order_archive_repo;
pub mod order_archive_repo_impl;

// Re-export traits
pub use audit_ledger_repo::AuditLedgerRepository;
pub use contact_repo::ContactRepository;
pub use order_archive_repo::OrderArchiveRepository;

// Re-export implementations
pub use audit_ledger_repo_impl::AuditLedgerRepositoryImpl;
pub use contact_repo_impl::ContactRepositoryImpl;
pub use order_archive_repo_impl::OrderArchiveRepositoryImpl;

// Re-export error types
pub use error::{RepositoryError, RepositoryResult};
