// ==========================================
// CRM Sales Reconciliation - Domain Layer
// ==========================================
// Responsibility: entities and value objects shared across the pipeline
// Red line: no I/O, no business orchestration in this layer
// ==========================================

pub mod contact;
pub mod ledger;
pub mod order;
pub mod run;
pub mod sale;
pub mod summary;

// Re-export core entities
pub use contact::{ContactPatch, ExistingContact, NewContact, ProvenanceEvent};
pub use ledger::LedgerRecord;
pub use order::HistoricalOrder;
pub use run::{ImportContext, ImportProgress};
pub use sale::CanonicalSale;
pub use summary::{ImportRowError, ImportSummary, ERROR_DISPLAY_CAP};
