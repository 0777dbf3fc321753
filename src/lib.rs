// ==========================================
// CRM Sales Reconciliation - Core Library
// ==========================================
// Ingests vendor sales-export CSVs and reconciles them against three
// target stores: historical order archive, contact directory, audit
// ledger. All writes are insert-only or null-fill-only.
// ==========================================

// Initialize the i18n system
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and value objects
pub mod domain;

// Repository layer - target store access
pub mod repository;

// Import layer - the reconciliation pipeline
pub mod importer;

// Configuration layer - per-run tunables
pub mod config;

// Database infrastructure (connection init / PRAGMA in one place)
pub mod db;

// Logging
pub mod logging;

// Internationalization
pub mod i18n;

// ==========================================
// Re-export core types
// ==========================================

// Domain entities
pub use domain::{
    CanonicalSale, ContactPatch, ExistingContact, HistoricalOrder, ImportContext,
    ImportProgress, ImportRowError, ImportSummary, LedgerRecord, NewContact, ProvenanceEvent,
};

// Configuration
pub use config::ImportConfig;

// Importer surface
pub use importer::{
    CancelHandle, ImportError, ImportResult, NullProgressObserver, ProgressObserver,
    SalesImporter, SalesImporterImpl,
};

// Repository traits and reference implementations
pub use repository::{
    AuditLedgerRepository, AuditLedgerRepositoryImpl, ContactRepository, ContactRepositoryImpl,
    OrderArchiveRepository, OrderArchiveRepositoryImpl, RepositoryError, RepositoryResult,
};

// ==========================================
// Constants
// ==========================================

// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Application name
pub const APP_NAME: &str = "CRM Sales Reconciliation";
