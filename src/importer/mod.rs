// ==========================================
// CRM Sales Reconciliation - Import Layer
// ==========================================
// Responsibility: vendor sales-export ingestion, file text to target stores
// Flow: tokenize -> detect -> map columns -> normalize -> resolve
// existence -> reconcile
// ==========================================

// Module declarations
pub mod column_mapper;
pub mod dispatcher;
pub mod error;
pub mod existence_resolver;
pub mod field_parsers;
pub mod format_detector;
pub mod normalize;
pub mod row_normalizer;
pub mod sales_importer_impl;
pub mod sales_importer_trait;
pub mod tokenizer;

// Re-export core types
pub use column_mapper::{CanonicalField, ColumnMap};
pub use dispatcher::ReconciliationDispatcher;
pub use error::{ImportError, ImportResult};
pub use existence_resolver::{resolve_existence, ExistenceSets};
pub use format_detector::is_supported_export;
pub use row_normalizer::normalize_rows;
pub use sales_importer_impl::SalesImporterImpl;
pub use tokenizer::tokenize;

// Re-export trait interfaces and run controls
pub use sales_importer_trait::{
    CancelHandle, NullProgressObserver, ProgressObserver, SalesImporter,
};
