// ==========================================
// CRM Sales Reconciliation - Import Error Types
// ==========================================
// Tooling: thiserror derive macro
// Taxonomy: file-level validation errors and run-level infrastructure
// failures abort the run; row-level failures never appear here - they are
// accumulated in the ImportSummary error list instead
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// Import pipeline error type
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File-level validation (terminal, pre-dispatch) =====
    #[error("unsupported file format: the file does not look like a sales export")]
    UnsupportedFormat,

    #[error("mandatory transaction column not found in the file headers")]
    MissingTransactionColumn,

    #[error("no valid rows: every data row is blank or lacks a transaction id")]
    NoValidRows,

    // ===== Run-level infrastructure (terminal) =====
    #[error("target store access failed: {0}")]
    Store(#[from] RepositoryError),

    // ===== Generic =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// Terminal validation errors get a corrective hint shown to the user;
    /// infrastructure errors do not.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ImportError::UnsupportedFormat
                | ImportError::MissingTransactionColumn
                | ImportError::NoValidRows
        )
    }

    /// Localized corrective hint for validation errors.
    pub fn user_hint(&self) -> Option<String> {
        let key = match self {
            ImportError::UnsupportedFormat => "import.error.unsupported_format",
            ImportError::MissingTransactionColumn => "import.error.missing_transaction_column",
            ImportError::NoValidRows => "import.error.no_valid_rows",
            _ => return None,
        };
        Some(crate::i18n::t(key))
    }
}

/// Result type alias
pub type ImportResult<T> = Result<T, ImportError>;
