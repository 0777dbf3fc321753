// ==========================================
// CRM Sales Reconciliation - Repository Error Types
// ==========================================
// Tooling: thiserror derive macro
// Red line: duplicate-key detection is a typed variant (AlreadyExists),
// never a magic error-code comparison at the call site
// ==========================================

use thiserror::Error;

/// Store adapter error type
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== Idempotency =====
    #[error("record already exists: {entity} with key={key}")]
    AlreadyExists { entity: String, key: String },

    // ===== Lookup =====
    #[error("record not found: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    // ===== Database =====
    #[error("database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("database lock acquisition failed: {0}")]
    LockError(String),

    #[error("database query failed: {0}")]
    DatabaseQueryError(String),

    // ===== Generic =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    /// Whether this error is the benign duplicate-insert case.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, RepositoryError::AlreadyExists { .. })
    }
}

// From<rusqlite::Error>
//
// UNIQUE constraint violations become the typed AlreadyExists variant; the
// entity/key context is refined at the adapter call site when available.
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("UNIQUE") => {
                RepositoryError::AlreadyExists {
                    entity: "unknown".to_string(),
                    key: msg,
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "unknown".to_string(),
                id: "unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result type alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_maps_to_already_exists() {
        let sqlite_err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT),
            Some("UNIQUE constraint failed: historical_order.transaction_id".to_string()),
        );

        let err = RepositoryError::from(sqlite_err);
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_other_sqlite_error_is_query_error() {
        let sqlite_err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("database is locked".to_string()),
        );

        let err = RepositoryError::from(sqlite_err);
        assert!(!err.is_already_exists());
    }
}
