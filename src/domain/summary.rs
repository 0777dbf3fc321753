// ==========================================
// CRM Sales Reconciliation - Import Summary
// ==========================================
// Responsibility: per-run accumulator of counts and row-level errors
// Red line: mutated only by the reconciliation dispatcher; read-only once
// the run completes or is cancelled
// ==========================================

use serde::{Deserialize, Serialize};

/// How many error entries callers are expected to surface inline.
pub const ERROR_DISPLAY_CAP: usize = 5;

// ==========================================
// ImportRowError - one per-pipeline failure
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRowError {
    pub transaction_id: String,
    pub message: String,
}

// ==========================================
// ImportSummary - final run report
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    // ===== Input =====
    pub total_rows: usize,

    // ===== Historical archive =====
    pub historical_orders_added: usize,
    pub orders_already_exist: usize,

    // ===== Contact directory =====
    pub contacts_created: usize,
    pub contacts_enriched: usize,

    // ===== Audit ledger =====
    pub ledger_records_added: usize,

    // ===== Run state =====
    pub cancelled: bool,

    // ===== Errors (unbounded; display-capped for callers) =====
    pub errors: Vec<ImportRowError>,
}

impl ImportSummary {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            ..Default::default()
        }
    }

    /// Record a non-benign per-pipeline failure for one row.
    pub fn record_error(&mut self, transaction_id: &str, message: impl Into<String>) {
        self.errors.push(ImportRowError {
            transaction_id: transaction_id.to_string(),
            message: message.into(),
        });
    }

    /// The leading slice callers should render inline.
    pub fn display_errors(&self) -> &[ImportRowError] {
        let cap = ERROR_DISPLAY_CAP.min(self.errors.len());
        &self.errors[..cap]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_errors_capped() {
        let mut summary = ImportSummary::new(10);
        for i in 0..8 {
            summary.record_error(&format!("HP{:04}", i), "archive write failed");
        }

        assert_eq!(summary.errors.len(), 8);
        assert_eq!(summary.display_errors().len(), ERROR_DISPLAY_CAP);
    }

    #[test]
    fn test_display_errors_under_cap() {
        let mut summary = ImportSummary::new(3);
        summary.record_error("HP0001", "ledger write failed");

        assert_eq!(summary.display_errors().len(), 1);
    }
}
