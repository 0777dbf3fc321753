// ==========================================
// CRM Sales Reconciliation - Import Configuration
// ==========================================
// Responsibility: per-run tunables with safe defaults
// ==========================================

use serde::{Deserialize, Serialize};

/// Default rows per batch.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Source-system tag on archive records and provenance events.
pub const DEFAULT_PROVIDER: &str = "hotmart";

// ==========================================
// ImportConfig
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Rows per batch; progress and cancellation are checked at batch
    /// boundaries.
    pub batch_size: usize,

    /// Source-system tag for the archive business key.
    pub provider: String,

    /// Currency assumed when the export carries none.
    pub default_currency: String,

    /// Exchange rate assumed when the export carries none.
    pub default_exchange_rate: f64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            provider: DEFAULT_PROVIDER.to_string(),
            default_currency: "BRL".to_string(),
            default_exchange_rate: 1.0,
        }
    }
}

impl ImportConfig {
    /// Batch size clamped away from zero, so chunking never panics.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.default_currency, "BRL");
        assert_eq!(config.default_exchange_rate, 1.0);
    }

    #[test]
    fn test_effective_batch_size_never_zero() {
        let config = ImportConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_batch_size(), 1);
    }
}
