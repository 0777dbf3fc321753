// ==========================================
// CRM Sales Reconciliation - Run Context & Progress
// ==========================================
// Responsibility: the project/user context a run executes under and the
// progress snapshots emitted at batch boundaries
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ImportContext - who is importing, into which project
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportContext {
    pub project_id: String,
    pub imported_by: String,
}

// ==========================================
// ImportProgress - one progress snapshot
// ==========================================
// Emitted after each completed batch; percent is monotonic because batches
// run strictly sequentially.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportProgress {
    pub percent: u8,
    pub stage: String, // localized, human-readable stage message
    pub completed_batches: usize,
    pub total_batches: usize,
}
