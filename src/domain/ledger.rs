// ==========================================
// CRM Sales Reconciliation - Audit Ledger Model
// ==========================================
// Responsibility: monetary mirror record written to the audit ledger
// Red line: the ledger is insert-only and gated on net_value > 0
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// LedgerRecord - audit ledger entry
// ==========================================
// Keyed by (project_id, transaction_id).
//
// Known limitation: the reporting currency is assumed to equal the source
// currency (BRL); currency and exchange_rate are stored verbatim and no
// conversion is performed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRecord {
    // ===== Business key =====
    pub project_id: String,
    pub transaction_id: String,

    // ===== Monetary breakdown =====
    pub gross_value: f64,
    pub platform_fee: f64,
    pub affiliate_commission: f64,
    pub coproducer_commission: f64,
    pub taxes: f64,
    pub net_value: f64,
    pub currency: String,
    pub exchange_rate: f64,

    // ===== Payout metadata =====
    pub payout_date: Option<NaiveDate>,

    // ===== Status =====
    pub status: String,

    // ===== Audit =====
    pub created_at: DateTime<Utc>,
}
