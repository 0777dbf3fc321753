// ==========================================
// CRM Sales Reconciliation - Historical Order Model
// ==========================================
// Responsibility: provenance-tagged record written to the order archive
// Red line: the archive is insert-only; no update or delete paths exist
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// HistoricalOrder - order archive record
// ==========================================
// Keyed by (project_id, provider, transaction_id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalOrder {
    // ===== Business key =====
    pub project_id: String,
    pub provider: String,
    pub transaction_id: String,

    // ===== Buyer snapshot =====
    pub buyer_email: Option<String>,
    pub buyer_name: Option<String>,

    // ===== Product =====
    pub product_name: Option<String>,
    pub offer_code: Option<String>,

    // ===== Monetary breakdown =====
    pub gross_value: f64,
    pub platform_fee: f64,
    pub affiliate_commission: f64,
    pub coproducer_commission: f64,
    pub taxes: f64,
    pub net_value: f64,
    pub currency: String,

    // ===== Status & payment =====
    pub status: String,
    pub payment_method: Option<String>,
    pub installments: Option<u32>,

    // ===== Timestamps =====
    pub order_date: Option<DateTime<Utc>>,
    pub confirmation_date: Option<DateTime<Utc>>,

    // ===== Provenance =====
    pub source: String,      // "csv" for this pipeline
    pub imported_by: String, // user who ran the import

    // ===== Audit =====
    pub created_at: DateTime<Utc>,
}
