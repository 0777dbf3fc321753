// ==========================================
// CRM Sales Reconciliation - Canonical Sale Model
// ==========================================
// Responsibility: one parsed source line, normalized to the canonical schema
// Red line: row normalizer writes, dispatcher reads - never mutated after parse
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// CanonicalSale - one normalized export row
// ==========================================
// Invariant: transaction_id is never empty; rows that fail this are dropped
// by the row normalizer before dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalSale {
    // ===== Business key =====
    pub transaction_id: String, // unique key in the source system

    // ===== Buyer identity (all optional) =====
    pub buyer_email: Option<String>,
    pub buyer_name: Option<String>,
    pub buyer_phone_ddd: Option<String>, // Brazilian area code, kept separate from the number
    pub buyer_phone: Option<String>,
    pub buyer_document: Option<String>, // CPF/CNPJ
    pub buyer_instagram: Option<String>,

    // ===== Product / offer descriptors =====
    pub product_name: Option<String>,
    pub offer_code: Option<String>,

    // ===== Monetary breakdown (non-negative, 0.0 when absent) =====
    pub gross_value: f64,
    pub platform_fee: f64,
    pub affiliate_commission: f64,
    pub coproducer_commission: f64,
    pub taxes: f64,
    pub net_value: f64,

    // ===== Currency =====
    pub currency: String,   // ISO code, defaults to "BRL"
    pub exchange_rate: f64, // defaults to 1.0

    // ===== Status (normalized, e.g. "APPROVED") =====
    pub status: String,

    // ===== Payment metadata =====
    pub payment_method: Option<String>,
    pub installments: Option<u32>,

    // ===== Payout metadata =====
    pub payout_date: Option<NaiveDate>,

    // ===== Timestamps =====
    pub order_date: Option<DateTime<Utc>>,
    pub confirmation_date: Option<DateTime<Utc>>,

    // ===== Meta =====
    pub source_row: usize, // 1-based data-row number, for error attribution
}
