// ==========================================
// CRM Sales Reconciliation - Contact Models
// ==========================================
// Responsibility: contact directory records and the null-fields-only patch
// Red line: existing contact fields that hold a value are never overwritten
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ExistingContact - mutable-field snapshot
// ==========================================
// What the existence resolver fetches per email: just the id plus the two
// fields the pipeline is allowed to fill when they are null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingContact {
    pub id: String,
    pub name: Option<String>,
    pub phone: Option<String>,
}

// ==========================================
// NewContact - insert payload
// ==========================================
// Keyed by (project_id, email).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContact {
    pub id: String,
    pub project_id: String,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub source: String, // "csv_import" for this pipeline
    pub status: String, // "lead" for this pipeline
    pub created_at: DateTime<Utc>,
}

// ==========================================
// ContactPatch - null-fields-only update
// ==========================================
// A field is Some only when the existing contact holds no value for it and
// the row supplies one. An empty patch means no write is issued.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none()
    }
}

// ==========================================
// ProvenanceEvent - identity-provenance record
// ==========================================
// Appended once per newly created contact: captures that this email was
// first declared through this import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvenanceEvent {
    pub id: String,
    pub project_id: String,
    pub contact_id: String,
    pub email: String,
    pub kind: String,   // "email_declared"
    pub source: String, // "csv_import"
    pub occurred_at: DateTime<Utc>,
}
