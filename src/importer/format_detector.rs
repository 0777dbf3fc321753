// ==========================================
// CRM Sales Reconciliation - Format Detector
// ==========================================
// Responsibility: decide from the header row alone whether the file is a
// supported vendor sales export
// Contract: at least two distinct signal fields must be present, so a
// superficially similar spreadsheet with a lone "status" column is rejected
// ==========================================

use crate::importer::column_mapper::{CanonicalField, ColumnMap};

/// Canonical fields whose presence signals a supported sales export.
/// A header counts only if it is an exact (normalized) synonym of one of
/// these fields; substring matches are not accepted, so a date column like
/// "Data da Transação" does not masquerade as the transaction column.
const SIGNAL_FIELDS: [CanonicalField; 8] = [
    CanonicalField::TransactionId,
    CanonicalField::Status,
    CanonicalField::BuyerEmail,
    CanonicalField::ProductName,
    CanonicalField::GrossValue,
    CanonicalField::PlatformFee,
    CanonicalField::NetValue,
    CanonicalField::PaymentMethod,
];

/// Minimum distinct signal fields for acceptance.
const MIN_SIGNAL_MATCHES: usize = 2;

/// Returns true when the header row identifies a supported export.
pub fn is_supported_export(headers: &[String]) -> bool {
    let map = ColumnMap::resolve(headers);

    let matches = SIGNAL_FIELDS.iter().filter(|f| map.has(**f)).count();

    matches >= MIN_SIGNAL_MATCHES
}
