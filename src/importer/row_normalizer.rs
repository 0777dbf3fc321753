// ==========================================
// CRM Sales Reconciliation - Row Normalizer
// ==========================================
// Responsibility: compose tokenizer, column map and field parsers into the
// canonical record sequence
// Contract: rows with an empty transaction id are dropped here, before any
// dispatch; the drop is logged, not an error
// ==========================================

use crate::config::ImportConfig;
use crate::domain::CanonicalSale;
use crate::importer::column_mapper::{CanonicalField, ColumnMap};
use crate::importer::field_parsers::{
    normalize_status, parse_date_flexible, parse_date_only, parse_exchange_rate,
    parse_installments, parse_money,
};
use tracing::warn;

/// Normalize tokenized data rows into canonical sales.
///
/// Returns the canonical records plus the number of rows dropped for a
/// missing transaction id.
pub fn normalize_rows(
    data_rows: &[Vec<String>],
    map: &ColumnMap,
    config: &ImportConfig,
) -> (Vec<CanonicalSale>, usize) {
    let mut sales = Vec::with_capacity(data_rows.len());
    let mut dropped = 0usize;

    for (idx, row) in data_rows.iter().enumerate() {
        let source_row = idx + 1;

        let transaction_id = opt_cell(row, map, CanonicalField::TransactionId);
        let Some(transaction_id) = transaction_id else {
            warn!(row = source_row, "row dropped: empty transaction id");
            dropped += 1;
            continue;
        };

        let money = |field| {
            map.value(row, field)
                .map(parse_money)
                .unwrap_or(0.0)
        };

        sales.push(CanonicalSale {
            transaction_id,
            buyer_email: opt_cell(row, map, CanonicalField::BuyerEmail)
                .map(|e| e.to_lowercase()),
            buyer_name: opt_cell(row, map, CanonicalField::BuyerName),
            buyer_phone_ddd: opt_cell(row, map, CanonicalField::BuyerPhoneDdd),
            buyer_phone: opt_cell(row, map, CanonicalField::BuyerPhone),
            buyer_document: opt_cell(row, map, CanonicalField::BuyerDocument),
            buyer_instagram: opt_cell(row, map, CanonicalField::BuyerInstagram),
            product_name: opt_cell(row, map, CanonicalField::ProductName),
            offer_code: opt_cell(row, map, CanonicalField::OfferCode),
            gross_value: money(CanonicalField::GrossValue),
            platform_fee: money(CanonicalField::PlatformFee),
            affiliate_commission: money(CanonicalField::AffiliateCommission),
            coproducer_commission: money(CanonicalField::CoproducerCommission),
            taxes: money(CanonicalField::Taxes),
            net_value: money(CanonicalField::NetValue),
            currency: opt_cell(row, map, CanonicalField::Currency)
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| config.default_currency.clone()),
            exchange_rate: match opt_cell(row, map, CanonicalField::ExchangeRate) {
                Some(raw) => parse_exchange_rate(Some(&raw)),
                None => config.default_exchange_rate,
            },
            status: opt_cell(row, map, CanonicalField::Status)
                .map(|s| normalize_status(&s))
                .unwrap_or_default(),
            payment_method: opt_cell(row, map, CanonicalField::PaymentMethod),
            installments: opt_cell(row, map, CanonicalField::Installments)
                .and_then(|v| parse_installments(&v)),
            payout_date: opt_cell(row, map, CanonicalField::PayoutDate)
                .and_then(|v| parse_date_only(&v)),
            order_date: opt_cell(row, map, CanonicalField::OrderDate)
                .and_then(|v| parse_date_flexible(&v)),
            confirmation_date: opt_cell(row, map, CanonicalField::ConfirmationDate)
                .and_then(|v| parse_date_flexible(&v)),
            source_row,
        });
    }

    (sales, dropped)
}

/// Non-empty trimmed cell for a canonical field.
fn opt_cell(row: &[String], map: &ColumnMap, field: CanonicalField) -> Option<String> {
    map.value(row, field).and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
