// ==========================================
// CRM Sales Reconciliation - Reconciliation Dispatcher
// ==========================================
// Responsibility: per row, three independent write decisions against the
// pre-fetched existence snapshot
// Red lines:
// - archive and ledger are insert-only; contacts get null-fields-only
//   updates; nothing is ever destructively overwritten
// - a failure in one pipeline never blocks the other two for the same row
// - duplicate-key failures are benign: counted, never surfaced as errors
// ==========================================

use crate::config::ImportConfig;
use crate::domain::{
    CanonicalSale, ContactPatch, HistoricalOrder, ImportContext, ImportSummary, LedgerRecord,
    NewContact, ProvenanceEvent,
};
use crate::importer::existence_resolver::ExistenceSets;
use crate::repository::{AuditLedgerRepository, ContactRepository, OrderArchiveRepository};
use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Provenance tag on archive records written by this pipeline.
pub const SOURCE_CSV: &str = "csv";
/// Provenance tag on contacts and events created by this pipeline.
pub const SOURCE_CSV_IMPORT: &str = "csv_import";
/// Initial status of contacts created by this pipeline.
pub const CONTACT_STATUS_LEAD: &str = "lead";
/// Event kind recorded when an email is first declared via an import.
pub const EVENT_EMAIL_DECLARED: &str = "email_declared";

// ==========================================
// ReconciliationDispatcher
// ==========================================
pub struct ReconciliationDispatcher<'a, A, C, L>
where
    A: OrderArchiveRepository,
    C: ContactRepository,
    L: AuditLedgerRepository,
{
    archive: &'a A,
    contacts: &'a C,
    ledger: &'a L,
    context: &'a ImportContext,
    config: &'a ImportConfig,
}

impl<'a, A, C, L> ReconciliationDispatcher<'a, A, C, L>
where
    A: OrderArchiveRepository,
    C: ContactRepository,
    L: AuditLedgerRepository,
{
    pub fn new(
        archive: &'a A,
        contacts: &'a C,
        ledger: &'a L,
        context: &'a ImportContext,
        config: &'a ImportConfig,
    ) -> Self {
        Self {
            archive,
            contacts,
            ledger,
            context,
            config,
        }
    }

    /// Run all three target pipelines for one row. The fixed 1 -> 2 -> 3
    /// order exists only for deterministic error reporting; the targets are
    /// disjoint.
    pub async fn dispatch_row(
        &self,
        sale: &CanonicalSale,
        existence: &ExistenceSets,
        summary: &mut ImportSummary,
    ) {
        self.reconcile_archive(sale, existence, summary).await;
        self.reconcile_contact(sale, existence, summary).await;
        self.reconcile_ledger(sale, existence, summary).await;
    }

    // ===== Pipeline 1: historical archive (insert-only) =====
    async fn reconcile_archive(
        &self,
        sale: &CanonicalSale,
        existence: &ExistenceSets,
        summary: &mut ImportSummary,
    ) {
        if existence
            .archived_transaction_ids
            .contains(&sale.transaction_id)
        {
            summary.orders_already_exist += 1;
            return;
        }

        let order = HistoricalOrder {
            project_id: self.context.project_id.clone(),
            provider: self.config.provider.clone(),
            transaction_id: sale.transaction_id.clone(),
            buyer_email: sale.buyer_email.clone(),
            buyer_name: sale.buyer_name.clone(),
            product_name: sale.product_name.clone(),
            offer_code: sale.offer_code.clone(),
            gross_value: sale.gross_value,
            platform_fee: sale.platform_fee,
            affiliate_commission: sale.affiliate_commission,
            coproducer_commission: sale.coproducer_commission,
            taxes: sale.taxes,
            net_value: sale.net_value,
            currency: sale.currency.clone(),
            status: sale.status.clone(),
            payment_method: sale.payment_method.clone(),
            installments: sale.installments,
            order_date: sale.order_date,
            confirmation_date: sale.confirmation_date,
            source: SOURCE_CSV.to_string(),
            imported_by: self.context.imported_by.clone(),
            created_at: Utc::now(),
        };

        match self.archive.insert_historical_order(order).await {
            Ok(()) => summary.historical_orders_added += 1,
            Err(e) if e.is_already_exists() => {
                // raced by another writer after the snapshot: benign
                debug!(transaction_id = %sale.transaction_id, "archive duplicate, skipped");
                summary.orders_already_exist += 1;
            }
            Err(e) => {
                warn!(transaction_id = %sale.transaction_id, error = %e, "archive insert failed");
                summary.record_error(&sale.transaction_id, format!("order archive: {e}"));
            }
        }
    }

    // ===== Pipeline 2: contact directory (insert or null-fill) =====
    async fn reconcile_contact(
        &self,
        sale: &CanonicalSale,
        existence: &ExistenceSets,
        summary: &mut ImportSummary,
    ) {
        let Some(email) = &sale.buyer_email else {
            // rows without an email skip this pipeline entirely
            return;
        };

        match existence.contacts_by_email.get(email) {
            Some(existing) => {
                // fill only fields the contact currently lacks
                let patch = ContactPatch {
                    name: if existing.name.is_none() {
                        sale.buyer_name.clone()
                    } else {
                        None
                    },
                    phone: if existing.phone.is_none() {
                        compose_phone(sale)
                    } else {
                        None
                    },
                };

                if patch.is_empty() {
                    return;
                }

                match self.contacts.update_contact_fields(&existing.id, patch).await {
                    Ok(()) => summary.contacts_enriched += 1,
                    Err(e) => {
                        warn!(transaction_id = %sale.transaction_id, error = %e, "contact enrich failed");
                        summary
                            .record_error(&sale.transaction_id, format!("contact update: {e}"));
                    }
                }
            }
            None => {
                let contact = NewContact {
                    id: Uuid::new_v4().to_string(),
                    project_id: self.context.project_id.clone(),
                    email: email.clone(),
                    name: sale.buyer_name.clone(),
                    phone: compose_phone(sale),
                    source: SOURCE_CSV_IMPORT.to_string(),
                    status: CONTACT_STATUS_LEAD.to_string(),
                    created_at: Utc::now(),
                };

                match self.contacts.insert_contact(contact).await {
                    Ok(contact_id) => {
                        summary.contacts_created += 1;
                        self.record_provenance(sale, email, &contact_id, summary)
                            .await;
                    }
                    Err(e) if e.is_already_exists() => {
                        // same email earlier in this file, or a concurrent
                        // writer; the snapshot is deliberately not refreshed
                        debug!(email = %email, "contact duplicate, skipped");
                    }
                    Err(e) => {
                        warn!(transaction_id = %sale.transaction_id, error = %e, "contact insert failed");
                        summary
                            .record_error(&sale.transaction_id, format!("contact insert: {e}"));
                    }
                }
            }
        }
    }

    /// One identity-provenance event per newly created contact.
    async fn record_provenance(
        &self,
        sale: &CanonicalSale,
        email: &str,
        contact_id: &str,
        summary: &mut ImportSummary,
    ) {
        let event = ProvenanceEvent {
            id: Uuid::new_v4().to_string(),
            project_id: self.context.project_id.clone(),
            contact_id: contact_id.to_string(),
            email: email.to_string(),
            kind: EVENT_EMAIL_DECLARED.to_string(),
            source: SOURCE_CSV_IMPORT.to_string(),
            occurred_at: Utc::now(),
        };

        if let Err(e) = self.contacts.insert_provenance_event(event).await {
            warn!(transaction_id = %sale.transaction_id, error = %e, "provenance event failed");
            summary.record_error(&sale.transaction_id, format!("provenance event: {e}"));
        }
    }

    // ===== Pipeline 3: audit ledger (insert-only, net_value > 0) =====
    async fn reconcile_ledger(
        &self,
        sale: &CanonicalSale,
        existence: &ExistenceSets,
        summary: &mut ImportSummary,
    ) {
        // zero-value and informational rows produce no audit record
        if sale.net_value <= 0.0 {
            return;
        }
        if existence
            .ledger_transaction_ids
            .contains(&sale.transaction_id)
        {
            return;
        }

        let record = LedgerRecord {
            project_id: self.context.project_id.clone(),
            transaction_id: sale.transaction_id.clone(),
            gross_value: sale.gross_value,
            platform_fee: sale.platform_fee,
            affiliate_commission: sale.affiliate_commission,
            coproducer_commission: sale.coproducer_commission,
            taxes: sale.taxes,
            net_value: sale.net_value,
            currency: sale.currency.clone(),
            exchange_rate: sale.exchange_rate,
            payout_date: sale.payout_date,
            status: sale.status.clone(),
            created_at: Utc::now(),
        };

        match self.ledger.insert_ledger_record(record).await {
            Ok(()) => summary.ledger_records_added += 1,
            Err(e) if e.is_already_exists() => {
                debug!(transaction_id = %sale.transaction_id, "ledger duplicate, skipped");
            }
            Err(e) => {
                warn!(transaction_id = %sale.transaction_id, error = %e, "ledger insert failed");
                summary.record_error(&sale.transaction_id, format!("audit ledger: {e}"));
            }
        }
    }
}

/// Compose a phone from the row's DDD + number. The DDD is only meaningful
/// next to a number; a bare DDD composes to nothing.
fn compose_phone(sale: &CanonicalSale) -> Option<String> {
    match (&sale.buyer_phone_ddd, &sale.buyer_phone) {
        (Some(ddd), Some(number)) => Some(format!("({}) {}", ddd, number)),
        (None, Some(number)) => Some(number.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale_with_phone(ddd: Option<&str>, number: Option<&str>) -> CanonicalSale {
        CanonicalSale {
            transaction_id: "HP001".to_string(),
            buyer_email: None,
            buyer_name: None,
            buyer_phone_ddd: ddd.map(|s| s.to_string()),
            buyer_phone: number.map(|s| s.to_string()),
            buyer_document: None,
            buyer_instagram: None,
            product_name: None,
            offer_code: None,
            gross_value: 0.0,
            platform_fee: 0.0,
            affiliate_commission: 0.0,
            coproducer_commission: 0.0,
            taxes: 0.0,
            net_value: 0.0,
            currency: "BRL".to_string(),
            exchange_rate: 1.0,
            status: "APPROVED".to_string(),
            payment_method: None,
            installments: None,
            payout_date: None,
            order_date: None,
            confirmation_date: None,
            source_row: 1,
        }
    }

    #[test]
    fn test_compose_phone_with_ddd() {
        let sale = sale_with_phone(Some("11"), Some("99999-0000"));
        assert_eq!(compose_phone(&sale), Some("(11) 99999-0000".to_string()));
    }

    #[test]
    fn test_compose_phone_without_ddd() {
        let sale = sale_with_phone(None, Some("99999-0000"));
        assert_eq!(compose_phone(&sale), Some("99999-0000".to_string()));
    }

    #[test]
    fn test_compose_phone_bare_ddd_is_nothing() {
        let sale = sale_with_phone(Some("11"), None);
        assert_eq!(compose_phone(&sale), None);
    }
}
