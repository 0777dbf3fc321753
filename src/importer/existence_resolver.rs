// ==========================================
// CRM Sales Reconciliation - Existence Resolver
// ==========================================
// Responsibility: one bulk read per target store, up front, for every
// business key in the run
// Contract: the result is a point-in-time snapshot; the dispatcher never
// re-queries or refreshes it mid-run, so "already exists" stays a constant
// fact for the whole run
// ==========================================

use crate::domain::{CanonicalSale, ExistingContact};
use crate::repository::{
    AuditLedgerRepository, ContactRepository, OrderArchiveRepository, RepositoryResult,
};
use std::collections::{HashMap, HashSet};
use tracing::info;

// ==========================================
// ExistenceSets - pre-fetched key snapshot
// ==========================================
#[derive(Debug, Default)]
pub struct ExistenceSets {
    /// Transaction ids already in the order archive.
    pub archived_transaction_ids: HashSet<String>,
    /// Transaction ids already in the audit ledger.
    pub ledger_transaction_ids: HashSet<String>,
    /// Email -> existing contact mutable-field snapshot.
    pub contacts_by_email: HashMap<String, ExistingContact>,
}

/// Resolve the three existence sets with exactly one bulk read per store.
///
/// The reads are awaited one at a time; per-row error attribution depends
/// on nothing else being in flight.
pub async fn resolve_existence<A, C, L>(
    archive: &A,
    contacts: &C,
    ledger: &L,
    project_id: &str,
    provider: &str,
    sales: &[CanonicalSale],
) -> RepositoryResult<ExistenceSets>
where
    A: OrderArchiveRepository + ?Sized,
    C: ContactRepository + ?Sized,
    L: AuditLedgerRepository + ?Sized,
{
    let transaction_ids = collect_unique(sales.iter().map(|s| s.transaction_id.clone()));
    let emails = collect_unique(sales.iter().filter_map(|s| s.buyer_email.clone()));

    let archived_transaction_ids = archive
        .fetch_existing_transaction_ids(project_id, provider, &transaction_ids)
        .await?;

    let contacts_by_email = contacts
        .fetch_contacts_by_email(project_id, &emails)
        .await?;

    let ledger_transaction_ids = ledger
        .fetch_existing_transaction_ids(project_id, &transaction_ids)
        .await?;

    info!(
        transactions = transaction_ids.len(),
        emails = emails.len(),
        archived = archived_transaction_ids.len(),
        known_contacts = contacts_by_email.len(),
        in_ledger = ledger_transaction_ids.len(),
        "existence snapshot resolved"
    );

    Ok(ExistenceSets {
        archived_transaction_ids,
        ledger_transaction_ids,
        contacts_by_email,
    })
}

fn collect_unique(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for value in values {
        if seen.insert(value.clone()) {
            unique.push(value);
        }
    }
    unique
}
