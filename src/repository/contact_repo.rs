// ==========================================
// CRM Sales Reconciliation - Contact Repository Trait
// ==========================================
// Responsibility: data access contract for the contact directory
// Red line: repository contains no business rules; the null-fields-only
// decision is made by the dispatcher, the adapter just applies the patch
// ==========================================

use crate::domain::{ContactPatch, ExistingContact, NewContact, ProvenanceEvent};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::collections::HashMap;

// ==========================================
// ContactRepository Trait
// ==========================================
// Implementor: ContactRepositoryImpl (rusqlite)
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Bulk fetch of existing contacts by email.
    ///
    /// # Arguments
    /// - project_id: project scope
    /// - emails: all buyer emails parsed from the file
    ///
    /// # Returns
    /// - Ok(HashMap<email, ExistingContact>): mutable-field snapshot for
    ///   every email that already has a contact
    async fn fetch_contacts_by_email(
        &self,
        project_id: &str,
        emails: &[String],
    ) -> RepositoryResult<HashMap<String, ExistingContact>>;

    /// Insert one new contact.
    ///
    /// # Returns
    /// - Ok(String): id of the created contact
    /// - Err(RepositoryError::AlreadyExists): (project, email) taken
    async fn insert_contact(&self, contact: NewContact) -> RepositoryResult<String>;

    /// Apply a null-fields-only patch to an existing contact.
    ///
    /// Only the Some fields of the patch are written; an empty patch must
    /// not reach this call.
    async fn update_contact_fields(
        &self,
        contact_id: &str,
        patch: ContactPatch,
    ) -> RepositoryResult<()>;

    /// Append one identity-provenance event.
    async fn insert_provenance_event(&self, event: ProvenanceEvent) -> RepositoryResult<()>;

    /// Count contacts for a project (test/reporting support).
    async fn count_contacts(&self, project_id: &str) -> RepositoryResult<usize>;
}
