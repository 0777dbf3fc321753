// ==========================================
// CRM Sales Reconciliation - Contact Repository Impl
// ==========================================
// Responsibility: rusqlite-backed adapter for the contact directory
// Red line: no business rules; the adapter applies exactly the patch it is
// given and never decides which fields to touch
// ==========================================

use crate::domain::{ContactPatch, ExistingContact, NewContact, ProvenanceEvent};
use crate::repository::contact_repo::ContactRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::order_archive_repo_impl::{in_placeholders, IN_CLAUSE_CHUNK};
use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ContactRepositoryImpl
// ==========================================
pub struct ContactRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ContactRepositoryImpl {
    /// Open the adapter on a database file.
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Share an existing connection.
    pub fn with_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl ContactRepository for ContactRepositoryImpl {
    async fn fetch_contacts_by_email(
        &self,
        project_id: &str,
        emails: &[String],
    ) -> RepositoryResult<HashMap<String, ExistingContact>> {
        let mut found = HashMap::new();
        if emails.is_empty() {
            return Ok(found);
        }

        let conn = self.lock()?;
        for chunk in emails.chunks(IN_CLAUSE_CHUNK) {
            let sql = format!(
                "SELECT email, id, name, phone FROM contact \
                 WHERE project_id = ?1 AND email IN ({})",
                in_placeholders(chunk.len())
            );
            let mut stmt = conn.prepare(&sql)?;
            let params_iter =
                std::iter::once(project_id.to_string()).chain(chunk.iter().cloned());
            let rows = stmt.query_map(params_from_iter(params_iter), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    ExistingContact {
                        id: row.get(1)?,
                        name: row.get(2)?,
                        phone: row.get(3)?,
                    },
                ))
            })?;
            for row in rows {
                let (email, contact) = row?;
                found.insert(email, contact);
            }
        }

        Ok(found)
    }

    async fn insert_contact(&self, contact: NewContact) -> RepositoryResult<String> {
        let conn = self.lock()?;
        let result = conn.execute(
            r#"
            INSERT INTO contact (
                id, project_id, email, name, phone, source, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                contact.id,
                contact.project_id,
                contact.email,
                contact.name,
                contact.phone,
                contact.source,
                contact.status,
                contact.created_at,
            ],
        );

        match result {
            Ok(_) => Ok(contact.id),
            Err(e) => match RepositoryError::from(e) {
                RepositoryError::AlreadyExists { .. } => Err(RepositoryError::AlreadyExists {
                    entity: "contact".to_string(),
                    key: contact.email.clone(),
                }),
                other => Err(other),
            },
        }
    }

    async fn update_contact_fields(
        &self,
        contact_id: &str,
        patch: ContactPatch,
    ) -> RepositoryResult<()> {
        if patch.is_empty() {
            return Ok(());
        }

        // Build the SET clause from the Some fields only.
        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();
        if let Some(name) = patch.name {
            sets.push("name = ?");
            values.push(name);
        }
        if let Some(phone) = patch.phone {
            sets.push("phone = ?");
            values.push(phone);
        }
        values.push(contact_id.to_string());

        let sql = format!(
            "UPDATE contact SET {} WHERE id = ?",
            sets.join(", ")
        );

        let conn = self.lock()?;
        let updated = conn.execute(&sql, params_from_iter(values.iter()))?;
        if updated == 0 {
            return Err(RepositoryError::NotFound {
                entity: "contact".to_string(),
                id: contact_id.to_string(),
            });
        }
        Ok(())
    }

    async fn insert_provenance_event(&self, event: ProvenanceEvent) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO contact_provenance_event (
                id, project_id, contact_id, email, kind, source, occurred_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                event.id,
                event.project_id,
                event.contact_id,
                event.email,
                event.kind,
                event.source,
                event.occurred_at,
            ],
        )?;
        Ok(())
    }

    async fn count_contacts(&self, project_id: &str) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM contact WHERE project_id = ?1",
            params![project_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
