// ==========================================
// CRM Sales Reconciliation - Audit Ledger Repository Impl
// ==========================================
// Responsibility: rusqlite-backed adapter for the audit ledger
// Red line: no business rules; plain INSERT so the UNIQUE business key
// surfaces duplicates as AlreadyExists
// ==========================================

use crate::domain::LedgerRecord;
use crate::repository::audit_ledger_repo::AuditLedgerRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::order_archive_repo_impl::{in_placeholders, IN_CLAUSE_CHUNK};
use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

// ==========================================
// AuditLedgerRepositoryImpl
// ==========================================
pub struct AuditLedgerRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl AuditLedgerRepositoryImpl {
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
impl AuditLedgerRepository for AuditLedgerRepositoryImpl {
    async fn fetch_existing_transaction_ids(
        &self,
        project_id: &str,
        transaction_ids: &[String],
    ) -> RepositoryResult<HashSet<String>> {
        let mut existing = HashSet::new();
        if transaction_ids.is_empty() {
            return Ok(existing);
        }

        let conn = self.lock()?;
        for chunk in transaction_ids.chunks(IN_CLAUSE_CHUNK) {
            let sql = format!(
                "SELECT transaction_id FROM audit_ledger \
                 WHERE project_id = ?1 AND transaction_id IN ({})",
                in_placeholders(chunk.len())
            );
            let mut stmt = conn.prepare(&sql)?;
            let params_iter =
                std::iter::once(project_id.to_string()).chain(chunk.iter().cloned());
            let rows = stmt.query_map(params_from_iter(params_iter), |row| {
                row.get::<_, String>(0)
            })?;
            for row in rows {
                existing.insert(row?);
            }
        }

        Ok(existing)
    }

    async fn insert_ledger_record(&self, record: LedgerRecord) -> RepositoryResult<()> {
        let conn = self.lock()?;
        let result = conn.execute(
            r#"
            INSERT INTO audit_ledger (
                project_id, transaction_id, gross_value, platform_fee,
                affiliate_commission, coproducer_commission, taxes, net_value,
                currency, exchange_rate, payout_date, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                record.project_id,
                record.transaction_id,
                record.gross_value,
                record.platform_fee,
                record.affiliate_commission,
                record.coproducer_commission,
                record.taxes,
                record.net_value,
                record.currency,
                record.exchange_rate,
                record.payout_date,
                record.status,
                record.created_at,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) => match RepositoryError::from(e) {
                RepositoryError::AlreadyExists { .. } => Err(RepositoryError::AlreadyExists {
                    entity: "audit_ledger".to_string(),
                    key: record.transaction_id.clone(),
                }),
                other => Err(other),
            },
        }
    }

    async fn count_records(&self, project_id: &str) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM audit_ledger WHERE project_id = ?1",
            params![project_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
