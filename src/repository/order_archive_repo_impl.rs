// ==========================================
// CRM Sales Reconciliation - Order Archive Repository Impl
// ==========================================
// Responsibility: rusqlite-backed adapter for the historical order archive
// Red line: no business rules; plain INSERT so the UNIQUE business key
// surfaces duplicates as AlreadyExists
// ==========================================

use crate::domain::HistoricalOrder;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::order_archive_repo::OrderArchiveRepository;
use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// SQLite bound-parameter safety margin for IN-clause chunks.
pub(crate) const IN_CLAUSE_CHUNK: usize = 500;

pub(crate) fn in_placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}

// ==========================================
// OrderArchiveRepositoryImpl
// ==========================================
pub struct OrderArchiveRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl OrderArchiveRepositoryImpl {
    /// Open the adapter on a database file.
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Share an existing connection (tests and the CLI wire all three
    /// adapters onto one connection).
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
impl OrderArchiveRepository for OrderArchiveRepositoryImpl {
    async fn fetch_existing_transaction_ids(
        &self,
        project_id: &str,
        provider: &str,
        transaction_ids: &[String],
    ) -> RepositoryResult<HashSet<String>> {
        let mut existing = HashSet::new();
        if transaction_ids.is_empty() {
            return Ok(existing);
        }

        let conn = self.lock()?;
        for chunk in transaction_ids.chunks(IN_CLAUSE_CHUNK) {
            let sql = format!(
                "SELECT transaction_id FROM historical_order \
                 WHERE project_id = ?1 AND provider = ?2 AND transaction_id IN ({})",
                in_placeholders(chunk.len())
            );
            let mut stmt = conn.prepare(&sql)?;
            let params_iter = std::iter::once(project_id.to_string())
                .chain(std::iter::once(provider.to_string()))
                .chain(chunk.iter().cloned());
            let rows = stmt.query_map(params_from_iter(params_iter), |row| {
                row.get::<_, String>(0)
            })?;
            for row in rows {
                existing.insert(row?);
            }
        }

        Ok(existing)
    }

    async fn insert_historical_order(&self, order: HistoricalOrder) -> RepositoryResult<()> {
        let conn = self.lock()?;
        let result = conn.execute(
            r#"
            INSERT INTO historical_order (
                project_id, provider, transaction_id, buyer_email, buyer_name,
                product_name, offer_code, gross_value, platform_fee,
                affiliate_commission, coproducer_commission, taxes, net_value,
                currency, status, payment_method, installments, order_date,
                confirmation_date, source, imported_by, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
                ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22
            )
            "#,
            params![
                order.project_id,
                order.provider,
                order.transaction_id,
                order.buyer_email,
                order.buyer_name,
                order.product_name,
                order.offer_code,
                order.gross_value,
                order.platform_fee,
                order.affiliate_commission,
                order.coproducer_commission,
                order.taxes,
                order.net_value,
                order.currency,
                order.status,
                order.payment_method,
                order.installments,
                order.order_date,
                order.confirmation_date,
                order.source,
                order.imported_by,
                order.created_at,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) => match RepositoryError::from(e) {
                RepositoryError::AlreadyExists { .. } => Err(RepositoryError::AlreadyExists {
                    entity: "historical_order".to_string(),
                    key: order.transaction_id.clone(),
                }),
                other => Err(other),
            },
        }
    }

    async fn count_orders(&self, project_id: &str) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM historical_order WHERE project_id = ?1",
            params![project_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
