// ==========================================
// CRM Sales Reconciliation - SQLite Connection Setup
// ==========================================
// Goals:
// - one place for Connection::open PRAGMA behavior, so no adapter ends up
//   with foreign keys off while another has them on
// - unified busy_timeout to soften concurrent-write busy errors
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Apply the unified PRAGMA set to a connection.
///
/// foreign_keys and busy_timeout are per-connection settings and must be
/// applied to every connection that is opened.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the unified configuration applied.
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create the three target-store tables if they do not exist.
///
/// The UNIQUE business keys are what turn a duplicate insert into the typed
/// AlreadyExists error the dispatcher branches on.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS historical_order (
            project_id            TEXT NOT NULL,
            provider              TEXT NOT NULL,
            transaction_id        TEXT NOT NULL,
            buyer_email           TEXT,
            buyer_name            TEXT,
            product_name          TEXT,
            offer_code            TEXT,
            gross_value           REAL NOT NULL DEFAULT 0,
            platform_fee          REAL NOT NULL DEFAULT 0,
            affiliate_commission  REAL NOT NULL DEFAULT 0,
            coproducer_commission REAL NOT NULL DEFAULT 0,
            taxes                 REAL NOT NULL DEFAULT 0,
            net_value             REAL NOT NULL DEFAULT 0,
            currency              TEXT NOT NULL DEFAULT 'BRL',
            status                TEXT NOT NULL,
            payment_method        TEXT,
            installments          INTEGER,
            order_date            TEXT,
            confirmation_date     TEXT,
            source                TEXT NOT NULL,
            imported_by           TEXT NOT NULL,
            created_at            TEXT NOT NULL,
            PRIMARY KEY (project_id, provider, transaction_id)
        );

        CREATE TABLE IF NOT EXISTS contact (
            id          TEXT PRIMARY KEY,
            project_id  TEXT NOT NULL,
            email       TEXT NOT NULL,
            name        TEXT,
            phone       TEXT,
            source      TEXT NOT NULL,
            status      TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            UNIQUE (project_id, email)
        );

        CREATE TABLE IF NOT EXISTS contact_provenance_event (
            id          TEXT PRIMARY KEY,
            project_id  TEXT NOT NULL,
            contact_id  TEXT NOT NULL,
            email       TEXT NOT NULL,
            kind        TEXT NOT NULL,
            source      TEXT NOT NULL,
            occurred_at TEXT NOT NULL,
            FOREIGN KEY (contact_id) REFERENCES contact(id)
        );

        CREATE TABLE IF NOT EXISTS audit_ledger (
            project_id            TEXT NOT NULL,
            transaction_id        TEXT NOT NULL,
            gross_value           REAL NOT NULL DEFAULT 0,
            platform_fee          REAL NOT NULL DEFAULT 0,
            affiliate_commission  REAL NOT NULL DEFAULT 0,
            coproducer_commission REAL NOT NULL DEFAULT 0,
            taxes                 REAL NOT NULL DEFAULT 0,
            net_value             REAL NOT NULL DEFAULT 0,
            currency              TEXT NOT NULL DEFAULT 'BRL',
            exchange_rate         REAL NOT NULL DEFAULT 1,
            payout_date           TEXT,
            status                TEXT NOT NULL,
            created_at            TEXT NOT NULL,
            PRIMARY KEY (project_id, transaction_id)
        );
        "#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        // IF NOT EXISTS: a second pass must not fail
        init_schema(&conn).unwrap();
    }
}
