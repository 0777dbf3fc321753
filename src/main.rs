// ==========================================
// CRM Sales Reconciliation - CLI Entry Point
// ==========================================
// Usage: sales-csv-recon <db-path> <csv-file> <project-id> <user>
// Runs one import against a SQLite database, creating the schema on first
// use, and prints the run summary.
// ==========================================

use anyhow::{bail, Context, Result};
use sales_csv_recon::i18n::{t, t_with_args};
use sales_csv_recon::{
    db, logging, AuditLedgerRepositoryImpl, ContactRepositoryImpl, ImportConfig, ImportContext,
    ImportProgress, OrderArchiveRepositoryImpl, SalesImporter, SalesImporterImpl,
};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Localized "label: count" summary line.
fn counted_line(key: &str, count: usize) -> String {
    let count = count.to_string();
    t_with_args(key, &[("count", count.as_str())])
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 5 {
        eprintln!("usage: {} <db-path> <csv-file> <project-id> <user>", args[0]);
        std::process::exit(2);
    }
    let db_path = &args[1];
    let csv_path = &args[2];
    let context = ImportContext {
        project_id: args[3].clone(),
        imported_by: args[4].clone(),
    };

    let file_text = std::fs::read_to_string(csv_path)
        .with_context(|| format!("cannot read file {csv_path}"))?;

    let conn = db::open_sqlite_connection(db_path)
        .with_context(|| format!("cannot open database {db_path}"))?;
    db::init_schema(&conn).context("schema initialization failed")?;
    let conn = Arc::new(Mutex::new(conn));

    // all three adapters share the one connection
    let archive = OrderArchiveRepositoryImpl::with_connection(conn.clone());
    let contacts = ContactRepositoryImpl::with_connection(conn.clone());
    let ledger = AuditLedgerRepositoryImpl::with_connection(conn);

    let importer = SalesImporterImpl::new(archive, contacts, ledger, ImportConfig::default())
        .with_observer(Box::new(|p: &ImportProgress| {
            info!(
                percent = p.percent,
                completed = p.completed_batches,
                total = p.total_batches,
                "{}",
                p.stage
            );
        }));

    let summary = match importer.run_import(&file_text, &context).await {
        Ok(summary) => summary,
        Err(e) => {
            if let Some(hint) = e.user_hint() {
                eprintln!("{hint}");
            }
            bail!("import failed: {e}");
        }
    };

    println!("{}", counted_line("import.summary.total_rows", summary.total_rows));
    println!(
        "{}",
        counted_line("import.summary.orders_added", summary.historical_orders_added)
    );
    println!(
        "{}",
        counted_line(
            "import.summary.orders_already_exist",
            summary.orders_already_exist
        )
    );
    println!(
        "{}",
        counted_line("import.summary.contacts_created", summary.contacts_created)
    );
    println!(
        "{}",
        counted_line("import.summary.contacts_enriched", summary.contacts_enriched)
    );
    println!(
        "{}",
        counted_line("import.summary.ledger_added", summary.ledger_records_added)
    );
    if summary.cancelled {
        println!("{}", t("import.summary.cancelled"));
    }
    if !summary.errors.is_empty() {
        println!("{}", counted_line("import.error.row_count", summary.errors.len()));
        for error in summary.display_errors() {
            println!("  {}: {}", error.transaction_id, error.message);
        }
        let remaining = summary.errors.len() - summary.display_errors().len();
        if remaining > 0 {
            println!("  {}", counted_line("import.summary.more_errors", remaining));
        }
    }

    Ok(())
}
