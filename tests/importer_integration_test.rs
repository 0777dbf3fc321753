// ==========================================
// SalesImporter integration tests
// ==========================================
// Target: the full pipeline against a real SQLite database, file text in,
// summary and store contents out
// ==========================================


use sales_csv_recon::domain::HistoricalOrder;
use sales_csv_recon::importer::{ImportError, SalesImporter};
use sales_csv_recon::repository::{
    AuditLedgerRepositoryImpl, ContactRepositoryImpl, OrderArchiveRepository, RepositoryError,
    RepositoryResult,
};
use sales_csv_recon::{db, logging, ImportConfig, ImportContext, SalesImporterImpl};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use test_helpers::{
    count_rows, create_test_db, create_test_importer, seed_archived_order, seed_contact,
    seed_ledger_record,
};

const PROJECT: &str = "proj-1";

fn test_context() -> ImportContext {
    ImportContext {
        project_id: PROJECT.to_string(),
        imported_by: "tester@crm".to_string(),
    }
}

// Three rows: HP001 brand new, HP002 already archived and already in the
// ledger, HP003 has no buyer email and a zero net value.
const THREE_ROW_EXPORT: &str = "\
Transação;Email;Nome do Comprador;DDD;Telefone;Status;Valor Total;Taxa Hotmart;Você Recebeu;Forma de Pagamento;Data da Transação
HP001;ana@exemplo.com;Ana Lima;11;99999-0001;Aprovado;R$ 297,00;R$ 29,70;R$ 267,30;credit_card;01/02/2024 10:30:00
HP002;bruno@exemplo.com;Bruno Costa;21;98888-0002;Aprovado;R$ 497,00;R$ 49,70;R$ 447,30;pix;02/02/2024 14:00:00
HP003;;;;;Cancelado;R$ 0,00;R$ 0,00;R$ 0,00;;03/02/2024
";

#[tokio::test]
async fn test_three_row_scenario() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().expect("failed to create test db");

    // HP002 was already imported by an earlier (partial) run
    seed_archived_order(&db_path, PROJECT, "hotmart", "HP002").unwrap();
    seed_ledger_record(&db_path, PROJECT, "HP002").unwrap();

    let importer = create_test_importer(&db_path, ImportConfig::default());
    let summary = importer
        .run_import(THREE_ROW_EXPORT, &test_context())
        .await
        .expect("import should succeed");

    assert_eq!(summary.total_rows, 3);
    assert_eq!(summary.historical_orders_added, 2);
    assert_eq!(summary.orders_already_exist, 1);
    assert_eq!(summary.contacts_created, 2);
    assert_eq!(summary.contacts_enriched, 0);
    assert_eq!(summary.ledger_records_added, 1);
    assert!(summary.errors.is_empty());
    assert!(!summary.cancelled);

    // 1 seeded + 2 inserted
    assert_eq!(count_rows(&db_path, "historical_order", PROJECT), 3);
    assert_eq!(count_rows(&db_path, "contact", PROJECT), 2);
    assert_eq!(count_rows(&db_path, "contact_provenance_event", PROJECT), 2);
    assert_eq!(count_rows(&db_path, "audit_ledger", PROJECT), 2);
}

#[tokio::test]
async fn test_import_twice_is_idempotent() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().expect("failed to create test db");

    let importer = create_test_importer(&db_path, ImportConfig::default());
    importer
        .run_import(THREE_ROW_EXPORT, &test_context())
        .await
        .expect("first import should succeed");

    let second = importer
        .run_import(THREE_ROW_EXPORT, &test_context())
        .await
        .expect("second import should succeed");

    // everything already there: only skip counters move
    assert_eq!(second.historical_orders_added, 0);
    assert_eq!(second.orders_already_exist, 3);
    assert_eq!(second.contacts_created, 0);
    assert_eq!(second.contacts_enriched, 0);
    assert_eq!(second.ledger_records_added, 0);
    assert!(second.errors.is_empty());

    assert_eq!(count_rows(&db_path, "historical_order", PROJECT), 3);
    assert_eq!(count_rows(&db_path, "contact", PROJECT), 2);
    assert_eq!(count_rows(&db_path, "audit_ledger", PROJECT), 2);
}

#[tokio::test]
async fn test_existing_contact_fields_never_overwritten() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().expect("failed to create test db");

    // contact exists with a name but no phone
    let contact_id =
        seed_contact(&db_path, PROJECT, "ana@exemplo.com", Some("Ana Original"), None).unwrap();

    let importer = create_test_importer(&db_path, ImportConfig::default());
    let summary = importer
        .run_import(THREE_ROW_EXPORT, &test_context())
        .await
        .expect("import should succeed");

    // the row for ana fills the phone only; no new contact for her
    assert_eq!(summary.contacts_created, 1); // bruno
    assert_eq!(summary.contacts_enriched, 1); // ana

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let (name, phone): (String, Option<String>) = conn
        .query_row(
            "SELECT name, phone FROM contact WHERE id = ?1",
            rusqlite::params![contact_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();

    assert_eq!(name, "Ana Original");
    assert_eq!(phone.as_deref(), Some("(11) 99999-0001"));
}

#[tokio::test]
async fn test_contact_with_all_fields_present_is_untouched() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().expect("failed to create test db");

    seed_contact(
        &db_path,
        PROJECT,
        "ana@exemplo.com",
        Some("Ana Original"),
        Some("(99) 1234-5678"),
    )
    .unwrap();

    let importer = create_test_importer(&db_path, ImportConfig::default());
    let summary = importer
        .run_import(THREE_ROW_EXPORT, &test_context())
        .await
        .expect("import should succeed");

    // nothing to fill, so not even counted as enriched
    assert_eq!(summary.contacts_enriched, 0);
    assert_eq!(summary.contacts_created, 1);
}

#[tokio::test]
async fn test_unsupported_format_rejected() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().expect("failed to create test db");

    let importer = create_test_importer(&db_path, ImportConfig::default());
    let result = importer
        .run_import("Nome;Cidade;Observações\nAna;São Paulo;ok\n", &test_context())
        .await;

    assert!(matches!(result, Err(ImportError::UnsupportedFormat)));
    assert_eq!(count_rows(&db_path, "historical_order", PROJECT), 0);
}

#[tokio::test]
async fn test_missing_transaction_column_rejected() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().expect("failed to create test db");

    // detection passes (status + email + valor total) but the mandatory
    // transaction column is absent
    let importer = create_test_importer(&db_path, ImportConfig::default());
    let result = importer
        .run_import(
            "Status;Email;Valor Total\nAprovado;ana@exemplo.com;R$ 10,00\n",
            &test_context(),
        )
        .await;

    assert!(matches!(result, Err(ImportError::MissingTransactionColumn)));
}

#[tokio::test]
async fn test_no_valid_rows_rejected() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().expect("failed to create test db");

    // every data row has an empty transaction id
    let importer = create_test_importer(&db_path, ImportConfig::default());
    let result = importer
        .run_import(
            "Transação;Status;Email\n;Aprovado;ana@exemplo.com\n;Cancelado;bruno@exemplo.com\n",
            &test_context(),
        )
        .await;

    assert!(matches!(result, Err(ImportError::NoValidRows)));
}

#[tokio::test]
async fn test_cancellation_at_batch_boundary() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().expect("failed to create test db");

    // one row per batch so the cancel lands between rows
    let config = ImportConfig {
        batch_size: 1,
        ..Default::default()
    };
    let importer = create_test_importer(&db_path, config);

    // cancel as soon as the first progress snapshot arrives
    let handle = importer.cancel_handle();
    let importer = importer.with_observer(Box::new(
        move |_progress: &sales_csv_recon::ImportProgress| {
            handle.cancel();
        },
    ));

    let summary = importer
        .run_import(THREE_ROW_EXPORT, &test_context())
        .await
        .expect("cancelled run still returns a summary");

    assert!(summary.cancelled);
    // the first batch completed before the flag was observed
    assert_eq!(summary.historical_orders_added, 1);
    assert_eq!(count_rows(&db_path, "historical_order", PROJECT), 1);
}

/// Archive adapter whose inserts always fail with an infrastructure error.
struct BrokenArchive;

#[async_trait::async_trait]
impl OrderArchiveRepository for BrokenArchive {
    async fn fetch_existing_transaction_ids(
        &self,
        _project_id: &str,
        _provider: &str,
        _transaction_ids: &[String],
    ) -> RepositoryResult<HashSet<String>> {
        Ok(HashSet::new())
    }

    async fn insert_historical_order(&self, _order: HistoricalOrder) -> RepositoryResult<()> {
        Err(RepositoryError::DatabaseQueryError(
            "disk I/O error".to_string(),
        ))
    }

    async fn count_orders(&self, _project_id: &str) -> RepositoryResult<usize> {
        Ok(0)
    }
}

#[tokio::test]
async fn test_archive_failure_does_not_block_contact_and_ledger() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().expect("failed to create test db");

    // contacts and ledger stay healthy, every archive insert fails
    let conn = db::open_sqlite_connection(&db_path).unwrap();
    let conn = Arc::new(Mutex::new(conn));
    let contacts = ContactRepositoryImpl::with_connection(conn.clone());
    let ledger = AuditLedgerRepositoryImpl::with_connection(conn);
    let importer =
        SalesImporterImpl::new(BrokenArchive, contacts, ledger, ImportConfig::default());

    let summary = importer
        .run_import(THREE_ROW_EXPORT, &test_context())
        .await
        .expect("row-level failures must not abort the run");

    // the archive pipeline failed for every row...
    assert_eq!(summary.historical_orders_added, 0);
    assert_eq!(summary.errors.len(), 3);
    for tx in ["HP001", "HP002", "HP003"] {
        assert!(
            summary
                .errors
                .iter()
                .any(|e| e.transaction_id == tx && e.message.contains("order archive")),
            "missing archive error for {tx}"
        );
    }

    // ...but the other two pipelines still landed for the same rows
    // (nothing is pre-seeded here, so both positive-value rows reach the
    // ledger; HP003 stays gated on its zero net value)
    assert_eq!(summary.contacts_created, 2);
    assert_eq!(summary.ledger_records_added, 2);
    assert_eq!(count_rows(&db_path, "contact", PROJECT), 2);
    assert_eq!(count_rows(&db_path, "audit_ledger", PROJECT), 2);
}

#[tokio::test]
async fn test_comma_separated_export_also_accepted() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().expect("failed to create test db");

    let importer = create_test_importer(&db_path, ImportConfig::default());
    let summary = importer
        .run_import(
            "Transação,Email,Status,\"Valor Total\"\nHP010,carla@exemplo.com,Aprovado,\"R$ 1.234,56\"\n",
            &test_context(),
        )
        .await
        .expect("import should succeed");

    assert_eq!(summary.historical_orders_added, 1);
    assert_eq!(summary.contacts_created, 1);

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let gross: f64 = conn
        .query_row(
            "SELECT gross_value FROM historical_order WHERE transaction_id = 'HP010'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(gross, 1234.56);
}
