// ==========================================
// Repository integration tests
// ==========================================
// Target: the rusqlite adapters against a real database file - typed
// duplicate errors, bulk existence fetches, patch semantics
// ==========================================


use chrono::Utc;
use sales_csv_recon::domain::{ContactPatch, HistoricalOrder, LedgerRecord, NewContact};
use sales_csv_recon::repository::{
    AuditLedgerRepository, AuditLedgerRepositoryImpl, ContactRepository, ContactRepositoryImpl,
    OrderArchiveRepository, OrderArchiveRepositoryImpl, RepositoryError,
};
use test_helpers::{create_test_db, seed_contact};

const PROJECT: &str = "proj-1";

fn sample_order(transaction_id: &str) -> HistoricalOrder {
    HistoricalOrder {
        project_id: PROJECT.to_string(),
        provider: "hotmart".to_string(),
        transaction_id: transaction_id.to_string(),
        buyer_email: Some("ana@exemplo.com".to_string()),
        buyer_name: Some("Ana Lima".to_string()),
        product_name: Some("Curso X".to_string()),
        offer_code: None,
        gross_value: 297.0,
        platform_fee: 29.7,
        affiliate_commission: 0.0,
        coproducer_commission: 0.0,
        taxes: 0.0,
        net_value: 267.3,
        currency: "BRL".to_string(),
        status: "APPROVED".to_string(),
        payment_method: Some("credit_card".to_string()),
        installments: Some(1),
        order_date: None,
        confirmation_date: None,
        source: "csv".to_string(),
        imported_by: "tester@crm".to_string(),
        created_at: Utc::now(),
    }
}

fn sample_ledger(transaction_id: &str) -> LedgerRecord {
    LedgerRecord {
        project_id: PROJECT.to_string(),
        transaction_id: transaction_id.to_string(),
        gross_value: 297.0,
        platform_fee: 29.7,
        affiliate_commission: 0.0,
        coproducer_commission: 0.0,
        taxes: 0.0,
        net_value: 267.3,
        currency: "BRL".to_string(),
        exchange_rate: 1.0,
        payout_date: None,
        status: "APPROVED".to_string(),
        created_at: Utc::now(),
    }
}

fn sample_contact(email: &str) -> NewContact {
    NewContact {
        id: uuid::Uuid::new_v4().to_string(),
        project_id: PROJECT.to_string(),
        email: email.to_string(),
        name: Some("Ana Lima".to_string()),
        phone: None,
        source: "csv_import".to_string(),
        status: "lead".to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_duplicate_order_insert_is_typed_already_exists() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = OrderArchiveRepositoryImpl::new(&db_path).unwrap();

    repo.insert_historical_order(sample_order("HP001"))
        .await
        .expect("first insert should succeed");

    let err = repo
        .insert_historical_order(sample_order("HP001"))
        .await
        .expect_err("second insert must fail");

    assert!(err.is_already_exists(), "got {err:?}");
    match err {
        RepositoryError::AlreadyExists { entity, key } => {
            assert_eq!(entity, "historical_order");
            assert_eq!(key, "HP001");
        }
        other => panic!("expected AlreadyExists, got {other:?}"),
    }
}

#[tokio::test]
async fn test_same_transaction_under_other_provider_is_not_a_duplicate() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = OrderArchiveRepositoryImpl::new(&db_path).unwrap();

    repo.insert_historical_order(sample_order("HP001")).await.unwrap();

    let mut other = sample_order("HP001");
    other.provider = "other-vendor".to_string();
    repo.insert_historical_order(other)
        .await
        .expect("different provider is a different business key");

    assert_eq!(repo.count_orders(PROJECT).await.unwrap(), 2);
}

#[tokio::test]
async fn test_bulk_existence_fetch_returns_only_present_ids() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = OrderArchiveRepositoryImpl::new(&db_path).unwrap();

    repo.insert_historical_order(sample_order("HP001")).await.unwrap();
    repo.insert_historical_order(sample_order("HP003")).await.unwrap();

    let ids = vec![
        "HP001".to_string(),
        "HP002".to_string(),
        "HP003".to_string(),
    ];
    let existing = repo
        .fetch_existing_transaction_ids(PROJECT, "hotmart", &ids)
        .await
        .unwrap();

    assert_eq!(existing.len(), 2);
    assert!(existing.contains("HP001"));
    assert!(existing.contains("HP003"));
    assert!(!existing.contains("HP002"));
}

#[tokio::test]
async fn test_bulk_existence_fetch_over_chunk_boundary() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = AuditLedgerRepositoryImpl::new(&db_path).unwrap();

    repo.insert_ledger_record(sample_ledger("HP0000")).await.unwrap();
    repo.insert_ledger_record(sample_ledger("HP0700")).await.unwrap();

    // more ids than one IN-clause chunk holds
    let ids: Vec<String> = (0..1200).map(|i| format!("HP{i:04}")).collect();
    let existing = repo
        .fetch_existing_transaction_ids(PROJECT, &ids)
        .await
        .unwrap();

    assert_eq!(existing.len(), 2);
    assert!(existing.contains("HP0000"));
    assert!(existing.contains("HP0700"));
}

#[tokio::test]
async fn test_duplicate_contact_email_is_typed_already_exists() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = ContactRepositoryImpl::new(&db_path).unwrap();

    repo.insert_contact(sample_contact("ana@exemplo.com"))
        .await
        .unwrap();

    let err = repo
        .insert_contact(sample_contact("ana@exemplo.com"))
        .await
        .expect_err("duplicate (project, email) must fail");
    assert!(err.is_already_exists(), "got {err:?}");

    // the rejected duplicate left no second row behind
    assert_eq!(repo.count_contacts(PROJECT).await.unwrap(), 1);
}

#[tokio::test]
async fn test_contact_patch_writes_only_given_fields() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let contact_id = seed_contact(
        &db_path,
        PROJECT,
        "ana@exemplo.com",
        Some("Ana Original"),
        None,
    )
    .unwrap();
    let repo = ContactRepositoryImpl::new(&db_path).unwrap();

    repo.update_contact_fields(
        &contact_id,
        ContactPatch {
            name: None,
            phone: Some("(11) 99999-0001".to_string()),
        },
    )
    .await
    .unwrap();

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let (name, phone): (String, String) = conn
        .query_row(
            "SELECT name, phone FROM contact WHERE id = ?1",
            rusqlite::params![contact_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();

    assert_eq!(name, "Ana Original");
    assert_eq!(phone, "(11) 99999-0001");
}

#[tokio::test]
async fn test_contact_patch_on_missing_contact_is_not_found() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = ContactRepositoryImpl::new(&db_path).unwrap();

    let err = repo
        .update_contact_fields(
            "no-such-id",
            ContactPatch {
                name: Some("Ana".to_string()),
                phone: None,
            },
        )
        .await
        .expect_err("patching a missing contact must fail");

    assert!(matches!(err, RepositoryError::NotFound { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_empty_patch_is_a_no_op() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = ContactRepositoryImpl::new(&db_path).unwrap();

    // no row is touched, so even a bogus id succeeds
    repo.update_contact_fields("no-such-id", ContactPatch::default())
        .await
        .expect("empty patch must not issue a write");
}

#[tokio::test]
async fn test_fetch_contacts_by_email_snapshot() {
    let (_tmp, db_path) = create_test_db().unwrap();
    seed_contact(&db_path, PROJECT, "ana@exemplo.com", Some("Ana"), None).unwrap();
    seed_contact(&db_path, PROJECT, "bruno@exemplo.com", None, None).unwrap();
    let repo = ContactRepositoryImpl::new(&db_path).unwrap();

    let emails = vec![
        "ana@exemplo.com".to_string(),
        "carla@exemplo.com".to_string(),
    ];
    let found = repo.fetch_contacts_by_email(PROJECT, &emails).await.unwrap();

    assert_eq!(found.len(), 1);
    let ana = &found["ana@exemplo.com"];
    assert_eq!(ana.name.as_deref(), Some("Ana"));
    assert!(ana.phone.is_none());
}

#[tokio::test]
async fn test_duplicate_ledger_insert_is_typed_already_exists() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = AuditLedgerRepositoryImpl::new(&db_path).unwrap();

    repo.insert_ledger_record(sample_ledger("HP001")).await.unwrap();
    let err = repo
        .insert_ledger_record(sample_ledger("HP001"))
        .await
        .expect_err("duplicate (project, transaction) must fail");

    assert!(err.is_already_exists(), "got {err:?}");
    assert_eq!(repo.count_records(PROJECT).await.unwrap(), 1);
}
