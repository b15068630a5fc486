use std::{fs, thread, time::Duration};

use chrono::NaiveDate;
use halo_core::{
    InvoiceNumberSequence, RecordStore, Records, StoredInvoiceSequence, INVOICE_COUNTER_KEY,
};
use halo_domain::{Deductions, Employee};
use halo_storage_json::{JsonFileStore, StoragePaths};
use rust_decimal_macros::dec;
use serde_json::json;
use tempfile::tempdir;

fn pause() {
    thread::sleep(Duration::from_millis(5));
}

#[test]
fn collections_round_trip_through_disk() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(StoragePaths::under(dir.path())).expect("create store");

    let records = vec![json!({"id": "a", "amount": "10.50"}), json!({"id": "b"})];
    store.save_collection("transactions", &records).expect("save collection");

    let loaded = store.load_collection("transactions").expect("load collection");
    assert_eq!(loaded, records);
    let path = store.collection_path("transactions");
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn missing_collection_and_document_read_as_empty() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(StoragePaths::under(dir.path())).expect("create store");

    assert!(store.load_collection("vendors").expect("load").is_empty());
    assert!(store.load_document(INVOICE_COUNTER_KEY).expect("load").is_none());
}

#[test]
fn non_array_collection_file_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(StoragePaths::under(dir.path())).expect("create store");
    fs::write(store.collection_path("tasks"), "{\"id\": \"x\"}").expect("write file");

    let err = store.load_collection("tasks").unwrap_err();
    assert!(err.to_string().contains("record list"), "unexpected error: {err}");
}

#[test]
fn overwriting_a_collection_keeps_a_backup() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(StoragePaths::under(dir.path())).expect("create store");

    store
        .save_collection("customers", &[json!({"id": "c1", "name": "Resort Guest A"})])
        .expect("first save");
    assert!(store.list_backups("customers").expect("list").is_empty());

    pause();
    store.save_collection("customers", &[]).expect("second save");

    let backups = store.list_backups("customers").expect("list backups");
    assert_eq!(backups.len(), 1);
    assert!(backups[0].created_at.is_some());
    assert!(backups[0].id.starts_with("customers_"));

    let restored = store
        .restore_backup("customers", &backups[0].id)
        .expect("restore backup");
    assert_eq!(restored.len(), 1);
    assert_eq!(store.load_collection("customers").expect("load").len(), 1);
}

#[test]
fn backups_are_pruned_to_the_retention_limit() {
    let dir = tempdir().expect("tempdir");
    let store =
        JsonFileStore::with_retention(StoragePaths::under(dir.path()), 2).expect("create store");

    for round in 0..6 {
        store
            .save_collection("products", &[json!({"id": format!("p{round}")})])
            .expect("save");
        pause();
    }

    let backups = store.list_backups("products").expect("list backups");
    assert_eq!(backups.len(), 2);
    assert!(backups[0].created_at >= backups[1].created_at);

    // newest snapshot holds the state before the final save
    let newest = fs::read_to_string(&backups[0].path).expect("read backup");
    assert!(newest.contains("p4"));

    store
        .delete_backup("products", &backups[1].id)
        .expect("delete backup");
    assert_eq!(store.list_backups("products").expect("list").len(), 1);
}

#[test]
fn restoring_an_unknown_backup_fails() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(StoragePaths::under(dir.path())).expect("create store");
    assert!(store.restore_backup("tasks", "tasks_19700101_000000000.json").is_err());
}

#[test]
fn typed_records_persist_across_store_instances() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::under(dir.path());
    let employee = Employee::new(
        "Ron Ron",
        "Maintenance Staff",
        dec!(120),
        NaiveDate::from_ymd_opt(2024, 1, 15).expect("date"),
    )
    .with_deductions(Deductions::new(dec!(450), dec!(175), dec!(100), dec!(0)));

    {
        let store = JsonFileStore::new(paths.clone()).expect("create store");
        Records::add(&store, employee.clone()).expect("add employee");
    }

    let reopened = JsonFileStore::new(paths).expect("reopen store");
    let employees: Vec<Employee> = Records::list(&reopened).expect("list employees");
    assert_eq!(employees, vec![employee]);
    assert_eq!(employees[0].deductions.total(), dec!(725));

    let counts = reopened.collection_counts().expect("counts");
    assert_eq!(counts, vec![("employees".to_string(), 1)]);
}

#[test]
fn invoice_counter_survives_reopening() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::under(dir.path());
    {
        let store = JsonFileStore::new(paths.clone()).expect("create store");
        let mut sequence = StoredInvoiceSequence::new(&store);
        assert_eq!(sequence.next_invoice_number(2024).expect("next"), "INV-2024-0001");
        assert_eq!(sequence.next_invoice_number(2024).expect("next"), "INV-2024-0002");
    }

    let store = JsonFileStore::new(paths).expect("reopen store");
    let document = store
        .load_document(INVOICE_COUNTER_KEY)
        .expect("load counter")
        .expect("counter document");
    assert_eq!(document, json!({"issued": {"2024": 2}}));

    let mut sequence = StoredInvoiceSequence::new(&store);
    assert_eq!(sequence.next_invoice_number(2024).expect("next"), "INV-2024-0003");
}
