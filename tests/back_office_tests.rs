mod common;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use halo_backoffice::{BackOffice, InvoiceOptions};
use halo_config::Config;
use halo_core::{
    start_of_day, ExpenseGrouping, FixedClock, InvoiceService, PayrollService, Records,
    Timeframe, TransactionService,
};
use halo_domain::{Customer, Deductions, Employee, PaymentMethod, Product, Transaction};
use halo_storage_json::{JsonFileStore, StoragePaths};
use rust_decimal_macros::dec;

use common::test_home;

/// 2024-06-15 12:00 in the default +08:00 offset.
fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 4, 0, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn office_on_disk(store: &JsonFileStore) -> BackOffice {
    BackOffice::new(
        Arc::new(store.clone()),
        Arc::new(FixedClock(noon())),
        Config::default(),
    )
    .unwrap()
}

fn disk_store() -> JsonFileStore {
    JsonFileStore::new(StoragePaths::under(&test_home())).unwrap()
}

#[test]
fn last_seven_days_compares_against_the_week_before() {
    let store = disk_store();
    let office = office_on_disk(&store);
    let offset = office.offset();
    let at = |d: NaiveDate| start_of_day(d, offset) + chrono::Duration::hours(10);

    for txn in [
        Transaction::income(at(date(2024, 6, 14)), dec!(1000), "Room Booking", PaymentMethod::GCash, "Guest"),
        Transaction::expense(at(date(2024, 6, 10)), dec!(300), "Utilities", PaymentMethod::Cash, "Electric Co."),
        Transaction::income(at(date(2024, 6, 5)), dec!(500), "Room Booking", PaymentMethod::Cash, "Guest"),
        // Before both windows.
        Transaction::income(at(date(2024, 5, 1)), dec!(9999), "Room Booking", PaymentMethod::Cash, "Guest"),
    ] {
        TransactionService::add(office.store(), txn).unwrap();
    }

    let dashboard = office
        .dashboard(Timeframe::Last7Days, ExpenseGrouping::Vendor)
        .unwrap();
    let comparison = &dashboard.comparison;
    assert_eq!(comparison.current.income, dec!(1000));
    assert_eq!(comparison.current.expenses, dec!(300));
    assert_eq!(comparison.current.net, dec!(700));
    assert_eq!(comparison.current.count, 2);

    let previous = comparison.previous.as_ref().unwrap();
    assert_eq!(previous.income, dec!(500));
    assert_eq!(previous.expenses, dec!(0));

    let change = comparison.change.unwrap();
    assert_eq!(change.income, 100.0);
    assert_eq!(change.expenses, f64::INFINITY);

    let vendors = comparison.current.expenses_sorted();
    assert_eq!(vendors[0].key, "Electric Co.");
    assert_eq!(dashboard.daily.len(), 2);
}

#[test]
fn records_survive_reopening_the_store() {
    let store = disk_store();
    {
        let office = office_on_disk(&store);
        let employee = Employee::new("Ana Cruz", "Cook", dec!(150), date(2024, 1, 8))
            .with_deductions(Deductions::new(dec!(100), dec!(50), dec!(25), dec!(0)));
        Records::add(office.store(), employee).unwrap();
        office
            .run_payroll(date(2024, 6, 1), date(2024, 6, 15), &[])
            .unwrap();
    }

    let reopened = JsonFileStore::new(store.paths().clone()).unwrap();
    let office = office_on_disk(&reopened);
    let history = PayrollService::history(office.store(), None).unwrap();
    assert_eq!(history.len(), 1);
    // 80 default hours at 150 less 175 in deductions.
    assert_eq!(history[0].gross_pay, dec!(12000));
    assert_eq!(history[0].net_pay, dec!(11825));
}

#[test]
fn invoice_numbers_continue_across_sessions() {
    let store = disk_store();
    let (customer_id, product_id) = {
        let office = office_on_disk(&store);
        let customer = InvoiceService::add_customer(
            office.store(),
            Customer::new("Resort Guest A", "Villa 1", "guest@example.com"),
        )
        .unwrap();
        let product = InvoiceService::add_product(office.store(), Product::new("Dinner Set", dec!(1800))).unwrap();
        let first = office
            .create_invoice(&customer.id, &[(product.id.clone(), 1)], InvoiceOptions::default())
            .unwrap();
        assert_eq!(first.invoice_number, "INV-2024-0001");
        (customer.id, product.id)
    };

    let office = office_on_disk(&store);
    assert_eq!(office.next_invoice_number(), "INV-2024-0002");
    let second = office
        .create_invoice(
            &customer_id,
            &[(product_id, 2)],
            InvoiceOptions {
                non_vat: true,
                discount: dec!(100),
                ..InvoiceOptions::default()
            },
        )
        .unwrap();
    assert_eq!(second.invoice_number, "INV-2024-0002");
    assert_eq!(second.tax_amount, dec!(0));
    assert_eq!(second.total, dec!(3500));
    assert_eq!(second.due_date, date(2024, 6, 15));
}

#[test]
fn failed_invoice_does_not_consume_a_number() {
    let store = disk_store();
    let office = office_on_disk(&store);
    let customer = InvoiceService::add_customer(office.store(), Customer::new("Acme", "", "a@b.c")).unwrap();
    assert!(office
        .create_invoice(&customer.id, &[], InvoiceOptions::default())
        .is_err());
    assert_eq!(office.next_invoice_number(), "INV-2024-0001");
}

#[test]
fn export_then_import_round_trips_amounts() {
    let store = disk_store();
    let office = office_on_disk(&store);
    TransactionService::add(
        office.store(),
        Transaction::expense(noon(), dec!(2500.50), "Utilities", PaymentMethod::Rcbc, "Electric Co."),
    )
    .unwrap();

    let file = test_home().join("ledger.csv");
    assert_eq!(office.export_transactions(&file).unwrap(), 1);

    let other = office_on_disk(&disk_store());
    let imported = other.import_transactions(&file).unwrap();
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].amount, dec!(2500.50));
    assert_eq!(imported[0].counterparty(), "Electric Co.");
    assert_eq!(imported[0].method, PaymentMethod::Rcbc);
}
