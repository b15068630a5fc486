use chrono::{NaiveDate, TimeZone, Utc};
use halo_core::{
    CoreError, EmployeeService, FundService, MemoryStore, Records, TaskPatch, TaskService,
    TransactionService, VendorService,
};
use halo_domain::{
    DeductionsPatch, Employee, EmployeePatch, FundAccount, FundAccountType, PaymentMethod, Task,
    TaskPriority, TaskStatus, Transaction, Vendor, VendorTransaction,
};
use rust_decimal_macros::dec;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
}

#[test]
fn employee_update_merges_deductions_and_delete_removes() {
    let store = MemoryStore::new();
    let employee = EmployeeService::add(&store, Employee::new("Ana", "Cashier", dec!(100), day(1))).unwrap();

    let patch = EmployeePatch {
        rate: Some(dec!(120)),
        deductions: DeductionsPatch {
            sss: Some(dec!(300)),
            ..DeductionsPatch::default()
        },
        ..EmployeePatch::default()
    };
    let updated = EmployeeService::update(&store, &employee.id, &patch).unwrap();
    assert_eq!(updated.rate, dec!(120));
    assert_eq!(updated.deductions.sss, dec!(300));
    assert_eq!(updated.deductions.tax, dec!(0));
    assert_eq!(updated.position, "Cashier");

    EmployeeService::delete(&store, &employee.id).unwrap();
    assert!(Records::list::<Employee>(&store).unwrap().is_empty());
    assert!(matches!(
        EmployeeService::delete(&store, &employee.id),
        Err(CoreError::NotFound { .. })
    ));
}

#[test]
fn deleting_a_vendor_cascades_its_transactions() {
    let store = MemoryStore::new();
    let kept = VendorService::add(&store, Vendor::new("Linen Supply", "Housekeeping")).unwrap();
    let dropped = VendorService::add(&store, Vendor::new("Electric Co.", "Utilities")).unwrap();
    VendorService::record(&store, VendorTransaction::charge(&kept.id, dec!(800), day(2))).unwrap();
    VendorService::record(&store, VendorTransaction::charge(&dropped.id, dec!(5000), day(2))).unwrap();
    let payment = VendorService::record(&store, VendorTransaction::payment(&dropped.id, dec!(1000), day(3))).unwrap();

    let now = Utc.with_ymd_and_hms(2024, 4, 4, 0, 0, 0).unwrap();
    let renamed = VendorService::update(&store, &kept.id, now, |vendor| vendor.name = "Linen Supply Co.".into()).unwrap();
    assert_eq!(renamed.name, "Linen Supply Co.");
    assert_eq!(renamed.updated_at, now);

    VendorService::delete_transaction(&store, &payment.id).unwrap();
    let balances = VendorService::list_with_balances(&store).unwrap();
    let electric = balances.iter().find(|entry| entry.vendor.id == dropped.id).unwrap();
    assert_eq!(electric.balance, dec!(5000));

    VendorService::delete(&store, &dropped.id).unwrap();
    let remaining: Vec<VendorTransaction> = Records::list(&store).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].vendor_id, kept.id);
}

#[test]
fn task_lifecycle_covers_patches_comments_and_attachments() {
    let store = MemoryStore::new();
    let now = Utc.with_ymd_and_hms(2024, 4, 5, 1, 0, 0).unwrap();
    let mut draft = Task::new("Restock minibar", TaskPriority::Low, "staff-1", "admin");
    draft.status = TaskStatus::Completed;
    let task = TaskService::create(&store, draft, now).unwrap();
    assert_eq!(task.status, TaskStatus::Todo);

    let patch = TaskPatch {
        priority: Some(TaskPriority::High),
        assignee: Some("manager-1".into()),
        ..TaskPatch::default()
    };
    let task = TaskService::update(&store, &task.id, &patch, now).unwrap();
    assert_eq!(task.priority, TaskPriority::High);
    assert_eq!(task.assignee, "manager-1");

    TaskService::comment(&store, &task.id, "admin", "Check room 12 first", now).unwrap();
    TaskService::comment(&store, &task.id, "staff-1", "On it", now).unwrap();
    let later = now + chrono::Duration::hours(2);
    let task = TaskService::edit_comment(&store, &task.id, 0, "Check room 14 first", later).unwrap();
    assert_eq!(task.comments[0].text, "Check room 14 first");
    assert_eq!(task.comments[0].created_at, later);

    let task = TaskService::delete_comment(&store, &task.id, 1, later).unwrap();
    assert_eq!(task.comments.len(), 1);
    assert!(TaskService::delete_comment(&store, &task.id, 5, later).is_err());

    TaskService::attach(&store, &task.id, "receipt.pdf", later).unwrap();
    let task = TaskService::attach(&store, &task.id, "photo.jpg", later).unwrap();
    assert_eq!(task.attachments, vec!["receipt.pdf", "photo.jpg"]);
    let task = TaskService::detach(&store, &task.id, "receipt.pdf", later).unwrap();
    assert_eq!(task.attachments, vec!["photo.jpg"]);

    TaskService::delete(&store, &task.id).unwrap();
    assert!(Records::list::<Task>(&store).unwrap().is_empty());
}

#[test]
fn transactions_and_funds_can_be_corrected_or_removed() {
    let store = MemoryStore::new();
    let date = Utc.with_ymd_and_hms(2024, 4, 6, 2, 0, 0).unwrap();
    let txn = TransactionService::add(
        &store,
        Transaction::income(date, dec!(1500), "Room", PaymentMethod::Cash, "Walk-in"),
    )
    .unwrap();
    let later = date + chrono::Duration::hours(1);
    let fixed = TransactionService::update(&store, &txn.id, later, |txn| txn.amount = dec!(1550)).unwrap();
    assert_eq!(fixed.amount, dec!(1550));
    assert_eq!(fixed.updated_at, later);
    TransactionService::delete(&store, &txn.id).unwrap();
    assert!(Records::list::<Transaction>(&store).unwrap().is_empty());

    let account = FundService::add(
        &store,
        FundAccount::new("Petty Cash", FundAccountType::Cash, "Front desk", dec!(5000)),
    )
    .unwrap();
    FundService::add(
        &store,
        FundAccount::new("Operating", FundAccountType::Checking, "BDO", dec!(20000)),
    )
    .unwrap();
    assert_eq!(FundService::totals(&store).unwrap().net_worth, dec!(25000));
    FundService::delete(&store, &account.id).unwrap();
    assert_eq!(FundService::totals(&store).unwrap().total_assets, dec!(20000));
}
