//! Demo data for a fresh store.

use chrono::{DateTime, Duration, Utc};
use halo_domain::{
    Customer, Deductions, Employee, FundAccount, FundAccountType, PaymentMethod, Product, Task,
    TaskComment, TaskPriority, TaskStatus, Transaction, TransactionKind, Vendor,
};
use rust_decimal::Decimal;

use crate::{
    storage::{RecordStore, Records, COLLECTIONS},
    CoreError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub fund_accounts: usize,
    pub transactions: usize,
    pub tasks: usize,
    pub employees: usize,
    pub vendors: usize,
    pub customers: usize,
    pub products: usize,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.fund_accounts
            + self.transactions
            + self.tasks
            + self.employees
            + self.vendors
            + self.customers
            + self.products
    }
}

fn php(amount: i64) -> Decimal {
    Decimal::from(amount)
}

fn cents(amount: i64) -> Decimal {
    Decimal::new(amount, 2)
}

/// Returns true when no collection holds any record.
pub fn is_empty(store: &dyn RecordStore) -> Result<bool, CoreError> {
    for name in COLLECTIONS {
        if !store.load_collection(name)?.is_empty() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Populates an empty store with the demo data set, dated relative to `now`.
/// A store that already holds records is left untouched.
pub fn seed_demo_data(store: &dyn RecordStore, now: DateTime<Utc>) -> Result<SeedReport, CoreError> {
    if !is_empty(store)? {
        tracing::info!("store already populated, skipping demo data");
        return Ok(SeedReport::default());
    }
    let days_ago = |days: i64| now - Duration::days(days);

    let mut accounts = vec![
        FundAccount::new("PayPal", FundAccountType::Digital, "PayPal", php(37_500)),
        FundAccount::new("GCash", FundAccountType::Digital, "GCash", php(125_000)),
        FundAccount::new("Bank Transfer (EastWest)", FundAccountType::Checking, "EastWest", php(1_025_678)),
        FundAccount::new("Bank Transfer (RCBC Bank)", FundAccountType::Checking, "RCBC", php(2_332_164)),
        FundAccount::new("Cash", FundAccountType::Cash, "Cash", php(50_000)),
    ];
    for (account, age) in accounts.iter_mut().zip([1, 0, 2, 1, 3]) {
        account.last_updated = days_ago(age);
    }

    let income = |age: i64, amount: Decimal, category: &str, method: PaymentMethod| {
        let mut txn = Transaction::income(days_ago(age), amount, category, method, category);
        txn.created_at = days_ago(age);
        txn.updated_at = days_ago(age);
        txn
    };
    let expense = |age: i64, amount: Decimal, category: &str, method: PaymentMethod, vendor: &str, invoice: Option<&str>| {
        let mut txn = Transaction::expense(days_ago(age), amount, category, method, vendor);
        txn.kind = TransactionKind::Expense {
            vendor: vendor.to_string(),
            invoice_no: invoice.map(str::to_string),
        };
        txn.created_at = days_ago(age);
        txn.updated_at = days_ago(age);
        txn
    };
    let transactions = vec![
        income(1, php(15_200), "Accommodation", PaymentMethod::PayPal),
        expense(2, php(2_500), "F&B", PaymentMethod::GCash, "Local Market", Some("LM-001")),
        income(3, cents(3_800_288), "Accommodation", PaymentMethod::EastWest),
        expense(4, php(1_200), "Utilities", PaymentMethod::Cash, "Electric Co.", None),
        income(5, php(19_530), "Accommodation", PaymentMethod::Rcbc),
        expense(6, php(5_500), "Repairs", PaymentMethod::Cash, "Handyman Services", Some("HS-2023-11-20")),
        income(7, php(22_000), "Accommodation", PaymentMethod::GCash),
        expense(8, php(780), "Telecom", PaymentMethod::PayPal, "Internet Provider", None),
        income(9, php(12_500), "F&B", PaymentMethod::Cash),
        expense(10, php(3_200), "Materials", PaymentMethod::Rcbc, "Hardware Store", Some("INV-9876")),
        income(11, php(8_500), "Tours", PaymentMethod::GCash),
        expense(12, php(15_000), "Labor", PaymentMethod::Cash, "Construction Crew", Some("CC-001")),
        expense(13, php(20_000), "Professional Services", PaymentMethod::Rcbc, "Accounting Firm", Some("AF-2023-01")),
    ];

    let mut pantry = Task::new("Restock pantry items", TaskPriority::Medium, "staff-1", "admin")
        .with_due_date(now + Duration::days(2));
    pantry.created_at = days_ago(5);
    let mut aircon = Task::new("Service air conditioning units", TaskPriority::High, "manager-1", "admin")
        .with_due_date(now + Duration::days(4));
    aircon.status = TaskStatus::InProgress;
    aircon.created_at = days_ago(7);
    aircon.comments = vec![
        TaskComment {
            user_id: "admin".into(),
            text: "Scheduled with the technician for Tuesday.".into(),
            created_at: days_ago(3),
        },
        TaskComment {
            user_id: "manager-1".into(),
            text: "Technician confirmed. All units will be checked.".into(),
            created_at: days_ago(2),
        },
    ];
    let mut website = Task::new("Update website with new photos", TaskPriority::Low, "manager-1", "admin");
    website.status = TaskStatus::Completed;
    let mut report = Task::new("Prepare monthly expense report", TaskPriority::High, "admin", "admin")
        .with_due_date(now);
    report.status = TaskStatus::InProgress;
    let mut follow_up = Task::new("Follow up on vendor invoice #5821", TaskPriority::Medium, "admin", "admin");
    follow_up.description =
        Some("Waiting for confirmation from the vendor about the price discrepancy.".into());
    let fire_safety = Task::new("Schedule fire safety inspection", TaskPriority::High, "manager-1", "admin")
        .with_due_date(now + Duration::days(10));
    let tasks = vec![pantry, aircon, website, report, follow_up, fire_safety];

    let hired = |days: i64| days_ago(days).date_naive();
    let employees = vec![
        Employee::new("David Le", "Resort Manager", php(300), hired(365))
            .with_deductions(Deductions::new(php(1_125), cents(43_750), php(100), cents(247_917))),
        Employee::new("Quennie O", "Front Desk Officer", php(150), hired(180))
            .with_deductions(Deductions::new(cents(56_250), cents(21_875), php(100), Decimal::ZERO)),
        Employee::new("Ron Ron", "Maintenance Staff", php(120), hired(90))
            .with_deductions(Deductions::new(php(450), php(175), php(100), Decimal::ZERO)),
        Employee::new("Accountan", "Housekeeping Supervisor", php(130), hired(600))
            .with_deductions(Deductions::new(php(495), cents(19_250), php(100), Decimal::ZERO)),
    ];

    let vendor = |name: &str, category: &str, contact: &str, email: &str, phone: &str| {
        let mut vendor = Vendor::new(name, category);
        vendor.contact_person = Some(contact.into());
        vendor.email = Some(email.into());
        vendor.phone = Some(phone.into());
        vendor
    };
    let vendors = vec![
        vendor("Local Market", "F&B", "Maria Dela Cruz", "maria@localmarket.com", "09171234567"),
        vendor("Electric Co.", "Utilities", "Juan Santos", "billing@electricco.ph", "0288887777"),
        vendor("Handyman Services", "Repairs", "Bob Builder", "bob@handyman.com", "09229876543"),
        vendor("Internet Provider", "Telecom", "Support Desk", "support@internet.ph", "0277301000"),
        vendor("Hardware Store", "Materials", "Henry Sy", "contact@hardware.com", "09181112222"),
        vendor("Construction Crew", "Labor", "Manny P.", "manny@construction.com", "09191234567"),
        vendor("Accounting Firm", "Professional Services", "Ms. Auditor", "audit@firm.com", "0281234567"),
    ];

    let customers = vec![
        Customer::new("Resort Guest A", "Villa 1, Luxury Resort, Palawan", "guest.a@example.com"),
        Customer::new("Modular Home Client B", "123 Main St, Metro Manila", "client.b@example.com"),
        Customer::new("Event Organizer C", "456 Business Park, Cebu City", "events.c@example.com"),
    ];

    let products = vec![
        Product::new("Overnight Stay - Deluxe Villa", php(15_000)),
        Product::new("Island Hopping Tour (per person)", php(2_500)),
        Product::new("Restaurant - Dinner Set", php(1_800)),
        Product::new("Modular Unit - Design Consultation", php(5_000)),
        Product::new("Modular Unit - Base Model", php(850_000)),
        Product::new("Construction Materials Delivery", php(3_500)),
    ];

    let report = SeedReport {
        fund_accounts: Records::add_batch(store, accounts)?.len(),
        transactions: Records::add_batch(store, transactions)?.len(),
        tasks: Records::add_batch(store, tasks)?.len(),
        employees: Records::add_batch(store, employees)?.len(),
        vendors: Records::add_batch(store, vendors)?.len(),
        customers: Records::add_batch(store, customers)?.len(),
        products: Records::add_batch(store, products)?.len(),
    };
    tracing::info!(records = report.total(), "seeded demo data");
    Ok(report)
}
