mod common;

use predicates::prelude::*;
use predicates::str::contains;

use common::{script_cli, test_home};

#[test]
fn seeded_office_reports_a_summary() {
    let home = test_home();
    script_cli(&home)
        .write_stdin("seed\nsummary all\nvendors\nfunds\nexit\n")
        .assert()
        .success()
        .stdout(contains("Seeded"))
        .stdout(contains("=== Summary: All Time ==="))
        .stdout(contains("Transactions in period:"))
        .stdout(contains("Total payable:"))
        .stdout(contains("Net worth: PHP 3,570,342.00"));

    assert!(home.join("collections").join("transactions.json").exists());
    assert!(home.join("config").exists());
}

#[test]
fn seeding_twice_leaves_existing_records_alone() {
    let home = test_home();
    script_cli(&home).write_stdin("seed\n").assert().success();
    script_cli(&home)
        .write_stdin("seed\n")
        .assert()
        .success()
        .stdout(contains("demo data not loaded"));
}

#[test]
fn unknown_commands_suggest_the_closest_name() {
    let home = test_home();
    script_cli(&home)
        .write_stdin("vendorz\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `vendorz`"))
        .stdout(contains("Did you mean `vendors`?"));
}

#[test]
fn bad_arguments_point_at_help() {
    let home = test_home();
    script_cli(&home)
        .write_stdin("report 2024-13-01 2024-01-31\n")
        .assert()
        .success()
        .stdout(contains("ERROR:"))
        .stdout(contains("help <command>"));
}

#[test]
fn payroll_run_uses_hour_overrides_and_flags_negative_net() {
    let home = test_home();
    let script = "\
employee-add \"Ana Cruz\" Cook 100 2024-01-01 --sss 50
employee-add Ben Helper 10 2024-01-01 --tax 500
payroll-run 2024-01-01 2024-01-15 \"Ana Cruz=10\" Ben=1
payroll Ana
exit
";
    script_cli(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("PHP 950.00"))
        .stdout(contains("PHP -490.00"))
        .stdout(contains("WARNING: Net pay for Ben is negative"))
        .stdout(contains("Saved 2 payroll entries."))
        .stdout(contains("no employees match `Ana`"));
}

#[test]
fn invoices_draw_sequential_numbers() {
    let home = test_home();
    let script = "\
customer-add Acme billing@acme.test
product-add Widget 1000
invoice-next
invoice-create Acme Widget:2 --tax 12
invoice-next
invoices draft
";
    script_cli(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Next invoice number: INV-").count(2))
        .stdout(contains("-0001"))
        .stdout(contains("-0002"))
        .stdout(contains("Tax (12%): PHP 240.00"))
        .stdout(contains("Total: PHP 2,240.00"));
}

#[test]
fn vendor_payments_reduce_the_balance() {
    let home = test_home();
    let script = "\
vendor-add \"Local Market\" F&B
vendor-charge \"Local Market\" 5000 weekly produce
vendor-pay \"local market\" 1500
vendor-history \"Local Market\"
";
    script_cli(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Balance now PHP 5,000.00."))
        .stdout(contains("Balance now PHP 3,500.00."))
        .stdout(contains("weekly produce"));
}

#[test]
fn csv_import_feeds_reports_and_exports() {
    let home = test_home();
    let upload = home.join("upload.csv");
    std::fs::write(
        &upload,
        "date,type,category,method,amount,currency,source_or_vendor,notes\n\
         2024-03-01,income,Room Booking,GCash,15000,PHP,Walk-in,\n\
         2024-03-02,expense,Utilities,Cash,2500.50,PHP,Electric Co.,March bill\n",
    )
    .unwrap();
    let export = home.join("export.csv");
    let pnl = home.join("pnl.csv");

    let script = format!(
        "import {}\nreport 2024-03-01 2024-03-31\nexport {}\npnl-export 2024-03-01 2024-03-31 {}\n",
        upload.display(),
        export.display(),
        pnl.display()
    );
    script_cli(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Imported 2 transaction(s)"))
        .stdout(contains("PHP 15,000.00"))
        .stdout(contains("PHP 12,499.50"))
        .stdout(contains("Exported 2 transaction(s)"));

    let exported = std::fs::read_to_string(&export).unwrap();
    assert!(exported.starts_with("date,type,category,method,amount,currency,source_or_vendor,notes"));
    assert!(exported.contains("Room Booking"));
    assert!(pnl.exists());
}

#[test]
fn rejected_upload_imports_nothing() {
    let home = test_home();
    let upload = home.join("bad.csv");
    std::fs::write(&upload, "when,what\n2024-03-01,income\n").unwrap();
    script_cli(&home)
        .write_stdin(format!("import {}\ntransactions\n", upload.display()))
        .assert()
        .success()
        .stdout(contains("ERROR:"))
        .stdout(contains("No transactions match."));
}

#[test]
fn tasks_move_between_columns() {
    let home = test_home();
    let script = "\
task-add \"Fix pump\" high \"David Le\" 2024-05-01
task-status \"fix pump\" in-progress
task-comment \"Fix pump\" parts ordered
tasks
task-show \"Fix pump\"
";
    script_cli(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Created task `Fix pump` for David Le"))
        .stdout(contains("`Fix pump` is now in-progress."))
        .stdout(contains("=== in-progress (1) ==="))
        .stdout(contains("parts ordered"));
}

#[test]
fn config_changes_persist_between_sessions() {
    let home = test_home();
    script_cli(&home)
        .write_stdin("config set currency usd\nconfig backup before-tax\n")
        .assert()
        .success()
        .stdout(contains("currency set to usd."))
        .stdout(contains("Saved configuration backup config_before-tax_"));

    script_cli(&home)
        .write_stdin("config show\nconfig set utc_offset_minutes 9999\nconfig backups\n")
        .assert()
        .success()
        .stdout(contains("USD"))
        .stdout(contains("ERROR:"))
        .stdout(contains("config_before-tax_"));
}

#[test]
fn help_lists_commands_and_exit_stops_the_script() {
    let home = test_home();
    script_cli(&home)
        .write_stdin("help\nhelp payroll-run\nexit\nseed\n")
        .assert()
        .success()
        .stdout(contains("Available commands"))
        .stdout(contains("usage: payroll-run <start> <end>"))
        .stdout(contains("Seeded").not());
}

#[test]
fn oversized_figures_are_reported_not_fatal() {
    let home = test_home();
    let script = "\
employee-add Whale Owner 79228162514264337593543950335
employee-add Boss Owner 1000000000000000 2024-01-01
payroll-run 2024-01-01 2024-01-15 Boss=1000000000000000
employees
exit
";
    script_cli(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("is out of range"))
        .stdout(contains("is too large"))
        .stdout(contains("Boss"))
        .stdout(contains("Whale").not());
}

#[test]
fn ambiguous_names_list_the_candidates() {
    let home = test_home();
    let script = "\
employee-add Ana Cook 100
employee-add Ana Clerk 90
payroll-run 2024-01-01 2024-01-15 Ana=8
exit
";
    script_cli(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("`Ana` matches 2 employees; use a longer id:"))
        .stdout(contains("Ana (Cook)"))
        .stdout(contains("Ana (Clerk)"));
}
