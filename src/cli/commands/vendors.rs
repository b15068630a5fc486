use halo_core::VendorService;
use halo_domain::{Vendor, VendorTransaction, VendorTransactionType};

use crate::cli::commands::lookup;
use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::format::{money, parse_amount, require, short_id};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Alignment, Table};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "vendors",
            "Vendors with their outstanding balances",
            "vendors",
            cmd_vendors,
        ),
        CommandEntry::new(
            "vendor-add",
            "Add a vendor",
            "vendor-add <name> <category>",
            cmd_vendor_add,
        ),
        CommandEntry::new(
            "vendor-charge",
            "Record a charge owed to a vendor",
            "vendor-charge <vendor> <amount> [note...]",
            cmd_vendor_charge,
        ),
        CommandEntry::new(
            "vendor-pay",
            "Record a payment made to a vendor",
            "vendor-pay <vendor> <amount> [note...]",
            cmd_vendor_pay,
        ),
        CommandEntry::new(
            "vendor-history",
            "Charges and payments for one vendor",
            "vendor-history <vendor>",
            cmd_vendor_history,
        ),
    ]
}

fn vendor_name(vendor: &Vendor) -> &str {
    &vendor.name
}

fn cmd_vendors(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let balances = VendorService::list_with_balances(context.office.store())?;
    if balances.is_empty() {
        output::info("No vendors yet.");
        return Ok(());
    }
    let currency = context.currency().to_string();
    let mut table = Table::new()
        .column("Id", Alignment::Left)
        .column("Vendor", Alignment::Left)
        .column("Category", Alignment::Left)
        .column("Balance", Alignment::Right);
    for entry in &balances {
        table.row(vec![
            short_id(&entry.vendor.id).to_string(),
            entry.vendor.name.clone(),
            entry.vendor.category.clone(),
            money(entry.balance, &currency),
        ]);
    }
    output::info(table.render());
    output::info(format!(
        "Total payable: {}",
        money(VendorService::total_payable(&balances), &currency)
    ));
    Ok(())
}

fn cmd_vendor_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "vendor-add <name> <category>";
    let name = require(args, 0, usage)?;
    let category = require(args, 1, usage)?;
    let saved = VendorService::add(context.office.store(), Vendor::new(name, category))?;
    output::success(format!("Added vendor {} ({}).", saved.name, short_id(&saved.id)));
    Ok(())
}

fn cmd_vendor_charge(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    record(context, args, VendorTransactionType::Charge, "vendor-charge <vendor> <amount> [note...]")
}

fn cmd_vendor_pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    record(context, args, VendorTransactionType::Payment, "vendor-pay <vendor> <amount> [note...]")
}

fn record(
    context: &mut ShellContext,
    args: &[&str],
    kind: VendorTransactionType,
    usage: &str,
) -> CommandResult {
    let vendor = lookup::<Vendor>(context, require(args, 0, usage)?, vendor_name)?;
    let amount = parse_amount(require(args, 1, usage)?)?;
    let today = context.office.today();
    let mut txn = match kind {
        VendorTransactionType::Charge => VendorTransaction::charge(&vendor.id, amount, today),
        VendorTransactionType::Payment => VendorTransaction::payment(&vendor.id, amount, today),
    };
    if args.len() > 2 {
        txn = txn.with_note(args[2..].join(" "));
    }
    let saved = VendorService::record(context.office.store(), txn)?;

    let currency = context.currency().to_string();
    let balance = VendorService::list_with_balances(context.office.store())?
        .into_iter()
        .find(|entry| entry.vendor.id == vendor.id)
        .map(|entry| entry.balance)
        .unwrap_or_default();
    output::success(format!(
        "Recorded {} of {} for {}. Balance now {}.",
        saved.kind,
        money(saved.amount, &currency),
        vendor.name,
        money(balance, &currency)
    ));
    Ok(())
}

fn cmd_vendor_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let vendor = lookup::<Vendor>(context, require(args, 0, "vendor-history <vendor>")?, vendor_name)?;
    let history = VendorService::history(context.office.store(), &vendor.id)?;
    output::section(format!("History: {}", vendor.name));
    if history.is_empty() {
        output::info("No charges or payments yet.");
        return Ok(());
    }
    let currency = context.currency().to_string();
    let mut table = Table::new()
        .column("Date", Alignment::Left)
        .column("Type", Alignment::Left)
        .column("Amount", Alignment::Right)
        .column("Note", Alignment::Left);
    for txn in &history {
        table.row(vec![
            txn.date.to_string(),
            txn.kind.to_string(),
            money(txn.amount, &currency),
            txn.note.clone().unwrap_or_default(),
        ]);
    }
    output::info(table.render());
    Ok(())
}
