use std::path::Path;

use halo_core::{start_of_day, TransactionFilter, TransactionService};
use halo_domain::{PaymentMethod, Transaction, TransactionType};

use crate::cli::commands::take_option;
use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::format::{money, parse_amount, parse_date, parse_enum, require, short_id};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Alignment, Table};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "transactions",
            "List transactions, newest first",
            "transactions [income|expense] [--search text] [--category name] [--method name] [--from date] [--to date]",
            cmd_transactions,
        ),
        CommandEntry::new(
            "transaction-add",
            "Record an income or expense",
            "transaction-add <income|expense> <amount> <category> <method> <source|vendor> [date]",
            cmd_transaction_add,
        ),
        CommandEntry::new(
            "import",
            "Import transactions from a CSV file",
            "import <file.csv>",
            cmd_import,
        ),
        CommandEntry::new(
            "export",
            "Export every transaction to a CSV file",
            "export <file.csv>",
            cmd_export,
        ),
    ]
}

fn cmd_transactions(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut args = args.to_vec();
    let filter = TransactionFilter {
        search: take_option(&mut args, "--search")?.map(str::to_string),
        category: take_option(&mut args, "--category")?.map(str::to_string),
        method: take_option(&mut args, "--method")?.map(PaymentMethod::from),
        from: take_option(&mut args, "--from")?.map(parse_date).transpose()?,
        to: take_option(&mut args, "--to")?.map(parse_date).transpose()?,
        kind: args
            .first()
            .map(|raw| parse_enum::<TransactionType>(raw))
            .transpose()?,
    };

    let transactions = context.office.transactions(&filter)?;
    if transactions.is_empty() {
        output::info("No transactions match.");
        return Ok(());
    }

    let currency = context.currency().to_string();
    let mut table = Table::new()
        .column("Id", Alignment::Left)
        .column("Date", Alignment::Left)
        .column("Type", Alignment::Left)
        .column("Category", Alignment::Left)
        .column("Method", Alignment::Left)
        .column("Counterparty", Alignment::Left)
        .column("Amount", Alignment::Right);
    let offset = context.office.offset();
    for txn in &transactions {
        table.row(vec![
            short_id(&txn.id).to_string(),
            txn.date.with_timezone(&offset).format("%Y-%m-%d").to_string(),
            txn.transaction_type().to_string(),
            txn.category.clone(),
            txn.method.to_string(),
            txn.counterparty().to_string(),
            money(txn.amount, &currency),
        ]);
    }
    output::info(table.render());
    output::info(format!("{} transaction(s).", transactions.len()));
    Ok(())
}

fn cmd_transaction_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "transaction-add <income|expense> <amount> <category> <method> <source|vendor> [date]";
    let kind: TransactionType = parse_enum(require(args, 0, usage)?)?;
    let amount = parse_amount(require(args, 1, usage)?)?;
    let category = require(args, 2, usage)?;
    let method = PaymentMethod::from(require(args, 3, usage)?);
    let counterparty = require(args, 4, usage)?;
    let date = match args.get(5) {
        Some(raw) => start_of_day(parse_date(raw)?, context.office.offset()),
        None => context.office.now(),
    };

    let txn = match kind {
        TransactionType::Income => Transaction::income(date, amount, category, method, counterparty),
        TransactionType::Expense => Transaction::expense(date, amount, category, method, counterparty),
    };
    let saved = TransactionService::add(context.office.store(), txn)?;
    output::success(format!(
        "Recorded {} of {} ({}).",
        saved.transaction_type(),
        money(saved.amount, context.currency()),
        short_id(&saved.id)
    ));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = Path::new(require(args, 0, "import <file.csv>")?);
    let imported = context.office.import_transactions(path)?;
    output::success(format!(
        "Imported {} transaction(s) from {}.",
        imported.len(),
        path.display()
    ));
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = Path::new(require(args, 0, "export <file.csv>")?);
    let count = context.office.export_transactions(path)?;
    output::success(format!("Exported {count} transaction(s) to {}.", path.display()));
    Ok(())
}
