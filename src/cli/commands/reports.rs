use std::path::Path;

use halo_core::{ExpenseGrouping, GroupTotal, ProfitAndLoss, Timeframe};

use crate::cli::commands::take_switch;
use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::format::{change, money, parse_date, require};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Alignment, Table};

const TOP_GROUPS: usize = 5;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Income, expenses and net against the previous period",
            "summary [today|7d|30d|ytd|all|custom <start> <end>] [--by-vendor] [--daily]",
            cmd_summary,
        ),
        CommandEntry::new(
            "report",
            "Profit and loss between two dates",
            "report <start> <end>",
            cmd_report,
        ),
        CommandEntry::new(
            "pnl-export",
            "Write a profit and loss statement to CSV",
            "pnl-export <start> <end> <file.csv>",
            cmd_pnl_export,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut args = args.to_vec();
    let grouping = if take_switch(&mut args, "--by-vendor") {
        ExpenseGrouping::Vendor
    } else {
        ExpenseGrouping::Category
    };
    let show_daily = take_switch(&mut args, "--daily");

    let default_timeframe = context.office.config().default_timeframe.clone();
    let name = args.first().copied().unwrap_or(default_timeframe.as_str());
    let custom_start = args.get(1).map(|raw| parse_date(raw)).transpose()?;
    let custom_end = args.get(2).map(|raw| parse_date(raw)).transpose()?;
    let timeframe = Timeframe::parse(name, custom_start, custom_end)?;

    let dashboard = context.office.dashboard(timeframe, grouping)?;
    let currency = context.currency().to_string();
    let comparison = &dashboard.comparison;

    output::section(format!("Summary: {}", dashboard.timeframe));
    let mut table = Table::new()
        .column("", Alignment::Left)
        .column("Current", Alignment::Right);
    if comparison.previous.is_some() {
        table = table
            .column("Previous", Alignment::Right)
            .column("Change", Alignment::Right);
    }
    let current = &comparison.current;
    let previous = comparison.previous.as_ref();
    let rows = [
        ("Income", current.income, previous.map(|p| p.income), comparison.change.map(|c| c.income)),
        (
            "Expenses",
            current.expenses,
            previous.map(|p| p.expenses),
            comparison.change.map(|c| c.expenses),
        ),
        ("Net", current.net, previous.map(|p| p.net), comparison.change.map(|c| c.net)),
    ];
    for (label, value, before, percent) in rows {
        let mut cells = vec![label.to_string(), money(value, &currency)];
        if let (Some(before), Some(percent)) = (before, percent) {
            cells.push(money(before, &currency));
            cells.push(change(percent));
        }
        table.row(cells);
    }
    output::info(table.render());
    output::info(format!("Transactions in period: {}", current.count));
    output::info(format!("Tasks due today: {}", dashboard.tasks_due_today));

    print_top_groups("Top income sources", &current.income_sorted(), &currency);
    let expense_title = match grouping {
        ExpenseGrouping::Category => "Top expense categories",
        ExpenseGrouping::Vendor => "Top vendors",
    };
    print_top_groups(expense_title, &current.expenses_sorted(), &currency);

    if show_daily && !dashboard.daily.is_empty() {
        let mut daily = Table::new()
            .column("Date", Alignment::Left)
            .column("Income", Alignment::Right)
            .column("Expenses", Alignment::Right);
        for day in &dashboard.daily {
            daily.row(vec![
                day.date.to_string(),
                money(day.income, &currency),
                money(day.expenses, &currency),
            ]);
        }
        output::section("Daily");
        output::info(daily.render());
    }
    Ok(())
}

fn print_top_groups(title: &str, groups: &[GroupTotal], currency: &str) {
    if groups.is_empty() {
        return;
    }
    let mut table = Table::new()
        .column(title, Alignment::Left)
        .column("Amount", Alignment::Right);
    for group in groups.iter().take(TOP_GROUPS) {
        table.row(vec![group.key.clone(), money(group.amount, currency)]);
    }
    output::info("");
    output::info(table.render());
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "report <start> <end>";
    let start = parse_date(require(args, 0, usage)?)?;
    let end = parse_date(require(args, 1, usage)?)?;
    let pnl = context.office.profit_and_loss(start, end)?;
    output::section(format!("Profit and Loss: {start} to {end}"));
    print_profit_and_loss(&pnl, context.currency());
    Ok(())
}

fn cmd_pnl_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "pnl-export <start> <end> <file.csv>";
    let start = parse_date(require(args, 0, usage)?)?;
    let end = parse_date(require(args, 1, usage)?)?;
    let path = Path::new(require(args, 2, usage)?);
    let pnl = context.office.export_profit_and_loss(start, end, path)?;
    output::success(format!(
        "Profit and loss written to {} (net profit {}).",
        path.display(),
        money(pnl.net_profit, context.currency())
    ));
    Ok(())
}

fn print_profit_and_loss(pnl: &ProfitAndLoss, currency: &str) {
    let mut table = Table::new()
        .column("Category", Alignment::Left)
        .column("Amount", Alignment::Right);
    table.row(vec!["INCOME".into(), String::new()]);
    for item in &pnl.income_items {
        table.row(vec![format!("  {}", item.key), money(item.amount, currency)]);
    }
    table.row(vec!["Total Income".into(), money(pnl.total_income, currency)]);
    table.row(vec!["EXPENSES".into(), String::new()]);
    for item in &pnl.expense_items {
        table.row(vec![format!("  {}", item.key), money(item.amount, currency)]);
    }
    table.row(vec!["Total Expenses".into(), money(pnl.total_expenses, currency)]);
    table.row(vec!["NET PROFIT".into(), money(pnl.net_profit, currency)]);
    output::info(table.render());
}
