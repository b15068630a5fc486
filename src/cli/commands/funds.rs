use halo_core::{fund_totals, FundService, Records};
use halo_domain::{FundAccount, FundAccountType};

use crate::cli::commands::{lookup, take_switch};
use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::format::{money, parse_amount, parse_enum, require, short_id};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Alignment, Table};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "funds",
            "Fund accounts with total assets and net worth",
            "funds [--all]",
            cmd_funds,
        ),
        CommandEntry::new(
            "fund-add",
            "Add a fund account",
            "fund-add <name> <checking|cash|digital> <institution> <balance>",
            cmd_fund_add,
        ),
        CommandEntry::new(
            "fund-set",
            "Set an account's current balance",
            "fund-set <account> <balance>",
            cmd_fund_set,
        ),
        CommandEntry::new(
            "fund-hide",
            "Hide or unhide an account in the listing",
            "fund-hide <account>",
            cmd_fund_hide,
        ),
    ]
}

fn account_name(account: &FundAccount) -> &str {
    &account.name
}

fn cmd_funds(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut args = args.to_vec();
    let show_hidden = take_switch(&mut args, "--all");
    let accounts: Vec<FundAccount> = Records::list(context.office.store())?;
    if accounts.is_empty() {
        output::info("No fund accounts yet.");
        return Ok(());
    }

    let currency = context.currency().to_string();
    let offset = context.office.offset();
    let mut table = Table::new()
        .column("Id", Alignment::Left)
        .column("Account", Alignment::Left)
        .column("Type", Alignment::Left)
        .column("Institution", Alignment::Left)
        .column("Balance", Alignment::Right)
        .column("Updated", Alignment::Left);
    let mut hidden = 0;
    for account in &accounts {
        if account.is_hidden && !show_hidden {
            hidden += 1;
            continue;
        }
        table.row(vec![
            short_id(&account.id).to_string(),
            account.name.clone(),
            account.kind.to_string(),
            account.institution.clone(),
            money(account.balance, &currency),
            account.last_updated.with_timezone(&offset).format("%Y-%m-%d").to_string(),
        ]);
    }
    output::info(table.render());
    if hidden > 0 {
        output::hint(format!("{hidden} hidden account(s); use `funds --all` to list them."));
    }

    // Hidden accounts still count toward the totals.
    let totals = fund_totals(&accounts);
    output::info(format!("Total assets: {}", money(totals.total_assets, &currency)));
    output::info(format!("Total liabilities: {}", money(totals.total_liabilities, &currency)));
    output::info(format!("Net worth: {}", money(totals.net_worth, &currency)));
    Ok(())
}

fn cmd_fund_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "fund-add <name> <checking|cash|digital> <institution> <balance>";
    let name = require(args, 0, usage)?;
    let kind: FundAccountType = parse_enum(require(args, 1, usage)?)?;
    let institution = require(args, 2, usage)?;
    let balance = parse_amount(require(args, 3, usage)?)?;
    let mut account = FundAccount::new(name, kind, institution, balance);
    account.last_updated = context.office.now();
    let saved = FundService::add(context.office.store(), account)?;
    output::success(format!("Added account {} ({}).", saved.name, short_id(&saved.id)));
    Ok(())
}

fn cmd_fund_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "fund-set <account> <balance>";
    let account = lookup::<FundAccount>(context, require(args, 0, usage)?, account_name)?;
    let balance = parse_amount(require(args, 1, usage)?)?;
    let updated = FundService::set_balance(context.office.store(), &account.id, balance, context.office.now())?;
    output::success(format!(
        "{} balance set to {}.",
        updated.name,
        money(updated.balance, context.currency())
    ));
    Ok(())
}

fn cmd_fund_hide(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let account = lookup::<FundAccount>(context, require(args, 0, "fund-hide <account>")?, account_name)?;
    let updated = FundService::toggle_hidden(context.office.store(), &account.id)?;
    let state = if updated.is_hidden { "hidden" } else { "visible" };
    output::success(format!("{} is now {state}.", updated.name));
    Ok(())
}
