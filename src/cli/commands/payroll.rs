use halo_core::{EmployeeService, PayrollService, PayrollTotals, Records};
use halo_domain::{Deductions, Employee, PayrollEntry, PayrollStatus};
use rust_decimal::Decimal;

use crate::cli::commands::{lookup, take_option};
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::format::{money, parse_amount, parse_date, parse_enum, require, short_id};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Alignment, Table};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("employees", "List employees and their rates", "employees", cmd_employees),
        CommandEntry::new(
            "employee-add",
            "Add an employee with an hourly rate",
            "employee-add <name> <position> <rate> [hire-date] [--sss N] [--philhealth N] [--pagibig N] [--tax N]",
            cmd_employee_add,
        ),
        CommandEntry::new(
            "payroll-run",
            "Compute and save pay for every employee over a period",
            "payroll-run <start> <end> [employee=hours ...]",
            cmd_payroll_run,
        ),
        CommandEntry::new(
            "payroll",
            "Payroll history, optionally for one employee",
            "payroll [employee]",
            cmd_payroll,
        ),
        CommandEntry::new(
            "payroll-status",
            "Move a payroll entry between draft, approved and paid",
            "payroll-status <entry> <draft|approved|paid>",
            cmd_payroll_status,
        ),
    ]
}

fn employee_name(employee: &Employee) -> &str {
    &employee.name
}

fn entry_employee(entry: &PayrollEntry) -> &str {
    &entry.employee_id
}

fn cmd_employees(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let employees: Vec<Employee> = Records::list(context.office.store())?;
    if employees.is_empty() {
        output::info("No employees yet. Add one with `employee-add`.");
        return Ok(());
    }
    let currency = context.currency().to_string();
    let mut table = Table::new()
        .column("Id", Alignment::Left)
        .column("Name", Alignment::Left)
        .column("Position", Alignment::Left)
        .column("Rate/hr", Alignment::Right)
        .column("Deductions", Alignment::Right)
        .column("Hired", Alignment::Left);
    for employee in &employees {
        table.row(vec![
            short_id(&employee.id).to_string(),
            employee.name.clone(),
            employee.position.clone(),
            money(employee.rate, &currency),
            money(employee.deductions.total(), &currency),
            employee.hire_date.to_string(),
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_employee_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "employee-add <name> <position> <rate> [hire-date] [--sss N] [--philhealth N] [--pagibig N] [--tax N]";
    let mut args = args.to_vec();
    let mut deduction = |name: &str| -> Result<Decimal, CommandError> {
        take_option(&mut args, name)?.map_or(Ok(Decimal::ZERO), parse_amount)
    };
    let deductions = Deductions::new(
        deduction("--sss")?,
        deduction("--philhealth")?,
        deduction("--pagibig")?,
        deduction("--tax")?,
    );
    let args = args.as_slice();
    let name = require(args, 0, usage)?;
    let position = require(args, 1, usage)?;
    let rate = parse_amount(require(args, 2, usage)?)?;
    let hire_date = match args.get(3) {
        Some(raw) => parse_date(raw)?,
        None => context.office.today(),
    };
    let employee = Employee::new(name, position, rate, hire_date).with_deductions(deductions);
    let saved = EmployeeService::add(context.office.store(), employee)?;
    output::success(format!("Added {} ({}).", saved.name, short_id(&saved.id)));
    Ok(())
}

fn cmd_payroll_run(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "payroll-run <start> <end> [employee=hours ...]";
    let start = parse_date(require(args, 0, usage)?)?;
    let end = parse_date(require(args, 1, usage)?)?;
    let mut hours = Vec::new();
    for raw in &args[2..] {
        let Some((reference, worked)) = raw.split_once('=') else {
            return Err(CommandError::InvalidArguments(format!(
                "expected employee=hours, got `{raw}`"
            )));
        };
        let employee = lookup::<Employee>(context, reference, employee_name)?;
        hours.push((employee.id, parse_amount(worked)?));
    }

    let entries = context.office.run_payroll(start, end, &hours)?;
    if entries.is_empty() {
        output::info("No employees to pay.");
        return Ok(());
    }
    let employees: Vec<Employee> = Records::list(context.office.store())?;
    output::section(format!("Payroll {start} to {end}"));
    print_entries(&entries, &employees, context.currency());
    for entry in entries.iter().filter(|entry| entry.has_negative_net()) {
        output::warning(format!(
            "Net pay for {} is negative; deductions exceed gross pay.",
            display_name(&employees, &entry.employee_id)
        ));
    }
    output::success(format!("Saved {} payroll entries.", entries.len()));
    Ok(())
}

fn cmd_payroll(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let employee_id = match args.first() {
        Some(reference) => Some(lookup::<Employee>(context, reference, employee_name)?.id),
        None => None,
    };
    let entries = PayrollService::history(context.office.store(), employee_id.as_deref())?;
    if entries.is_empty() {
        output::info("No payroll entries yet.");
        return Ok(());
    }
    let employees: Vec<Employee> = Records::list(context.office.store())?;
    print_entries(&entries, &employees, context.currency());
    Ok(())
}

fn cmd_payroll_status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "payroll-status <entry> <draft|approved|paid>";
    let entry = lookup::<PayrollEntry>(context, require(args, 0, usage)?, entry_employee)?;
    let status: PayrollStatus = parse_enum(require(args, 1, usage)?)?;
    let updated = PayrollService::set_status(context.office.store(), &entry.id, status)?;
    output::success(format!("Payroll entry {} is now {}.", short_id(&updated.id), updated.status));
    Ok(())
}

fn display_name<'a>(employees: &'a [Employee], employee_id: &'a str) -> &'a str {
    employees
        .iter()
        .find(|employee| employee.id == employee_id)
        .map_or(employee_id, |employee| employee.name.as_str())
}

fn print_entries(entries: &[PayrollEntry], employees: &[Employee], currency: &str) {
    let mut table = Table::new()
        .column("Id", Alignment::Left)
        .column("Employee", Alignment::Left)
        .column("Period", Alignment::Left)
        .column("Gross", Alignment::Right)
        .column("Deductions", Alignment::Right)
        .column("Net", Alignment::Right)
        .column("Status", Alignment::Left);
    for entry in entries {
        table.row(vec![
            short_id(&entry.id).to_string(),
            display_name(employees, &entry.employee_id).to_string(),
            format!("{} to {}", entry.period_start, entry.period_end),
            money(entry.gross_pay, currency),
            money(entry.total_deductions(), currency),
            money(entry.net_pay, currency),
            entry.status.to_string(),
        ]);
    }
    output::info(table.render());

    let totals = PayrollTotals::of(entries);
    output::info(format!(
        "Totals: gross {}, deductions {}, net {}",
        money(totals.gross, currency),
        money(totals.deductions, currency),
        money(totals.net, currency)
    ));
}
