pub mod backups;
pub mod config;
pub mod funds;
pub mod invoices;
pub mod payroll;
pub mod reports;
pub mod system;
pub mod tasks;
pub mod transactions;
pub mod vendors;

use halo_core::Records;
use halo_domain::{Displayable, Record};

use crate::cli::context::{CommandError, ShellContext};
use crate::cli::format::short_id;
use crate::cli::registry::CommandRegistry;

pub(crate) fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    let groups = [
        system::definitions(),
        reports::definitions(),
        transactions::definitions(),
        payroll::definitions(),
        invoices::definitions(),
        vendors::definitions(),
        tasks::definitions(),
        funds::definitions(),
        config::definitions(),
        backups::definitions(),
    ];
    for entry in groups.into_iter().flatten() {
        registry.register(entry);
    }
    registry
}

/// Finds a record by exact id, case-insensitive name, or unique id prefix
/// (with or without the type prefix shown in tables). Ambiguous references
/// list the candidates they matched.
pub(crate) fn lookup<R: Record + Displayable>(
    context: &ShellContext,
    reference: &str,
    name_of: fn(&R) -> &str,
) -> Result<R, CommandError> {
    let records: Vec<R> = Records::list(context.office.store())?;
    let needle = reference.trim();
    if let Some(found) = records.iter().find(|record| record.id() == needle) {
        return Ok(found.clone());
    }

    let mut matches: Vec<&R> = records
        .iter()
        .filter(|record| name_of(record).eq_ignore_ascii_case(needle))
        .collect();
    if matches.is_empty() && !needle.is_empty() {
        matches = records
            .iter()
            .filter(|record| {
                record.id().starts_with(needle)
                    || record
                        .id()
                        .split_once('-')
                        .is_some_and(|(_, body)| body.starts_with(needle))
            })
            .collect();
    }
    match matches.as_slice() {
        [only] => Ok((*only).clone()),
        [] => Err(CommandError::InvalidArguments(format!(
            "no {} match `{needle}`",
            R::COLLECTION.replace('_', " ")
        ))),
        _ => Err(CommandError::InvalidArguments(ambiguous(needle, &matches))),
    }
}

fn ambiguous<R: Record + Displayable>(needle: &str, matches: &[&R]) -> String {
    let mut message = format!(
        "`{needle}` matches {} {}; use a longer id:",
        matches.len(),
        R::COLLECTION.replace('_', " ")
    );
    for record in matches {
        message.push_str(&format!("\n  {}  {}", short_id(record.id()), record.display_label()));
    }
    message
}

/// Removes `--name value` from `args`, returning the value.
pub(crate) fn take_option<'a>(
    args: &mut Vec<&'a str>,
    name: &str,
) -> Result<Option<&'a str>, CommandError> {
    let Some(index) = args.iter().position(|arg| *arg == name) else {
        return Ok(None);
    };
    if index + 1 >= args.len() {
        return Err(CommandError::InvalidArguments(format!("{name} needs a value")));
    }
    let value = args.remove(index + 1);
    args.remove(index);
    Ok(Some(value))
}

/// Removes a bare `--name` switch from `args`, reporting whether it was present.
pub(crate) fn take_switch(args: &mut Vec<&str>, name: &str) -> bool {
    let before = args.len();
    args.retain(|arg| *arg != name);
    args.len() != before
}
