use halo_core::storage::COLLECTIONS;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::format::require;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Alignment, Table};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "collections",
            "Record counts per stored collection",
            "collections",
            cmd_collections,
        ),
        CommandEntry::new(
            "backups",
            "List saved snapshots of a collection, newest first",
            "backups <collection>",
            cmd_backups,
        ),
        CommandEntry::new(
            "restore",
            "Replace a collection with one of its snapshots",
            "restore <collection> <backup>",
            cmd_restore,
        ),
    ]
}

fn known_collection(name: &str) -> Result<&str, CommandError> {
    COLLECTIONS
        .iter()
        .find(|known| known.eq_ignore_ascii_case(name))
        .copied()
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "unknown collection `{name}`; expected one of {}",
                COLLECTIONS.join(", ")
            ))
        })
}

fn cmd_collections(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let counts = context.storage.collection_counts()?;
    if counts.is_empty() {
        output::info("Nothing stored yet. Try `seed`.");
        return Ok(());
    }
    let mut table = Table::new()
        .column("Collection", Alignment::Left)
        .column("Records", Alignment::Right);
    for (name, count) in counts {
        table.row(vec![name, count.to_string()]);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let collection = known_collection(require(args, 0, "backups <collection>")?)?;
    let backups = context.storage.list_backups(collection)?;
    if backups.is_empty() {
        output::info(format!("No backups of {collection} yet."));
        return Ok(());
    }
    let mut table = Table::new()
        .column("Backup", Alignment::Left)
        .column("Taken", Alignment::Left)
        .column("Bytes", Alignment::Right);
    for backup in &backups {
        table.row(vec![
            backup.id.clone(),
            backup
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "?".into()),
            backup.size_bytes.to_string(),
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "restore <collection> <backup>";
    let collection = known_collection(require(args, 0, usage)?)?;
    let backup_id = require(args, 1, usage)?;
    let records = context.storage.restore_backup(collection, backup_id)?;
    output::success(format!(
        "Restored {} record(s) into {collection} from {backup_id}.",
        records.len()
    ));
    Ok(())
}
