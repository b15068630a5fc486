use std::path::PathBuf;

use halo_config::Config;
use halo_core::Timeframe;

use crate::cli::context::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::format::{parse_amount, require};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Alignment, Table};

const USAGE: &str = "config [show | set <key> <value> | backup [note] | backups | restore <name>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show, change, back up or restore preferences",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().copied().unwrap_or("show") {
        "show" => show(context),
        "set" => set(context, require(args, 1, USAGE)?, require(args, 2, USAGE)?),
        "backup" => backup(context, args.get(1).copied()),
        "backups" => list_backups(context),
        "restore" => restore(context, require(args, 1, USAGE)?),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}`\nusage: {USAGE}"
        ))),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    let config = context.office.config();
    let mut table = Table::new()
        .column("Key", Alignment::Left)
        .column("Value", Alignment::Left);
    let data_root = config
        .data_root
        .as_ref()
        .map_or_else(|| "(base directory)".to_string(), |path| path.display().to_string());
    let rows = [
        ("locale", config.locale.clone()),
        ("currency", config.currency.clone()),
        ("utc_offset_minutes", config.utc_offset_minutes.to_string()),
        ("default_timeframe", config.default_timeframe.clone()),
        ("payroll_default_hours", config.payroll_default_hours.to_string()),
        ("default_tax_rate", config.default_tax_rate.to_string()),
        ("ui_color_enabled", config.ui_color_enabled.to_string()),
        ("data_root", data_root),
    ];
    for (key, value) in rows {
        table.row(vec![key.to_string(), value]);
    }
    output::info(table.render());
    output::info(format!("Stored at {}", context.config_manager.config_path().display()));
    Ok(())
}

fn set(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut config = context.office.config().clone();
    apply(&mut config, key, value)?;
    context.office.set_config(config.clone())?;
    context.config_manager.save(&config)?;
    if key == "ui_color_enabled" {
        output::set_preferences(output::OutputPreferences {
            color_enabled: config.ui_color_enabled && context.mode == CliMode::Interactive,
        });
    }
    tracing::info!(key, value, "configuration updated");
    output::success(format!("{key} set to {value}."));
    if key == "data_root" {
        output::hint("The new data location is used the next time the shell starts.");
    }
    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<(), CommandError> {
    match key {
        "locale" => config.locale = value.to_string(),
        "currency" => config.currency = value.to_ascii_uppercase(),
        "utc_offset_minutes" => {
            config.utc_offset_minutes = value.parse().map_err(|_| {
                CommandError::InvalidArguments(format!("`{value}` is not a whole number of minutes"))
            })?;
        }
        "default_timeframe" => {
            // Custom ranges fail here since no dates accompany the name.
            Timeframe::parse(value, None, None)?;
            config.default_timeframe = value.to_string();
        }
        "payroll_default_hours" => config.payroll_default_hours = parse_amount(value)?,
        "default_tax_rate" => config.default_tax_rate = parse_amount(value)?,
        "ui_color_enabled" => {
            config.ui_color_enabled = value.parse().map_err(|_| {
                CommandError::InvalidArguments(format!("`{value}` is not true or false"))
            })?;
        }
        "data_root" => {
            config.data_root = match value {
                "" | "default" => None,
                path => Some(PathBuf::from(path)),
            };
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{other}`"
            )))
        }
    }
    Ok(())
}

fn backup(context: &ShellContext, note: Option<&str>) -> CommandResult {
    let name = context.config_manager.backup(context.office.config(), note)?;
    output::success(format!("Saved configuration backup {name}."));
    Ok(())
}

fn list_backups(context: &ShellContext) -> CommandResult {
    let backups = context.config_manager.list_backups()?;
    if backups.is_empty() {
        output::info("No configuration backups yet.");
        return Ok(());
    }
    for name in backups {
        output::info(name);
    }
    Ok(())
}

fn restore(context: &mut ShellContext, name: &str) -> CommandResult {
    let config = context.config_manager.restore(name)?;
    context.office.set_config(config)?;
    output::success(format!("Restored configuration from {name}."));
    Ok(())
}
