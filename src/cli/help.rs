use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::table::{Alignment, Table};

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    let mut table = Table::new()
        .column("Command", Alignment::Left)
        .column("Description", Alignment::Left);
    for entry in registry.entries() {
        table.row(vec![entry.name.to_string(), entry.description.to_string()]);
    }
    output::info(table.render());
    output::hint("Use `help <command>` for usage details.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(format!("Help: {}", entry.name));
    output::info(format!("  {}", entry.description));
    output::info(format!("  usage: {}", entry.usage));
}
