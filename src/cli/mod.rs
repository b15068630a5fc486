pub mod commands;
pub mod context;
pub mod format;
pub mod help;
pub mod output;
pub mod registry;
mod shell;
pub mod table;

pub use shell::{run_cli, SCRIPT_ENV};
