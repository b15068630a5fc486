//! Shared runtime state for shell sessions and command execution.

use std::{io, path::Path, sync::Arc};

use halo_config::{ConfigError, ConfigManager};
use halo_core::{CoreError, SystemClock};
use halo_storage_json::{JsonFileStore, StoragePaths};

use crate::{
    cli::{commands, output, registry::CommandRegistry},
    errors::{AppError, CliError},
    office::BackOffice,
    utils,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub office: BackOffice,
    pub storage: JsonFileStore,
    pub config_manager: ConfigManager,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Opens the office under `HALO_BACKOFFICE_HOME` or the default base directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::open(mode, &utils::base_dir())
    }

    pub fn open(mode: CliMode, base: &Path) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        let data_root = config.resolve_data_root(base);
        let storage = JsonFileStore::new(StoragePaths::under(&data_root))?;
        output::set_preferences(output::OutputPreferences {
            color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        });
        let office = BackOffice::new(Arc::new(storage.clone()), Arc::new(SystemClock), config)?;
        tracing::info!(base = %base.display(), data = %data_root.display(), "opened back office");

        Ok(Self {
            mode,
            registry: commands::registry(),
            office,
            storage,
            config_manager,
            last_command: None,
            running: true,
        })
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        "halo> ".to_string()
    }

    /// Currency code every amount is rendered with.
    pub fn currency(&self) -> &str {
        &self.office.config().currency
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.find(command).map(|entry| entry.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.registry.closest(input) {
            output::hint(format!("Did you mean `{best}`?"));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => {
                tracing::debug!(error = ?other, command = ?self.last_command, "command failed");
                output::error(other);
            }
        }
    }
}
