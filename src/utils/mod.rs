pub mod build_info;

use std::{env, path::PathBuf, sync::Once};

/// Overrides the directory holding `config/` and the record files.
pub const HOME_ENV: &str = "HALO_BACKOFFICE_HOME";

static TRACING_INIT: Once = Once::new();

/// Installs the global fmt subscriber; `RUST_LOG` adds to the default directive.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "halo_backoffice=info".parse::<Directive>() {
            filter = filter.add_directive(directive);
        }

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// `HALO_BACKOFFICE_HOME` when set and non-empty, else the documents folder default.
pub fn base_dir() -> PathBuf {
    match env::var_os(HOME_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => halo_config::default_base_dir(),
    }
}
