//! halo-config
//!
//! Persisted back-office preferences: locale, currency, the business's UTC
//! offset and the defaults used by the shell when a command omits them.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{default_base_dir, Config};
