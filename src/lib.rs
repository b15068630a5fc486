#![doc(test(attr(deny(warnings))))]

//! Halo Back Office: a command shell over the period aggregator, payroll,
//! invoicing and vendor ledgers, persisting records as JSON files.

pub mod cli;
pub mod errors;
pub mod office;
pub mod utils;

pub use errors::{AppError, CliError};
pub use office::{BackOffice, Dashboard, InvoiceOptions};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        let build = utils::build_info::current();
        tracing::info!(version = build.version, hash = build.git_hash, "halo back office starting");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
