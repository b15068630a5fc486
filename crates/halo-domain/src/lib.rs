//! halo-domain
//!
//! Pure back-office records (transactions, payroll, vendors, invoices, tasks, funds).
//! No I/O, no storage, no terminal code. Only data types and core enums.

pub mod common;
pub mod employee;
pub mod fund;
pub mod invoice;
pub mod task;
pub mod transaction;
pub mod vendor;

pub use common::*;
pub use employee::*;
pub use fund::*;
pub use invoice::*;
pub use task::*;
pub use transaction::*;
pub use vendor::*;
