//! halo-core
//!
//! Financial aggregation and calculators for the back office.
//! Depends on halo-domain. No terminal I/O; persistence only through [`storage::RecordStore`].

pub mod aggregate;
pub mod csv_io;
pub mod error;
pub mod fund;
pub mod invoice;
pub mod ledger;
pub mod payroll;
pub mod period;
pub mod seed;
pub mod storage;
pub mod task;
pub mod time;
pub mod vendor;

pub use aggregate::*;
pub use error::CoreError;
pub use fund::{fund_totals, FundService, FundTotals};
pub use invoice::*;
pub use ledger::{TransactionFilter, TransactionService};
pub use payroll::*;
pub use period::*;
pub use storage::{MemoryStore, RecordStore, Records};
pub use task::{group_by_status, tasks_due_on, TaskPatch, TaskService};
pub use time::{Clock, FixedClock, SystemClock};
pub use vendor::*;
