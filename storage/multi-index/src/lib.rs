#![doc = include_str!("../README.md")]
#![allow(
    clippy::significant_drop_tightening,
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
)]
// Allow some lints in tests.
#![cfg_attr(
    test,
    allow(
        clippy::cognitive_complexity,
        clippy::too_many_lines,
        clippy::float_cmp
    )
)]

// Payload lengths are charged as `u64`.
#[cfg(not(target_pointer_width = "64"))]
compile_error!("tabula-multi-index only supports 64-bit targets");

//---------------------------------------------------------------------------------------------------- Public API
mod constants;
mod context;
mod error;
mod free;
mod iterator_cache;
mod long_double;
mod resource;
mod secondary_key;

pub use constants::{
    billable_size, row_billable_size, secondary_billable_size, BILLABLE_ALIGNMENT,
    DATABASE_VERSION, DEFAULT_MAX_ROW_SIZE, OVERHEAD_PER_INDEX, PARTITION_BILLABLE_SIZE,
    ROW_BILLABLE_SIZE,
};
pub use context::{ApplyContext, Cursor, SecondaryIndex};
pub use error::{TableError, TableResult};
pub use free::open;
pub use iterator_cache::Handle;
pub use long_double::LongDouble;
pub use resource::{ActionPayers, PayerAuthority, RamUsage, ResourceLedger};
pub use secondary_key::{IndexKind, SecondaryKey};
pub use tabula_database;

pub mod config;
pub mod ops;
pub mod tables;
pub mod types;

//---------------------------------------------------------------------------------------------------- Private
#[cfg(test)]
pub(crate) mod tests;
