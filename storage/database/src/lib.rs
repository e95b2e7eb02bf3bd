#![doc = include_str!("../README.md")]
#![allow(
    clippy::must_use_candidate,
    clippy::significant_drop_tightening,
    clippy::items_after_statements,
    clippy::module_name_repetitions,
    clippy::module_inception,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else,
)]
#![cfg_attr(
    test,
    allow(
        clippy::cognitive_complexity,
        clippy::needless_pass_by_value,
        clippy::cast_possible_truncation,
        clippy::too_many_lines
    )
)]

// Lengths and offsets are `u64` on disk and `usize` in memory.
#[cfg(not(target_pointer_width = "64"))]
compile_error!("tabula-database only supports 64-bit targets");

//---------------------------------------------------------------------------------------------------- Public API
mod backend;
mod constants;
mod database;
mod entry;
mod env;
mod error;
mod key;
mod storable;
mod table;
mod tables;
mod transaction;

pub mod config;

pub use backend::ConcreteEnv;
pub use constants::{DATABASE_BACKEND, DATABASE_CORRUPT_MSG, DATABASE_DATA_FILENAME};
pub use database::{DatabaseIter, DatabaseRo, DatabaseRw};
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use env::{Env, EnvInner};
pub use error::{DbResult, InitError, RuntimeError};
pub use key::{compare_decoded, Key};
pub use storable::{Storable, StorableVec};
pub use table::Table;
pub use transaction::{TxRo, TxRw};


// `define_tables!` expands to `paste` calls in the caller's crate.
#[doc(hidden)]
pub use paste;

// For `unused_crate_dependencies`.
#[cfg(feature = "redb")]
use redb as _;
