//! Abstracted multi-index table operations.
//!
//! This module contains free functions that use the traits in
//! [`tabula_database`] to generically read and write the tables
//! defined in [`crate::tables`].
//!
//! # `impl Table`
//! Functions in this module take [`Tables`](crate::tables::Tables),
//! [`TablesMut`](crate::tables::TablesMut) or single database tables
//! directly - these are _already opened_ database tables.
//!
//! As such, the responsibility of
//! transactions, tables, etc, are on the caller.
//!
//! # Storage only
//! These functions only keep the tables consistent with each other,
//! e.g. an entry in [`Idx64s`](crate::tables::Idx64s) always has its
//! reverse entry in [`Idx64Primaries`](crate::tables::Idx64Primaries).
//!
//! They do _not_:
//! - check who is allowed to write a partition
//! - charge or refund payers
//! - maintain partition records alongside rows
//! - hand out iterator handles
//!
//! All of the above is done by the [`ApplyContext`](crate::ApplyContext),
//! which is what contracts should be using.
//!
//! # Atomicity
//! As transactions are handled by the _caller_ of these functions,
//! it is up to the caller to decide what happens if one them return
//! an error.
//!
//! To maintain atomicity, transactions should be [`abort`](tabula_database::TxRw::abort)ed
//! if one of the functions failed.
//!
//! # Example
//! ```rust
//! use tabula_multi_index::{
//!     tabula_database::{Env, EnvInner, TxRw},
//!     config::ConfigBuilder,
//!     tables::{OpenTables, Tables, TablesMut},
//!     types::{PartitionKey, Row},
//!     ops::primary::{get_row, insert_row, lower_bound_row, next_row},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tmp_dir = tempfile::tempdir()?;
//! let config = ConfigBuilder::new(tmp_dir.path().to_owned().into()).build();
//! let env = tabula_multi_index::open(config)?;
//!
//! let env_inner = env.env_inner();
//! let tx_rw = env_inner.tx_rw()?;
//! let mut tables = env_inner.open_tables_mut(&tx_rw)?;
//!
//! let partition = PartitionKey::new(1, 7, 9);
//! for primary in [5, 1, 3] {
//!     insert_row(&partition.row(primary), &Row::new(1, b"data"), tables.rows_mut())?;
//! }
//!
//! // Rows are iterated in primary key order.
//! let first = lower_bound_row(partition, 0, tables.rows())?.unwrap();
//! assert_eq!(first.primary, 1);
//! let second = next_row(&first, tables.rows())?.unwrap();
//! assert_eq!(second.primary, 3);
//! assert_eq!(get_row(&second, tables.rows())?.data(), b"data");
//!
//! drop(tables);
//! TxRw::commit(tx_rw)?;
//! # Ok(()) }
//! ```

pub mod partition;
pub mod primary;
pub mod secondary;

mod macros;
mod range;
