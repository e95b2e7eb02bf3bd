//! Multi-index tables.
//!
//! # Table marker structs
//! This module contains all the table definitions used by `tabula_multi_index`.
//!
//! The zero-sized structs here represents the table type;
//! they all are essentially marker types that implement [`tabula_database::Table`].
//!
//! Table structs are `CamelCase`, and their static string
//! names used by the actual database backend are `snake_case`.
//!
//! For example: [`Idx64Primaries`] -> `idx64_primaries`.
//!
//! # Traits
//! This module also contains a set of traits for
//! accessing _all_ tables defined here at once.

//---------------------------------------------------------------------------------------------------- Import
use crate::types::{
    AccountName, EntryKey128, EntryKey256, EntryKey64, PartitionInfo, PartitionKey, Row, RowKey,
};

//---------------------------------------------------------------------------------------------------- Tables
// Notes:
// - Each secondary index is a pair of tables, entries then primaries
// - Tables are defined in plural to avoid name conflicts with types
// - If adding/changing a table also edit:
//   - the tests in `src/tests.rs`
//   - `crate::DATABASE_VERSION`
tabula_database::define_tables! {
    /// Partition records.
    ///
    /// Contains the payer and live object count of every non-empty partition.
    0 => Partitions,
    PartitionKey => PartitionInfo,

    /// Primary rows.
    ///
    /// Contains the payer and payload of every row.
    1 => Rows,
    RowKey => Row,

    /// `u64` secondary entries.
    2 => Idx64s,
    EntryKey64 => AccountName,

    /// `u64` secondary keys by primary key.
    3 => Idx64Primaries,
    RowKey => [u8; 8],

    /// `u128` secondary entries.
    4 => Idx128s,
    EntryKey128 => AccountName,

    /// `u128` secondary keys by primary key.
    5 => Idx128Primaries,
    RowKey => [u8; 16],

    /// 256-bit secondary entries.
    6 => Idx256s,
    EntryKey256 => AccountName,

    /// 256-bit secondary keys by primary key.
    7 => Idx256Primaries,
    RowKey => [u8; 32],

    /// `f64` secondary entries.
    8 => IdxDoubles,
    EntryKey64 => AccountName,

    /// `f64` secondary keys by primary key.
    9 => IdxDoublePrimaries,
    RowKey => [u8; 8],

    /// Long double secondary entries.
    10 => IdxLongDoubles,
    EntryKey128 => AccountName,

    /// Long double secondary keys by primary key.
    11 => IdxLongDoublePrimaries,
    RowKey => [u8; 16],
}
