//! The execution context of one contract invocation; `struct ApplyContext`.
//!
//! An [`ApplyContext`] is what contracts use to reach their tables.
//! It wraps already opened [`TablesMut`] and adds everything the
//! [`ops`](crate::ops) functions leave out:
//!
//! - **Access control**: mutations only ever target partitions whose
//!   `code` is the [receiver](ApplyContext::receiver), lookups may target any `code`
//! - **Payers**: every `store`/`update` payer is checked with the [`PayerAuthority`]
//! - **Accounting**: every object's billable size is charged to (and refunded from)
//!   its payer through the [`ResourceLedger`]
//! - **Partition records**: created on a partition's first object, erased with its last
//! - **Iterator handles**: every row or entry returned is referred to by a [`Handle`]
//!
//! # Lifetime
//! A context lives for exactly one contract invocation. Handles
//! are only valid within the context that issued them and are all
//! dropped with it.
//!
//! The context does not own the transaction. If an operation returns an
//! error the caller is expected to abort the write transaction (or restore
//! a [savepoint](tabula_database::TxRw::savepoint)), as the tables may be
//! partially mutated.
//!
//! # Example
//! ```rust
//! use tabula_multi_index::{
//!     tabula_database::{Env, EnvInner, TxRw},
//!     config::ConfigBuilder,
//!     tables::OpenTables,
//!     ActionPayers, ApplyContext, Cursor, RamUsage,
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
//! let (receiver, scope, table) = (1, 7, 9);
//! let payers = ActionPayers { sender: 2, origin: 2 };
//! let mut ram = RamUsage::new();
//!
//! {
//!     let mut ctx = ApplyContext::new(&mut tables, receiver, &payers, &mut ram);
//!
//!     for id in [5, 1, 3] {
//!         ctx.db_store_i64(scope, table, receiver, id, b"hello")?;
//!     }
//!     ctx.idx64().store(scope, table, receiver, 3, 100)?;
//!
//!     // Rows are returned in primary key order.
//!     let first = ctx.db_lowerbound_i64(receiver, scope, table, 0)?;
//!     let Cursor::At(second, primary) = ctx.db_next_i64(first)? else {
//!         unreachable!()
//!     };
//!     assert_eq!(primary, 3);
//!
//!     // Probe the payload size, then fetch it.
//!     let size = ctx.db_get_i64(second, &mut [])?;
//!     let mut buffer = vec![0; size];
//!     ctx.db_get_i64(second, &mut buffer)?;
//!     assert_eq!(buffer, b"hello");
//!
//!     // Look the row up by its secondary key.
//!     let cursor = ctx.idx64().find_secondary(receiver, scope, table, 100)?;
//!     assert_eq!(cursor.into_value(), Some(3));
//! }
//!
//! // The partition record, 3 rows and 1 entry are charged to the receiver.
//! assert_eq!(ram.usage(receiver), 112 + 3 * (112 + 5) + 128);
//!
//! drop(tables);
//! TxRw::commit(tx_rw)?;
//! # Ok(()) }
//! ```

//---------------------------------------------------------------------------------------------------- Import
use crate::{
    constants::{DEFAULT_MAX_ROW_SIZE, PARTITION_BILLABLE_SIZE},
    error::{TableError, TableResult},
    iterator_cache::{Handle, IteratorCache},
    ops::partition::{decrement_partition, increment_partition},
    resource::{PayerAuthority, ResourceLedger},
    secondary_key::IndexKind,
    tables::TablesMut,
    types::{AccountName, PartitionKey},
};

mod primary;
mod secondary;

pub use secondary::SecondaryIndex;

//---------------------------------------------------------------------------------------------------- Cursor
/// The result of positioning an iterator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cursor<V> {
    /// The iterator points at a row or entry.
    At(Handle, V),
    /// The iterator is the end sentinel of the partition.
    End(Handle),
}

impl<V> Cursor<V> {
    /// The iterator handle.
    pub const fn handle(&self) -> Handle {
        match self {
            Self::At(handle, _) | Self::End(handle) => *handle,
        }
    }

    /// Returns `true` if this is [`Cursor::End`].
    pub const fn is_end(&self) -> bool {
        matches!(self, Self::End(_))
    }

    /// The value found, `None` at the end.
    pub fn into_value(self) -> Option<V> {
        match self {
            Self::At(_, value) => Some(value),
            Self::End(_) => None,
        }
    }
}

//---------------------------------------------------------------------------------------------------- ApplyContext
/// The table engine, as seen by one contract invocation.
///
/// See the [module documentation](self) for details.
///
/// # Operations
/// The primary index is reached with the `db_*_i64` functions, each
/// secondary index through its [`SecondaryIndex`] view:
///
/// | Index             | View                                 |
/// |-------------------|--------------------------------------|
/// | `idx64`           | [`ApplyContext::idx64`]              |
/// | `idx128`          | [`ApplyContext::idx128`]             |
/// | `idx256`          | [`ApplyContext::idx256`]             |
/// | `idx_double`      | [`ApplyContext::idx_double`]         |
/// | `idx_long_double` | [`ApplyContext::idx_long_double`]    |
pub struct ApplyContext<'a, T: TablesMut> {
    /// The opened tables.
    tables: &'a mut T,
    /// The contract executing.
    receiver: AccountName,
    /// Decides which payers the receiver may charge.
    authority: &'a dyn PayerAuthority,
    /// Charged for every stored object.
    ledger: &'a mut dyn ResourceLedger,
    /// [`crate::config::Config::max_row_size`].
    max_row_size: usize,
    /// Handles into the primary index.
    primary_iterators: IteratorCache,
    /// Handles into each secondary index, by [`IndexKind::index`].
    secondary_iterators: [IteratorCache; 5],
    /// Net bytes charged by this context.
    ram_delta: i64,
}

impl<'a, T: TablesMut> ApplyContext<'a, T> {
    /// Create the context for one invocation of contract `receiver`.
    ///
    /// Rows are limited to [`DEFAULT_MAX_ROW_SIZE`] bytes,
    /// see [`ApplyContext::with_max_row_size`].
    pub fn new(
        tables: &'a mut T,
        receiver: AccountName,
        authority: &'a dyn PayerAuthority,
        ledger: &'a mut dyn ResourceLedger,
    ) -> Self {
        Self {
            tables,
            receiver,
            authority,
            ledger,
            max_row_size: DEFAULT_MAX_ROW_SIZE,
            primary_iterators: IteratorCache::default(),
            secondary_iterators: Default::default(),
            ram_delta: 0,
        }
    }

    /// Set the maximum row payload size, e.g. to [`crate::config::Config::max_row_size`].
    #[must_use]
    pub const fn with_max_row_size(mut self, max_row_size: usize) -> Self {
        self.max_row_size = max_row_size;
        self
    }

    /// The contract executing.
    pub const fn receiver(&self) -> AccountName {
        self.receiver
    }

    /// Net bytes charged (positive) or refunded (negative) by this context so far.
    pub const fn ram_delta(&self) -> i64 {
        self.ram_delta
    }

    /// Read access to the underlying tables.
    pub fn tables(&self) -> &T {
        &*self.tables
    }

    //------------------------------------------------ Private
    /// Reject mutations of partitions the receiver does not own.
    fn check_partition(&self, partition: &PartitionKey) -> TableResult<()> {
        if partition.code == self.receiver {
            Ok(())
        } else {
            Err(TableError::PartitionMismatch {
                code: partition.code,
                receiver: self.receiver,
            })
        }
    }

    /// Resolve and authorize `payer`.
    fn authorize(&self, payer: AccountName) -> TableResult<AccountName> {
        self.authority.authorize(self.receiver, payer)
    }

    /// Charge `payer` for `size` bytes.
    fn charge(&mut self, payer: AccountName, size: u64) -> TableResult<()> {
        self.update_ram_usage(payer, ledger_delta(size))
    }

    /// Refund `payer` for `size` bytes.
    fn refund(&mut self, payer: AccountName, size: u64) -> TableResult<()> {
        self.update_ram_usage(payer, -ledger_delta(size))
    }

    /// Move a charge of `old_size` bytes on `old_payer` to `new_size` bytes on `new_payer`.
    fn recharge(
        &mut self,
        old_payer: AccountName,
        old_size: u64,
        new_payer: AccountName,
        new_size: u64,
    ) -> TableResult<()> {
        if old_payer == new_payer {
            let delta = ledger_delta(new_size) - ledger_delta(old_size);
            self.update_ram_usage(new_payer, delta)
        } else {
            self.refund(old_payer, old_size)?;
            self.charge(new_payer, new_size)
        }
    }

    /// Forward a delta to the ledger.
    fn update_ram_usage(&mut self, payer: AccountName, delta: i64) -> TableResult<()> {
        if delta == 0 {
            return Ok(());
        }

        self.ledger.update_ram_usage(payer, delta)?;
        self.ram_delta += delta;
        tracing::trace!(payer, delta, "ram usage updated");
        Ok(())
    }

    /// Count a new object in `partition`, creating its record if needed.
    fn add_object(&mut self, partition: &PartitionKey, payer: AccountName) -> TableResult<()> {
        if increment_partition(partition, payer, self.tables.partitions_mut())? {
            tracing::trace!(?partition, payer, "partition created");
            self.charge(payer, PARTITION_BILLABLE_SIZE)?;
        }
        Ok(())
    }

    /// Count one object less in `partition`, erasing its record with the last one.
    fn remove_object(&mut self, partition: &PartitionKey) -> TableResult<()> {
        if let Some(payer) = decrement_partition(partition, self.tables.partitions_mut())? {
            tracing::trace!(?partition, payer, "partition erased");
            self.refund(payer, PARTITION_BILLABLE_SIZE)?;
        }
        Ok(())
    }

    /// The handle table of a secondary index.
    fn secondary_iterators(&mut self, kind: IndexKind) -> &mut IteratorCache {
        &mut self.secondary_iterators[kind.index()]
    }
}

/// A billable size as a ledger delta.
///
/// Billable sizes are bounded by the maximum row size,
/// so they never come close to [`i64::MAX`].
fn ledger_delta(size: u64) -> i64 {
    i64::try_from(size).unwrap_or(i64::MAX)
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cursor() {
        let at = Cursor::At(Handle::from_raw(3), 10_u64);
        let end = Cursor::<u64>::End(Handle::from_raw(-2));

        assert_eq!(at.handle(), Handle::from_raw(3));
        assert_eq!(end.handle(), Handle::from_raw(-2));
        assert!(end.is_end());
        assert_eq!(at.into_value(), Some(10));
        assert_eq!(end.into_value(), None);
    }
}
