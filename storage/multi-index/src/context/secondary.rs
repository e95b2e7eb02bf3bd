//! Secondary index operations of [`ApplyContext`]; `struct SecondaryIndex`.

//---------------------------------------------------------------------------------------------------- Import
use std::marker::PhantomData;

use tabula_database::RuntimeError;

use crate::{
    context::{ApplyContext, Cursor},
    error::{TableError, TableResult},
    iterator_cache::{Handle, IteratorCache},
    long_double::LongDouble,
    ops::{
        primary::row_exists,
        secondary::{
            find_entry, get_entry, insert_entry, last_entry, lower_bound_entry, next_entry,
            previous_entry, remove_entry, update_entry, upper_bound_entry,
        },
    },
    secondary_key::SecondaryKey,
    tables::TablesMut,
    types::{AccountName, Key256, PartitionKey, PrimaryKey},
};

//---------------------------------------------------------------------------------------------------- Views
impl<'a, T: TablesMut> ApplyContext<'a, T> {
    /// The `u64` secondary index.
    pub fn idx64(&mut self) -> SecondaryIndex<'_, 'a, T, u64> {
        SecondaryIndex::new(self)
    }

    /// The `u128` secondary index.
    pub fn idx128(&mut self) -> SecondaryIndex<'_, 'a, T, u128> {
        SecondaryIndex::new(self)
    }

    /// The 256-bit secondary index.
    pub fn idx256(&mut self) -> SecondaryIndex<'_, 'a, T, Key256> {
        SecondaryIndex::new(self)
    }

    /// The `f64` secondary index.
    pub fn idx_double(&mut self) -> SecondaryIndex<'_, 'a, T, f64> {
        SecondaryIndex::new(self)
    }

    /// The long double secondary index.
    pub fn idx_long_double(&mut self) -> SecondaryIndex<'_, 'a, T, LongDouble> {
        SecondaryIndex::new(self)
    }
}

//---------------------------------------------------------------------------------------------------- SecondaryIndex
/// One secondary index of an [`ApplyContext`].
///
/// Every index supports the same operations, only the key type `K` differs.
///
/// Entries are ordered by secondary key, then by primary key. Each row
/// has at most one entry per index, but any number of rows may share a
/// secondary key.
///
/// Handles issued by one index are only valid with that same index.
pub struct SecondaryIndex<'c, 'a, T: TablesMut, K: SecondaryKey> {
    /// The context this is a view of.
    ctx: &'c mut ApplyContext<'a, T>,
    /// The key type.
    _key: PhantomData<K>,
}

impl<'c, 'a, T: TablesMut, K: SecondaryKey> SecondaryIndex<'c, 'a, T, K> {
    /// Create a view of the `K` index of `ctx`.
    fn new(ctx: &'c mut ApplyContext<'a, T>) -> Self {
        Self {
            ctx,
            _key: PhantomData,
        }
    }

    /// This index's handles.
    fn iterators(&mut self) -> &mut IteratorCache {
        self.ctx.secondary_iterators(K::KIND)
    }

    //------------------------------------------------ Mutation
    /// Store the secondary key of row `id` in the receiver's `(scope, table)` partition.
    ///
    /// `payer` is charged the entry's billable size.
    ///
    /// Returns a handle to the new entry.
    ///
    /// # Errors
    /// - [`TableError::InvalidValue`] if `secondary` is NaN
    /// - [`TableError::AuthorizationDenied`] if `payer` may not be charged
    /// - [`TableError::NotFound`] if row `id` does not exist
    /// - [`TableError::DuplicateSecondary`] if row `id` already has an entry in this index
    pub fn store(
        &mut self,
        scope: u64,
        table: u64,
        payer: AccountName,
        id: PrimaryKey,
        secondary: K,
    ) -> TableResult<Handle> {
        secondary.validate()?;
        let payer = self.ctx.authorize(payer)?;

        let partition = PartitionKey::new(self.ctx.receiver, scope, table);
        let row = partition.row(id);

        if !row_exists(&row, self.ctx.tables.rows())? {
            return Err(TableError::NotFound);
        }

        insert_entry::<K>(&row, secondary.encode(), payer, &mut *self.ctx.tables).map_err(
            |e| match e {
                RuntimeError::KeyExists => TableError::DuplicateSecondary {
                    index: K::KIND.name(),
                },
                e => e.into(),
            },
        )?;

        self.ctx.add_object(&partition, payer)?;
        self.ctx.charge(payer, K::BILLABLE_SIZE)?;

        tracing::trace!(?partition, id, payer, index = K::KIND.name(), "entry stored");
        self.iterators().add(row)
    }

    /// Change the secondary key and payer of the entry at `iterator`.
    ///
    /// The entry moves to its new position in the index, its handle stays valid.
    ///
    /// # Errors
    /// - [`TableError::InvalidIterator`] if `iterator` does not reference an entry
    /// - [`TableError::PartitionMismatch`] if the entry is not in a receiver's partition
    /// - [`TableError::InvalidValue`] if `secondary` is NaN
    /// - [`TableError::AuthorizationDenied`] if `payer` may not be charged
    pub fn update(&mut self, iterator: Handle, payer: AccountName, secondary: K) -> TableResult<()> {
        let row = self.iterators().get(iterator)?;
        self.ctx.check_partition(&row.partition)?;
        secondary.validate()?;
        let payer = self.ctx.authorize(payer)?;

        let (_, old_payer) =
            update_entry::<K>(&row, secondary.encode(), payer, &mut *self.ctx.tables)?;
        self.ctx
            .recharge(old_payer, K::BILLABLE_SIZE, payer, K::BILLABLE_SIZE)?;

        tracing::trace!(
            partition = ?row.partition,
            id = row.primary,
            payer,
            index = K::KIND.name(),
            "entry updated"
        );
        Ok(())
    }

    /// Remove the entry at `iterator`.
    ///
    /// The row itself is not touched.
    ///
    /// # Errors
    /// - [`TableError::InvalidIterator`] if `iterator` does not reference an entry
    /// - [`TableError::PartitionMismatch`] if the entry is not in a receiver's partition
    pub fn remove(&mut self, iterator: Handle) -> TableResult<()> {
        let row = self.iterators().get(iterator)?;
        self.ctx.check_partition(&row.partition)?;

        let (_, payer) = remove_entry::<K>(&row, &mut *self.ctx.tables)?;
        self.ctx.refund(payer, K::BILLABLE_SIZE)?;
        self.ctx.remove_object(&row.partition)?;
        self.iterators().invalidate(&row);

        tracing::trace!(
            partition = ?row.partition,
            id = row.primary,
            index = K::KIND.name(),
            "entry removed"
        );
        Ok(())
    }

    //------------------------------------------------ Lookup
    /// Find the entry of row `id` in the `(code, scope, table)` partition.
    ///
    /// Returns the entry's secondary key,
    /// or the partition's end sentinel if the row has no entry.
    ///
    /// # Errors
    /// [`TableError::TooManyIterators`] if no more handles can be issued.
    pub fn find_primary(
        &mut self,
        code: AccountName,
        scope: u64,
        table: u64,
        id: PrimaryKey,
    ) -> TableResult<Cursor<K>> {
        let partition = PartitionKey::new(code, scope, table);
        let row = partition.row(id);

        Ok(match get_entry::<K>(&row, &*self.ctx.tables)? {
            Some((secondary, _)) => Cursor::At(self.iterators().add(row)?, K::decode(&secondary)),
            None => Cursor::End(self.iterators().end(partition)?),
        })
    }

    /// Find the entry with secondary key `secondary` in the `(code, scope, table)` partition.
    ///
    /// If several rows share the key, the one with the smallest primary key is returned.
    ///
    /// Returns the entry's primary key,
    /// or the partition's end sentinel if there is no such entry.
    ///
    /// # Errors
    /// [`TableError::TooManyIterators`] if no more handles can be issued.
    pub fn find_secondary(
        &mut self,
        code: AccountName,
        scope: u64,
        table: u64,
        secondary: K,
    ) -> TableResult<Cursor<PrimaryKey>> {
        let partition = PartitionKey::new(code, scope, table);
        let found = find_entry::<K>(partition, secondary.encode(), &*self.ctx.tables)?;
        self.primary_cursor(partition, found)
    }

    /// Find the first entry with a secondary key `>= secondary`
    /// in the `(code, scope, table)` partition.
    ///
    /// Returns the entry's `(secondary, primary)`,
    /// or the partition's end sentinel if there is no such entry.
    ///
    /// # Errors
    /// [`TableError::TooManyIterators`] if no more handles can be issued.
    pub fn lowerbound(
        &mut self,
        code: AccountName,
        scope: u64,
        table: u64,
        secondary: K,
    ) -> TableResult<Cursor<(K, PrimaryKey)>> {
        let partition = PartitionKey::new(code, scope, table);
        let found = lower_bound_entry::<K>(partition, secondary.encode(), &*self.ctx.tables)?;
        self.entry_cursor(partition, found)
    }

    /// Find the first entry with a secondary key `> secondary`
    /// in the `(code, scope, table)` partition.
    ///
    /// Returns the entry's `(secondary, primary)`,
    /// or the partition's end sentinel if there is no such entry.
    ///
    /// # Errors
    /// [`TableError::TooManyIterators`] if no more handles can be issued.
    pub fn upperbound(
        &mut self,
        code: AccountName,
        scope: u64,
        table: u64,
        secondary: K,
    ) -> TableResult<Cursor<(K, PrimaryKey)>> {
        let partition = PartitionKey::new(code, scope, table);
        let found = upper_bound_entry::<K>(partition, secondary.encode(), &*self.ctx.tables)?;
        self.entry_cursor(partition, found)
    }

    /// Step to the entry after `iterator`.
    ///
    /// Stepping past the last entry, or from the end sentinel,
    /// returns the end sentinel.
    ///
    /// # Errors
    /// [`TableError::InvalidIterator`] if `iterator` was not issued
    /// by this index, or its entry was removed.
    pub fn next(&mut self, iterator: Handle) -> TableResult<Cursor<PrimaryKey>> {
        if iterator.is_end() {
            self.iterators().end_partition(iterator)?;
            return Ok(Cursor::End(iterator));
        }

        let row = self.iterators().get(iterator)?;
        let found = next_entry::<K>(&row, &*self.ctx.tables)?;
        self.primary_cursor(row.partition, found.map(|(_, primary)| primary))
    }

    /// Step to the entry before `iterator`.
    ///
    /// Stepping back from the end sentinel returns the last entry,
    /// stepping back from the first entry returns the end sentinel.
    ///
    /// # Errors
    /// [`TableError::InvalidIterator`] if `iterator` was not issued
    /// by this index, or its entry was removed.
    pub fn previous(&mut self, iterator: Handle) -> TableResult<Cursor<PrimaryKey>> {
        let (partition, found) = if iterator.is_end() {
            let partition = self.iterators().end_partition(iterator)?;
            (partition, last_entry::<K>(partition, &*self.ctx.tables)?)
        } else {
            let row = self.iterators().get(iterator)?;
            (row.partition, previous_entry::<K>(&row, &*self.ctx.tables)?)
        };

        self.primary_cursor(partition, found.map(|(_, primary)| primary))
    }

    /// The end sentinel of the `(code, scope, table)` partition.
    ///
    /// # Errors
    /// [`TableError::TooManyIterators`] if no more handles can be issued.
    pub fn end(&mut self, code: AccountName, scope: u64, table: u64) -> TableResult<Handle> {
        self.iterators().end(PartitionKey::new(code, scope, table))
    }

    //------------------------------------------------ Private
    /// A handle to the entry of row `found`, or the end sentinel of `partition`.
    fn primary_cursor(
        &mut self,
        partition: PartitionKey,
        found: Option<PrimaryKey>,
    ) -> TableResult<Cursor<PrimaryKey>> {
        Ok(match found {
            Some(primary) => Cursor::At(self.iterators().add(partition.row(primary))?, primary),
            None => Cursor::End(self.iterators().end(partition)?),
        })
    }

    /// Same as [`Self::primary_cursor`], also decoding the secondary key.
    fn entry_cursor(
        &mut self,
        partition: PartitionKey,
        found: Option<(K::Encoded, PrimaryKey)>,
    ) -> TableResult<Cursor<(K, PrimaryKey)>> {
        Ok(match found {
            Some((secondary, primary)) => {
                let handle = self.iterators().add(partition.row(primary))?;
                Cursor::At(handle, (K::decode(&secondary), primary))
            }
            None => Cursor::End(self.iterators().end(partition)?),
        })
    }
}
