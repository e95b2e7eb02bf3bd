//! Primary index operations of [`ApplyContext`].

//---------------------------------------------------------------------------------------------------- Import
use tabula_database::RuntimeError;

use crate::{
    constants::row_billable_size,
    context::{ApplyContext, Cursor},
    error::{TableError, TableResult},
    iterator_cache::Handle,
    long_double::LongDouble,
    ops::{
        primary::{
            get_row, insert_row, last_row, lower_bound_row, next_row, previous_row, remove_row,
            replace_row, row_exists, upper_bound_row,
        },
        secondary::{get_entry, remove_entry},
    },
    secondary_key::SecondaryKey,
    tables::TablesMut,
    types::{AccountName, Key256, PartitionKey, PrimaryKey, Row, RowKey},
};

//---------------------------------------------------------------------------------------------------- Primary index
impl<T: TablesMut> ApplyContext<'_, T> {
    //------------------------------------------------ Mutation
    /// Store a new row in the receiver's `(scope, table)` partition.
    ///
    /// `payer` is charged the row's billable size, and the
    /// partition record's if this is the partition's first object.
    ///
    /// Returns a handle to the new row.
    ///
    /// # Errors
    /// - [`TableError::RowTooLarge`] if `data` exceeds the maximum row size
    /// - [`TableError::AuthorizationDenied`] if `payer` may not be charged
    /// - [`TableError::DuplicateKey`] if the row already exists
    pub fn db_store_i64(
        &mut self,
        scope: u64,
        table: u64,
        payer: AccountName,
        id: PrimaryKey,
        data: &[u8],
    ) -> TableResult<Handle> {
        self.check_row_size(data)?;
        let payer = self.authorize(payer)?;

        let partition = PartitionKey::new(self.receiver, scope, table);
        let key = partition.row(id);

        insert_row(&key, &Row::new(payer, data), self.tables.rows_mut()).map_err(|e| match e {
            RuntimeError::KeyExists => TableError::DuplicateKey,
            e => e.into(),
        })?;

        self.add_object(&partition, payer)?;
        self.charge(payer, row_billable_size(data.len()))?;

        tracing::trace!(?partition, id, payer, len = data.len(), "row stored");
        self.primary_iterators.add(key)
    }

    /// Replace the payer and payload of the row at `iterator`.
    ///
    /// If the payer changes, the old payer is refunded and the new
    /// payer charged in full, otherwise only the size difference is charged.
    ///
    /// # Errors
    /// - [`TableError::InvalidIterator`] if `iterator` does not reference a row
    /// - [`TableError::PartitionMismatch`] if the row is not in a receiver's partition
    /// - [`TableError::RowTooLarge`] if `data` exceeds the maximum row size
    /// - [`TableError::AuthorizationDenied`] if `payer` may not be charged
    pub fn db_update_i64(
        &mut self,
        iterator: Handle,
        payer: AccountName,
        data: &[u8],
    ) -> TableResult<()> {
        let key = self.primary_iterators.get(iterator)?;
        self.check_partition(&key.partition)?;
        self.check_row_size(data)?;
        let payer = self.authorize(payer)?;

        let old = replace_row(&key, &Row::new(payer, data), self.tables.rows_mut())?;

        self.recharge(
            old.payer(),
            row_billable_size(old.data().len()),
            payer,
            row_billable_size(data.len()),
        )?;

        tracing::trace!(
            partition = ?key.partition,
            id = key.primary,
            payer,
            len = data.len(),
            "row updated"
        );
        Ok(())
    }

    /// Remove the row at `iterator`.
    ///
    /// The row's entries in every secondary index are removed with it.
    /// All payers are refunded, and every handle referencing the
    /// row or one of its entries becomes invalid.
    ///
    /// # Errors
    /// - [`TableError::InvalidIterator`] if `iterator` does not reference a row
    /// - [`TableError::PartitionMismatch`] if the row is not in a receiver's partition
    pub fn db_remove_i64(&mut self, iterator: Handle) -> TableResult<()> {
        let key = self.primary_iterators.get(iterator)?;
        self.check_partition(&key.partition)?;

        let row = remove_row(&key, self.tables.rows_mut())?;
        self.refund(row.payer(), row_billable_size(row.data().len()))?;
        self.remove_object(&key.partition)?;

        self.remove_entries::<u64>(&key)?;
        self.remove_entries::<u128>(&key)?;
        self.remove_entries::<Key256>(&key)?;
        self.remove_entries::<f64>(&key)?;
        self.remove_entries::<LongDouble>(&key)?;

        self.primary_iterators.invalidate(&key);

        tracing::trace!(partition = ?key.partition, id = key.primary, "row removed");
        Ok(())
    }

    //------------------------------------------------ Lookup
    /// Copy the payload of the row at `iterator` into `buffer`.
    ///
    /// At most `buffer.len()` bytes are copied, but the full payload size is
    /// returned, so an empty `buffer` can be used to probe the size first.
    ///
    /// # Errors
    /// [`TableError::InvalidIterator`] if `iterator` does not reference a row.
    pub fn db_get_i64(&self, iterator: Handle, buffer: &mut [u8]) -> TableResult<usize> {
        let key = self.primary_iterators.get(iterator)?;
        let row = get_row(&key, self.tables.rows())?;
        let data = row.data();

        let len = buffer.len().min(data.len());
        buffer[..len].copy_from_slice(&data[..len]);
        Ok(data.len())
    }

    /// Find the row `id` of the `(code, scope, table)` partition.
    ///
    /// Returns the partition's end sentinel if there is no such row.
    ///
    /// # Errors
    /// [`TableError::TooManyIterators`] if no more handles can be issued.
    pub fn db_find_i64(
        &mut self,
        code: AccountName,
        scope: u64,
        table: u64,
        id: PrimaryKey,
    ) -> TableResult<Handle> {
        let partition = PartitionKey::new(code, scope, table);
        let key = partition.row(id);

        if row_exists(&key, self.tables.rows())? {
            self.primary_iterators.add(key)
        } else {
            self.primary_iterators.end(partition)
        }
    }

    /// Find the first row of the `(code, scope, table)` partition with a primary key `>= id`.
    ///
    /// Returns the partition's end sentinel if there is no such row.
    ///
    /// # Errors
    /// [`TableError::TooManyIterators`] if no more handles can be issued.
    pub fn db_lowerbound_i64(
        &mut self,
        code: AccountName,
        scope: u64,
        table: u64,
        id: PrimaryKey,
    ) -> TableResult<Handle> {
        let partition = PartitionKey::new(code, scope, table);
        let found = lower_bound_row(partition, id, self.tables.rows())?;
        Ok(self.row_cursor(partition, found)?.handle())
    }

    /// Find the first row of the `(code, scope, table)` partition with a primary key `> id`.
    ///
    /// Returns the partition's end sentinel if there is no such row.
    ///
    /// # Errors
    /// [`TableError::TooManyIterators`] if no more handles can be issued.
    pub fn db_upperbound_i64(
        &mut self,
        code: AccountName,
        scope: u64,
        table: u64,
        id: PrimaryKey,
    ) -> TableResult<Handle> {
        let partition = PartitionKey::new(code, scope, table);
        let found = upper_bound_row(partition, id, self.tables.rows())?;
        Ok(self.row_cursor(partition, found)?.handle())
    }

    /// Step to the row after `iterator`.
    ///
    /// Stepping past the last row, or from the end sentinel,
    /// returns the end sentinel.
    ///
    /// # Errors
    /// [`TableError::InvalidIterator`] if `iterator` was not issued
    /// by the primary index, or its row was removed.
    pub fn db_next_i64(&mut self, iterator: Handle) -> TableResult<Cursor<PrimaryKey>> {
        if iterator.is_end() {
            self.primary_iterators.end_partition(iterator)?;
            return Ok(Cursor::End(iterator));
        }

        let key = self.primary_iterators.get(iterator)?;
        let found = next_row(&key, self.tables.rows())?;
        self.row_cursor(key.partition, found)
    }

    /// Step to the row before `iterator`.
    ///
    /// Stepping back from the end sentinel returns the last row,
    /// stepping back from the first row returns the end sentinel.
    ///
    /// # Errors
    /// [`TableError::InvalidIterator`] if `iterator` was not issued
    /// by the primary index, or its row was removed.
    pub fn db_previous_i64(&mut self, iterator: Handle) -> TableResult<Cursor<PrimaryKey>> {
        let (partition, found) = if iterator.is_end() {
            let partition = self.primary_iterators.end_partition(iterator)?;
            (partition, last_row(partition, self.tables.rows())?)
        } else {
            let key = self.primary_iterators.get(iterator)?;
            (key.partition, previous_row(&key, self.tables.rows())?)
        };

        self.row_cursor(partition, found)
    }

    /// The end sentinel of the `(code, scope, table)` partition.
    ///
    /// # Errors
    /// [`TableError::TooManyIterators`] if no more handles can be issued.
    pub fn db_end_i64(&mut self, code: AccountName, scope: u64, table: u64) -> TableResult<Handle> {
        self.primary_iterators.end(PartitionKey::new(code, scope, table))
    }

    //------------------------------------------------ Private
    /// Reject payloads over the maximum row size.
    const fn check_row_size(&self, data: &[u8]) -> TableResult<()> {
        if data.len() > self.max_row_size {
            return Err(TableError::RowTooLarge {
                size: data.len(),
                max: self.max_row_size,
            });
        }
        Ok(())
    }

    /// A handle to `found`, or the end sentinel of `partition`.
    fn row_cursor(
        &mut self,
        partition: PartitionKey,
        found: Option<RowKey>,
    ) -> TableResult<Cursor<PrimaryKey>> {
        Ok(match found {
            Some(key) => Cursor::At(self.primary_iterators.add(key)?, key.primary),
            None => Cursor::End(self.primary_iterators.end(partition)?),
        })
    }

    /// Remove the entry of the row at `key` from the `K` index, if it has one.
    fn remove_entries<K: SecondaryKey>(&mut self, key: &RowKey) -> TableResult<()> {
        if get_entry::<K>(key, &*self.tables)?.is_some() {
            let (_, payer) = remove_entry::<K>(key, &mut *self.tables)?;
            self.refund(payer, K::BILLABLE_SIZE)?;
            self.remove_object(&key.partition)?;
            tracing::trace!(
                partition = ?key.partition,
                id = key.primary,
                index = K::KIND.name(),
                "entry removed with row"
            );
        }

        self.secondary_iterators(K::KIND).invalidate(key);
        Ok(())
    }
}
