//! Iterator handle tables.
//!
//! An [`IteratorCache`] hands out the small integer [`Handle`]s
//! contracts use to refer to rows and secondary entries.
//!
//! # Encoding
//! - Handles `>= 0` are positions in a dense slot table, each
//!   slot referencing one row (or the entry of one row).
//! - Handles `<= -2` are end sentinels, one per partition.
//! - `-1` is never issued.
//!
//! Slots are never reused: once the referenced object is removed its
//! slot is emptied and every later use of the handle fails with
//! [`TableError::InvalidIterator`].

//---------------------------------------------------------------------------------------------------- Import
use std::collections::BTreeMap;

use crate::{
    error::{TableError, TableResult},
    types::{PartitionKey, RowKey},
};

//---------------------------------------------------------------------------------------------------- Handle
/// An iterator handle.
///
/// Only meaningful within the [`ApplyContext`](crate::ApplyContext)
/// and the index it was issued by.
///
/// ```rust
/// # use tabula_multi_index::Handle;
/// assert!(Handle::from_raw(-2).is_end());
/// assert!(!Handle::from_raw(0).is_end());
/// assert_eq!(Handle::from_raw(7).get(), 7);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(i32);

impl Handle {
    /// Wrap a raw handle, e.g. one passed back by a contract.
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw handle.
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Returns `true` if this is an end sentinel.
    pub const fn is_end(self) -> bool {
        self.0 < -1
    }

    /// The slot index of a live handle.
    const fn slot(self) -> Option<usize> {
        if self.0 >= 0 {
            Some(self.0.unsigned_abs() as usize)
        } else {
            None
        }
    }

    /// The sentinel index of an end handle.
    const fn end(self) -> Option<usize> {
        if self.is_end() {
            Some((self.0.unsigned_abs() - 2) as usize)
        } else {
            None
        }
    }
}

//---------------------------------------------------------------------------------------------------- IteratorCache
/// The handles issued for one index within one execution context.
#[derive(Clone, Debug, Default)]
pub(crate) struct IteratorCache {
    /// Partition of each end sentinel, by sentinel index.
    ends: Vec<PartitionKey>,
    /// Sentinel index of each partition with an end sentinel.
    end_lookup: BTreeMap<PartitionKey, usize>,
    /// Referenced object of each handle, `None` once removed.
    slots: Vec<Option<RowKey>>,
    /// Live handle of each referenced object.
    lookup: BTreeMap<RowKey, Handle>,
}

impl IteratorCache {
    /// The end sentinel of `partition`.
    ///
    /// # Errors
    /// Returns [`TableError::TooManyIterators`] if no more sentinels can be issued.
    pub(crate) fn end(&mut self, partition: PartitionKey) -> TableResult<Handle> {
        if let Some(index) = self.end_lookup.get(&partition) {
            return Ok(end_handle(*index));
        }

        let index = self.ends.len();
        // `-(index + 2)` must fit in an `i32`.
        if index > (i32::MAX - 1).unsigned_abs() as usize {
            return Err(TableError::TooManyIterators);
        }

        self.ends.push(partition);
        self.end_lookup.insert(partition, index);
        Ok(end_handle(index))
    }

    /// The partition an end sentinel belongs to.
    ///
    /// # Errors
    /// Returns [`TableError::InvalidIterator`] if `handle` is
    /// not an end sentinel issued by this cache.
    pub(crate) fn end_partition(&self, handle: Handle) -> TableResult<PartitionKey> {
        handle
            .end()
            .and_then(|index| self.ends.get(index))
            .copied()
            .ok_or(TableError::InvalidIterator(handle.get()))
    }

    /// A handle referencing `row`.
    ///
    /// Returns the existing handle if `row` is already referenced.
    ///
    /// # Errors
    /// Returns [`TableError::TooManyIterators`] if no more handles can be issued.
    pub(crate) fn add(&mut self, row: RowKey) -> TableResult<Handle> {
        if let Some(handle) = self.lookup.get(&row) {
            return Ok(*handle);
        }

        let raw = i32::try_from(self.slots.len()).map_err(|_| TableError::TooManyIterators)?;
        let handle = Handle(raw);

        self.slots.push(Some(row));
        self.lookup.insert(row, handle);
        Ok(handle)
    }

    /// The object `handle` references.
    ///
    /// # Errors
    /// Returns [`TableError::InvalidIterator`] if `handle` is an end sentinel,
    /// was never issued, or its object was removed.
    pub(crate) fn get(&self, handle: Handle) -> TableResult<RowKey> {
        handle
            .slot()
            .and_then(|slot| self.slots.get(slot))
            .copied()
            .flatten()
            .ok_or(TableError::InvalidIterator(handle.get()))
    }

    /// Invalidate the handle referencing `row`, if any.
    pub(crate) fn invalidate(&mut self, row: &RowKey) {
        if let Some(handle) = self.lookup.remove(row) {
            if let Some(slot) = handle.slot().and_then(|slot| self.slots.get_mut(slot)) {
                *slot = None;
            }
        }
    }
}

/// The handle of sentinel `index`.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn end_handle(index: usize) -> Handle {
    Handle(-(index as i32) - 2)
}
