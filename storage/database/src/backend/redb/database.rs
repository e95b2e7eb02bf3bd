//! `trait DatabaseR{o,w}` and `trait DatabaseIter` for `redb` tables.

//---------------------------------------------------------------------------------------------------- Import
use std::ops::{Bound, RangeBounds};

use redb::{AccessGuard, ReadableTable, ReadableTableMetadata};

use crate::{
    backend::redb::{
        storable::StorableRedb,
        types::{RedbTableRo, RedbTableRw},
    },
    database::{DatabaseIter, DatabaseRo, DatabaseRw},
    entry::{Entry, OccupiedEntry, VacantEntry},
    error::{DbResult, RuntimeError},
    key::Key,
    storable::Storable,
    table::Table,
};

//---------------------------------------------------------------------------------------------------- Helpers
/// A `redb` key/value guard pair.
type Guards<'a, K, V> = (AccessGuard<'a, StorableRedb<K>>, AccessGuard<'a, StorableRedb<V>>);

/// Decode a `redb` key/value guard pair.
#[inline]
fn decode<K: Key, V: Storable>((key, value): Guards<'_, K, V>) -> (K, V) {
    (key.value(), value.value())
}

/// Clone the bounds out of `range`.
///
/// `redb` takes its range by value for as long as the returned iterator lives.
#[inline]
fn owned_bounds<K: Clone>(range: &impl RangeBounds<K>) -> (Bound<K>, Bound<K>) {
    (range.start_bound().cloned(), range.end_bound().cloned())
}

/// Both table types only share [`ReadableTable`], so [`DatabaseRo`] is
/// implemented once per type through this macro.
macro_rules! impl_database_ro {
    ($table:ty) => {
        impl<T: Table + 'static> DatabaseRo<T> for $table {
            #[inline]
            fn get(&self, key: &T::Key) -> DbResult<T::Value> {
                let value = ReadableTable::get(self, key)?.ok_or(RuntimeError::KeyNotFound)?;
                Ok(value.value())
            }

            #[inline]
            fn len(&self) -> DbResult<u64> {
                Ok(ReadableTableMetadata::len(self)?)
            }

            #[inline]
            fn first(&self) -> DbResult<(T::Key, T::Value)> {
                let pair = ReadableTable::first(self)?.ok_or(RuntimeError::KeyNotFound)?;
                Ok(decode(pair))
            }

            #[inline]
            fn last(&self) -> DbResult<(T::Key, T::Value)> {
                let pair = ReadableTable::last(self)?.ok_or(RuntimeError::KeyNotFound)?;
                Ok(decode(pair))
            }

            #[inline]
            fn is_empty(&self) -> DbResult<bool> {
                Ok(ReadableTableMetadata::is_empty(self)?)
            }

            #[inline]
            fn range_first<R>(&self, range: R) -> DbResult<Option<(T::Key, T::Value)>>
            where
                R: RangeBounds<T::Key>,
            {
                let mut range = ReadableTable::range(self, owned_bounds(&range))?;
                range.next().transpose().map(|pair| pair.map(decode)).map_err(Into::into)
            }

            #[inline]
            fn range_last<R>(&self, range: R) -> DbResult<Option<(T::Key, T::Value)>>
            where
                R: RangeBounds<T::Key>,
            {
                let mut range = ReadableTable::range(self, owned_bounds(&range))?;
                range.next_back().transpose().map(|pair| pair.map(decode)).map_err(Into::into)
            }
        }
    };
}

//---------------------------------------------------------------------------------------------------- DatabaseRo
impl_database_ro!(RedbTableRo<T::Key, T::Value>);
impl_database_ro!(RedbTableRw<'_, T::Key, T::Value>);

//---------------------------------------------------------------------------------------------------- DatabaseIter
impl<T: Table + 'static> DatabaseIter<T> for RedbTableRo<T::Key, T::Value> {
    #[inline]
    fn get_range<'a, Range>(
        &'a self,
        range: Range,
    ) -> DbResult<impl Iterator<Item = DbResult<T::Value>> + 'a>
    where
        Range: RangeBounds<T::Key> + 'a,
    {
        let iter = ReadableTable::range(self, owned_bounds(&range))?;
        Ok(iter.map(|result| Ok(result?.1.value())))
    }

    #[inline]
    fn iter(&self) -> DbResult<impl Iterator<Item = DbResult<(T::Key, T::Value)>> + '_> {
        Ok(ReadableTable::iter(self)?.map(|result| Ok(decode(result?))))
    }

    #[inline]
    fn keys(&self) -> DbResult<impl Iterator<Item = DbResult<T::Key>> + '_> {
        Ok(ReadableTable::iter(self)?.map(|result| Ok(result?.0.value())))
    }

    #[inline]
    fn values(&self) -> DbResult<impl Iterator<Item = DbResult<T::Value>> + '_> {
        Ok(ReadableTable::iter(self)?.map(|result| Ok(result?.1.value())))
    }
}

//---------------------------------------------------------------------------------------------------- DatabaseRw
impl<T: Table + 'static> DatabaseRw<T> for RedbTableRw<'_, T::Key, T::Value> {
    #[inline]
    fn put(&mut self, key: &T::Key, value: &T::Value) -> DbResult<()> {
        redb::Table::insert(self, key, value)?;
        Ok(())
    }

    #[inline]
    fn delete(&mut self, key: &T::Key) -> DbResult<()> {
        redb::Table::remove(self, key)?;
        Ok(())
    }

    #[inline]
    fn take(&mut self, key: &T::Key) -> DbResult<T::Value> {
        let value = redb::Table::remove(self, key)?.ok_or(RuntimeError::KeyNotFound)?;
        Ok(value.value())
    }

    #[inline]
    fn entry<'a>(&'a mut self, key: &'a T::Key) -> DbResult<Entry<'a, T, Self>> {
        match DatabaseRo::<T>::get(self, key) {
            Ok(value) => Ok(Entry::Occupied(OccupiedEntry {
                db: self,
                key,
                value,
            })),
            Err(RuntimeError::KeyNotFound) => Ok(Entry::Vacant(VacantEntry { db: self, key })),
            Err(e) => Err(e),
        }
    }
}
