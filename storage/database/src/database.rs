//! Table access; `trait DatabaseRo`, `trait DatabaseRw`, `trait DatabaseIter`.

//---------------------------------------------------------------------------------------------------- Import
use std::ops::RangeBounds;

use crate::{
    entry::Entry,
    error::{DbResult, RuntimeError},
    table::Table,
};

//---------------------------------------------------------------------------------------------------- DatabaseIter
/// Shared `# Errors` section of [`DatabaseIter`] functions.
macro_rules! doc_iter {
    () => {
        r"Values are decoded and owned, they may outlive the iterator.

# Errors
Creating the iterator may fail, and so may every item."
    };
}

/// Whole-table iteration over a read-only table.
///
/// Write tables do not implement this, they are
/// positioned with [`DatabaseRo::range_first`]
/// and [`DatabaseRo::range_last`].
pub trait DatabaseIter<T: Table> {
    /// Iterate the values of every key in `range`, in key order.
    ///
    #[doc = doc_iter!()]
    fn get_range<'a, Range>(
        &'a self,
        range: Range,
    ) -> DbResult<impl Iterator<Item = DbResult<T::Value>> + 'a>
    where
        Range: RangeBounds<T::Key> + 'a;

    /// Iterate every `(key, value)`, in key order.
    ///
    #[doc = doc_iter!()]
    #[expect(clippy::iter_not_returning_iterator)]
    fn iter(&self) -> DbResult<impl Iterator<Item = DbResult<(T::Key, T::Value)>> + '_>;

    /// Iterate every key, in order.
    ///
    #[doc = doc_iter!()]
    fn keys(&self) -> DbResult<impl Iterator<Item = DbResult<T::Key>> + '_>;

    /// Iterate every value, in key order.
    ///
    #[doc = doc_iter!()]
    fn values(&self) -> DbResult<impl Iterator<Item = DbResult<T::Value>> + '_>;
}

//---------------------------------------------------------------------------------------------------- DatabaseRo
/// Shared `# Errors` section of point lookups.
macro_rules! doc_database {
    () => {
        r"# Errors
Returns [`RuntimeError::KeyNotFound`] if there is no such `(key, value)`."
    };
}

/// Reads from one opened table.
///
/// "First", "last" and ranges all follow the
/// table's [`Key::compare`](crate::Key::compare) order.
pub trait DatabaseRo<T: Table> {
    /// The value of `key`.
    #[doc = doc_database!()]
    fn get(&self, key: &T::Key) -> DbResult<T::Value>;

    /// Returns `true` if `key` has a value.
    ///
    /// # Errors
    /// Never returns [`RuntimeError::KeyNotFound`].
    fn contains(&self, key: &T::Key) -> DbResult<bool> {
        match self.get(key) {
            Ok(_) => Ok(true),
            Err(RuntimeError::KeyNotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// The number of `(key, value)`s.
    ///
    /// # Errors
    /// Never returns [`RuntimeError::KeyNotFound`].
    fn len(&self) -> DbResult<u64>;

    /// The `(key, value)` with the smallest key.
    #[doc = doc_database!()]
    fn first(&self) -> DbResult<(T::Key, T::Value)>;

    /// The `(key, value)` with the largest key.
    #[doc = doc_database!()]
    fn last(&self) -> DbResult<(T::Key, T::Value)>;

    /// Returns `true` if the table holds no `(key, value)`.
    ///
    /// # Errors
    /// Never returns [`RuntimeError::KeyNotFound`].
    fn is_empty(&self) -> DbResult<bool>;

    /// The `(key, value)` with the smallest key in `range`, `None` if the range is empty.
    ///
    /// Only the returned pair is read, so this is a cheap cursor step:
    /// ```rust,ignore
    /// // The key after `5`, up to `10`.
    /// table.range_first((Bound::Excluded(5), Bound::Included(10)));
    /// ```
    ///
    /// `range` must not start after it ends.
    ///
    /// # Errors
    /// Never returns [`RuntimeError::KeyNotFound`].
    fn range_first<R>(&self, range: R) -> DbResult<Option<(T::Key, T::Value)>>
    where
        R: RangeBounds<T::Key>;

    /// The `(key, value)` with the largest key in `range`, `None` if the range is empty.
    ///
    /// `range` must not start after it ends.
    ///
    /// # Errors
    /// Never returns [`RuntimeError::KeyNotFound`].
    fn range_last<R>(&self, range: R) -> DbResult<Option<(T::Key, T::Value)>>
    where
        R: RangeBounds<T::Key>;
}

//---------------------------------------------------------------------------------------------------- DatabaseRw
/// Writes to one opened table.
///
/// Writes are only visible outside the write transaction once it commits.
pub trait DatabaseRw<T: Table>: DatabaseRo<T> + Sized {
    /// Set the value of `key`, replacing any previous one.
    ///
    /// # Errors
    /// Never returns [`RuntimeError::KeyExists`] or [`RuntimeError::KeyNotFound`].
    fn put(&mut self, key: &T::Key, value: &T::Value) -> DbResult<()>;

    /// Delete the value of `key`, if any.
    ///
    /// # Errors
    /// Never returns [`RuntimeError::KeyExists`] or [`RuntimeError::KeyNotFound`].
    fn delete(&mut self, key: &T::Key) -> DbResult<()>;

    /// Delete the value of `key`, returning it.
    #[doc = doc_database!()]
    fn take(&mut self, key: &T::Key) -> DbResult<T::Value>;

    /// Look `key` up for a read-modify-write, see [`Entry`].
    ///
    /// # Errors
    /// Never returns [`RuntimeError::KeyNotFound`],
    /// a missing key is an [`Entry::Vacant`].
    fn entry<'a>(&'a mut self, key: &'a T::Key) -> DbResult<Entry<'a, T, Self>>;
}
