//! Stepping between neighbouring keys.

//---------------------------------------------------------------------------------------------------- Import
use std::ops::Bound;

use tabula_database::{DatabaseRo, DbResult, Table};

//---------------------------------------------------------------------------------------------------- Free functions
/// The first `(key, value)` after `current`, up to and including `max`.
#[inline]
pub(super) fn first_after<T: Table>(
    table: &impl DatabaseRo<T>,
    current: T::Key,
    max: T::Key,
) -> DbResult<Option<(T::Key, T::Value)>> {
    // The backend rejects ranges with the start past the end.
    if current >= max {
        return Ok(None);
    }

    table.range_first((Bound::Excluded(current), Bound::Included(max)))
}

/// The last `(key, value)` before `current`, down to and including `min`.
#[inline]
pub(super) fn last_before<T: Table>(
    table: &impl DatabaseRo<T>,
    current: T::Key,
    min: T::Key,
) -> DbResult<Option<(T::Key, T::Value)>> {
    if current <= min {
        return Ok(None);
    }

    table.range_last((Bound::Included(min), Bound::Excluded(current)))
}
