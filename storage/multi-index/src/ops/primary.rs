//! Primary row functions.

//---------------------------------------------------------------------------------------------------- Import
use tabula_database::{DatabaseRo, DatabaseRw, Entry, RuntimeError};

use crate::{
    ops::{
        macros::{doc_error, doc_partition_bounded, doc_partition_invariant},
        range::{first_after, last_before},
    },
    tables::Rows,
    types::{PartitionKey, PrimaryKey, Row, RowKey},
};

//---------------------------------------------------------------------------------------------------- Mutation
/// Add a row to the database.
///
/// # Errors
/// This returns [`RuntimeError::KeyExists`] if the row already exists,
/// the existing row is left untouched.
#[doc = doc_partition_invariant!()]
#[inline]
pub fn insert_row(
    key: &RowKey,
    row: &Row,
    table_rows: &mut impl DatabaseRw<Rows>,
) -> Result<(), RuntimeError> {
    match table_rows.entry(key)? {
        Entry::Vacant(entry) => entry.insert(row),
        Entry::Occupied(_) => Err(RuntimeError::KeyExists),
    }
}

/// Replace an existing row, returning the old one.
#[doc = doc_error!()]
#[inline]
pub fn replace_row(
    key: &RowKey,
    row: &Row,
    table_rows: &mut impl DatabaseRw<Rows>,
) -> Result<Row, RuntimeError> {
    let old = table_rows.get(key)?;
    table_rows.put(key, row)?;
    Ok(old)
}

/// Remove a row from the database, returning it.
///
/// Secondary entries referencing the row are not touched.
#[doc = doc_partition_invariant!()]
///
#[doc = doc_error!()]
#[inline]
pub fn remove_row(key: &RowKey, table_rows: &mut impl DatabaseRw<Rows>) -> Result<Row, RuntimeError> {
    table_rows.take(key)
}

//---------------------------------------------------------------------------------------------------- Lookup
/// Retrieve a row from the database.
#[doc = doc_error!()]
#[inline]
pub fn get_row(key: &RowKey, table_rows: &impl DatabaseRo<Rows>) -> Result<Row, RuntimeError> {
    table_rows.get(key)
}

/// Check if a row exists.
///
/// # Errors
/// This function only returns `RuntimeError`'s on database errors.
#[inline]
pub fn row_exists(key: &RowKey, table_rows: &impl DatabaseRo<Rows>) -> Result<bool, RuntimeError> {
    table_rows.contains(key)
}

/// The first row in `partition` with a primary key `>= primary`.
#[doc = doc_partition_bounded!()]
///
/// # Errors
/// This function only returns `RuntimeError`'s on database errors.
#[inline]
pub fn lower_bound_row(
    partition: PartitionKey,
    primary: PrimaryKey,
    table_rows: &impl DatabaseRo<Rows>,
) -> Result<Option<RowKey>, RuntimeError> {
    let range = partition.row(primary)..=RowKey::last_in(partition);
    Ok(table_rows.range_first(range)?.map(|(key, _)| key))
}

/// The first row in `partition` with a primary key `> primary`.
#[doc = doc_partition_bounded!()]
///
/// # Errors
/// This function only returns `RuntimeError`'s on database errors.
#[inline]
pub fn upper_bound_row(
    partition: PartitionKey,
    primary: PrimaryKey,
    table_rows: &impl DatabaseRo<Rows>,
) -> Result<Option<RowKey>, RuntimeError> {
    next_row(&partition.row(primary), table_rows)
}

/// The row after `key` in primary key order.
///
/// `key` itself does not need to exist.
#[doc = doc_partition_bounded!()]
///
/// # Errors
/// This function only returns `RuntimeError`'s on database errors.
#[inline]
pub fn next_row(key: &RowKey, table_rows: &impl DatabaseRo<Rows>) -> Result<Option<RowKey>, RuntimeError> {
    let max = RowKey::last_in(key.partition);
    Ok(first_after::<Rows>(table_rows, *key, max)?.map(|(key, _)| key))
}

/// The row before `key` in primary key order.
///
/// `key` itself does not need to exist.
#[doc = doc_partition_bounded!()]
///
/// # Errors
/// This function only returns `RuntimeError`'s on database errors.
#[inline]
pub fn previous_row(
    key: &RowKey,
    table_rows: &impl DatabaseRo<Rows>,
) -> Result<Option<RowKey>, RuntimeError> {
    let min = RowKey::first_in(key.partition);
    Ok(last_before::<Rows>(table_rows, *key, min)?.map(|(key, _)| key))
}

/// The row with the largest primary key in `partition`.
#[doc = doc_partition_bounded!()]
///
/// # Errors
/// This function only returns `RuntimeError`'s on database errors.
#[inline]
pub fn last_row(
    partition: PartitionKey,
    table_rows: &impl DatabaseRo<Rows>,
) -> Result<Option<RowKey>, RuntimeError> {
    let range = RowKey::first_in(partition)..=RowKey::last_in(partition);
    Ok(table_rows.range_last(range)?.map(|(key, _)| key))
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use tabula_database::{Env, EnvInner, TxRw};

    use super::*;
    use crate::{
        tables::{OpenTables, Tables, TablesMut},
        tests::{assert_all_tables_are_empty, tmp_concrete_env, AssertTableLen, ALICE, PARTITION},
    };

    /// Tests all above row functions.
    #[test]
    fn all_row_functions() {
        let (env, _tmp) = tmp_concrete_env();
        let env_inner = env.env_inner();
        assert_all_tables_are_empty(&env);

        let tx_rw = env_inner.tx_rw().unwrap();
        let mut tables = env_inner.open_tables_mut(&tx_rw).unwrap();

        // Neighbouring partitions, which must never be stepped into.
        let before = PartitionKey::new(ALICE, 7, 8);
        let after = PartitionKey::new(ALICE, 7, 10);

        for key in [
            before.row(u64::MAX),
            PARTITION.row(5),
            PARTITION.row(0),
            PARTITION.row(u64::MAX),
            after.row(0),
        ] {
            insert_row(&key, &Row::new(ALICE, &key.primary.to_le_bytes()), tables.rows_mut())
                .unwrap();
        }
        AssertTableLen {
            rows: 5,
            ..Default::default()
        }
        .assert(&tables);

        // Insert is insert-only.
        assert!(matches!(
            insert_row(&PARTITION.row(5), &Row::new(ALICE, &[]), tables.rows_mut()),
            Err(RuntimeError::KeyExists)
        ));
        assert_eq!(
            get_row(&PARTITION.row(5), tables.rows()).unwrap().data(),
            5_u64.to_le_bytes()
        );

        // Forwards.
        let rows = tables.rows();
        let first = lower_bound_row(PARTITION, 0, rows).unwrap().unwrap();
        assert_eq!(first, PARTITION.row(0));
        let second = next_row(&first, rows).unwrap().unwrap();
        assert_eq!(second, PARTITION.row(5));
        let third = next_row(&second, rows).unwrap().unwrap();
        assert_eq!(third, PARTITION.row(u64::MAX));
        assert_eq!(next_row(&third, rows).unwrap(), None);

        // Backwards.
        assert_eq!(last_row(PARTITION, rows).unwrap(), Some(third));
        assert_eq!(previous_row(&third, rows).unwrap(), Some(second));
        assert_eq!(previous_row(&first, rows).unwrap(), None);

        // Bounds.
        assert_eq!(lower_bound_row(PARTITION, 1, rows).unwrap(), Some(second));
        assert_eq!(lower_bound_row(PARTITION, 5, rows).unwrap(), Some(second));
        assert_eq!(upper_bound_row(PARTITION, 5, rows).unwrap(), Some(third));
        assert_eq!(upper_bound_row(PARTITION, u64::MAX, rows).unwrap(), None);

        // Empty partitions.
        let empty = PartitionKey::new(ALICE, 8, 0);
        assert_eq!(lower_bound_row(empty, 0, rows).unwrap(), None);
        assert_eq!(last_row(empty, rows).unwrap(), None);

        // Replace & remove.
        let old = replace_row(&second, &Row::new(ALICE, b"new"), tables.rows_mut()).unwrap();
        assert_eq!(old.data(), 5_u64.to_le_bytes());
        assert_eq!(get_row(&second, tables.rows()).unwrap().data(), b"new");

        let removed = remove_row(&second, tables.rows_mut()).unwrap();
        assert_eq!(removed.data(), b"new");
        assert!(!row_exists(&second, tables.rows()).unwrap());
        assert_eq!(next_row(&first, tables.rows()).unwrap(), Some(third));
        assert!(matches!(
            remove_row(&second, tables.rows_mut()),
            Err(RuntimeError::KeyNotFound)
        ));
        assert!(matches!(
            replace_row(&second, &Row::new(ALICE, &[]), tables.rows_mut()),
            Err(RuntimeError::KeyNotFound)
        ));

        drop(tables);
        TxRw::abort(tx_rw).unwrap();
        assert_all_tables_are_empty(&env);
    }
}
