//! Secondary index functions.
//!
//! All functions here are generic over the [`SecondaryKey`] of the index,
//! and operate on its pair of tables together:
//! - the entry table, ordered by `(partition, secondary, primary)`
//! - the reverse table, mapping `(partition, primary)` to the secondary key
//!
//! Keys are passed and returned in their encoded form, see [`SecondaryKey::encode`].

//---------------------------------------------------------------------------------------------------- Import
use tabula_database::{DatabaseRo, DatabaseRw, Entry, RuntimeError};

use crate::{
    ops::{
        macros::{doc_error, doc_partition_bounded, doc_partition_invariant},
        range::{first_after, last_before},
    },
    secondary_key::SecondaryKey,
    tables::{Tables, TablesMut},
    types::{AccountName, PartitionKey, PrimaryKey, RowKey},
};

//---------------------------------------------------------------------------------------------------- Mutation
/// Add an entry for the row at `row`.
///
/// # Errors
/// This returns [`RuntimeError::KeyExists`] if the row already
/// has an entry in this index, the existing entry is left untouched.
#[doc = doc_partition_invariant!()]
#[inline]
pub fn insert_entry<K: SecondaryKey>(
    row: &RowKey,
    secondary: K::Encoded,
    payer: AccountName,
    tables: &mut impl TablesMut,
) -> Result<(), RuntimeError> {
    match K::by_primary_mut(tables).entry(row)? {
        Entry::Vacant(entry) => entry.insert(&secondary)?,
        Entry::Occupied(_) => return Err(RuntimeError::KeyExists),
    }

    let key = K::entry_key(row.partition, secondary, row.primary);
    K::entries_mut(tables).put(&key, &payer)
}

/// Remove the entry of the row at `row`.
///
/// Returns the removed entry's `(secondary, payer)`.
#[doc = doc_partition_invariant!()]
///
#[doc = doc_error!()]
#[inline]
pub fn remove_entry<K: SecondaryKey>(
    row: &RowKey,
    tables: &mut impl TablesMut,
) -> Result<(K::Encoded, AccountName), RuntimeError> {
    let secondary = K::by_primary_mut(tables).take(row)?;
    let key = K::entry_key(row.partition, secondary, row.primary);
    let payer = K::entries_mut(tables).take(&key)?;
    Ok((secondary, payer))
}

/// Change the secondary key and payer of the entry of the row at `row`.
///
/// The entry is re-sorted under its new key.
///
/// Returns the old `(secondary, payer)`.
#[doc = doc_error!()]
#[inline]
pub fn update_entry<K: SecondaryKey>(
    row: &RowKey,
    secondary: K::Encoded,
    payer: AccountName,
    tables: &mut impl TablesMut,
) -> Result<(K::Encoded, AccountName), RuntimeError> {
    let old = remove_entry::<K>(row, tables)?;
    insert_entry::<K>(row, secondary, payer, tables)?;
    Ok(old)
}

//---------------------------------------------------------------------------------------------------- Lookup
/// Retrieve the `(secondary, payer)` of the entry of the row at `row`.
///
/// `Ok(None)` is returned if the row has no entry in this index.
///
/// # Errors
/// This function only returns `RuntimeError`'s on database errors.
#[inline]
pub fn get_entry<K: SecondaryKey>(
    row: &RowKey,
    tables: &impl Tables,
) -> Result<Option<(K::Encoded, AccountName)>, RuntimeError> {
    let secondary = match K::by_primary(tables).get(row) {
        Ok(secondary) => secondary,
        Err(RuntimeError::KeyNotFound) => return Ok(None),
        Err(e) => return Err(e),
    };

    let key = K::entry_key(row.partition, secondary, row.primary);
    let payer = K::entries(tables).get(&key)?;
    Ok(Some((secondary, payer)))
}

/// The entry with the smallest primary key among those with
/// a secondary key `>= secondary`, in secondary key order.
///
/// Returns the entry's `(secondary, primary)`.
#[doc = doc_partition_bounded!()]
///
/// # Errors
/// This function only returns `RuntimeError`'s on database errors.
#[inline]
pub fn lower_bound_entry<K: SecondaryKey>(
    partition: PartitionKey,
    secondary: K::Encoded,
    tables: &impl Tables,
) -> Result<Option<(K::Encoded, PrimaryKey)>, RuntimeError> {
    let start = K::entry_key(partition, secondary, PrimaryKey::MIN);
    let range = start..=last_entry_key::<K>(partition);
    Ok(K::entries(tables)
        .range_first(range)?
        .map(|(key, _)| split::<K>(&key)))
}

/// The first entry with a secondary key `> secondary`.
///
/// Returns the entry's `(secondary, primary)`.
#[doc = doc_partition_bounded!()]
///
/// # Errors
/// This function only returns `RuntimeError`'s on database errors.
#[inline]
pub fn upper_bound_entry<K: SecondaryKey>(
    partition: PartitionKey,
    secondary: K::Encoded,
    tables: &impl Tables,
) -> Result<Option<(K::Encoded, PrimaryKey)>, RuntimeError> {
    // The last possible entry with this secondary key.
    let current = K::entry_key(partition, secondary, PrimaryKey::MAX);
    Ok(
        first_after::<K::Entries>(K::entries(tables), current, last_entry_key::<K>(partition))?
            .map(|(key, _)| split::<K>(&key)),
    )
}

/// The entry with secondary key `secondary` and the smallest primary key.
///
/// Returns the entry's primary key.
#[doc = doc_partition_bounded!()]
///
/// # Errors
/// This function only returns `RuntimeError`'s on database errors.
#[inline]
pub fn find_entry<K: SecondaryKey>(
    partition: PartitionKey,
    secondary: K::Encoded,
    tables: &impl Tables,
) -> Result<Option<PrimaryKey>, RuntimeError> {
    Ok(lower_bound_entry::<K>(partition, secondary, tables)?
        .filter(|(found, _)| *found == secondary)
        .map(|(_, primary)| primary))
}

/// The entry after the one of the row at `row`, in secondary key order.
///
/// Returns the entry's `(secondary, primary)`.
#[doc = doc_partition_bounded!()]
///
#[doc = doc_error!()]
#[inline]
pub fn next_entry<K: SecondaryKey>(
    row: &RowKey,
    tables: &impl Tables,
) -> Result<Option<(K::Encoded, PrimaryKey)>, RuntimeError> {
    let secondary = K::by_primary(tables).get(row)?;
    let current = K::entry_key(row.partition, secondary, row.primary);
    Ok(first_after::<K::Entries>(
        K::entries(tables),
        current,
        last_entry_key::<K>(row.partition),
    )?
    .map(|(key, _)| split::<K>(&key)))
}

/// The entry before the one of the row at `row`, in secondary key order.
///
/// Returns the entry's `(secondary, primary)`.
#[doc = doc_partition_bounded!()]
///
#[doc = doc_error!()]
#[inline]
pub fn previous_entry<K: SecondaryKey>(
    row: &RowKey,
    tables: &impl Tables,
) -> Result<Option<(K::Encoded, PrimaryKey)>, RuntimeError> {
    let secondary = K::by_primary(tables).get(row)?;
    let current = K::entry_key(row.partition, secondary, row.primary);
    Ok(last_before::<K::Entries>(
        K::entries(tables),
        current,
        first_entry_key::<K>(row.partition),
    )?
    .map(|(key, _)| split::<K>(&key)))
}

/// The last entry of `partition` in secondary key order.
///
/// Returns the entry's `(secondary, primary)`.
///
/// # Errors
/// This function only returns `RuntimeError`'s on database errors.
#[inline]
pub fn last_entry<K: SecondaryKey>(
    partition: PartitionKey,
    tables: &impl Tables,
) -> Result<Option<(K::Encoded, PrimaryKey)>, RuntimeError> {
    let range = first_entry_key::<K>(partition)..=last_entry_key::<K>(partition);
    Ok(K::entries(tables)
        .range_last(range)?
        .map(|(key, _)| split::<K>(&key)))
}

//---------------------------------------------------------------------------------------------------- Private
/// The smallest possible entry key in `partition`.
#[inline]
fn first_entry_key<K: SecondaryKey>(partition: PartitionKey) -> K::EntryKey {
    K::entry_key(partition, K::ENCODED_MIN, PrimaryKey::MIN)
}

/// The largest possible entry key in `partition`.
#[inline]
fn last_entry_key<K: SecondaryKey>(partition: PartitionKey) -> K::EntryKey {
    K::entry_key(partition, K::ENCODED_MAX, PrimaryKey::MAX)
}

/// `(secondary, primary)` of an entry key.
#[inline]
fn split<K: SecondaryKey>(key: &K::EntryKey) -> (K::Encoded, PrimaryKey) {
    let (_, secondary, primary) = K::split_entry_key(key);
    (secondary, primary)
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use tabula_database::{Env, EnvInner, TxRw};

    use super::*;
    use crate::{
        long_double::LongDouble,
        tables::OpenTables,
        tests::{assert_all_tables_are_empty, tmp_concrete_env, AssertTableLen, ALICE, BOB, PARTITION},
        types::Key256,
    };

    /// Tests insert, lookup and removal on the `u64` index,
    /// including entries sharing a secondary key.
    #[test]
    fn all_entry_functions() {
        let (env, _tmp) = tmp_concrete_env();
        let env_inner = env.env_inner();
        assert_all_tables_are_empty(&env);

        let tx_rw = env_inner.tx_rw().unwrap();
        let mut tables = env_inner.open_tables_mut(&tx_rw).unwrap();

        // An entry in a neighbouring partition, which must never be stepped into.
        let neighbour = PartitionKey::new(ALICE, 7, 10);
        insert_entry::<u64>(&neighbour.row(1), 0_u64.encode(), ALICE, &mut tables).unwrap();

        // (primary, secondary)
        for (primary, secondary) in [(20, 100_u64), (10, 100), (30, 50), (40, 200)] {
            insert_entry::<u64>(&PARTITION.row(primary), secondary.encode(), BOB, &mut tables)
                .unwrap();
        }
        AssertTableLen {
            idx64s: 5,
            idx64_primaries: 5,
            ..Default::default()
        }
        .assert(&tables);

        // One entry per row.
        assert!(matches!(
            insert_entry::<u64>(&PARTITION.row(10), 1_u64.encode(), BOB, &mut tables),
            Err(RuntimeError::KeyExists)
        ));

        assert_eq!(
            get_entry::<u64>(&PARTITION.row(30), &tables).unwrap(),
            Some((50_u64.encode(), BOB))
        );
        assert_eq!(get_entry::<u64>(&PARTITION.row(50), &tables).unwrap(), None);

        // Ties are broken by the primary key.
        assert_eq!(
            find_entry::<u64>(PARTITION, 100_u64.encode(), &tables).unwrap(),
            Some(10)
        );
        assert_eq!(find_entry::<u64>(PARTITION, 99_u64.encode(), &tables).unwrap(), None);

        // Iterate in `(secondary, primary)` order.
        let order = [(50, 30), (100, 10), (100, 20), (200, 40)]
            .map(|(secondary, primary): (u64, u64)| (secondary.encode(), primary));

        let mut current = lower_bound_entry::<u64>(PARTITION, 0_u64.encode(), &tables).unwrap();
        for expected in order {
            assert_eq!(current, Some(expected));
            current = next_entry::<u64>(&PARTITION.row(expected.1), &tables).unwrap();
        }
        assert_eq!(current, None);

        assert_eq!(last_entry::<u64>(PARTITION, &tables).unwrap(), Some(order[3]));
        assert_eq!(
            previous_entry::<u64>(&PARTITION.row(20), &tables).unwrap(),
            Some(order[1])
        );
        assert_eq!(previous_entry::<u64>(&PARTITION.row(30), &tables).unwrap(), None);

        // Bounds.
        assert_eq!(
            lower_bound_entry::<u64>(PARTITION, 100_u64.encode(), &tables).unwrap(),
            Some(order[1])
        );
        assert_eq!(
            upper_bound_entry::<u64>(PARTITION, 100_u64.encode(), &tables).unwrap(),
            Some(order[3])
        );
        assert_eq!(
            upper_bound_entry::<u64>(PARTITION, u64::MAX.encode(), &tables).unwrap(),
            None
        );

        // Update re-sorts.
        let old = update_entry::<u64>(&PARTITION.row(40), 1_u64.encode(), ALICE, &mut tables).unwrap();
        assert_eq!(old, (200_u64.encode(), BOB));
        assert_eq!(
            lower_bound_entry::<u64>(PARTITION, 0_u64.encode(), &tables).unwrap(),
            Some((1_u64.encode(), 40))
        );

        // Remove.
        let removed = remove_entry::<u64>(&PARTITION.row(10), &mut tables).unwrap();
        assert_eq!(removed, (100_u64.encode(), BOB));
        assert_eq!(
            find_entry::<u64>(PARTITION, 100_u64.encode(), &tables).unwrap(),
            Some(20)
        );
        assert!(matches!(
            remove_entry::<u64>(&PARTITION.row(10), &mut tables),
            Err(RuntimeError::KeyNotFound)
        ));
        assert!(matches!(
            next_entry::<u64>(&PARTITION.row(10), &tables),
            Err(RuntimeError::KeyNotFound)
        ));

        drop(tables);
        TxRw::abort(tx_rw).unwrap();
        assert_all_tables_are_empty(&env);
    }

    /// Each index only touches its own tables.
    #[test]
    fn indices_are_independent() {
        let (env, _tmp) = tmp_concrete_env();
        let env_inner = env.env_inner();

        let tx_rw = env_inner.tx_rw().unwrap();
        let mut tables = env_inner.open_tables_mut(&tx_rw).unwrap();
        let row = PARTITION.row(1);

        insert_entry::<u64>(&row, 1_u64.encode(), ALICE, &mut tables).unwrap();
        insert_entry::<u128>(&row, 1_u128.encode(), ALICE, &mut tables).unwrap();
        insert_entry::<Key256>(&row, Key256([1; 32]).encode(), ALICE, &mut tables).unwrap();
        insert_entry::<f64>(&row, 1.0_f64.encode(), ALICE, &mut tables).unwrap();
        insert_entry::<LongDouble>(&row, LongDouble::from(1.0).encode(), ALICE, &mut tables)
            .unwrap();

        AssertTableLen {
            partitions: 0,
            rows: 0,
            idx64s: 1,
            idx64_primaries: 1,
            idx128s: 1,
            idx128_primaries: 1,
            idx256s: 1,
            idx256_primaries: 1,
            idx_doubles: 1,
            idx_double_primaries: 1,
            idx_long_doubles: 1,
            idx_long_double_primaries: 1,
        }
        .assert(&tables);

        remove_entry::<f64>(&row, &mut tables).unwrap();
        assert_eq!(get_entry::<f64>(&row, &tables).unwrap(), None);
        assert_eq!(
            get_entry::<u64>(&row, &tables).unwrap(),
            Some((1_u64.encode(), ALICE))
        );

        // A negative double sorts before every positive one.
        insert_entry::<f64>(&PARTITION.row(2), (-1.0_f64).encode(), ALICE, &mut tables).unwrap();
        insert_entry::<f64>(&PARTITION.row(3), 0.5_f64.encode(), ALICE, &mut tables).unwrap();
        assert_eq!(
            lower_bound_entry::<f64>(PARTITION, f64::NEG_INFINITY.encode(), &tables).unwrap(),
            Some(((-1.0_f64).encode(), 2))
        );
        assert_eq!(
            upper_bound_entry::<f64>(PARTITION, 0.0_f64.encode(), &tables).unwrap(),
            Some((0.5_f64.encode(), 3))
        );

        drop(tables);
        TxRw::abort(tx_rw).unwrap();
    }
}
