//! Backend tests, written against the traits only.
//!
//! With `redb-memory` these run against the in-memory backend.

//---------------------------------------------------------------------------------------------------- Import
use pretty_assertions::assert_eq;

use crate::{
    config::SyncMode,
    database::{DatabaseIter, DatabaseRo, DatabaseRw},
    entry::Entry,
    env::{Env, EnvInner},
    error::RuntimeError,
    tests::{tmp_concrete_env, tmp_concrete_env_with, TestTable},
    transaction::{TxRo, TxRw},
};

//---------------------------------------------------------------------------------------------------- Tests
/// Empty transactions commit and abort.
#[test]
fn empty_transactions() {
    let (env, _tempdir) = tmp_concrete_env();
    let env_inner = env.env_inner();

    TxRo::commit(env_inner.tx_ro().unwrap()).unwrap();
    TxRw::commit(env_inner.tx_rw().unwrap()).unwrap();
    TxRw::abort(env_inner.tx_rw().unwrap()).unwrap();
}

/// Read-only opens need a created table, read/write opens create it.
#[test]
fn table_creation() {
    let (env, _tempdir) = tmp_concrete_env();
    let env_inner = env.env_inner();

    {
        let tx_ro = env_inner.tx_ro().unwrap();
        let error = env_inner.open_db_ro::<TestTable>(&tx_ro);
        assert!(matches!(error, Err(RuntimeError::TableNotFound)));
    }

    // Opening without committing creates nothing.
    {
        let tx_rw = env_inner.tx_rw().unwrap();
        env_inner.open_db_rw::<TestTable>(&tx_rw).unwrap();
        TxRw::abort(tx_rw).unwrap();

        let tx_ro = env_inner.tx_ro().unwrap();
        let error = env_inner.open_db_ro::<TestTable>(&tx_ro);
        assert!(matches!(error, Err(RuntimeError::TableNotFound)));
    }

    let tx_rw = env_inner.tx_rw().unwrap();
    env_inner.create_db::<TestTable>(&tx_rw).unwrap();
    TxRw::commit(tx_rw).unwrap();

    let tx_ro = env_inner.tx_ro().unwrap();
    let table = env_inner.open_db_ro::<TestTable>(&tx_ro).unwrap();
    assert!(table.is_empty().unwrap());
}

/// [`EnvInner::clear_db`] only clears created tables.
#[test]
fn clear_db() {
    let (env, _tempdir) = tmp_concrete_env();
    let env_inner = env.env_inner();
    let mut tx_rw = env_inner.tx_rw().unwrap();

    let error = env_inner.clear_db::<TestTable>(&mut tx_rw).unwrap_err();
    assert!(matches!(error, RuntimeError::TableNotFound));

    {
        let mut table = env_inner.open_db_rw::<TestTable>(&tx_rw).unwrap();
        table.put(&1, &1).unwrap();
    }
    env_inner.clear_db::<TestTable>(&mut tx_rw).unwrap();

    let table = env_inner.open_db_rw::<TestTable>(&tx_rw).unwrap();
    assert!(table.is_empty().unwrap());
}

/// Point reads and writes, and a reader's snapshot surviving a clear.
#[test]
fn read_write() {
    const N: u32 = 100;

    let (env, _tempdir) = tmp_concrete_env();
    let env_inner = env.env_inner();

    {
        let tx_rw = env_inner.tx_rw().unwrap();
        let mut table = env_inner.open_db_rw::<TestTable>(&tx_rw).unwrap();
        assert!(table.is_empty().unwrap());

        for key in 0..N {
            table.put(&key, &u64::from(key * 10)).unwrap();
        }
        // Overwrites keep the length.
        table.put(&0, &7).unwrap();

        assert_eq!(table.len().unwrap(), u64::from(N));
        assert_eq!(table.get(&0).unwrap(), 7);
        assert_eq!(table.first().unwrap(), (0, 7));
        assert_eq!(table.last().unwrap(), (N - 1, u64::from(N - 1) * 10));

        drop(table);
        TxRw::commit(tx_rw).unwrap();
    }

    let tx_ro = env_inner.tx_ro().unwrap();
    let table_ro = env_inner.open_db_ro::<TestTable>(&tx_ro).unwrap();
    assert_eq!(table_ro.values().unwrap().count(), N as usize);

    // Iterated values are owned.
    let value = {
        let mut values = table_ro.values().unwrap();
        values.next().unwrap().unwrap()
    };
    assert_eq!(value, 7);

    let mut tx_rw = env_inner.tx_rw().unwrap();
    {
        let mut table = env_inner.open_db_rw::<TestTable>(&tx_rw).unwrap();

        let Entry::Occupied(mut entry) = table.entry(&1).unwrap() else {
            panic!("1 was inserted");
        };
        entry.update(|value| *value += 1).unwrap();
        assert_eq!(*entry.value(), 11);
        assert_eq!(table.get(&1).unwrap(), 11);

        let Entry::Vacant(entry) = table.entry(&N).unwrap() else {
            panic!("{N} was never inserted");
        };
        entry.insert(&0).unwrap();
        assert!(table.contains(&N).unwrap());

        table.delete(&2).unwrap();
        assert!(!table.contains(&2).unwrap());
        assert!(matches!(table.get(&2), Err(RuntimeError::KeyNotFound)));
        // Deleting twice is fine.
        table.delete(&2).unwrap();

        assert_eq!(table.take(&3).unwrap(), 30);
        assert!(matches!(table.take(&3), Err(RuntimeError::KeyNotFound)));
        assert_eq!(table.get(&4).unwrap(), 40);
    }

    env_inner.clear_db::<TestTable>(&mut tx_rw).unwrap();
    {
        let table = env_inner.open_db_rw::<TestTable>(&tx_rw).unwrap();
        assert!(table.is_empty().unwrap());
        assert!(matches!(table.first(), Err(RuntimeError::KeyNotFound)));
    }
    TxRw::commit(tx_rw).unwrap();

    // The reader began before the clear.
    assert_eq!(table_ro.len().unwrap(), u64::from(N));
    assert_eq!(table_ro.get(&2).unwrap(), 20);
}

/// `u32` keys sort by value, not by their little-endian bytes.
#[test]
fn tables_are_sorted() {
    /// Crosses the first byte boundary.
    const RANGE: std::ops::Range<u32> = 0..257;

    let (env, _tempdir) = tmp_concrete_env();
    let env_inner = env.env_inner();

    let tx_rw = env_inner.tx_rw().unwrap();
    {
        let mut table = env_inner.open_db_rw::<TestTable>(&tx_rw).unwrap();
        for key in RANGE.rev() {
            table.put(&key, &0).unwrap();
            assert_eq!(table.first().unwrap().0, key);
        }
    }
    TxRw::commit(tx_rw).unwrap();

    let tx_ro = env_inner.tx_ro().unwrap();
    let table = env_inner.open_db_ro::<TestTable>(&tx_ro).unwrap();

    let keys = table.keys().unwrap().map(Result::unwrap);
    assert!(RANGE.eq(keys));

    let pairs = table.iter().unwrap().map(|pair| pair.unwrap().0);
    assert!(RANGE.eq(pairs));

    assert_eq!(table.last().unwrap().0, 256);
}

/// Test [`DatabaseRo::range_first`] and [`DatabaseRo::range_last`].
#[test]
fn range_first_last() {
    let (env, _tmp) = tmp_concrete_env();
    let env_inner = env.env_inner();
    let tx_rw = env_inner.tx_rw().unwrap();
    let mut table = env_inner.open_db_rw::<TestTable>(&tx_rw).unwrap();

    // Empty tables have nothing in any range.
    assert_eq!(table.range_first(..).unwrap(), None);
    assert_eq!(table.range_last(..).unwrap(), None);

    for key in [1, 3, 5, u32::MAX] {
        table.put(&key, &u64::from(key)).unwrap();
    }

    assert_eq!(table.range_first(..).unwrap(), Some((1, 1)));
    assert_eq!(table.range_last(..).unwrap(), Some((u32::MAX, u64::from(u32::MAX))));

    // Inclusive/exclusive starts.
    assert_eq!(table.range_first(2..).unwrap(), Some((3, 3)));
    assert_eq!(table.range_first(3..).unwrap(), Some((3, 3)));
    assert_eq!(
        table
            .range_first((std::ops::Bound::Excluded(3), std::ops::Bound::Unbounded))
            .unwrap(),
        Some((5, 5))
    );

    // Inclusive/exclusive ends.
    assert_eq!(table.range_last(..5).unwrap(), Some((3, 3)));
    assert_eq!(table.range_last(..=5).unwrap(), Some((5, 5)));
    assert_eq!(table.range_last(..1).unwrap(), None);

    // Bounded on both sides.
    assert_eq!(table.range_first(2..5).unwrap(), Some((3, 3)));
    assert_eq!(table.range_last(2..5).unwrap(), Some((3, 3)));
    assert_eq!(table.range_first(6..u32::MAX).unwrap(), None);
    assert_eq!(table.range_first(6..=u32::MAX).unwrap().unwrap().0, u32::MAX);

    drop(table);
    TxRw::commit(tx_rw).unwrap();

    // Read-only tables see the same ranges, and `get_range` agrees.
    let tx_ro = env_inner.tx_ro().unwrap();
    let table = env_inner.open_db_ro::<TestTable>(&tx_ro).unwrap();
    assert_eq!(table.range_first(4..).unwrap(), Some((5, 5)));
    assert_eq!(table.range_last(..u32::MAX).unwrap(), Some((5, 5)));

    let values = table
        .get_range(2..=5)
        .unwrap()
        .collect::<Result<Vec<u64>, RuntimeError>>()
        .unwrap();
    assert_eq!(values, [3, 5]);
}

/// Test [`TxRw::abort`] discards writes.
#[test]
fn tx_rw_abort() {
    let (env, _tmp) = tmp_concrete_env();
    let env_inner = env.env_inner();

    {
        let tx_rw = env_inner.tx_rw().unwrap();
        env_inner.create_db::<TestTable>(&tx_rw).unwrap();
        TxRw::commit(tx_rw).unwrap();
    }

    {
        let tx_rw = env_inner.tx_rw().unwrap();
        let mut table = env_inner.open_db_rw::<TestTable>(&tx_rw).unwrap();
        table.put(&0, &0).unwrap();
        drop(table);
        TxRw::abort(tx_rw).unwrap();
    }

    let tx_ro = env_inner.tx_ro().unwrap();
    let table = env_inner.open_db_ro::<TestTable>(&tx_ro).unwrap();
    assert!(table.is_empty().unwrap());
}

/// Test [`TxRw::savepoint`] and [`TxRw::restore_savepoint`].
#[test]
fn savepoint_restore() {
    let (env, _tmp) = tmp_concrete_env_with(SyncMode::Safe);
    let env_inner = env.env_inner();

    {
        let tx_rw = env_inner.tx_rw().unwrap();
        let mut table = env_inner.open_db_rw::<TestTable>(&tx_rw).unwrap();
        table.put(&1, &1).unwrap();
        drop(table);
        TxRw::commit(tx_rw).unwrap();
    }

    // Take a savepoint, then write.
    let tx_rw = env_inner.tx_rw().unwrap();
    let savepoint = TxRw::savepoint(&tx_rw).unwrap();
    {
        let mut table = env_inner.open_db_rw::<TestTable>(&tx_rw).unwrap();
        table.put(&2, &2).unwrap();
        table.delete(&1).unwrap();
    }
    TxRw::commit(tx_rw).unwrap();

    // Restore, the writes after the savepoint are gone.
    let mut tx_rw = env_inner.tx_rw().unwrap();
    TxRw::restore_savepoint(&mut tx_rw, &savepoint).unwrap();
    TxRw::commit(tx_rw).unwrap();

    let tx_ro = env_inner.tx_ro().unwrap();
    let table = env_inner.open_db_ro::<TestTable>(&tx_ro).unwrap();
    assert_eq!(table.get(&1).unwrap(), 1);
    assert!(matches!(table.get(&2), Err(RuntimeError::KeyNotFound)));
}
