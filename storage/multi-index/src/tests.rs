//! Accounts, partitions and table assertions shared by the unit tests.

//---------------------------------------------------------------------------------------------------- Import
use pretty_assertions::assert_eq;

use tabula_database::{ConcreteEnv, DatabaseRo, Env, EnvInner};

use crate::{
    config::ConfigBuilder,
    tables::{OpenTables, Tables},
    types::{AccountName, PartitionKey},
};

//---------------------------------------------------------------------------------------------------- Constants
/// The contract executing in tests.
pub(crate) const ALICE: AccountName = 1;

/// Another contract, owning partitions `ALICE` may only read.
pub(crate) const BOB: AccountName = 2;

/// The account that signed the test actions.
pub(crate) const CAROL: AccountName = 3;

/// An account nobody authorized.
pub(crate) const MALLORY: AccountName = 4;

/// `ALICE`'s test partition.
pub(crate) const PARTITION: PartitionKey = PartitionKey::new(ALICE, 7, 9);

//---------------------------------------------------------------------------------------------------- Struct
/// Expected length of every table, unnamed fields default to `0`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct AssertTableLen {
    pub(crate) partitions: u64,
    pub(crate) rows: u64,
    pub(crate) idx64s: u64,
    pub(crate) idx64_primaries: u64,
    pub(crate) idx128s: u64,
    pub(crate) idx128_primaries: u64,
    pub(crate) idx256s: u64,
    pub(crate) idx256_primaries: u64,
    pub(crate) idx_doubles: u64,
    pub(crate) idx_double_primaries: u64,
    pub(crate) idx_long_doubles: u64,
    pub(crate) idx_long_double_primaries: u64,
}

impl AssertTableLen {
    pub(crate) fn assert(self, tables: &impl Tables) {
        let other = Self {
            partitions: tables.partitions().len().unwrap(),
            rows: tables.rows().len().unwrap(),
            idx64s: tables.idx64s().len().unwrap(),
            idx64_primaries: tables.idx64_primaries().len().unwrap(),
            idx128s: tables.idx128s().len().unwrap(),
            idx128_primaries: tables.idx128_primaries().len().unwrap(),
            idx256s: tables.idx256s().len().unwrap(),
            idx256_primaries: tables.idx256_primaries().len().unwrap(),
            idx_doubles: tables.idx_doubles().len().unwrap(),
            idx_double_primaries: tables.idx_double_primaries().len().unwrap(),
            idx_long_doubles: tables.idx_long_doubles().len().unwrap(),
            idx_long_double_primaries: tables.idx_long_double_primaries().len().unwrap(),
        };

        assert_eq!(self, other);
    }
}

//---------------------------------------------------------------------------------------------------- fn
/// A [`crate::open`]ed env in a fresh directory, deleted when the [`tempfile::TempDir`] drops.
pub(crate) fn tmp_concrete_env() -> (ConcreteEnv, tempfile::TempDir) {
    let tempdir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(tempdir.path().to_path_buf().into())
        .fast()
        .build();
    let env = crate::open(config).unwrap();

    (env, tempdir)
}

/// Nothing is left in any table, partition records included.
pub(crate) fn assert_all_tables_are_empty(env: &ConcreteEnv) {
    let env_inner = env.env_inner();
    let tx_ro = env_inner.tx_ro().unwrap();
    let tables = env_inner.open_tables(&tx_ro).unwrap();
    assert!(tables.all_tables_empty().unwrap());
    AssertTableLen::default().assert(&tables);
}
