//! `redb` type aliases.

//---------------------------------------------------------------------------------------------------- Import
use crate::backend::redb::storable::StorableRedb;

//---------------------------------------------------------------------------------------------------- Types
/// The concrete type for readable `redb` tables.
pub(super) type RedbTableRo<K, V> = redb::ReadOnlyTable<StorableRedb<K>, StorableRedb<V>>;

/// The concrete type for readable/writable `redb` tables.
pub(super) type RedbTableRw<'tx, K, V> = redb::Table<'tx, StorableRedb<K>, StorableRedb<V>>;

/// The definition of a `redb` table, opened with one of the above.
pub(super) type RedbTableDefinition<K, V> =
    redb::TableDefinition<'static, StorableRedb<K>, StorableRedb<V>>;
