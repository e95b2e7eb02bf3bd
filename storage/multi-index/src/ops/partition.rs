//! Partition record functions.

//---------------------------------------------------------------------------------------------------- Import
use tabula_database::{DatabaseRo, DatabaseRw, Entry, RuntimeError};

use crate::{
    ops::macros::doc_error,
    tables::Partitions,
    types::{AccountName, PartitionInfo, PartitionKey},
};

//---------------------------------------------------------------------------------------------------- Free functions
/// Retrieve a partition's record.
///
/// `Ok(None)` is returned if the partition holds no objects.
///
/// # Errors
/// This function only returns `RuntimeError`'s on database errors.
#[inline]
pub fn get_partition(
    partition: &PartitionKey,
    table_partitions: &impl DatabaseRo<Partitions>,
) -> Result<Option<PartitionInfo>, RuntimeError> {
    match table_partitions.get(partition) {
        Ok(info) => Ok(Some(info)),
        Err(RuntimeError::KeyNotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Count one more object in `partition`.
///
/// If the partition has no record yet, one is created with
/// `payer` as its payer and `true` is returned.
///
/// # Errors
/// This function only returns `RuntimeError`'s on database errors.
#[inline]
pub fn increment_partition(
    partition: &PartitionKey,
    payer: AccountName,
    table_partitions: &mut impl DatabaseRw<Partitions>,
) -> Result<bool, RuntimeError> {
    match table_partitions.entry(partition)? {
        Entry::Occupied(mut entry) => {
            entry.update(|info| info.count += 1)?;
            Ok(false)
        }
        Entry::Vacant(entry) => {
            entry.insert(&PartitionInfo { payer, count: 1 })?;
            Ok(true)
        }
    }
}

/// Count one less object in `partition`.
///
/// When the last object is gone the record is erased,
/// and its payer is returned.
#[doc = doc_error!()]
#[inline]
pub fn decrement_partition(
    partition: &PartitionKey,
    table_partitions: &mut impl DatabaseRw<Partitions>,
) -> Result<Option<AccountName>, RuntimeError> {
    match table_partitions.entry(partition)? {
        Entry::Occupied(entry) if entry.value().count <= 1 => {
            let (_, info) = entry.remove()?;
            Ok(Some(info.payer))
        }
        Entry::Occupied(mut entry) => {
            entry.update(|info| info.count -= 1)?;
            Ok(None)
        }
        Entry::Vacant(_) => Err(RuntimeError::KeyNotFound),
    }
}
