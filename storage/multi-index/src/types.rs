//! Multi-index [table](crate::tables) types.
//!
//! This module contains all types used by the database tables,
//! and aliases for common types that use the same underlying
//! primitive type.
//!
//! # Layout
//! Every key in [`crate::tables`] starts with a [`PartitionKey`],
//! so all objects of one `(code, scope, table)` partition are
//! stored next to each other in each table:
//!
//! | Table                      | Key                                      | Value           |
//! |----------------------------|------------------------------------------|-----------------|
//! | `Partitions`               | `(code, scope, table)`                   | `(payer, count)` |
//! | `Rows`                     | `(code, scope, table, primary)`          | `payer ++ data` |
//! | `Idx{64,128,256,...}s`     | `(code, scope, table, secondary, primary)` | `payer`       |
//! | `Idx{64,128,256,...}Primaries` | `(code, scope, table, primary)`      | `secondary`     |

//---------------------------------------------------------------------------------------------------- Import
use std::cmp::Ordering;

use bytemuck::{Pod, Zeroable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tabula_database::{compare_decoded, Key, Storable};

//---------------------------------------------------------------------------------------------------- Aliases
// These type aliases exist as many Tabula types are the same primitive,
// but are semantically different; this makes the code clearer.

/// An account name, e.g. a contract's `code` or a `payer`.
///
/// `0` is never a real account.
pub type AccountName = u64;

/// A row's primary key.
pub type PrimaryKey = u64;

//---------------------------------------------------------------------------------------------------- PartitionKey
/// The `(code, scope, table)` triple identifying one logical table.
///
/// ```rust
/// # use tabula_database::Storable;
/// # use tabula_multi_index::types::*;
/// let a = PartitionKey::new(1, 2, 3);
/// let b: PartitionKey = Storable::from_bytes(Storable::as_bytes(&a));
/// assert_eq!(a, b);
///
/// // Partitions are ordered by `code`, then `scope`, then `table`.
/// assert!(PartitionKey::new(1, 2, 4) > a);
/// assert!(PartitionKey::new(2, 0, 0) > a);
/// ```
///
/// # Size & Alignment
/// ```rust
/// # use tabula_multi_index::types::*;
/// assert_eq!(size_of::<PartitionKey>(), 24);
/// assert_eq!(align_of::<PartitionKey>(), 8);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct PartitionKey {
    /// The contract owning the partition.
    pub code: AccountName,
    /// Contract-defined namespace.
    pub scope: u64,
    /// Contract-defined table identifier.
    pub table: u64,
}

impl PartitionKey {
    /// Create a new [`PartitionKey`].
    pub const fn new(code: AccountName, scope: u64, table: u64) -> Self {
        Self { code, scope, table }
    }

    /// The key of this partition's row with primary key `primary`.
    pub const fn row(self, primary: PrimaryKey) -> RowKey {
        RowKey {
            partition: self,
            primary,
        }
    }
}

impl Key for PartitionKey {
    fn compare(left: &[u8], right: &[u8]) -> Ordering {
        compare_decoded::<Self>(left, right)
    }
}

//---------------------------------------------------------------------------------------------------- PartitionInfo
/// Persisted bookkeeping for one partition.
///
/// # Size & Alignment
/// ```rust
/// # use tabula_multi_index::types::*;
/// assert_eq!(size_of::<PartitionInfo>(), 16);
/// assert_eq!(align_of::<PartitionInfo>(), 8);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct PartitionInfo {
    /// The account charged for this record.
    pub payer: AccountName,
    /// Live rows plus live secondary entries (of every index type).
    pub count: u64,
}

//---------------------------------------------------------------------------------------------------- RowKey
/// The location of a primary row.
///
/// ```rust
/// # use tabula_multi_index::types::*;
/// let partition = PartitionKey::new(1, 2, 3);
///
/// // Rows are ordered by partition first...
/// assert!(partition.row(u64::MAX) < PartitionKey::new(1, 2, 4).row(0));
/// // ...then by primary key.
/// assert!(partition.row(255) < partition.row(256));
/// ```
///
/// # Size & Alignment
/// ```rust
/// # use tabula_multi_index::types::*;
/// assert_eq!(size_of::<RowKey>(), 32);
/// assert_eq!(align_of::<RowKey>(), 8);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct RowKey {
    /// The partition the row lives in.
    pub partition: PartitionKey,
    /// The row's primary key.
    pub primary: PrimaryKey,
}

impl RowKey {
    /// The smallest possible key in `partition`.
    pub const fn first_in(partition: PartitionKey) -> Self {
        partition.row(PrimaryKey::MIN)
    }

    /// The largest possible key in `partition`.
    pub const fn last_in(partition: PartitionKey) -> Self {
        partition.row(PrimaryKey::MAX)
    }
}

impl Key for RowKey {
    fn compare(left: &[u8], right: &[u8]) -> Ordering {
        compare_decoded::<Self>(left, right)
    }
}

//---------------------------------------------------------------------------------------------------- Row
/// A primary row's value: the payer followed by the payload.
///
/// ```rust
/// # use tabula_database::Storable;
/// # use tabula_multi_index::types::*;
/// let row = Row::new(5, b"hello");
/// assert_eq!(row.payer(), 5);
/// assert_eq!(row.data(), b"hello");
///
/// let bytes = row.as_bytes();
/// assert_eq!(bytes.len(), 8 + 5);
/// assert_eq!(Row::from_bytes(bytes), row);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Row(Vec<u8>);

impl Row {
    /// Byte length of the payer prefix.
    const PAYER_LEN: usize = size_of::<AccountName>();

    /// Create a new [`Row`].
    pub fn new(payer: AccountName, data: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(Self::PAYER_LEN + data.len());
        bytes.extend_from_slice(&payer.to_le_bytes());
        bytes.extend_from_slice(data);
        Self(bytes)
    }

    /// The account charged for this row.
    pub fn payer(&self) -> AccountName {
        let mut payer = [0; Self::PAYER_LEN];
        payer.copy_from_slice(&self.0[..Self::PAYER_LEN]);
        AccountName::from_le_bytes(payer)
    }

    /// The row's payload.
    pub fn data(&self) -> &[u8] {
        &self.0[Self::PAYER_LEN..]
    }
}

impl Storable for Row {
    const BYTE_LENGTH: Option<usize> = None;

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// # Panics
    /// This panics if `bytes` is shorter than the payer prefix,
    /// which only happens if the database is corrupt.
    #[inline]
    fn from_bytes(bytes: &[u8]) -> Self {
        assert!(
            bytes.len() >= Self::PAYER_LEN,
            "{}",
            tabula_database::DATABASE_CORRUPT_MSG
        );
        Self(bytes.to_vec())
    }
}

//---------------------------------------------------------------------------------------------------- Key256
/// A 256-bit secondary key, compared as an opaque byte blob.
///
/// ```rust
/// # use tabula_multi_index::types::*;
/// let low = Key256([0; 32]);
/// let mut high = [0; 32];
/// high[0] = 1;
/// assert!(Key256(high) > low);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Key256(pub [u8; 32]);

//---------------------------------------------------------------------------------------------------- Secondary entry keys
/// Define the key type of a secondary index table.
///
/// `$width` is the byte length of the encoded secondary key.
macro_rules! define_entry_key {
    ($(
        $(#[$attr:meta])*
        $name:ident => $width:literal
    ),* $(,)?) => {$(
        $(#[$attr])*
        ///
        /// Entries are ordered by partition, then secondary key, then primary key.
        ///
        /// The secondary key is stored in an order preserving
        /// encoding, see [`crate::SecondaryKey::encode`].
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[repr(C)]
        pub struct $name {
            /// The partition the entry lives in.
            pub partition: PartitionKey,
            /// The encoded secondary key.
            pub secondary: [u8; $width],
            /// The primary key of the row this entry indexes.
            pub primary: PrimaryKey,
        }

        impl $name {
            /// Create a new entry key.
            pub const fn new(
                partition: PartitionKey,
                secondary: [u8; $width],
                primary: PrimaryKey,
            ) -> Self {
                Self { partition, secondary, primary }
            }
        }

        impl Key for $name {
            fn compare(left: &[u8], right: &[u8]) -> Ordering {
                compare_decoded::<Self>(left, right)
            }
        }
    )*};
}

define_entry_key! {
    /// Key of the 64-bit secondary index tables (`u64` and `f64`).
    EntryKey64 => 8,
    /// Key of the 128-bit secondary index tables (`u128` and long double).
    EntryKey128 => 16,
    /// Key of the 256-bit secondary index table.
    EntryKey256 => 32,
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod test {
    use hex_literal::hex;
    use pretty_assertions::assert_eq;

    use super::*;

    /// Composite keys sort field-wise, not byte-wise.
    #[test]
    fn composite_key_order() {
        let a = PartitionKey::new(1, 0, 0).row(256);
        let b = PartitionKey::new(1, 0, 0).row(255);

        // Little-endian bytes would put 256 first.
        assert_eq!(RowKey::compare(a.as_bytes(), b.as_bytes()), Ordering::Greater);

        let a = PartitionKey::new(256, 0, 0);
        let b = PartitionKey::new(255, u64::MAX, u64::MAX);
        assert_eq!(PartitionKey::compare(a.as_bytes(), b.as_bytes()), Ordering::Greater);
    }

    /// Entry keys compare the secondary bytes before the primary key.
    #[test]
    fn entry_key_order() {
        let partition = PartitionKey::new(1, 2, 3);
        let low = EntryKey64::new(partition, hex!("0000000000000001"), u64::MAX);
        let high = EntryKey64::new(partition, hex!("0000000000000002"), 0);

        assert_eq!(EntryKey64::compare(low.as_bytes(), high.as_bytes()), Ordering::Less);

        let tie_low = EntryKey64::new(partition, hex!("0000000000000002"), 1);
        let tie_high = EntryKey64::new(partition, hex!("0000000000000002"), 256);
        assert_eq!(
            EntryKey64::compare(tie_low.as_bytes(), tie_high.as_bytes()),
            Ordering::Less
        );
    }

    #[test]
    fn entry_key_size() {
        assert_eq!(size_of::<EntryKey64>(), 40);
        assert_eq!(size_of::<EntryKey128>(), 48);
        assert_eq!(size_of::<EntryKey256>(), 64);
    }

    #[test]
    fn row_empty_payload() {
        let row = Row::new(7, &[]);
        assert_eq!(row.payer(), 7);
        assert!(row.data().is_empty());
        assert_eq!(Row::from_bytes(row.as_bytes()), row);
    }

    #[test]
    #[should_panic = "The database may be corrupted"]
    fn row_too_short() {
        Row::from_bytes(&[0; 7]);
    }
}
