//! Secondary key types; `trait SecondaryKey`.
//!
//! Each secondary index is one instantiation of the same generic
//! engine over a [`SecondaryKey`]. The trait carries everything
//! that differs per index:
//! - the tables the index is stored in
//! - the order preserving encoding of the key
//! - validation (NaN rejection for floats)
//! - the wire format keys are passed in
//!
//! | Index             | Rust type       | Wire size | Order                 |
//! |-------------------|-----------------|-----------|-----------------------|
//! | `idx64`           | [`u64`]         | 8         | numeric               |
//! | `idx128`          | [`u128`]        | 16        | numeric               |
//! | `idx256`          | [`Key256`]      | 32        | lexicographic bytes   |
//! | `idx_double`      | [`f64`]         | 8         | numeric, NaN rejected |
//! | `idx_long_double` | [`LongDouble`]  | 16        | numeric, NaN rejected |

//---------------------------------------------------------------------------------------------------- Import
use std::fmt::Debug;

use tabula_database::{DatabaseRo, DatabaseRw, Key, Storable, Table};

use crate::{
    constants::secondary_billable_size,
    error::{TableError, TableResult},
    long_double::{LongDouble, SIGN_MASK},
    tables::{
        Idx128Primaries, Idx128s, Idx256Primaries, Idx256s, Idx64Primaries, Idx64s,
        IdxDoublePrimaries, IdxDoubles, IdxLongDoublePrimaries, IdxLongDoubles, Tables, TablesMut,
    },
    types::{
        AccountName, EntryKey128, EntryKey256, EntryKey64, Key256, PartitionKey, PrimaryKey,
        RowKey,
    },
};

//---------------------------------------------------------------------------------------------------- IndexKind
/// The five secondary index families.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexKind {
    /// [`u64`] keys.
    Idx64,
    /// [`u128`] keys.
    Idx128,
    /// [`Key256`] keys.
    Idx256,
    /// [`f64`] keys.
    IdxDouble,
    /// [`LongDouble`] keys.
    IdxLongDouble,
}

impl IndexKind {
    /// All index kinds.
    pub const ALL: [Self; 5] = [
        Self::Idx64,
        Self::Idx128,
        Self::Idx256,
        Self::IdxDouble,
        Self::IdxLongDouble,
    ];

    /// The index's name, e.g. `idx64`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idx64 => "idx64",
            Self::Idx128 => "idx128",
            Self::Idx256 => "idx256",
            Self::IdxDouble => "idx_double",
            Self::IdxLongDouble => "idx_long_double",
        }
    }

    /// Position of the index in [`Self::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

//---------------------------------------------------------------------------------------------------- SecondaryKey
/// A type usable as a secondary index key.
///
/// # Encoding
/// Keys are stored as [`Self::Encoded`], a big-endian encoding in which
/// byte order equals the key's numeric order. Encoding is a bijection
/// on valid keys, except that `-0.0` encodes as `+0.0`.
///
/// ```rust
/// # use tabula_multi_index::SecondaryKey;
/// assert!(SecondaryKey::encode(&-1.5_f64) < SecondaryKey::encode(&-0.5_f64));
/// assert!(SecondaryKey::encode(&-0.5_f64) < SecondaryKey::encode(&0.0_f64));
/// assert_eq!(SecondaryKey::encode(&-0.0_f64), SecondaryKey::encode(&0.0_f64));
/// assert!(SecondaryKey::encode(&255_u64) < SecondaryKey::encode(&256_u64));
/// ```
pub trait SecondaryKey: Copy + Debug + PartialEq + Sized + 'static {
    /// Which index family this is.
    const KIND: IndexKind;

    /// Byte length of the key on the wire.
    const WIRE_SIZE: usize;

    /// Billable size of one entry in this index.
    const BILLABLE_SIZE: u64 = secondary_billable_size(Self::WIRE_SIZE as u64);

    /// The smallest encoded key.
    const ENCODED_MIN: Self::Encoded;

    /// The largest encoded key.
    const ENCODED_MAX: Self::Encoded;

    /// The order preserving encoding of this key.
    type Encoded: Storable + Copy + Ord + Debug + 'static;

    /// Key type of [`Self::Entries`].
    type EntryKey: Key + Copy + Debug + 'static;

    /// `(partition, secondary, primary) -> payer`.
    type Entries: Table<Key = Self::EntryKey, Value = AccountName>;

    /// `(partition, primary) -> secondary`.
    type ByPrimary: Table<Key = RowKey, Value = Self::Encoded>;

    //------------------------------------------------ Tables
    /// The index's entry table.
    fn entries(tables: &impl Tables) -> &impl DatabaseRo<Self::Entries>;

    /// The index's entry table, mutably.
    fn entries_mut(tables: &mut impl TablesMut) -> &mut impl DatabaseRw<Self::Entries>;

    /// The index's reverse (primary to secondary) table.
    fn by_primary(tables: &impl Tables) -> &impl DatabaseRo<Self::ByPrimary>;

    /// The index's reverse (primary to secondary) table, mutably.
    fn by_primary_mut(tables: &mut impl TablesMut) -> &mut impl DatabaseRw<Self::ByPrimary>;

    //------------------------------------------------ Entry keys
    /// Build an entry key.
    fn entry_key(
        partition: PartitionKey,
        secondary: Self::Encoded,
        primary: PrimaryKey,
    ) -> Self::EntryKey;

    /// Split an entry key into `(partition, secondary, primary)`.
    fn split_entry_key(key: &Self::EntryKey) -> (PartitionKey, Self::Encoded, PrimaryKey);

    //------------------------------------------------ Values
    /// Check the key may be stored.
    ///
    /// # Errors
    /// Returns [`TableError::InvalidValue`] for NaN.
    fn validate(&self) -> TableResult<()> {
        Ok(())
    }

    /// Encode into the order preserving representation.
    fn encode(&self) -> Self::Encoded;

    /// Decode from the order preserving representation.
    fn decode(encoded: &Self::Encoded) -> Self;

    /// Read a key from its wire representation.
    ///
    /// # Errors
    /// Returns [`TableError::InvalidKeySize`] if `bytes` is not [`Self::WIRE_SIZE`] long.
    fn from_wire(bytes: &[u8]) -> TableResult<Self>;

    /// Write the key in its wire representation.
    fn to_wire(&self) -> Vec<u8>;
}

/// Copy `bytes` into an array of the key's wire size.
fn wire_array<const N: usize>(bytes: &[u8]) -> TableResult<[u8; N]> {
    <[u8; N]>::try_from(bytes).map_err(|_| TableError::InvalidKeySize {
        expected: N,
        found: bytes.len(),
    })
}

//---------------------------------------------------------------------------------------------------- Float encoding
/// Order preserving bits of an `f64`.
///
/// Negative values have all bits flipped, positive values only the sign.
fn encode_f64_bits(value: f64) -> u64 {
    const SIGN: u64 = 1 << 63;
    // -0.0 is stored as +0.0.
    let bits = if value == 0.0 { 0 } else { value.to_bits() };
    if bits & SIGN == 0 {
        bits | SIGN
    } else {
        !bits
    }
}

/// Inverse of [`encode_f64_bits`].
fn decode_f64_bits(encoded: u64) -> f64 {
    const SIGN: u64 = 1 << 63;
    let bits = if encoded & SIGN == 0 {
        !encoded
    } else {
        encoded & !SIGN
    };
    f64::from_bits(bits)
}

/// Order preserving bits of a binary128.
fn encode_f128_bits(value: LongDouble) -> u128 {
    let bits = if value.is_zero() { 0 } else { value.to_bits() };
    if bits & SIGN_MASK == 0 {
        bits | SIGN_MASK
    } else {
        !bits
    }
}

/// Inverse of [`encode_f128_bits`].
fn decode_f128_bits(encoded: u128) -> LongDouble {
    let bits = if encoded & SIGN_MASK == 0 {
        !encoded
    } else {
        encoded & !SIGN_MASK
    };
    LongDouble::from_bits(bits)
}

//---------------------------------------------------------------------------------------------------- Impl
/// Implement the table accessors of [`SecondaryKey`].
macro_rules! impl_tables {
    ($entries:ident, $by_primary:ident) => { paste::paste! {
        type Entries = $entries;
        type ByPrimary = $by_primary;

        #[inline]
        fn entries(tables: &impl Tables) -> &impl DatabaseRo<$entries> {
            tables.[<$entries:snake>]()
        }

        #[inline]
        fn entries_mut(tables: &mut impl TablesMut) -> &mut impl DatabaseRw<$entries> {
            tables.[<$entries:snake _mut>]()
        }

        #[inline]
        fn by_primary(tables: &impl Tables) -> &impl DatabaseRo<$by_primary> {
            tables.[<$by_primary:snake>]()
        }

        #[inline]
        fn by_primary_mut(tables: &mut impl TablesMut) -> &mut impl DatabaseRw<$by_primary> {
            tables.[<$by_primary:snake _mut>]()
        }
    }};
}

/// Implement the entry key functions of [`SecondaryKey`].
macro_rules! impl_entry_key {
    ($entry_key:ident, $width:literal) => {
        type EntryKey = $entry_key;
        type Encoded = [u8; $width];

        const ENCODED_MIN: [u8; $width] = [0; $width];
        const ENCODED_MAX: [u8; $width] = [u8::MAX; $width];

        #[inline]
        fn entry_key(
            partition: PartitionKey,
            secondary: [u8; $width],
            primary: PrimaryKey,
        ) -> $entry_key {
            $entry_key::new(partition, secondary, primary)
        }

        #[inline]
        fn split_entry_key(key: &$entry_key) -> (PartitionKey, [u8; $width], PrimaryKey) {
            (key.partition, key.secondary, key.primary)
        }
    };
}

impl SecondaryKey for u64 {
    const KIND: IndexKind = IndexKind::Idx64;
    const WIRE_SIZE: usize = 8;

    impl_tables!(Idx64s, Idx64Primaries);
    impl_entry_key!(EntryKey64, 8);

    fn encode(&self) -> [u8; 8] {
        self.to_be_bytes()
    }

    fn decode(encoded: &[u8; 8]) -> Self {
        Self::from_be_bytes(*encoded)
    }

    fn from_wire(bytes: &[u8]) -> TableResult<Self> {
        Ok(Self::from_le_bytes(wire_array(bytes)?))
    }

    fn to_wire(&self) -> Vec<u8> {
        self.to_le_bytes().to_vec()
    }
}

impl SecondaryKey for u128 {
    const KIND: IndexKind = IndexKind::Idx128;
    const WIRE_SIZE: usize = 16;

    impl_tables!(Idx128s, Idx128Primaries);
    impl_entry_key!(EntryKey128, 16);

    fn encode(&self) -> [u8; 16] {
        self.to_be_bytes()
    }

    fn decode(encoded: &[u8; 16]) -> Self {
        Self::from_be_bytes(*encoded)
    }

    fn from_wire(bytes: &[u8]) -> TableResult<Self> {
        Ok(Self::from_le_bytes(wire_array(bytes)?))
    }

    fn to_wire(&self) -> Vec<u8> {
        self.to_le_bytes().to_vec()
    }
}

impl SecondaryKey for Key256 {
    const KIND: IndexKind = IndexKind::Idx256;
    const WIRE_SIZE: usize = 32;

    impl_tables!(Idx256s, Idx256Primaries);
    impl_entry_key!(EntryKey256, 32);

    fn encode(&self) -> [u8; 32] {
        self.0
    }

    fn decode(encoded: &[u8; 32]) -> Self {
        Self(*encoded)
    }

    fn from_wire(bytes: &[u8]) -> TableResult<Self> {
        Ok(Self(wire_array(bytes)?))
    }

    fn to_wire(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl SecondaryKey for f64 {
    const KIND: IndexKind = IndexKind::IdxDouble;
    const WIRE_SIZE: usize = 8;

    impl_tables!(IdxDoubles, IdxDoublePrimaries);
    impl_entry_key!(EntryKey64, 8);

    fn validate(&self) -> TableResult<()> {
        if self.is_nan() {
            return Err(TableError::InvalidValue);
        }
        Ok(())
    }

    fn encode(&self) -> [u8; 8] {
        encode_f64_bits(*self).to_be_bytes()
    }

    fn decode(encoded: &[u8; 8]) -> Self {
        decode_f64_bits(u64::from_be_bytes(*encoded))
    }

    fn from_wire(bytes: &[u8]) -> TableResult<Self> {
        Ok(Self::from_le_bytes(wire_array(bytes)?))
    }

    fn to_wire(&self) -> Vec<u8> {
        self.to_le_bytes().to_vec()
    }
}

impl SecondaryKey for LongDouble {
    const KIND: IndexKind = IndexKind::IdxLongDouble;
    const WIRE_SIZE: usize = 16;

    impl_tables!(IdxLongDoubles, IdxLongDoublePrimaries);
    impl_entry_key!(EntryKey128, 16);

    fn validate(&self) -> TableResult<()> {
        if self.is_nan() {
            return Err(TableError::InvalidValue);
        }
        Ok(())
    }

    fn encode(&self) -> [u8; 16] {
        encode_f128_bits(*self).to_be_bytes()
    }

    fn decode(encoded: &[u8; 16]) -> Self {
        decode_f128_bits(u128::from_be_bytes(*encoded))
    }

    fn from_wire(bytes: &[u8]) -> TableResult<Self> {
        Ok(Self::from_bits(u128::from_le_bytes(wire_array(bytes)?)))
    }

    fn to_wire(&self) -> Vec<u8> {
        self.to_bits().to_le_bytes().to_vec()
    }
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use hex_literal::hex;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn kind_index() {
        for (i, kind) in IndexKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert_eq!(<f64 as SecondaryKey>::KIND.name(), "idx_double");
    }

    #[test]
    fn billable_size() {
        assert_eq!(<u64 as SecondaryKey>::BILLABLE_SIZE, 128);
        assert_eq!(<f64 as SecondaryKey>::BILLABLE_SIZE, 128);
        assert_eq!(<u128 as SecondaryKey>::BILLABLE_SIZE, 144);
        assert_eq!(<LongDouble as SecondaryKey>::BILLABLE_SIZE, 144);
        assert_eq!(<Key256 as SecondaryKey>::BILLABLE_SIZE, 160);
    }

    #[test]
    fn wire_size() {
        assert!(matches!(
            u64::from_wire(&[0; 7]),
            Err(TableError::InvalidKeySize {
                expected: 8,
                found: 7
            })
        ));
        assert!(matches!(
            Key256::from_wire(&[0; 33]),
            Err(TableError::InvalidKeySize {
                expected: 32,
                found: 33
            })
        ));
        assert_eq!(u128::from_wire(&hex!("01000000000000000000000000000000")).unwrap(), 1);
        assert_eq!(
            f64::from_wire(&1.25_f64.to_le_bytes()).unwrap().to_bits(),
            1.25_f64.to_bits()
        );
    }

    #[test]
    fn key256_is_lexicographic() {
        let mut a = [0; 32];
        let mut b = [0; 32];
        a[31] = u8::MAX;
        b[0] = 1;
        assert!(Key256(a).encode() < Key256(b).encode());
    }

    #[test]
    fn nan_is_invalid() {
        for nan in [f64::NAN, -f64::NAN, f64::from_bits(0x7ff0_0000_0000_0001)] {
            assert!(matches!(nan.validate(), Err(TableError::InvalidValue)));
            assert!(matches!(
                LongDouble::from(nan).validate(),
                Err(TableError::InvalidValue)
            ));
        }
        f64::INFINITY.validate().unwrap();
        LongDouble::from(f64::NEG_INFINITY).validate().unwrap();
    }

    #[test]
    fn negative_zero() {
        assert_eq!((-0.0_f64).encode(), 0.0_f64.encode());
        assert_eq!(f64::decode(&(-0.0_f64).encode()).to_bits(), 0);
        assert_eq!(
            LongDouble::from(-0.0).encode(),
            LongDouble::from(0.0).encode()
        );
    }

    #[test]
    fn float_extremes() {
        let order = [
            f64::NEG_INFINITY,
            f64::MIN,
            -1.0,
            -f64::MIN_POSITIVE,
            -f64::from_bits(1),
            0.0,
            f64::from_bits(1),
            f64::MIN_POSITIVE,
            1.0,
            f64::MAX,
            f64::INFINITY,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].encode() < pair[1].encode(), "{pair:?}");
            assert!(
                LongDouble::from(pair[0]).encode() < LongDouble::from(pair[1]).encode(),
                "{pair:?}"
            );
        }
    }

    /// Any non-NaN `f64`.
    fn finite_or_infinite() -> impl Strategy<Value = f64> {
        any::<f64>().prop_filter("NaN", |f| !f.is_nan())
    }

    proptest! {
        #[test]
        fn u64_order(a: u64, b: u64) {
            prop_assert_eq!(a.cmp(&b), a.encode().cmp(&b.encode()));
            prop_assert_eq!(u64::decode(&a.encode()), a);
        }

        #[test]
        fn u128_order(a: u128, b: u128) {
            prop_assert_eq!(a.cmp(&b), a.encode().cmp(&b.encode()));
            prop_assert_eq!(u128::decode(&a.encode()), a);
        }

        #[test]
        fn f64_order(a in finite_or_infinite(), b in finite_or_infinite()) {
            let expected = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            prop_assert_eq!(expected, a.encode().cmp(&b.encode()));
            prop_assert_eq!(f64::decode(&a.encode()), a);
        }

        #[test]
        fn long_double_order(a in finite_or_infinite(), b in finite_or_infinite()) {
            let expected = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            let (la, lb) = (LongDouble::from(a), LongDouble::from(b));
            prop_assert_eq!(expected, la.encode().cmp(&lb.encode()));
        }
    }
}
