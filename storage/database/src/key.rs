//! Table ordering; `trait Key`.

//---------------------------------------------------------------------------------------------------- Import
use std::{cmp::Ordering, fmt::Debug};

use crate::storable::{Storable, StorableVec};

//---------------------------------------------------------------------------------------------------- Key
/// A [`Storable`] that can order a [`Table`](crate::Table).
///
/// Tables are sorted with [`Key::compare`], which works on the encoded
/// bytes. The default is a byte comparison, numbers override it so they
/// sort by value instead of by their native-endian bytes.
///
/// Composite keys, e.g. a `#[repr(C)]` struct of numbers, should use
/// [`compare_decoded`] so the stored order matches their [`Ord`].
///
/// ```rust
/// # use std::cmp::Ordering;
/// # use tabula_database::*;
/// let a = StorableVec(vec![0_u8, 1]);
/// let b = StorableVec(vec![255_u8, 0]);
/// assert_eq!(<StorableVec<u8> as Key>::compare(a.as_bytes(), b.as_bytes()), Ordering::Less);
///
/// // 256 encodes as `[0, 1]` on little-endian, but still sorts after 255.
/// assert_eq!(<u16 as Key>::compare(256_u16.as_bytes(), 255_u16.as_bytes()), Ordering::Greater);
/// ```
pub trait Key: Storable + Sized + Ord + Clone {
    /// Order two encoded keys.
    #[inline]
    fn compare(left: &[u8], right: &[u8]) -> Ordering {
        left.cmp(right)
    }
}

/// Order two encoded `K`s by decoding them and using [`Ord`].
///
/// # Panics
/// Panics if either side is not an encoded `K`,
/// which means the data file is corrupt.
#[inline]
pub fn compare_decoded<K: Key>(left: &[u8], right: &[u8]) -> Ordering {
    Ord::cmp(
        &<K as Storable>::from_bytes(left),
        &<K as Storable>::from_bytes(right),
    )
}

//---------------------------------------------------------------------------------------------------- Impl
impl<const N: usize, T> Key for [T; N] where T: Key + bytemuck::Pod {}
impl<T: bytemuck::Pod + Debug + Ord> Key for StorableVec<T> {}

/// Numbers sort by value.
macro_rules! impl_key_number {
    ($($t:ident),* $(,)?) => {
        $(
            impl Key for $t {
                #[inline]
                fn compare(left: &[u8], right: &[u8]) -> Ordering {
                    compare_decoded::<$t>(left, right)
                }
            }
        )*
    };
}

impl_key_number!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);
