//! Read-modify-write access to one key of a [`DatabaseRw`]; `enum Entry`.
//!
//! [`DatabaseRw::entry`] looks a key up once and hands back either an
//! [`OccupiedEntry`] holding the current value, or a [`VacantEntry`].
//! Follow-up writes go to the same key without a second lookup.
//!
//! This is the primitive behind insert-only writes and counters that
//! are erased when they reach zero:
//!
//! ```rust
//! use tabula_database::{
//!     ConcreteEnv,
//!     config::ConfigBuilder,
//!     Entry, Env, EnvInner,
//!     DatabaseRo, DatabaseRw, TxRw,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let tmp_dir = tempfile::tempdir()?;
//! # let config = ConfigBuilder::new(tmp_dir.path().to_owned().into()).build();
//! # let env = ConcreteEnv::open(config)?;
//! #
//! /// Object counts, keyed by owner.
//! struct Counts;
//! impl tabula_database::Table for Counts {
//!     const NAME: &'static str = "counts";
//!     type Key = u64;
//!     type Value = u32;
//! }
//!
//! # let env_inner = env.env_inner();
//! # let tx_rw = env_inner.tx_rw()?;
//! # env_inner.create_db::<Counts>(&tx_rw)?;
//! let mut table = env_inner.open_db_rw::<Counts>(&tx_rw)?;
//!
//! // Count up, creating the record on first use.
//! for _ in 0..2 {
//!     match table.entry(&7)? {
//!         Entry::Occupied(mut entry) => entry.update(|count| *count += 1)?,
//!         Entry::Vacant(entry) => entry.insert(&1)?,
//!     }
//! }
//! assert_eq!(table.get(&7)?, 2);
//!
//! // Count down, erasing the record at zero.
//! for _ in 0..2 {
//!     if let Entry::Occupied(mut entry) = table.entry(&7)? {
//!         if *entry.value() == 1 {
//!             entry.remove()?;
//!         } else {
//!             entry.update(|count| *count -= 1)?;
//!         }
//!     }
//! }
//! assert!(!table.contains(&7)?);
//! # drop(table);
//! # TxRw::commit(tx_rw)?;
//! # Ok(()) }
//! ```

use crate::{DatabaseRw, DbResult, Table};

//---------------------------------------------------------------------------------------------------- Entry
/// One key of a [`DatabaseRw`], either holding a value or not.
///
/// Returned by [`DatabaseRw::entry`].
pub enum Entry<'a, T, D>
where
    T: Table,
    D: DatabaseRw<T>,
{
    /// The key has no value.
    Vacant(VacantEntry<'a, T, D>),

    /// The key has a value.
    Occupied(OccupiedEntry<'a, T, D>),
}

impl<T, D> Entry<'_, T, D>
where
    T: Table,
    D: DatabaseRw<T>,
{
    /// Returns [`true`] if [`Self::Vacant`].
    pub const fn is_vacant(&self) -> bool {
        matches!(self, Self::Vacant(_))
    }
}

//---------------------------------------------------------------------------------------------------- VacantEntry
/// A key of a [`DatabaseRw`] without a value.
pub struct VacantEntry<'a, T, D>
where
    T: Table,
    D: DatabaseRw<T>,
{
    pub(crate) db: &'a mut D,
    pub(crate) key: &'a T::Key,
}

impl<T, D> VacantEntry<'_, T, D>
where
    T: Table,
    D: DatabaseRw<T>,
{
    /// The key [`Self::insert`] writes to.
    pub const fn key(&self) -> &T::Key {
        self.key
    }

    /// Write `value` under [`Self::key`].
    pub fn insert(self, value: &T::Value) -> DbResult<()> {
        DatabaseRw::put(self.db, self.key, value)
    }
}

//---------------------------------------------------------------------------------------------------- OccupiedEntry
/// A key of a [`DatabaseRw`] with a value.
///
/// The value is read once on creation, [`Self::value`] never hits the database.
pub struct OccupiedEntry<'a, T, D>
where
    T: Table,
    D: DatabaseRw<T>,
{
    pub(crate) db: &'a mut D,
    pub(crate) key: &'a T::Key,
    pub(crate) value: T::Value,
}

impl<'a, T, D> OccupiedEntry<'a, T, D>
where
    T: Table,
    D: DatabaseRw<T>,
{
    /// The key of this entry.
    pub const fn key(&self) -> &T::Key {
        self.key
    }

    /// The value as of the last write through this entry.
    pub const fn value(&self) -> &T::Value {
        &self.value
    }

    /// Apply `f` to the value and write the result back.
    pub fn update<F>(&mut self, f: F) -> DbResult<()>
    where
        F: FnOnce(&mut T::Value),
    {
        f(&mut self.value);
        DatabaseRw::put(self.db, self.key, &self.value)
    }

    /// Delete the value.
    ///
    /// Returns the now vacant key and the deleted value.
    pub fn remove(self) -> DbResult<(VacantEntry<'a, T, D>, T::Value)> {
        DatabaseRw::delete(self.db, self.key)?;
        Ok((
            VacantEntry {
                db: self.db,
                key: self.key,
            },
            self.value,
        ))
    }
}
