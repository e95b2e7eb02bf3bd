//! `trait Table`.

//---------------------------------------------------------------------------------------------------- Import
use crate::{key::Key, storable::Storable};

//---------------------------------------------------------------------------------------------------- Table
/// The name and key/value types of a table, known at compile time.
///
/// A table stores its `(key, value)`s sorted by [`Key::compare`].
///
/// [`crate::define_tables`] defines a set of tables at once.
pub trait Table: 'static {
    /// Name the table is stored under, unique within an [`Env`](crate::Env).
    const NAME: &'static str;

    /// Key type, defines the table's order.
    type Key: Key + 'static;

    /// Value type.
    type Value: Storable + 'static;
}
