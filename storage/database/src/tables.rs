//! `define_tables!`.

//---------------------------------------------------------------------------------------------------- Table macro
/// Define a set of tables, and traits to open and access them together.
///
/// Each table is written as `index => Name, Key => Value`, where
/// `index` counts up from `0` in declaration order:
///
/// ```rust
/// use tabula_database::{
///     ConcreteEnv,
///     config::ConfigBuilder,
///     Env, EnvInner,
///     DatabaseRo, DatabaseRw, TxRw,
/// };
///
/// tabula_database::define_tables! {
///     /// Account balances.
///     0 => Balances,
///     u64 => u64,
///
///     1 => Nonces,
///     u64 => u32,
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let tmp_dir = tempfile::tempdir()?;
/// # let config = ConfigBuilder::new(tmp_dir.path().to_owned().into()).build();
/// let env = ConcreteEnv::open(config)?;
/// let env_inner = env.env_inner();
///
/// // Create, then write through the generated accessors.
/// let tx_rw = env_inner.tx_rw()?;
/// env_inner.create_tables(&tx_rw)?;
/// let mut tables = env_inner.open_tables_mut(&tx_rw)?;
/// tables.balances_mut().put(&1, &100)?;
/// drop(tables);
/// TxRw::commit(tx_rw)?;
///
/// let tx_ro = env_inner.tx_ro()?;
/// let tables = env_inner.open_tables(&tx_ro)?;
/// assert_eq!(tables.balances().get(&1)?, 100);
/// assert!(tables.nonces().is_empty()?);
/// assert!(!tables.all_tables_empty()?);
/// # Ok(()) }
/// ```
///
/// # Output
/// - A unit struct per table implementing [`Table`](crate::Table),
///   named in `CamelCase` and stored under its `snake_case` name
/// - `trait Tables`: `&self` accessors, e.g. `balances()`
/// - `trait TablesIter`: `&self` accessors with [`DatabaseIter`](crate::DatabaseIter), e.g. `balances_iter()`
/// - `trait TablesMut`: `&mut self` accessors, e.g. `balances_mut()`
/// - `trait OpenTables`: implemented on every [`EnvInner`](crate::EnvInner),
///   creates or opens every table at once
///
/// The accessor traits are implemented on the tuple of opened tables,
/// so code can take `&impl Tables` or `&mut impl TablesMut` without
/// naming the backend's table types.
///
/// `tabula_multi_index::tables` is the main user.
#[macro_export]
macro_rules! define_tables {
    (
        $(
            $(#[$attr:meta])*
            $index:literal => $table:ident,
            $key:ty => $value:ty
        ),* $(,)?
    ) => { $crate::paste::paste! {
        $(
            $(#[$attr])*
            #[doc = concat!("- Key: [`", stringify!($key), "`]")]
            #[doc = concat!("- Value: [`", stringify!($value), "`]")]
            #[doc = concat!("- Name: `", stringify!([<$table:snake>]), "`")]
            #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
            #[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
            pub struct [<$table:camel>];

            impl $crate::Table for [<$table:camel>] {
                const NAME: &'static str = stringify!([<$table:snake>]);
                type Key = $key;
                type Value = $value;
            }
        )*

        /// Every table, opened for reading.
        ///
        /// Implemented on the tuple returned by [`OpenTables::open_tables`]
        /// and [`OpenTables::open_tables_mut`].
        pub trait Tables {
            $(
                #[doc = concat!("The opened [`", stringify!($table), "`] table.")]
                fn [<$table:snake>](&self) -> &impl $crate::DatabaseRo<$table>;
            )*

            /// Returns `true` if no table holds any `(key, value)`.
            ///
            /// # Errors
            /// Only returns database errors.
            fn all_tables_empty(&self) -> Result<bool, $crate::RuntimeError>;
        }

        /// [`Tables`], with [`DatabaseIter`](tabula_database::DatabaseIter) access.
        pub trait TablesIter: Tables {
            $(
                #[doc = concat!("The opened [`", stringify!($table), "`] table, iterable.")]
                fn [<$table:snake _iter>](&self) -> &(impl $crate::DatabaseRo<$table> + $crate::DatabaseIter<$table>);
            )*
        }

        /// [`Tables`], opened for writing.
        pub trait TablesMut: Tables {
            $(
                #[doc = concat!("The opened [`", stringify!($table), "`] table, writable.")]
                fn [<$table:snake _mut>](&mut self) -> &mut impl $crate::DatabaseRw<$table>;
            )*
        }

        // One generic per table, named after it in UPPERCASE,
        // e.g. `impl<PARTITIONS, ROWS, ...> Tables for (PARTITIONS, ROWS, ...)`.
        impl<$([<$table:upper>]),*> Tables
            for ($([<$table:upper>]),*)
        where
            $(
                [<$table:upper>]: $crate::DatabaseRo<$table>,
            )*
        {
            $(
                #[inline]
                fn [<$table:snake>](&self) -> &impl $crate::DatabaseRo<$table> {
                    &self.$index
                }
            )*

            fn all_tables_empty(&self) -> Result<bool, $crate::RuntimeError> {
                $(
                     if !$crate::DatabaseRo::is_empty(&self.$index)? {
                        return Ok(false);
                     }
                )*
                Ok(true)
            }
        }

        impl<$([<$table:upper>]),*> TablesIter
            for ($([<$table:upper>]),*)
        where
            $(
                [<$table:upper>]: $crate::DatabaseRo<$table> + $crate::DatabaseIter<$table>,
            )*
        {
            $(
                #[inline]
                fn [<$table:snake _iter>](&self) -> &(impl $crate::DatabaseRo<$table> + $crate::DatabaseIter<$table>) {
                    &self.$index
                }
            )*
        }

        impl<$([<$table:upper>]),*> TablesMut
            for ($([<$table:upper>]),*)
        where
            $(
                [<$table:upper>]: $crate::DatabaseRw<$table>,
            )*
        {
            $(
                #[inline]
                fn [<$table:snake _mut>](&mut self) -> &mut impl $crate::DatabaseRw<$table> {
                    &mut self.$index
                }
            )*
        }

        /// Create or open every table at once.
        ///
        /// Implemented on every [`EnvInner`](tabula_database::EnvInner).
        ///
        /// [`OpenTables::create_tables`] must have been committed
        /// before [`OpenTables::open_tables`] is called.
        pub trait OpenTables<'env> {
            /// [`EnvInner::Ro`](tabula_database::EnvInner::Ro).
            type Ro<'tx>;
            /// [`EnvInner::Rw`](tabula_database::EnvInner::Rw).
            type Rw<'tx>;

            /// Open every table for reading.
            ///
            /// # Errors
            /// Returns [`tabula_database::RuntimeError::TableNotFound`]
            /// if the tables were never created.
            fn open_tables(&self, tx_ro: &Self::Ro<'_>) -> Result<impl TablesIter, $crate::RuntimeError>;

            /// Open every table for writing, creating missing ones.
            ///
            /// # Errors
            /// Only returns [`tabula_database::RuntimeError::Io`].
            fn open_tables_mut(&self, tx_rw: &Self::Rw<'_>) -> Result<impl TablesMut, $crate::RuntimeError>;

            /// Create every missing table.
            ///
            /// # Errors
            /// Only returns [`tabula_database::RuntimeError::Io`].
            fn create_tables(&self, tx_rw: &Self::Rw<'_>) -> Result<(), $crate::RuntimeError>;
        }

        impl<'env, Ei> OpenTables<'env> for Ei
        where
            Ei: $crate::EnvInner<'env>,
        {
            type Ro<'tx> = <Ei as $crate::EnvInner<'env>>::Ro<'tx>;
            type Rw<'tx> = <Ei as $crate::EnvInner<'env>>::Rw<'tx>;

            fn open_tables(&self, tx_ro: &Self::Ro<'_>) -> Result<impl TablesIter, $crate::RuntimeError> {
                Ok(($(
                    Self::open_db_ro::<[<$table:camel>]>(self, tx_ro)?,
                )*))
            }

            fn open_tables_mut(&self, tx_rw: &Self::Rw<'_>) -> Result<impl TablesMut, $crate::RuntimeError> {
                Ok(($(
                    Self::open_db_rw::<[<$table:camel>]>(self, tx_rw)?,
                )*))
            }

            fn create_tables(&self, tx_rw: &Self::Rw<'_>) -> Result<(), $crate::RuntimeError> {
                $(
                    Self::create_db::<[<$table:camel>]>(self, tx_rw)?;
                )*
                Ok(())
            }
        }
    }};
}
