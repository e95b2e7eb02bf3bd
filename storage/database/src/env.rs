//! Database environment; `trait Env`, `trait EnvInner`.

//---------------------------------------------------------------------------------------------------- Import
use crate::{
    config::Config,
    database::{DatabaseIter, DatabaseRo, DatabaseRw},
    error::{DbResult, InitError},
    table::Table,
    transaction::{TxRo, TxRw},
};

//---------------------------------------------------------------------------------------------------- Env
/// An opened ordered store.
///
/// [`ConcreteEnv`](crate::ConcreteEnv) is the only implementation.
///
/// # Borrows
/// Everything opened from an [`Env`] borrows from it:
/// ```text
/// Env <- EnvInner <- TxRo/TxRw <- DatabaseRo/DatabaseRw
/// ```
/// An open table cannot outlive its transaction,
/// and no transaction can outlive the environment.
///
/// # `Drop`
/// Dropping an [`Env`] calls [`Env::sync`], whatever its [`SyncMode`](crate::config::SyncMode).
pub trait Env: Sized {
    /// Handle that creates transactions and opens tables.
    ///
    // `redb` needs the durability per transaction,
    // so this carries the sync mode next to the database.
    type EnvInner<'env>: EnvInner<'env>
    where
        Self: 'env;

    /// Open (or create) the store described by `config`.
    ///
    /// No tables are created, see [`EnvInner::create_db`].
    ///
    /// # Errors
    /// Returns an [`InitError`] if the data file cannot be opened,
    /// is corrupt, or was written by an incompatible version.
    fn open(config: Config) -> Result<Self, InitError>;

    /// The [`Config`] passed to [`Env::open`].
    fn config(&self) -> &Config;

    /// Flush all committed data to disk, blocking until done.
    ///
    /// # Errors
    /// Returns [`crate::RuntimeError::Io`] if flushing failed.
    fn sync(&self) -> DbResult<()>;

    /// Borrow the [`Env::EnvInner`].
    fn env_inner(&self) -> Self::EnvInner<'_>;
}

//---------------------------------------------------------------------------------------------------- EnvInner
/// Creates transactions and opens tables within them.
///
/// Created with [`Env::env_inner`].
pub trait EnvInner<'env> {
    /// Read-only transaction.
    type Ro<'tx>: TxRo<'tx>;
    /// Read/write transaction.
    type Rw<'tx>: TxRw<'tx>;

    /// Begin a read-only transaction.
    ///
    /// It sees the store as of the last commit before this call.
    ///
    /// # Errors
    /// Returns [`crate::RuntimeError::Io`] on failure.
    fn tx_ro(&self) -> DbResult<Self::Ro<'_>>;

    /// Begin a read/write transaction.
    ///
    /// There is at most one live read/write transaction,
    /// this blocks until the previous one is committed or aborted.
    ///
    /// # Errors
    /// Returns [`crate::RuntimeError::Io`] on failure.
    fn tx_rw(&self) -> DbResult<Self::Rw<'_>>;

    /// Open table `T` for reading.
    ///
    /// ```rust
    /// # use tabula_database::{
    /// #     ConcreteEnv,
    /// #     config::ConfigBuilder,
    /// #     Env, EnvInner, DatabaseRo, TxRw,
    /// # };
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let tmp_dir = tempfile::tempdir()?;
    /// # let config = ConfigBuilder::new(tmp_dir.path().to_owned().into()).build();
    /// # let env = ConcreteEnv::open(config)?;
    /// struct Balances;
    /// impl tabula_database::Table for Balances {
    ///     const NAME: &'static str = "balances";
    ///     type Key = u64;
    ///     type Value = u64;
    /// }
    ///
    /// let env_inner = env.env_inner();
    /// let tx_rw = env_inner.tx_rw()?;
    /// env_inner.create_db::<Balances>(&tx_rw)?;
    /// TxRw::commit(tx_rw)?;
    ///
    /// let tx_ro = env_inner.tx_ro()?;
    /// let balances = env_inner.open_db_ro::<Balances>(&tx_ro)?;
    /// assert!(balances.is_empty()?);
    /// # Ok(()) }
    /// ```
    ///
    /// # Errors
    /// Returns [`crate::RuntimeError::TableNotFound`] if `T` was never
    /// [created](EnvInner::create_db), otherwise only [`crate::RuntimeError::Io`].
    fn open_db_ro<T: Table>(
        &self,
        tx_ro: &Self::Ro<'_>,
    ) -> DbResult<impl DatabaseRo<T> + DatabaseIter<T>>;

    /// Open table `T` for reading and writing, creating it if needed.
    ///
    /// # Errors
    /// Returns [`crate::RuntimeError::Io`] on failure.
    fn open_db_rw<T: Table>(&self, tx_rw: &Self::Rw<'_>) -> DbResult<impl DatabaseRw<T>>;

    /// Create table `T` if it does not exist.
    ///
    /// # Errors
    /// Returns [`crate::RuntimeError::Io`] on failure.
    fn create_db<T: Table>(&self, tx_rw: &Self::Rw<'_>) -> DbResult<()>;

    /// Delete every `(key, value)` of table `T`, keeping the table.
    ///
    /// Aborting `tx_rw` undoes this.
    ///
    /// # Errors
    /// Returns [`crate::RuntimeError::TableNotFound`] if `T` was never
    /// [created](EnvInner::create_db), otherwise only [`crate::RuntimeError::Io`].
    fn clear_db<T: Table>(&self, tx_rw: &mut Self::Rw<'_>) -> DbResult<()>;
}
