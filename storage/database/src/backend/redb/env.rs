//! `trait Env` for `redb`; `struct ConcreteEnv`.

//---------------------------------------------------------------------------------------------------- Import
use crate::{
    backend::redb::types::RedbTableDefinition,
    config::{Config, SyncMode},
    database::{DatabaseIter, DatabaseRo, DatabaseRw},
    env::{Env, EnvInner},
    error::{DbResult, InitError, RuntimeError},
    table::Table,
    transaction::TxRw,
};

//---------------------------------------------------------------------------------------------------- ConcreteEnv
/// The `redb` backed [`Env`].
pub struct ConcreteEnv {
    /// The database.
    env: redb::Database,

    /// [`Env::config`].
    config: Config,

    /// [`Config::sync_mode`], set on every write transaction.
    durability: redb::Durability,
}

impl Drop for ConcreteEnv {
    fn drop(&mut self) {
        if let Err(e) = self.sync() {
            tracing::warn!("Env sync error: {e}");
        }
    }
}

/// The `redb` definition of table `T`.
const fn definition<T: Table>() -> RedbTableDefinition<T::Key, T::Value> {
    redb::TableDefinition::new(T::NAME)
}

//---------------------------------------------------------------------------------------------------- Env Impl
impl Env for ConcreteEnv {
    type EnvInner<'env> = (&'env redb::Database, redb::Durability);

    #[cold]
    #[inline(never)] // called once.
    fn open(config: Config) -> Result<Self, InitError> {
        let durability = match config.sync_mode {
            SyncMode::Safe => redb::Durability::Immediate,
            SyncMode::Fast => redb::Durability::Eventual,
        };

        let builder = redb::Builder::new();

        let mut env = if cfg!(feature = "redb-memory") {
            builder.create_with_backend(redb::backends::InMemoryBackend::new())?
        } else {
            std::fs::create_dir_all(config.db_directory())?;

            let db_file = std::fs::OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(config.db_file())?;

            builder.create_file(db_file)?
        };

        // Repairs the file after an unclean shutdown.
        env.check_integrity()?;

        tracing::debug!(
            db_file = %config.db_file().display(),
            sync_mode = ?config.sync_mode,
            "opened redb environment",
        );

        Ok(Self {
            env,
            config,
            durability,
        })
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn sync(&self) -> DbResult<()> {
        // `redb` only flushes on commit, so commit an empty durable transaction.
        let mut tx_rw = self.env.begin_write()?;
        tx_rw.set_durability(redb::Durability::Immediate);
        tx_rw.set_two_phase_commit(true);
        TxRw::commit(tx_rw)
    }

    fn env_inner(&self) -> Self::EnvInner<'_> {
        (&self.env, self.durability)
    }
}

//---------------------------------------------------------------------------------------------------- EnvInner Impl
impl<'env> EnvInner<'env> for (&'env redb::Database, redb::Durability)
where
    Self: 'env,
{
    type Ro<'a> = redb::ReadTransaction;
    type Rw<'a> = redb::WriteTransaction;

    #[inline]
    fn tx_ro(&self) -> DbResult<redb::ReadTransaction> {
        Ok(self.0.begin_read()?)
    }

    #[inline]
    fn tx_rw(&self) -> DbResult<redb::WriteTransaction> {
        let mut tx_rw = self.0.begin_write()?;
        tx_rw.set_durability(self.1);
        Ok(tx_rw)
    }

    #[inline]
    fn open_db_ro<T: Table>(
        &self,
        tx_ro: &Self::Ro<'_>,
    ) -> DbResult<impl DatabaseRo<T> + DatabaseIter<T>> {
        Ok(tx_ro.open_table(definition::<T>())?)
    }

    #[inline]
    fn open_db_rw<T: Table>(&self, tx_rw: &Self::Rw<'_>) -> DbResult<impl DatabaseRw<T>> {
        // Creates the table if needed, so never `TableNotFound`.
        Ok(tx_rw.open_table(definition::<T>())?)
    }

    fn create_db<T: Table>(&self, tx_rw: &redb::WriteTransaction) -> DbResult<()> {
        self.open_db_rw::<T>(tx_rw)?;
        Ok(())
    }

    #[inline]
    fn clear_db<T: Table>(&self, tx_rw: &mut redb::WriteTransaction) -> DbResult<()> {
        // `&mut tx_rw` means no table of this transaction is open,
        // so `delete_table` cannot fail with `TableAlreadyOpen`.
        if !tx_rw.delete_table(definition::<T>())? {
            return Err(RuntimeError::TableNotFound);
        }

        tx_rw.open_table(definition::<T>())?;
        Ok(())
    }
}

