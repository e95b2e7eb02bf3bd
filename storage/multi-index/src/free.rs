//! General free functions (related to the multi-index database).

//---------------------------------------------------------------------------------------------------- Import
use tabula_database::{ConcreteEnv, Env, EnvInner, InitError, RuntimeError, TxRw};

use crate::{config::Config, tables::OpenTables};

//---------------------------------------------------------------------------------------------------- Free functions
/// Open the multi-index database using the passed [`Config`].
///
/// This calls [`tabula_database::Env::open`] and prepares the
/// database to be ready for table-engine usage, e.g.
/// table creation, table sort order, etc.
///
/// All tables found in [`crate::tables`] will be
/// ready for usage in the returned [`ConcreteEnv`].
///
/// # Errors
/// This will error if:
/// - The database file could not be opened
/// - A write transaction could not be opened
/// - A table could not be created/opened
#[cold]
#[inline(never)] // only called once
pub fn open(config: Config) -> Result<ConcreteEnv, InitError> {
    // Attempt to open the database environment.
    let env = <ConcreteEnv as Env>::open(config.db_config)?;

    /// Convert runtime errors to init errors.
    ///
    /// INVARIANT:
    /// [`tabula_database`]'s functions mostly return the former
    /// so we must convert them. We have knowledge of which errors
    /// makes sense in this functions context so we panic on
    /// unexpected ones.
    fn runtime_to_init_error(runtime: RuntimeError) -> InitError {
        match runtime {
            RuntimeError::Io(io_error) => io_error.into(),

            // These errors shouldn't be happening here.
            RuntimeError::KeyExists
            | RuntimeError::KeyNotFound
            | RuntimeError::TableNotFound
            | RuntimeError::InvalidSavepoint => unreachable!(),
        }
    }

    // INVARIANT: We must ensure that all tables are created,
    // `tabula_database` has no way of knowing _which_ tables
    // we want since it is agnostic, so we are responsible for this.
    {
        let env_inner = env.env_inner();
        let tx_rw = env_inner.tx_rw().map_err(runtime_to_init_error)?;

        // Create all tables.
        OpenTables::create_tables(&env_inner, &tx_rw).map_err(runtime_to_init_error)?;

        TxRw::commit(tx_rw).map_err(runtime_to_init_error)?;
    }

    tracing::debug!(
        max_row_size = config.max_row_size,
        "created multi-index tables"
    );

    Ok(env)
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod test {
    use tabula_database::{DatabaseRo, TxRo};

    use super::*;
    use crate::{
        config::ConfigBuilder,
        tables::{OpenTables, Tables},
        tests::assert_all_tables_are_empty,
    };

    /// Opening twice re-uses the already created tables.
    #[test]
    fn open_existing() {
        let tempdir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::new(tempdir.path().to_path_buf().into())
            .fast()
            .build();

        let env = open(config.clone()).unwrap();
        assert_all_tables_are_empty(&env);
        drop(env);

        let env = open(config).unwrap();
        let env_inner = env.env_inner();
        let tx_ro = env_inner.tx_ro().unwrap();
        let tables = env_inner.open_tables(&tx_ro).unwrap();
        assert!(tables.rows().is_empty().unwrap());
        drop(tables);
        TxRo::commit(tx_ro).unwrap();
    }
}
