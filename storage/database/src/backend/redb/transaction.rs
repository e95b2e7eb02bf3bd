//! `trait TxRo/TxRw` for `redb`'s transactions.

//---------------------------------------------------------------------------------------------------- Import
use crate::{
    error::DbResult,
    transaction::{TxRo, TxRw},
};

//---------------------------------------------------------------------------------------------------- TxRo
impl TxRo<'_> for redb::ReadTransaction {
    fn commit(self) -> DbResult<()> {
        // Dropped here. `redb::ReadTransaction::close`
        // would fail while a table is still open.
        Ok(())
    }
}

//---------------------------------------------------------------------------------------------------- TxRw
impl TxRw<'_> for redb::WriteTransaction {
    type Savepoint = redb::Savepoint;

    fn commit(self) -> DbResult<()> {
        Ok(redb::WriteTransaction::commit(self)?)
    }

    fn abort(self) -> DbResult<()> {
        Ok(redb::WriteTransaction::abort(self)?)
    }

    fn savepoint(&self) -> DbResult<redb::Savepoint> {
        // Not persisted, it dies with the write transaction.
        Ok(redb::WriteTransaction::ephemeral_savepoint(self)?)
    }

    fn restore_savepoint(&mut self, savepoint: &redb::Savepoint) -> DbResult<()> {
        Ok(redb::WriteTransaction::restore_savepoint(self, savepoint)?)
    }
}
