//! Transactions; `trait TxRo`, `trait TxRw`.

//---------------------------------------------------------------------------------------------------- Import
use crate::error::DbResult;

//---------------------------------------------------------------------------------------------------- TxRo
/// A read snapshot, from [`EnvInner::tx_ro`](crate::EnvInner::tx_ro).
///
/// Tables opened with it never see writes committed after it began.
pub trait TxRo<'tx> {
    /// Release the snapshot.
    ///
    /// Dropping the transaction does the same.
    ///
    /// # Errors
    /// Always `Ok(())` with `redb`.
    fn commit(self) -> DbResult<()>;
}

//---------------------------------------------------------------------------------------------------- TxRw
/// The single write transaction, from [`EnvInner::tx_rw`](crate::EnvInner::tx_rw).
///
/// Its writes are invisible to every other transaction until
/// [`TxRw::commit`], and can be undone with [`TxRw::abort`] or
/// rewound to a [`TxRw::savepoint`].
///
/// Savepoints are taken before any table is opened,
/// and restored after every table is dropped.
pub trait TxRw<'tx> {
    /// A rewind point inside one write transaction.
    type Savepoint;

    /// Make every write visible.
    ///
    /// Whether this also reaches the disk depends on
    /// [`SyncMode`](crate::config::SyncMode).
    ///
    /// # Errors
    /// [`RuntimeError::Io`](crate::RuntimeError::Io) if the writes could not be persisted.
    fn commit(self) -> DbResult<()>;

    /// Discard every write.
    ///
    /// # Errors
    /// [`RuntimeError::Io`](crate::RuntimeError::Io) if the transaction could not be released.
    fn abort(self) -> DbResult<()>;

    /// Take a rewind point at the current state.
    ///
    /// # Errors
    /// [`RuntimeError::InvalidSavepoint`](crate::RuntimeError::InvalidSavepoint)
    /// if a table is already open.
    fn savepoint(&self) -> DbResult<Self::Savepoint>;

    /// Discard every write made after `savepoint` was taken.
    ///
    /// # Errors
    /// [`RuntimeError::InvalidSavepoint`](crate::RuntimeError::InvalidSavepoint)
    /// if `savepoint` is from another transaction or was invalidated
    /// by restoring an older one.
    fn restore_savepoint(&mut self, savepoint: &Self::Savepoint) -> DbResult<()>;
}
