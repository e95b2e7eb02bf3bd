//! Ordered store errors; `enum InitError`, `enum RuntimeError`.

//---------------------------------------------------------------------------------------------------- Import
use std::fmt::Debug;

//---------------------------------------------------------------------------------------------------- Types
/// Boxed backend error that does not fit any other variant.
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// [`Result`] with [`RuntimeError`] as the error.
pub type DbResult<T> = Result<T, RuntimeError>;

//---------------------------------------------------------------------------------------------------- InitError
/// Errors returned by [`Env::open`](crate::env::Env::open).
///
/// None of these are recoverable by retrying,
/// the data file has to be fixed or replaced.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    /// The data file is not a `redb` database.
    #[error("database file exists but is not valid")]
    Invalid,

    /// The data file was written by an incompatible `redb` version.
    #[error("database file is valid, but version is incorrect")]
    InvalidVersion,

    /// Opening or creating the data file failed.
    #[error("database I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data file failed its integrity checks.
    #[error("database file is corrupt")]
    Corrupt,

    /// Any other backend error.
    #[error("unknown error: {0}")]
    Unknown(BoxError),
}

//---------------------------------------------------------------------------------------------------- RuntimeError
/// Errors returned by an opened store.
///
/// Decoding stored bytes cannot fail,
/// so there is no (de)serialization variant.
#[derive(thiserror::Error, Debug)]
pub enum RuntimeError {
    /// The key already has a value.
    #[error("key already existed")]
    KeyExists,

    /// The key has no value.
    #[error("key/value pair was not found")]
    KeyNotFound,

    /// The table was never created.
    #[error("database table did not exist")]
    TableNotFound,

    /// The savepoint belongs to another write transaction,
    /// or was invalidated by restoring an earlier one.
    #[error("savepoint is invalid for this transaction")]
    InvalidSavepoint,

    /// Reading or writing the data file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
