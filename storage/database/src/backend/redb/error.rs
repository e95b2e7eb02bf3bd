//! `redb` errors -> `InitError`/`RuntimeError`.
//!
//! `redb`'s error enums are `#[non_exhaustive]`, so variants
//! added after `redb 2` fall through to a generic error.

//---------------------------------------------------------------------------------------------------- Import
use crate::{
    constants::DATABASE_CORRUPT_MSG,
    error::{InitError, RuntimeError},
};

//---------------------------------------------------------------------------------------------------- Helpers
/// Any error without a dedicated [`RuntimeError`] variant.
fn other(error: impl std::error::Error + Send + Sync + 'static) -> RuntimeError {
    RuntimeError::Io(std::io::Error::other(error))
}

/// `From<$error> for RuntimeError` for errors that only
/// add lifecycle failures on top of a `Storage` variant.
macro_rules! impl_from_storage_wrapper {
    ($($error:ident),* $(,)?) => {
        $(
            impl From<redb::$error> for RuntimeError {
                fn from(error: redb::$error) -> Self {
                    match error {
                        redb::$error::Storage(error) => error.into(),
                        _ => other(error),
                    }
                }
            }
        )*
    };
}

//---------------------------------------------------------------------------------------------------- InitError
impl From<redb::StorageError> for InitError {
    /// From `redb::Database::check_integrity`.
    fn from(error: redb::StorageError) -> Self {
        match error {
            redb::StorageError::Io(e) => Self::Io(e),
            redb::StorageError::Corrupted(_) => Self::Corrupt,
            _ => Self::Unknown(Box::new(error)),
        }
    }
}

impl From<redb::DatabaseError> for InitError {
    /// From `redb::Builder::create_file` and friends.
    fn from(error: redb::DatabaseError) -> Self {
        match error {
            redb::DatabaseError::Storage(error) => error.into(),
            redb::DatabaseError::RepairAborted => Self::Corrupt,
            redb::DatabaseError::UpgradeRequired(_) => Self::InvalidVersion,
            _ => Self::Unknown(Box::new(error)),
        }
    }
}

//---------------------------------------------------------------------------------------------------- RuntimeError
impl_from_storage_wrapper!(TransactionError, CommitError);

impl From<redb::SavepointError> for RuntimeError {
    fn from(error: redb::SavepointError) -> Self {
        match error {
            redb::SavepointError::Storage(error) => error.into(),
            redb::SavepointError::InvalidSavepoint => Self::InvalidSavepoint,
            _ => other(error),
        }
    }
}

#[expect(clippy::fallible_impl_from, reason = "table misuse is a bug, not a runtime error")]
impl From<redb::TableError> for RuntimeError {
    /// From `open_table` and `delete_table`.
    fn from(error: redb::TableError) -> Self {
        use redb::TableError as E;

        match error {
            E::Storage(error) => error.into(),
            E::TableDoesNotExist(_) => Self::TableNotFound,

            // A table was defined twice with different
            // types, or opened twice in one transaction.
            E::TableTypeMismatch { .. }
            | E::TableIsMultimap(_)
            | E::TableIsNotMultimap(_)
            | E::TypeDefinitionChanged { .. }
            | E::TableAlreadyOpen(..) => panic!("invalid table usage: {error:#?}"),

            _ => other(error),
        }
    }
}

#[expect(clippy::fallible_impl_from, reason = "corruption cannot be handled by callers")]
impl From<redb::StorageError> for RuntimeError {
    /// From every table read and write.
    fn from(error: redb::StorageError) -> Self {
        match error {
            redb::StorageError::Io(e) => Self::Io(e),
            redb::StorageError::Corrupted(s) => panic!("{s:#?}\n{DATABASE_CORRUPT_MSG}"),
            redb::StorageError::ValueTooLarge(len) => panic!("value of {len} bytes is too large"),
            redb::StorageError::LockPoisoned(location) => panic!("lock poisoned at {location}"),
            _ => other(error),
        }
    }
}
