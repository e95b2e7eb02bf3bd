//! Table engine error types.

//---------------------------------------------------------------------------------------------------- Import
use tabula_database::RuntimeError;

use crate::types::AccountName;

//---------------------------------------------------------------------------------------------------- Types
/// [`Result`] with [`TableError`] as the error.
pub type TableResult<T> = Result<T, TableError>;

//---------------------------------------------------------------------------------------------------- TableError
/// Errors that occur while operating on multi-index tables.
///
/// # Handling
/// All of these are fatal to the current execution context,
/// the caller is expected to abort the enclosing write transaction.
#[derive(thiserror::Error, Debug)]
pub enum TableError {
    /// A row with this primary key already exists in the partition.
    #[error("primary key already exists in the table")]
    DuplicateKey,

    /// The primary key already has an entry in this secondary index.
    #[error("primary key already has an entry in the {index} index")]
    DuplicateSecondary {
        /// Name of the secondary index.
        index: &'static str,
    },

    /// The referenced row or entry does not exist.
    #[error("row or secondary entry was not found")]
    NotFound,

    /// The iterator handle is an end sentinel, was removed, or was never issued.
    #[error("iterator {0} is invalid")]
    InvalidIterator(i32),

    /// A floating point secondary key was NaN.
    #[error("secondary key value is NaN")]
    InvalidValue,

    /// The payer may not be charged by the current execution context.
    #[error("account {payer} is not authorized to pay for this action")]
    AuthorizationDenied {
        /// The rejected payer.
        payer: AccountName,
    },

    /// A mutation targeted a partition not owned by the receiver.
    #[error("code {code} may not be modified by receiver {receiver}")]
    PartitionMismatch {
        /// The `code` of the targeted partition.
        code: AccountName,
        /// The contract currently executing.
        receiver: AccountName,
    },

    /// A secondary key was passed in a buffer of the wrong size.
    #[error("invalid size of secondary key array: expected {expected}, found {found}")]
    InvalidKeySize {
        /// The wire size of the key type.
        expected: usize,
        /// The length of the passed buffer.
        found: usize,
    },

    /// A row payload exceeds the configured maximum.
    #[error("row payload of {size} bytes exceeds the maximum of {max} bytes")]
    RowTooLarge {
        /// The payload size.
        size: usize,
        /// [`crate::config::Config::max_row_size`].
        max: usize,
    },

    /// More iterator handles were issued than can be represented.
    #[error("iterator handles exhausted")]
    TooManyIterators,

    /// A refund would make an account's usage negative.
    #[error("resource usage of account {payer} would underflow")]
    ResourceUnderflow {
        /// The account being refunded.
        payer: AccountName,
    },

    /// An error from the ordered store.
    #[error("database error: {0}")]
    Database(#[from] RuntimeError),
}
