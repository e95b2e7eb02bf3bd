//! General constants used throughout `tabula-database`.

//---------------------------------------------------------------------------------------------------- Import
use cfg_if::cfg_if;

//---------------------------------------------------------------------------------------------------- Error Messages
/// Corrupt database error message.
///
/// The error message shown to end-users in panic
/// messages if we think the database is corrupted.
///
/// This is meant to be user-friendly.
pub const DATABASE_CORRUPT_MSG: &str = r"Tabula has encountered a fatal error. The database may be corrupted.

If you continue to encounter this error, please delete the database directory and restore it from a snapshot.";

//---------------------------------------------------------------------------------------------------- Misc
cfg_if! {
    if #[cfg(feature = "redb-memory")] {
        /// Static string of the `crate` being used as the database backend.
        pub const DATABASE_BACKEND: &str = "redb-memory";
    } else {
        /// Static string of the `crate` being used as the database backend.
        pub const DATABASE_BACKEND: &str = "redb";
    }
}

/// Tabula's database filename.
///
/// Used in [`Config::db_file`](crate::config::Config::db_file).
pub const DATABASE_DATA_FILENAME: &str = "data.redb";
