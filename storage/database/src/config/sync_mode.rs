//! `enum SyncMode`.

//---------------------------------------------------------------------------------------------------- Import
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//---------------------------------------------------------------------------------------------------- SyncMode
/// When committed write transactions reach the disk.
///
/// Dropping the [`Env`](crate::Env) flushes everything in either mode.
///
/// ```rust
/// use tabula_database::config::SyncMode;
///
/// assert_eq!(SyncMode::default(), SyncMode::Fast);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SyncMode {
    /// Every commit blocks until its data is on disk.
    ///
    /// A crash never loses a committed transaction.
    ///
    /// `redb`: [`Durability::Immediate`](https://docs.rs/redb/2.1.0/redb/enum.Durability.html#variant.Immediate).
    Safe,

    /// Commits return before their data is on disk,
    /// the OS flushes it eventually.
    ///
    /// A crash may lose recent commits or corrupt the data file.
    /// Committed state is still fully visible to later transactions.
    ///
    /// `redb`: [`Durability::Eventual`](https://docs.rs/redb/2.1.0/redb/enum.Durability.html#variant.Eventual).
    #[default]
    Fast,
}
