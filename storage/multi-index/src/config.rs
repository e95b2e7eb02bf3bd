//! Table engine configuration.
//!
//! [`Config`] is the store's [`Config`](tabula_database::config::Config)
//! plus the limits the tables enforce. Build it with [`ConfigBuilder`].
//!
//! # Example
//! ```rust
//! use tabula_multi_index::{
//!     tabula_database::{config::SyncMode, Env},
//!     config::ConfigBuilder,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tmp_dir = tempfile::tempdir()?;
//! let db_dir = tmp_dir.path().to_owned();
//!
//! let config = ConfigBuilder::new(db_dir.into())
//!     .sync_mode(SyncMode::Fast)
//!     .max_row_size(64 * 1024)
//!     .build();
//! assert_eq!(config.max_row_size, 64 * 1024);
//!
//! let env = tabula_multi_index::open(config.clone())?;
//! assert_eq!(env.config(), &config.db_config);
//! # Ok(()) }
//! ```

//---------------------------------------------------------------------------------------------------- Import
use std::{borrow::Cow, path::Path};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tabula_database::config::SyncMode;

use crate::constants::DEFAULT_MAX_ROW_SIZE;

//---------------------------------------------------------------------------------------------------- ConfigBuilder
/// Builder for [`Config`].
#[derive(Debug, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConfigBuilder {
    /// [`Config::db_config`].
    db_config: tabula_database::config::ConfigBuilder,

    /// [`Config::max_row_size`].
    max_row_size: Option<usize>,
}

impl ConfigBuilder {
    /// Create a new [`ConfigBuilder`] for a database in `db_directory`.
    ///
    /// [`ConfigBuilder::build`] can be called immediately
    /// after this function to use default values.
    pub const fn new(db_directory: Cow<'static, Path>) -> Self {
        Self {
            db_config: tabula_database::config::ConfigBuilder::new(db_directory),
            max_row_size: None,
        }
    }

    /// Build into a [`Config`].
    ///
    /// # Default values
    /// [`Config::max_row_size`] defaults to [`DEFAULT_MAX_ROW_SIZE`].
    ///
    /// For all other values, [`Default::default`] is used.
    pub fn build(self) -> Config {
        Config {
            db_config: self.db_config.build(),
            max_row_size: self.max_row_size.unwrap_or(DEFAULT_MAX_ROW_SIZE),
        }
    }

    /// Set a custom database directory (and file) [`Path`].
    #[must_use]
    pub fn db_directory(mut self, db_directory: Cow<'static, Path>) -> Self {
        self.db_config = self.db_config.db_directory(db_directory);
        self
    }

    /// Calls [`tabula_database::config::ConfigBuilder::sync_mode`].
    #[must_use]
    pub fn sync_mode(mut self, sync_mode: SyncMode) -> Self {
        self.db_config = self.db_config.sync_mode(sync_mode);
        self
    }

    /// Set a custom [`Config::max_row_size`].
    #[must_use]
    pub const fn max_row_size(mut self, max_row_size: usize) -> Self {
        self.max_row_size = Some(max_row_size);
        self
    }

    /// Calls [`tabula_database::config::ConfigBuilder::fast`].
    #[must_use]
    pub fn fast(mut self) -> Self {
        self.db_config = self.db_config.fast();
        self
    }

    /// Calls [`tabula_database::config::ConfigBuilder::safe`].
    #[must_use]
    pub fn safe(mut self) -> Self {
        self.db_config = self.db_config.safe();
        self
    }
}

//---------------------------------------------------------------------------------------------------- Config
/// Settings of the multi-index tables, from [`ConfigBuilder`].
///
/// ```rust
/// use std::{borrow::Cow, path::Path};
///
/// use tabula_database::{config::SyncMode, DATABASE_DATA_FILENAME};
/// use tabula_multi_index::{config::*, DEFAULT_MAX_ROW_SIZE};
///
/// let config = ConfigBuilder::new(Cow::Borrowed(Path::new("/tmp/tabula"))).build();
///
/// assert!(config.db_config.db_file().ends_with(DATABASE_DATA_FILENAME));
/// assert_eq!(config.db_config.sync_mode, SyncMode::default());
/// assert_eq!(config.max_row_size, DEFAULT_MAX_ROW_SIZE);
/// ```
#[derive(Debug, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// The database configuration.
    pub db_config: tabula_database::config::Config,

    /// Maximum payload size of one primary row, in bytes.
    ///
    /// Stores and updates with a larger payload fail with
    /// [`TableError::RowTooLarge`](crate::TableError::RowTooLarge).
    pub max_row_size: usize,
}
