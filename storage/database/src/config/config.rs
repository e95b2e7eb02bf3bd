//! `struct Config`, `struct ConfigBuilder`.

//---------------------------------------------------------------------------------------------------- Import
use std::{borrow::Cow, path::Path};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{config::SyncMode, constants::DATABASE_DATA_FILENAME};

//---------------------------------------------------------------------------------------------------- ConfigBuilder
/// Builder for [`Config`].
#[derive(Debug, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConfigBuilder {
    /// [`Config::db_directory`].
    db_directory: Cow<'static, Path>,

    /// [`Config::sync_mode`].
    sync_mode: Option<SyncMode>,
}

impl ConfigBuilder {
    /// Start building a [`Config`] for a store in `db_directory`.
    ///
    /// Every setting not set on the builder uses its default.
    pub const fn new(db_directory: Cow<'static, Path>) -> Self {
        Self {
            db_directory,
            sync_mode: None,
        }
    }

    /// Finish the [`Config`].
    ///
    /// The data file is [`DATABASE_DATA_FILENAME`] inside the directory.
    pub fn build(self) -> Config {
        let db_file = Cow::Owned(self.db_directory.join(DATABASE_DATA_FILENAME));

        Config {
            db_directory: self.db_directory,
            db_file,
            sync_mode: self.sync_mode.unwrap_or_default(),
        }
    }

    /// Change the directory the data file is stored in.
    #[must_use]
    pub fn db_directory(mut self, db_directory: Cow<'static, Path>) -> Self {
        self.db_directory = db_directory;
        self
    }

    /// Use [`SyncMode::Fast`].
    ///
    /// Committed data may be lost on a crash, fine for tests.
    #[must_use]
    pub const fn fast(mut self) -> Self {
        self.sync_mode = Some(SyncMode::Fast);
        self
    }

    /// Use [`SyncMode::Safe`].
    #[must_use]
    pub const fn safe(mut self) -> Self {
        self.sync_mode = Some(SyncMode::Safe);
        self
    }

    /// Use `sync_mode`.
    #[must_use]
    pub const fn sync_mode(mut self, sync_mode: SyncMode) -> Self {
        self.sync_mode = Some(sync_mode);
        self
    }
}

//---------------------------------------------------------------------------------------------------- Config
/// Settings of an [`Env`](crate::Env), passed to [`Env::open`](crate::Env::open).
///
/// Build with [`ConfigBuilder`].
#[derive(Debug, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    // The paths are derived from each other,
    // so they can only be set through the builder.
    /// Directory holding the data file.
    pub(crate) db_directory: Cow<'static, Path>,
    /// The data file.
    pub(crate) db_file: Cow<'static, Path>,

    /// When commits are flushed to disk.
    pub sync_mode: SyncMode,
}

impl Config {
    /// A [`Config`] for a store in `db_directory`, with every other setting at its default.
    ///
    /// ```rust
    /// use tabula_database::{config::*, DATABASE_DATA_FILENAME};
    ///
    /// let tmp_dir = tempfile::tempdir().unwrap();
    /// let db_directory = tmp_dir.path().to_owned();
    /// let config = Config::new(db_directory.clone().into());
    ///
    /// assert_eq!(*config.db_directory(), db_directory);
    /// assert_eq!(*config.db_file(), db_directory.join(DATABASE_DATA_FILENAME));
    /// assert_eq!(config.sync_mode, SyncMode::Fast);
    /// ```
    pub fn new(db_directory: Cow<'static, Path>) -> Self {
        ConfigBuilder::new(db_directory).build()
    }

    /// The directory holding the data file.
    pub const fn db_directory(&self) -> &Cow<'_, Path> {
        &self.db_directory
    }

    /// The data file.
    pub const fn db_file(&self) -> &Cow<'_, Path> {
        &self.db_file
    }
}
