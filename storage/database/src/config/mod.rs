//! Settings of an [`Env`](crate::Env).
//!
//! Build a [`Config`] with the [`ConfigBuilder`]:
//!
//! ```rust
//! use tabula_database::{
//!     ConcreteEnv, Env,
//!     config::{ConfigBuilder, SyncMode}
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db_dir = tempfile::tempdir()?;
//!
//! let config = ConfigBuilder::new(db_dir.path().to_path_buf().into())
//!     .sync_mode(SyncMode::Safe)
//!     .build();
//!
//! let env = ConcreteEnv::open(config.clone())?;
//! assert_eq!(env.config(), &config);
//! # Ok(()) }
//! ```

mod config;
pub use config::{Config, ConfigBuilder};

mod sync_mode;
pub use sync_mode::SyncMode;
