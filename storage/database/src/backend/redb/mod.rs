//! Database backend implementation backed by `redb`.

mod env;
pub use env::ConcreteEnv;

mod database;
mod error;
mod storable;
mod transaction;
mod types;
