//! Database backends.

cfg_if::cfg_if! {
    if #[cfg(feature = "redb")] {
        mod redb;
        pub use redb::ConcreteEnv;
    } else {
        compile_error!("`tabula-database` needs the `redb` feature enabled");
    }
}

#[cfg(test)]
mod tests;
