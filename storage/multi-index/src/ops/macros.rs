//! Macros.
//!
//! These generate repetitive documentation
//! for all the functions defined in `ops/`.

//---------------------------------------------------------------------------------------------------- Documentation macros
/// Generate documentation for the required `# Error` section.
macro_rules! doc_error {
    () => {
        r#"# Errors
This function returns [`RuntimeError::KeyNotFound`] if the input (if applicable) doesn't exist or other `RuntimeError`'s on database errors."#
    };
}
pub(super) use doc_error;

/// Generate `# Invariant` documentation for `fn`'s that
/// do not maintain the partition records.
macro_rules! doc_partition_invariant {
    () => {
        r#"# ⚠️ Invariant ⚠️
This function only mutates the tables of the object itself, it does
_not_ update the partition's record in [`crate::tables::Partitions`].

When calling this function, ensure that either:
1. This effect (incomplete database mutation) is what is desired, or that...
2. ...[`crate::ops::partition`] is also called to keep the record's count correct"#
    };
}
pub(super) use doc_partition_invariant;

/// Generate documentation for `fn`'s that step or search
/// within one partition.
macro_rules! doc_partition_bounded {
    () => {
        r"This never leaves the partition; `Ok(None)` is returned
instead of a row or entry from a neighbouring partition."
    };
}
pub(super) use doc_partition_bounded;
