//! General constants used throughout `tabula-multi-index`.

//---------------------------------------------------------------------------------------------------- Version
/// The current schema version of the multi-index tables.
///
/// Any change to [`crate::tables`] or [`crate::types`]
/// that alters the stored bytes must bump this.
pub const DATABASE_VERSION: u64 = 0;

//---------------------------------------------------------------------------------------------------- Limits
/// Default maximum payload size of one primary row, in bytes.
///
/// See [`crate::config::Config::max_row_size`].
pub const DEFAULT_MAX_ROW_SIZE: usize = 1024 * 1024;

//---------------------------------------------------------------------------------------------------- Billable sizes
/// Every billable size is rounded up to a multiple of this.
pub const BILLABLE_ALIGNMENT: u64 = 16;

/// Bytes charged for each index an object is stored in.
pub const OVERHEAD_PER_INDEX: u64 = 32;

/// Byte length of the fixed part of a partition record.
///
/// `(code, scope, table, payer, count)` plus a 4 byte table id.
const PARTITION_FIXED_SIZE: u64 = 44;

/// Byte length of the fixed part of a primary row, excluding its payload.
///
/// `(table id, primary, payer)` plus the payload's length prefix.
const ROW_FIXED_SIZE: u64 = 44;

/// Byte length of the fixed part of a secondary entry, excluding the secondary key.
///
/// `(table id, primary, payer)`.
const SECONDARY_FIXED_SIZE: u64 = 24;

/// Calculate the billable size of an object.
///
/// This is `value_size` plus [`OVERHEAD_PER_INDEX`] for
/// each index, rounded up to [`BILLABLE_ALIGNMENT`].
///
/// ```rust
/// # use tabula_multi_index::*;
/// assert_eq!(billable_size(44, 2), 112);
/// assert_eq!(billable_size(32, 3), 128);
/// assert_eq!(billable_size(0, 0), 0);
/// ```
pub const fn billable_size(value_size: u64, indices: u64) -> u64 {
    let size = value_size + OVERHEAD_PER_INDEX * indices;
    size.div_ceil(BILLABLE_ALIGNMENT) * BILLABLE_ALIGNMENT
}

/// Billable size of a partition record.
pub const PARTITION_BILLABLE_SIZE: u64 = billable_size(PARTITION_FIXED_SIZE, 2);

/// Billable size of a primary row, excluding its payload.
///
/// The payload is charged byte for byte on top of this.
pub const ROW_BILLABLE_SIZE: u64 = billable_size(ROW_FIXED_SIZE, 2);

/// Billable size of a secondary entry whose key is `key_size` bytes.
pub const fn secondary_billable_size(key_size: u64) -> u64 {
    billable_size(SECONDARY_FIXED_SIZE + key_size, 3)
}

/// Billable size of a primary row with a `payload_len` byte payload.
///
/// ```rust
/// # use tabula_multi_index::*;
/// assert_eq!(row_billable_size(0), 112);
/// assert_eq!(row_billable_size(5), 117);
/// ```
pub const fn row_billable_size(payload_len: usize) -> u64 {
    // INVARIANT: 64-bit targets only, `usize` fits in `u64`.
    ROW_BILLABLE_SIZE + payload_len as u64
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn billable_sizes() {
        assert_eq!(PARTITION_BILLABLE_SIZE, 112);
        assert_eq!(ROW_BILLABLE_SIZE, 112);
        assert_eq!(secondary_billable_size(8), 128);
        assert_eq!(secondary_billable_size(16), 144);
        assert_eq!(secondary_billable_size(32), 160);
    }

    #[test]
    fn billable_sizes_are_aligned() {
        for value_size in 0..100 {
            for indices in 0..4 {
                let size = billable_size(value_size, indices);
                assert_eq!(size % BILLABLE_ALIGNMENT, 0);
                assert!(size >= value_size + OVERHEAD_PER_INDEX * indices);
                assert!(size < value_size + OVERHEAD_PER_INDEX * indices + BILLABLE_ALIGNMENT);
            }
        }
    }
}
