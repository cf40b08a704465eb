//! Process-wide literal-array numbering.
//!
//! Literal buffers and auxiliary arrays (scope names, annotation arrays)
//! share one namespace per record: `<record>_<n>`. Numbers come from one
//! atomic counter for the whole process, across threads and files.

use std::sync::atomic::{AtomicU32, Ordering};

static LITERAL_ARRAY_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Reserve the next literal-array number.
#[inline]
pub fn next_literal_index() -> u32 {
    LITERAL_ARRAY_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Reserve a fresh literal-array name under `owner`.
pub fn next_literal_array_name(owner: &str) -> String {
    format!("{owner}_{}", next_literal_index())
}
