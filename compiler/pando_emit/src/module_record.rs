//! Module metadata produced by import/export resolution.
//!
//! The emitter treats the buffers as opaque: it stores them under the
//! record's literal-array namespace and points a marker field at them.

use pando_program::LiteralArray;
use rustc_hash::FxHashSet;

/// Import/export table of one source text module.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModuleRecord {
    /// Literal-array index, reserved from the shared counter.
    pub index: u32,
    pub buffer: LiteralArray,
    /// Slots of local exports that are never reassigned.
    pub constant_local_export_slots: FxHashSet<u32>,
}

/// Evaluation phase of each module request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModuleRequestPhase {
    pub index: u32,
    pub buffer: LiteralArray,
}
