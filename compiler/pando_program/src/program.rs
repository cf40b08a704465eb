//! The program artifact.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::{Function, LiteralArray, Record, SourceLang};

/// A finished compilation unit: everything the VM loader needs.
///
/// All tables are insert-if-absent. A name collision keeps the first entry
/// and reports `false`; callers guarantee uniqueness upstream.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    pub lang: SourceLang,
    strings: BTreeSet<String>,
    functions: BTreeMap<String, Function>,
    records: BTreeMap<String, Record>,
    literal_arrays: BTreeMap<String, LiteralArray>,
}

impl Program {
    pub fn new(lang: SourceLang) -> Self {
        Program {
            lang,
            ..Program::default()
        }
    }

    // ── Insertion ───────────────────────────────────────────────────

    pub fn insert_string(&mut self, s: impl Into<String>) -> bool {
        self.strings.insert(s.into())
    }

    pub fn insert_function(&mut self, function: Function) -> bool {
        match self.functions.entry(function.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(function);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn insert_record(&mut self, record: Record) -> bool {
        match self.records.entry(record.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn insert_literal_array(&mut self, name: impl Into<String>, array: LiteralArray) -> bool {
        match self.literal_arrays.entry(name.into()) {
            Entry::Vacant(slot) => {
                slot.insert(array);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    // ── Lookup ──────────────────────────────────────────────────────

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn function_mut(&mut self, name: &str) -> Option<&mut Function> {
        self.functions.get_mut(name)
    }

    pub fn record(&self, name: &str) -> Option<&Record> {
        self.records.get(name)
    }

    pub fn record_mut(&mut self, name: &str) -> Option<&mut Record> {
        self.records.get_mut(name)
    }

    #[inline]
    pub fn has_record(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn literal_array(&self, name: &str) -> Option<&LiteralArray> {
        self.literal_arrays.get(name)
    }

    #[inline]
    pub fn contains_string(&self, s: &str) -> bool {
        self.strings.contains(s)
    }

    pub fn strings(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn literal_arrays(&self) -> impl Iterator<Item = (&str, &LiteralArray)> {
        self.literal_arrays
            .iter()
            .map(|(name, array)| (name.as_str(), array))
    }

    #[inline]
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    #[inline]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn literal_array_count(&self) -> usize {
        self.literal_arrays.len()
    }

    // ── Output ──────────────────────────────────────────────────────

    /// Write the human-readable assembly listing of every function.
    pub fn dump<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, ".language {}", self.lang)?;
        writeln!(out)?;
        for function in self.functions.values() {
            dump_function(function, out)?;
        }
        writeln!(out)
    }

    /// Encode the program with bincode.
    #[cfg(feature = "serialize")]
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decode a program written by [`Program::to_bytes`].
    #[cfg(feature = "serialize")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

fn dump_function<W: fmt::Write>(function: &Function, out: &mut W) -> fmt::Result {
    writeln!(out, "slotNum = 0x{:x}", function.slots_num)?;
    if function.expected_property_count != 0 {
        writeln!(
            out,
            "expectedProperty = 0x{:x}",
            function.expected_property_count
        )?;
    }

    write!(out, ".function any {}(", function.name)?;
    for i in 0..function.param_count() {
        if i != 0 {
            write!(out, ", ")?;
        }
        write!(out, "any a{i}")?;
    }
    writeln!(out, ") {{")?;

    for ins in &function.ins {
        let indent = if ins.is_label() { "" } else { "\t" };
        writeln!(out, "{indent}{ins}")?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    for block in &function.catch_blocks {
        if block.exception_record.is_empty() {
            write!(out, ".catchall ")?;
        } else {
            write!(out, ".catch {}, ", block.exception_record)?;
        }
        writeln!(
            out,
            "{}, {}, {}, {}",
            block.try_begin_label,
            block.try_end_label,
            block.catch_begin_label,
            block.catch_end_label
        )?;
        writeln!(out)?;
    }
    Ok(())
}
