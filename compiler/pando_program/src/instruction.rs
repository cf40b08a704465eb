//! Target instructions and their debug records.

use std::fmt;
use std::ops::Range;

use smallvec::SmallVec;

use crate::Opcode;

/// Most register operands any instruction carries.
pub const MAX_REG_OPERANDS: usize = 5;

/// Register operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct VReg(u16);

impl VReg {
    #[inline]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Get the index as `usize` (for indexing into `Vec`s).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Immediate operand.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Imm {
    Int(i64),
    Float(f64),
}

impl fmt::Display for Imm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Imm::Int(v) => write!(f, "0x{v:x}"),
            Imm::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// Source position and byte span of one instruction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct InsDebug {
    /// 1-based source line, or [`InsDebug::INVALID_LINE`].
    pub line: u32,
    /// 0-based source column, or [`InsDebug::INVALID_COLUMN`].
    pub column: u32,
    /// `[begin, end)` byte range in the encoded instruction stream.
    /// Only recorded in debug builds.
    pub bound: Option<Range<u32>>,
}

impl InsDebug {
    pub const INVALID_LINE: u32 = u32::MAX;
    pub const INVALID_COLUMN: u32 = u32::MAX;

    #[inline]
    pub fn has_line(&self) -> bool {
        self.line != Self::INVALID_LINE
    }
}

impl Default for InsDebug {
    fn default() -> Self {
        InsDebug {
            line: Self::INVALID_LINE,
            column: Self::INVALID_COLUMN,
            bound: None,
        }
    }
}

/// One target instruction.
///
/// Labels are represented as instructions with opcode [`Opcode::Invalid`]
/// and `label` set.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    pub opcode: Opcode,
    pub regs: SmallVec<[VReg; MAX_REG_OPERANDS]>,
    pub imms: Vec<Imm>,
    pub ids: Vec<String>,
    pub label: Option<String>,
    pub debug: InsDebug,
}

impl Instruction {
    pub fn new(opcode: Opcode) -> Self {
        Instruction {
            opcode,
            regs: SmallVec::new(),
            imms: Vec::new(),
            ids: Vec::new(),
            label: None,
            debug: InsDebug::default(),
        }
    }

    /// A label pseudo-instruction.
    pub fn label(name: impl Into<String>) -> Self {
        Instruction {
            label: Some(name.into()),
            ..Instruction::new(Opcode::Invalid)
        }
    }

    #[must_use]
    pub fn with_regs(mut self, regs: impl IntoIterator<Item = VReg>) -> Self {
        self.regs.extend(regs);
        self
    }

    #[must_use]
    pub fn with_imms(mut self, imms: impl IntoIterator<Item = Imm>) -> Self {
        self.imms.extend(imms);
        self
    }

    #[must_use]
    pub fn with_ids<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    #[inline]
    pub fn is_label(&self) -> bool {
        self.label.is_some()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            return write!(f, "{label}:");
        }
        f.write_str(self.opcode.mnemonic())?;
        let mut sep = " ";
        for imm in &self.imms {
            write!(f, "{sep}{imm}")?;
            sep = ", ";
        }
        for id in &self.ids {
            write!(f, "{sep}{id}")?;
            sep = ", ";
        }
        for reg in &self.regs {
            write!(f, "{sep}{reg}")?;
            sep = ", ";
        }
        Ok(())
    }
}
