//! Instruction set: opcodes and their binary encodings.
//!
//! An opcode may be encodable in several *formats* that differ only in the
//! bit width of their operands (`mov v4, v4` vs `mov v16, v16`). Formats are
//! listed narrowest first; the emitter picks the first one wide enough for
//! the registers an instruction actually uses.
//!
//! Every encoding is one opcode byte followed by the packed operands.

// ── Formats ─────────────────────────────────────────────────────────

/// What an operand slot holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandKind {
    /// Virtual register.
    Reg,
    /// Immediate value.
    Imm,
    /// Index into an id table (strings, methods, literal arrays).
    Id,
}

/// One operand slot of a [`Format`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FormatItem {
    pub kind: OperandKind,
    pub bits: u8,
}

impl FormatItem {
    #[inline]
    pub const fn reg(bits: u8) -> Self {
        FormatItem {
            kind: OperandKind::Reg,
            bits,
        }
    }

    #[inline]
    pub const fn imm(bits: u8) -> Self {
        FormatItem {
            kind: OperandKind::Imm,
            bits,
        }
    }

    #[inline]
    pub const fn id(bits: u8) -> Self {
        FormatItem {
            kind: OperandKind::Id,
            bits,
        }
    }

    #[inline]
    pub const fn is_reg(self) -> bool {
        matches!(self.kind, OperandKind::Reg)
    }
}

/// One binary encoding of an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Format {
    items: &'static [FormatItem],
}

impl Format {
    #[inline]
    pub const fn new(items: &'static [FormatItem]) -> Self {
        Format { items }
    }

    #[inline]
    pub fn items(&self) -> &'static [FormatItem] {
        self.items
    }

    /// Number of distinct registers addressable by this format.
    ///
    /// Taken from the first register operand; all register operands of a
    /// format share one width. A format without register operands has zero
    /// capacity.
    pub fn register_capacity(&self) -> u64 {
        self.items
            .iter()
            .find(|item| item.is_reg())
            .map_or(0, |item| 1u64 << item.bits)
    }

    /// Encoded size in bytes, opcode byte included.
    pub fn encoded_len(&self) -> u32 {
        let bits: u32 = self.items.iter().map(|item| u32::from(item.bits)).sum();
        1 + bits.div_ceil(8)
    }
}

const NONE: &[Format] = &[Format { items: &[] }];
const V8: &[Format] = &[Format {
    items: &[FormatItem::reg(8)],
}];
const IMM8: &[Format] = &[Format {
    items: &[FormatItem::imm(8)],
}];
const IMM8_V8: &[Format] = &[Format {
    items: &[FormatItem::imm(8), FormatItem::reg(8)],
}];
const IMM8_V8_V8: &[Format] = &[Format {
    items: &[FormatItem::imm(8), FormatItem::reg(8), FormatItem::reg(8)],
}];
const IMM8_IMM8_V8: &[Format] = &[
    Format {
        items: &[FormatItem::imm(8), FormatItem::imm(8), FormatItem::reg(8)],
    },
    Format {
        items: &[FormatItem::imm(16), FormatItem::imm(8), FormatItem::reg(8)],
    },
];
const IMM8_ID16: &[Format] = &[
    Format {
        items: &[FormatItem::imm(8), FormatItem::id(16)],
    },
    Format {
        items: &[FormatItem::imm(16), FormatItem::id(16)],
    },
];
const IMM8_ID16_V8: &[Format] = &[
    Format {
        items: &[FormatItem::imm(8), FormatItem::id(16), FormatItem::reg(8)],
    },
    Format {
        items: &[FormatItem::imm(16), FormatItem::id(16), FormatItem::reg(8)],
    },
];
const IMM8_ID16_IMM8: &[Format] = &[
    Format {
        items: &[FormatItem::imm(8), FormatItem::id(16), FormatItem::imm(8)],
    },
    Format {
        items: &[FormatItem::imm(16), FormatItem::id(16), FormatItem::imm(8)],
    },
];
const IMM16_ID16: &[Format] = &[Format {
    items: &[FormatItem::imm(16), FormatItem::id(16)],
}];
const IMM32: &[Format] = &[Format {
    items: &[FormatItem::imm(32)],
}];
const IMM64: &[Format] = &[Format {
    items: &[FormatItem::imm(64)],
}];
const ID16: &[Format] = &[Format {
    items: &[FormatItem::id(16)],
}];
const JUMP: &[Format] = &[
    Format {
        items: &[FormatItem::imm(8)],
    },
    Format {
        items: &[FormatItem::imm(16)],
    },
    Format {
        items: &[FormatItem::imm(32)],
    },
];
const MOV: &[Format] = &[
    Format {
        items: &[FormatItem::reg(4), FormatItem::reg(4)],
    },
    Format {
        items: &[FormatItem::reg(8), FormatItem::reg(8)],
    },
    Format {
        items: &[FormatItem::reg(16), FormatItem::reg(16)],
    },
];
const LEXVAR: &[Format] = &[
    Format {
        items: &[FormatItem::imm(4), FormatItem::imm(4)],
    },
    Format {
        items: &[FormatItem::imm(8), FormatItem::imm(8)],
    },
];

// ── Opcodes ─────────────────────────────────────────────────────────

/// Target instruction opcodes.
///
/// `Invalid` is the opcode of label pseudo-instructions; it has no encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Opcode {
    Invalid,
    Nop,

    // Constants
    LdUndefined,
    LdNull,
    LdTrue,
    LdFalse,
    LdHole,
    Ldai,
    Fldai,
    LdaStr,

    // Accumulator and registers
    Lda,
    Sta,
    Mov,

    // Arithmetic and comparison
    Add2,
    Sub2,
    Mul2,
    Div2,
    Less,
    Greater,
    Eq,
    StrictEq,
    Inc,
    Dec,
    Neg,
    Not,
    TypeOf,
    IsTrue,
    IsFalse,

    // Control flow
    Jmp,
    Jeqz,
    Jnez,
    Return,
    ReturnUndefined,
    Throw,
    Debugger,

    // Calls and construction
    CallArg0,
    CallArg1,
    CallArgs2,
    CallThis0,
    CallThis1,
    CallRange,
    NewObjRange,
    DefineFunc,
    DefineMethod,

    // Objects and arrays
    CreateEmptyObject,
    CreateEmptyArray,
    CreateObjectWithBuffer,
    CreateArrayWithBuffer,
    LdObjByName,
    StObjByName,
    LdObjByValue,
    StObjByValue,

    // Globals and lexical environments
    TryLdGlobalByName,
    TryStGlobalByName,
    LdGlobalVar,
    StGlobalVar,
    NewLexEnv,
    PopLexEnv,
    LdLexVar,
    StLexVar,

    // Iterators, generators and async
    GetIterator,
    CreateGeneratorObj,
    SuspendGenerator,
    ResumeGenerator,
    AsyncFunctionEnter,
    AsyncFunctionResolve,
}

impl Opcode {
    /// Assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Invalid => "invalid",
            Opcode::Nop => "nop",
            Opcode::LdUndefined => "ldundefined",
            Opcode::LdNull => "ldnull",
            Opcode::LdTrue => "ldtrue",
            Opcode::LdFalse => "ldfalse",
            Opcode::LdHole => "ldhole",
            Opcode::Ldai => "ldai",
            Opcode::Fldai => "fldai",
            Opcode::LdaStr => "lda.str",
            Opcode::Lda => "lda",
            Opcode::Sta => "sta",
            Opcode::Mov => "mov",
            Opcode::Add2 => "add2",
            Opcode::Sub2 => "sub2",
            Opcode::Mul2 => "mul2",
            Opcode::Div2 => "div2",
            Opcode::Less => "less",
            Opcode::Greater => "greater",
            Opcode::Eq => "eq",
            Opcode::StrictEq => "stricteq",
            Opcode::Inc => "inc",
            Opcode::Dec => "dec",
            Opcode::Neg => "neg",
            Opcode::Not => "not",
            Opcode::TypeOf => "typeof",
            Opcode::IsTrue => "istrue",
            Opcode::IsFalse => "isfalse",
            Opcode::Jmp => "jmp",
            Opcode::Jeqz => "jeqz",
            Opcode::Jnez => "jnez",
            Opcode::Return => "return",
            Opcode::ReturnUndefined => "returnundefined",
            Opcode::Throw => "throw",
            Opcode::Debugger => "debugger",
            Opcode::CallArg0 => "callarg0",
            Opcode::CallArg1 => "callarg1",
            Opcode::CallArgs2 => "callargs2",
            Opcode::CallThis0 => "callthis0",
            Opcode::CallThis1 => "callthis1",
            Opcode::CallRange => "callrange",
            Opcode::NewObjRange => "newobjrange",
            Opcode::DefineFunc => "definefunc",
            Opcode::DefineMethod => "definemethod",
            Opcode::CreateEmptyObject => "createemptyobject",
            Opcode::CreateEmptyArray => "createemptyarray",
            Opcode::CreateObjectWithBuffer => "createobjectwithbuffer",
            Opcode::CreateArrayWithBuffer => "createarraywithbuffer",
            Opcode::LdObjByName => "ldobjbyname",
            Opcode::StObjByName => "stobjbyname",
            Opcode::LdObjByValue => "ldobjbyvalue",
            Opcode::StObjByValue => "stobjbyvalue",
            Opcode::TryLdGlobalByName => "tryldglobalbyname",
            Opcode::TryStGlobalByName => "trystglobalbyname",
            Opcode::LdGlobalVar => "ldglobalvar",
            Opcode::StGlobalVar => "stglobalvar",
            Opcode::NewLexEnv => "newlexenv",
            Opcode::PopLexEnv => "poplexenv",
            Opcode::LdLexVar => "ldlexvar",
            Opcode::StLexVar => "stlexvar",
            Opcode::GetIterator => "getiterator",
            Opcode::CreateGeneratorObj => "creategeneratorobj",
            Opcode::SuspendGenerator => "suspendgenerator",
            Opcode::ResumeGenerator => "resumegenerator",
            Opcode::AsyncFunctionEnter => "asyncfunctionenter",
            Opcode::AsyncFunctionResolve => "asyncfunctionresolve",
        }
    }

    /// Alternative encodings, narrowest first. Empty for pseudo-instructions.
    pub fn formats(self) -> &'static [Format] {
        match self {
            Opcode::Invalid => &[],
            Opcode::Nop
            | Opcode::LdUndefined
            | Opcode::LdNull
            | Opcode::LdTrue
            | Opcode::LdFalse
            | Opcode::LdHole
            | Opcode::Return
            | Opcode::ReturnUndefined
            | Opcode::Throw
            | Opcode::Debugger
            | Opcode::CreateEmptyObject
            | Opcode::PopLexEnv
            | Opcode::ResumeGenerator
            | Opcode::AsyncFunctionEnter => NONE,
            Opcode::Ldai => IMM32,
            Opcode::Fldai => IMM64,
            Opcode::LdaStr => ID16,
            Opcode::Lda
            | Opcode::Sta
            | Opcode::CreateGeneratorObj
            | Opcode::SuspendGenerator
            | Opcode::AsyncFunctionResolve => V8,
            Opcode::Mov => MOV,
            Opcode::Add2
            | Opcode::Sub2
            | Opcode::Mul2
            | Opcode::Div2
            | Opcode::Less
            | Opcode::Greater
            | Opcode::Eq
            | Opcode::StrictEq
            | Opcode::CallArg1
            | Opcode::CallThis0
            | Opcode::LdObjByValue => IMM8_V8,
            Opcode::Inc
            | Opcode::Dec
            | Opcode::Neg
            | Opcode::Not
            | Opcode::TypeOf
            | Opcode::IsTrue
            | Opcode::IsFalse
            | Opcode::CallArg0
            | Opcode::CreateEmptyArray
            | Opcode::NewLexEnv
            | Opcode::GetIterator => IMM8,
            Opcode::Jmp | Opcode::Jeqz | Opcode::Jnez => JUMP,
            Opcode::CallArgs2 | Opcode::CallThis1 | Opcode::StObjByValue => IMM8_V8_V8,
            Opcode::CallRange | Opcode::NewObjRange => IMM8_IMM8_V8,
            Opcode::DefineFunc | Opcode::DefineMethod => IMM8_ID16_IMM8,
            Opcode::CreateObjectWithBuffer
            | Opcode::CreateArrayWithBuffer
            | Opcode::LdObjByName
            | Opcode::TryLdGlobalByName
            | Opcode::TryStGlobalByName => IMM8_ID16,
            Opcode::StObjByName => IMM8_ID16_V8,
            Opcode::LdGlobalVar | Opcode::StGlobalVar => IMM16_ID16,
            Opcode::LdLexVar | Opcode::StLexVar => LEXVAR,
        }
    }

    /// `return` and `returnundefined`: the instructions a debugger maps to
    /// the closing brace of the function.
    #[inline]
    pub fn is_return(self) -> bool {
        matches!(self, Opcode::Return | Opcode::ReturnUndefined)
    }
}

#[cfg(test)]
mod tests;
