//! Per-function input handed to the emitter.
//!
//! By the time a function reaches this crate it has been lowered to a
//! linear stream over virtual registers and register allocation has run.
//! The emitter does not look inside instructions beyond what
//! [`IrInstruction`] exposes.

use std::fmt;

use pando_program::isa::Format;
use pando_program::{FunctionKind, Instruction, Opcode, VReg, MAX_REG_OPERANDS};
use smallvec::SmallVec;

use crate::source::NodeId;

// ── Instructions ────────────────────────────────────────────────────

/// Identity of an instruction within its function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct InsnId(u32);

impl InsnId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Source node an instruction was generated from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// Synthesized with no source position.
    #[default]
    None,
    Node(NodeId),
    /// Stands for the first statement of the enclosing function body.
    FirstStatement,
}

/// An instruction of the upstream IR.
pub trait IrInstruction: Send + Sync + fmt::Debug {
    fn opcode(&self) -> Opcode;

    /// The target instruction, without debug info.
    fn lower(&self) -> Instruction;

    /// Registers the instruction reads or writes.
    fn registers(&self) -> SmallVec<[VReg; MAX_REG_OPERANDS]>;

    /// Alternative encodings, narrowest first.
    fn formats(&self) -> &'static [Format] {
        self.opcode().formats()
    }
}

/// An instruction that is already in target form.
#[derive(Clone, Debug, PartialEq)]
pub struct OpInsn {
    ins: Instruction,
}

impl OpInsn {
    pub fn new(ins: Instruction) -> Self {
        OpInsn { ins }
    }
}

impl IrInstruction for OpInsn {
    fn opcode(&self) -> Opcode {
        self.ins.opcode
    }

    fn lower(&self) -> Instruction {
        self.ins.clone()
    }

    fn registers(&self) -> SmallVec<[VReg; MAX_REG_OPERANDS]> {
        self.ins.regs.clone()
    }
}

/// A jump target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelInsn {
    name: String,
}

impl LabelInsn {
    pub fn new(name: impl Into<String>) -> Self {
        LabelInsn { name: name.into() }
    }
}

impl IrInstruction for LabelInsn {
    fn opcode(&self) -> Opcode {
        Opcode::Invalid
    }

    fn lower(&self) -> Instruction {
        Instruction::label(self.name.clone())
    }

    fn registers(&self) -> SmallVec<[VReg; MAX_REG_OPERANDS]> {
        SmallVec::new()
    }
}

#[derive(Debug)]
pub struct IrInsn {
    pub id: InsnId,
    pub node: NodeRef,
    pub op: Box<dyn IrInstruction>,
}

impl IrInsn {
    pub fn new(id: InsnId, node: NodeRef, op: impl IrInstruction + 'static) -> Self {
        IrInsn {
            id,
            node,
            op: Box::new(op),
        }
    }
}

// ── Literals ────────────────────────────────────────────────────────

/// Builtin typed-array kinds referenced from literal buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BuiltinTypeIndex {
    NumberArray = 0,
    StringArray = 1,
}

/// A constant as produced by the code generator.
#[derive(Clone, Debug, PartialEq)]
pub enum IrLiteral {
    Boolean(bool),
    Integer(u32),
    Double(f64),
    String(String),
    Method(String),
    GeneratorMethod(String),
    AsyncGeneratorMethod(String),
    /// Placeholder for a getter/setter pair.
    Accessor,
    /// Parameter count of the preceding method.
    MethodAffiliate(u16),
    Getter(String),
    Setter(String),
    LiteralBufferIndex(u32),
    /// Reference to another literal array by name.
    LiteralArray(String),
    BuiltinTypeIndex(BuiltinTypeIndex),
    Null,
}

/// A constant buffer owned by one function.
#[derive(Clone, Debug, PartialEq)]
pub struct LiteralBuffer {
    /// Index reserved with [`next_literal_index`](crate::naming::next_literal_index).
    pub index: u32,
    pub literals: Vec<IrLiteral>,
}

/// Exception region by label name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IrCatchBlock {
    /// Exception record caught; `None` for a catch-all.
    pub exception_record: Option<String>,
    pub try_begin: String,
    pub try_end: String,
    pub catch_begin: String,
    pub catch_end: String,
}

// ── Scopes ──────────────────────────────────────────────────────────

/// Where a variable declared in a scope lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    /// In a register. `lexically_bound` variables are captured by a
    /// closure and live in the lexical environment instead.
    Local { vreg: VReg, lexically_bound: bool },
    Global,
    Module,
}

/// A lexical scope with the instructions delimiting it.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugScope {
    pub start: InsnId,
    pub end: InsnId,
    /// Declared names in declaration order.
    pub bindings: Vec<(String, Binding)>,
}

// ── Functions ───────────────────────────────────────────────────────

/// The AST node a function was generated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionRoot {
    /// The top-level code of the file.
    Program,
    Function(NodeId),
}

/// Everything the emitter needs about one function.
#[derive(Debug)]
pub struct FunctionIr {
    pub name: String,
    pub param_count: usize,
    pub total_regs: u32,
    pub kind: FunctionKind,
    pub slot_count: u32,
    pub expected_property_count: u32,
    /// Registers the allocator reserved below the virtual ones.
    pub spill_reg_count: u16,
    pub root: FunctionRoot,
    pub first_stmt: Option<NodeId>,
    pub insns: Vec<IrInsn>,
    pub literal_buffers: Vec<LiteralBuffer>,
    pub catch_blocks: Vec<IrCatchBlock>,
    pub debug_scopes: Vec<DebugScope>,
    /// Module indices a concurrent function depends on.
    pub concurrent_module_requests: Vec<u32>,
    /// Strings the function's instructions reference.
    pub strings: Vec<String>,
}

impl FunctionIr {
    /// An empty function body.
    pub fn new(name: impl Into<String>, root: FunctionRoot) -> Self {
        FunctionIr {
            name: name.into(),
            param_count: 0,
            total_regs: 0,
            kind: FunctionKind::None,
            slot_count: 0,
            expected_property_count: 0,
            spill_reg_count: 0,
            root,
            first_stmt: None,
            insns: Vec::new(),
            literal_buffers: Vec::new(),
            catch_blocks: Vec::new(),
            debug_scopes: Vec::new(),
            concurrent_module_requests: Vec::new(),
            strings: Vec::new(),
        }
    }

    /// Append `op` with the next free instruction id.
    pub fn push(&mut self, node: NodeRef, op: impl IrInstruction + 'static) -> InsnId {
        let id = InsnId::new(u32::try_from(self.insns.len()).unwrap_or(u32::MAX));
        self.insns.push(IrInsn::new(id, node, op));
        id
    }
}
