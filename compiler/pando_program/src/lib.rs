//! Pando Program - the finished bytecode artifact.
//!
//! This crate contains the data structures handed to the virtual machine
//! loader once emission is complete:
//!
//! - [`Program`]: string pool plus function, record and literal-array tables
//! - [`Function`]: instructions, catch blocks, debug info, annotations
//! - [`Record`] and [`Field`]: declared and synthetic record types
//! - [`LiteralArray`]: tag/value encoded constant buffers
//! - [`Opcode`] and [`Format`]: the instruction set and its encodings
//!
//! # Design Philosophy
//!
//! - **Plain data**: no behaviour beyond construction, lookup and dumping.
//!   Everything that decides *what* goes into a program lives in `pando_emit`.
//! - **Deterministic**: tables are ordered maps, so dumps and serialized
//!   artifacts do not depend on merge order.
//! - **First writer wins**: table insertion never overwrites.

mod annotation;
mod function;
mod instruction;
pub mod isa;
mod literal;
mod program;
mod record;
mod type_desc;

pub use annotation::{AnnotationData, AnnotationElement, ScalarValue};
pub use function::{CatchBlock, Function, FunctionKind, LocalVariable};
pub use instruction::{Imm, InsDebug, Instruction, VReg, MAX_REG_OPERANDS};
pub use isa::{Format, FormatItem, Opcode, OperandKind};
pub use literal::{Literal, LiteralArray, LiteralTag, LiteralValue};
pub use program::Program;
pub use record::{AccessFlags, Field, Record, SourceLang};
pub use type_desc::TypeDescriptor;
