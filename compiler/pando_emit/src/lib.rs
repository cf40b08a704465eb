//! Bytecode emission backend for the Pando compiler.
//!
//! This crate turns per-function IR into a finished
//! [`Program`](pando_program::Program):
//!
//! - **Function emission** ([`FunctionEmitter`]): one function's IR becomes an
//!   [`EmittedFunction`] with source positions, instruction byte spans,
//!   local-variable records, encoded literal buffers and annotations.
//!
//! - **Program assembly** ([`Emitter`]): emitted functions, module metadata
//!   and annotation declarations are merged into one shared program under a
//!   single lock. [`Emitter::emit_functions`] drives emission on the rayon
//!   pool.
//!
//! - **Literal encoding** ([`literal_encoder`]): IR constants become
//!   tag/value literal pairs.
//!
//! - **Annotations** ([`annotation`]): usages on methods and declared
//!   annotation interfaces.
//!
//! # Crate Dependencies
//!
//! `pando_emit` depends on `pando_program` for the artifact data model.
//! Parsing, register allocation and module resolution happen upstream; their
//! results arrive through [`ir`], [`source`] and [`module_record`].

pub mod annotation;
mod context;
mod emitter;
mod error;
mod function;
pub mod ir;
pub mod literal_encoder;
pub mod module_record;
pub mod names;
pub mod naming;
mod patch;
pub mod source;

#[cfg(test)]
mod test_helpers;

pub use annotation::interface::{
    AnnotationInterface, AnnotationPropertyDecl, DeclaredType, EnumArrayInit, EnumKind, EnumType,
    PropertyInit,
};
pub use annotation::{AnnotationExpr, AnnotationProperty, AnnotationUsage};
pub use context::{EmitContext, EmitMode, ScriptKind};
pub use emitter::Emitter;
pub use error::{internal_error, BoxError, EmitError};
pub use function::{
    attach_concurrent_module_requests, attach_expected_property_count, attach_slot_number,
    EmittedFunction, FunctionEmitter,
};
pub use ir::{
    Binding, BuiltinTypeIndex, DebugScope, FunctionIr, FunctionRoot, InsnId, IrCatchBlock,
    IrInsn, IrInstruction, IrLiteral, LabelInsn, LiteralBuffer, NodeRef, OpInsn,
};
pub use module_record::{ModuleRecord, ModuleRequestPhase};
pub use patch::PatchHook;
pub use source::{LineIndex, Node, NodeId, NodeKind, SourceLocation, SourceUnit, Span, SyntaxTree};
