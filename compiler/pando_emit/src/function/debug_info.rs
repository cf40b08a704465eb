//! Instruction translation with source positions and byte spans.

use pando_program::{InsDebug, Instruction, LocalVariable};

use crate::error::internal_error;
use crate::ir::{Binding, FunctionIr, IrInsn, NodeRef};
use crate::names::LOCAL_VARIABLE_SIGNATURE;
use crate::source::{NodeId, SourceUnit};

/// Lower every instruction, in order, attaching line/column and, in debug
/// builds, the `[begin, end)` byte range of its encoding.
pub(super) fn translate(ir: &FunctionIr, source: &SourceUnit, debug: bool) -> Vec<Instruction> {
    let mut offset = 0u32;
    ir.insns
        .iter()
        .map(|insn| {
            let mut ins = insn.op.lower();
            let (line, column) = position(insn, ir.first_stmt, source);
            ins.debug.line = line;
            ins.debug.column = column;

            if debug {
                if let Some(len) = encoded_len(insn) {
                    ins.debug.bound = Some(offset..offset + len);
                    offset += len;
                }
            }
            ins
        })
        .collect()
}

fn resolve(node: NodeRef, first_stmt: Option<NodeId>) -> Option<NodeId> {
    match node {
        NodeRef::None => None,
        NodeRef::Node(id) => Some(id),
        NodeRef::FirstStatement => first_stmt,
    }
}

/// Line (1-based) and column (0-based) of `insn`.
///
/// `return` instructions map to the end of the enclosing function, all others to
/// the start of its node.
fn position(insn: &IrInsn, first_stmt: Option<NodeId>, source: &SourceUnit) -> (u32, u32) {
    const INVALID: (u32, u32) = (InsDebug::INVALID_LINE, InsDebug::INVALID_COLUMN);

    let Some(node) = resolve(insn.node, first_stmt) else {
        return INVALID;
    };
    let tree = &source.tree;
    let offset = if insn.op.opcode().is_return() {
        match tree.enclosing_function(node).and_then(|f| tree.get(f)) {
            Some(function) => function.span.end,
            None => return INVALID,
        }
    } else {
        match tree.get(node) {
            Some(node) => node.span.start,
            None => return INVALID,
        }
    };

    let location = source.location(offset);
    (location.line, location.column - 1)
}

/// Size of the narrowest encoding that can address every register of
/// `insn`, or `None` for pseudo-instructions.
fn encoded_len(insn: &IrInsn) -> Option<u32> {
    let formats = insn.op.formats();
    if formats.is_empty() {
        return None;
    }

    let widest = insn
        .op
        .registers()
        .iter()
        .map(|reg| u64::from(reg.raw()))
        .max();
    let format = formats
        .iter()
        .find(|format| widest.map_or(true, |reg| format.register_capacity() > reg));
    match format {
        Some(format) => Some(format.encoded_len()),
        None => internal_error(format_args!(
            "no format of {} addresses register v{}",
            insn.op.opcode().mnemonic(),
            widest.unwrap_or_default()
        )),
    }
}

/// Local-variable records for every scope whose end instruction exists.
///
/// Registers are shifted by the spill register count.
pub(super) fn local_variables(ir: &FunctionIr) -> Vec<LocalVariable> {
    let mut vars = Vec::new();

    for scope in &ir.debug_scopes {
        let mut start = None;
        let mut end = None;
        for (index, insn) in ir.insns.iter().enumerate() {
            if insn.id == scope.start {
                start = Some(index);
            }
            if insn.id == scope.end {
                end = Some(index);
                break;
            }
        }
        let Some(end) = end else {
            continue;
        };
        let start = start.unwrap_or(0);
        let start_idx = u32::try_from(start).unwrap_or(u32::MAX);
        let length = u32::try_from(end - start + 1).unwrap_or(u32::MAX);

        for (name, binding) in &scope.bindings {
            if let Binding::Local {
                vreg,
                lexically_bound: false,
            } = binding
            {
                vars.push(LocalVariable {
                    name: name.clone(),
                    signature: LOCAL_VARIABLE_SIGNATURE.to_owned(),
                    signature_type: LOCAL_VARIABLE_SIGNATURE.to_owned(),
                    reg: i32::from(vreg.raw()) + i32::from(ir.spill_reg_count),
                    start: start_idx,
                    length,
                });
            }
        }
    }
    vars
}
