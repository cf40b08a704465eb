//! Builders shared by unit tests.

use pando_program::{Imm, Instruction, Opcode, VReg};

use crate::annotation::AnnotationUsage;
use crate::ir::{FunctionIr, FunctionRoot, LabelInsn, NodeRef, OpInsn};
use crate::source::{NodeId, NodeKind, SourceUnit, Span, SyntaxTree};

/// Source text used by [`method_source`].
///
/// Line 3 holds the method body; its closing brace is at the start of
/// line 5.
pub const METHOD_TEXT: &str = "class A {\n  m() {\n    let x = 1;\n    return x;\n  }\n}\n";

/// Node ids of [`method_source`].
pub struct MethodNodes {
    pub program: NodeId,
    pub function: NodeId,
    pub first_stmt: NodeId,
    pub return_stmt: NodeId,
}

/// `class A { m() { let x = 1; return x; } }` with `annotations` on `m`.
pub fn method_source(annotations: Vec<AnnotationUsage>) -> (SourceUnit, MethodNodes) {
    let text = METHOD_TEXT;
    let at = |needle: &str| {
        u32::try_from(text.find(needle).unwrap_or_default()).unwrap_or_default()
    };
    let len = u32::try_from(text.len()).unwrap_or_default();
    let body_end = at("  }\n}") + 3;

    let mut tree = SyntaxTree::new();
    let program = tree.push(NodeKind::Program, Span::new(0, len), None);
    let method = tree.push(
        NodeKind::MethodDefinition { annotations },
        Span::new(at("m()"), body_end),
        Some(program),
    );
    let expr = tree.push(
        NodeKind::FunctionExpression,
        Span::new(at("()"), body_end),
        Some(method),
    );
    let function = tree.push(NodeKind::Function, Span::new(at("()"), body_end), Some(expr));
    let body = tree.push(
        NodeKind::Block {
            scope_owner: Some(function),
        },
        Span::new(at("{\n    let"), body_end),
        Some(function),
    );
    let first_stmt = tree.push(
        NodeKind::Other,
        Span::new(at("let x"), at("let x") + 10),
        Some(body),
    );
    let return_stmt = tree.push(
        NodeKind::Other,
        Span::new(at("return"), at("return") + 9),
        Some(body),
    );

    let nodes = MethodNodes {
        program,
        function,
        first_stmt,
        return_stmt,
    };
    (SourceUnit::new("a.js", text, tree), nodes)
}

/// IR for `m` over [`method_source`]: `ldai 1; sta v0; lda v0; return`.
pub fn method_ir(nodes: &MethodNodes) -> FunctionIr {
    let mut ir = FunctionIr::new("m", FunctionRoot::Function(nodes.function));
    ir.total_regs = 1;
    ir.first_stmt = Some(nodes.first_stmt);
    ir.push(
        NodeRef::FirstStatement,
        OpInsn::new(Instruction::new(Opcode::Ldai).with_imms([Imm::Int(1)])),
    );
    ir.push(
        NodeRef::Node(nodes.first_stmt),
        OpInsn::new(Instruction::new(Opcode::Sta).with_regs([VReg::new(0)])),
    );
    ir.push(
        NodeRef::Node(nodes.return_stmt),
        OpInsn::new(Instruction::new(Opcode::Lda).with_regs([VReg::new(0)])),
    );
    ir.push(
        NodeRef::Node(nodes.return_stmt),
        OpInsn::new(Instruction::new(Opcode::Return)),
    );
    ir
}

/// A top-level function containing a single `returnundefined`.
pub fn program_ir(name: &str) -> FunctionIr {
    let mut ir = FunctionIr::new(name, FunctionRoot::Program);
    ir.push(NodeRef::None, OpInsn::new(Instruction::new(Opcode::ReturnUndefined)));
    ir
}

pub fn label(ir: &mut FunctionIr, name: &str) {
    ir.push(NodeRef::None, LabelInsn::new(name));
}
