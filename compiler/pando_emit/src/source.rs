//! Read-only view of the parsed source handed over by the front end.
//!
//! The emitter never walks the full AST. It needs three things from it:
//! node spans (for line/column debug info), the parent chain (to find the
//! function a `return` belongs to) and the annotations written on method
//! definitions. [`SyntaxTree`] is a flat arena carrying exactly that.

use std::fmt;

use crate::annotation::AnnotationUsage;

// ── Spans ───────────────────────────────────────────────────────────

/// Byte range in the source text, end exclusive.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// ── Line index ──────────────────────────────────────────────────────

/// 1-based line and column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

/// Pre-computed line starts for O(log L) offset lookups.
#[derive(Clone, Debug, Default)]
pub struct LineIndex {
    /// Byte offset of each line start. `offsets[0] == 0`.
    offsets: Vec<u32>,
}

impl LineIndex {
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        let mut next = 0u32;
        for byte in source.bytes() {
            next = next.saturating_add(1);
            if byte == b'\n' {
                offsets.push(next);
            }
        }
        LineIndex { offsets }
    }

    /// Line and column of `offset`. The column counts characters, not bytes.
    pub fn location(&self, source: &str, offset: u32) -> SourceLocation {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        let line_start = self.offsets.get(line_idx).copied().unwrap_or(0) as usize;
        let end = (offset as usize).min(source.len());
        let column = source
            .get(line_start..end)
            .map_or(end.saturating_sub(line_start), |text| text.chars().count());

        SourceLocation {
            line: u32::try_from(line_idx + 1).unwrap_or(u32::MAX),
            column: u32::try_from(column + 1).unwrap_or(u32::MAX),
        }
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}

// ── Syntax tree ─────────────────────────────────────────────────────

/// Index of a node in a [`SyntaxTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The node shapes the emitter distinguishes. Everything else is `Other`.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Program,
    /// A function. Its span ends after the closing brace.
    Function,
    /// Expression wrapping a [`NodeKind::Function`].
    FunctionExpression,
    /// Class method; owns the annotations written on it.
    MethodDefinition { annotations: Vec<AnnotationUsage> },
    /// Block statement. `scope_owner` is the node whose scope the block
    /// opens (a function for function bodies).
    Block { scope_owner: Option<NodeId> },
    Other,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// Flat arena of nodes, parents before children.
#[derive(Clone, Debug, Default)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: NodeKind, span: Span, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::new(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node { kind, span, parent });
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The function whose body encloses `id`, starting at `id` itself.
    ///
    /// Stops at the first function node, or at the first block that opens a
    /// function's body scope (and returns that function).
    pub fn enclosing_function(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id)?;
            match &node.kind {
                NodeKind::Function => return Some(node_id),
                NodeKind::Block {
                    scope_owner: Some(owner),
                } if self
                    .get(*owner)
                    .is_some_and(|o| o.kind == NodeKind::Function) =>
                {
                    return Some(*owner);
                }
                _ => current = node.parent,
            }
        }
        None
    }

    /// Annotations of the method whose body is `function`.
    ///
    /// Returns `None` unless `function`'s grandparent is a method definition
    /// (`MethodDefinition -> FunctionExpression -> Function`).
    pub fn method_annotations(&self, function: NodeId) -> Option<&[AnnotationUsage]> {
        let grandparent = self.parent(function).and_then(|p| self.parent(p))?;
        match &self.get(grandparent)?.kind {
            NodeKind::MethodDefinition { annotations } => Some(annotations),
            _ => None,
        }
    }
}

/// One source file as seen by every function emitted from it.
#[derive(Clone, Debug, Default)]
pub struct SourceUnit {
    pub path: String,
    pub text: String,
    pub lines: LineIndex,
    pub tree: SyntaxTree,
}

impl SourceUnit {
    pub fn new(path: impl Into<String>, text: impl Into<String>, tree: SyntaxTree) -> Self {
        let text = text.into();
        let lines = LineIndex::build(&text);
        SourceUnit {
            path: path.into(),
            text,
            lines,
            tree,
        }
    }

    #[inline]
    pub fn location(&self, offset: u32) -> SourceLocation {
        self.lines.location(&self.text, offset)
    }
}

#[cfg(test)]
mod tests;
