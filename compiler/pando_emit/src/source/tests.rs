use super::*;
use pretty_assertions::assert_eq;

#[test]
fn line_index_is_one_based() {
    let text = "let a = 1;\nfunction f() {\n  return a;\n}\n";
    let index = LineIndex::build(text);

    assert_eq!(index.line_count(), 5);
    assert_eq!(index.location(text, 0), SourceLocation { line: 1, column: 1 });
    assert_eq!(index.location(text, 11), SourceLocation { line: 2, column: 1 });
    assert_eq!(index.location(text, 28), SourceLocation { line: 3, column: 3 });
}

#[test]
fn columns_count_characters() {
    let text = "é = 1";
    let index = LineIndex::build(text);
    // 'é' is two bytes; '=' sits at byte 3.
    assert_eq!(index.location(text, 3), SourceLocation { line: 1, column: 3 });
}

#[test]
fn offset_past_end_clamps() {
    let text = "ab";
    let index = LineIndex::build(text);
    assert_eq!(index.location(text, 10), SourceLocation { line: 1, column: 3 });
}

fn method_tree() -> (SyntaxTree, NodeId, NodeId, NodeId) {
    let mut tree = SyntaxTree::new();
    let program = tree.push(NodeKind::Program, Span::new(0, 40), None);
    let method = tree.push(
        NodeKind::MethodDefinition {
            annotations: Vec::new(),
        },
        Span::new(5, 35),
        Some(program),
    );
    let expr = tree.push(NodeKind::FunctionExpression, Span::new(8, 35), Some(method));
    let func = tree.push(NodeKind::Function, Span::new(8, 35), Some(expr));
    let body = tree.push(
        NodeKind::Block {
            scope_owner: Some(func),
        },
        Span::new(12, 35),
        Some(func),
    );
    let stmt = tree.push(NodeKind::Other, Span::new(14, 20), Some(body));
    (tree, func, body, stmt)
}

#[test]
fn enclosing_function_walks_up() {
    let (tree, func, body, stmt) = method_tree();
    assert_eq!(tree.enclosing_function(stmt), Some(func));
    assert_eq!(tree.enclosing_function(body), Some(func));
    assert_eq!(tree.enclosing_function(func), Some(func));
}

#[test]
fn enclosing_function_of_top_level_is_none() {
    let mut tree = SyntaxTree::new();
    let program = tree.push(NodeKind::Program, Span::new(0, 10), None);
    let stmt = tree.push(NodeKind::Other, Span::new(0, 5), Some(program));
    assert_eq!(tree.enclosing_function(stmt), None);
}

#[test]
fn method_annotations_need_method_grandparent() {
    let (tree, func, body, _) = method_tree();
    assert_eq!(tree.method_annotations(func).map(<[_]>::len), Some(0));
    assert!(tree.method_annotations(body).is_none());
}
