use tracing::warn;

// Domain modules with aliases
use crate::{
    validation::semantic::{ReportSink, SemanticDiagnostic},
    Node, NodeKind,
};

/// Walks a parse tree depth-first, rendering scalars and reporting error productions.
///
/// Depth only drives indentation and lives on the call stack; sibling branches
/// never share it. The tree is read, never modified.
pub struct TreeValidator<'s> {
    sink: &'s mut dyn ReportSink,
    diagnostics: usize,
}

impl<'s> TreeValidator<'s> {
    pub fn new(sink: &'s mut dyn ReportSink) -> Self {
        TreeValidator {
            sink,
            diagnostics: 0,
        }
    }

    /// Validates a whole document. Returns the number of diagnostics emitted.
    pub fn validate(mut self, root: &Node) -> usize {
        self.traverse(root, 0);
        self.diagnostics
    }

    fn traverse(&mut self, node: &Node, depth: usize) {
        for child in &node.children {
            match child.kind {
                kind if kind.is_error() => self.report_error_production(child),
                NodeKind::Declr | NodeKind::DeclrScope => self.traverse(child, depth + 1),
                // braces group children, they do not nest the report
                NodeKind::Scope => self.traverse(child, depth),
                NodeKind::NumberList => {
                    let line = render_number_list(child, depth);
                    self.sink.emit_line(&line);
                }
                kind if kind.is_scalar() => {
                    let line = render_scalar(child, depth);
                    self.sink.emit_line(&line);
                }
                _ => {}
            }
        }
    }

    fn report_error_production(&mut self, node: &Node) {
        let diagnostic = SemanticDiagnostic::from_node(node);
        warn!(%diagnostic, start = node.span.start, "type mismatch");
        self.diagnostics += 1;
        self.sink.emit_diagnostic(&diagnostic);
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// `indent + kind + value`, e.g. `    number 6`.
pub fn render_scalar(node: &Node, depth: usize) -> String {
    format!("{}{} {}", indent(depth), node.kind, node.value)
}

/// All numbers of a bare list on one line, e.g. `  numberList 316, 332, 394`.
pub fn render_number_list(node: &Node, depth: usize) -> String {
    let values: Vec<&str> = node.children.iter().map(|n| n.value.as_str()).collect();
    format!("{}{} {}", indent(depth), node.kind, values.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Report;
    use crate::Span;

    fn leaf(kind: NodeKind, value: &str) -> Node {
        Node::terminal(kind, value, Span::default())
    }

    fn branch(kind: NodeKind, children: Vec<Node>) -> Node {
        Node::branch(kind, children, Span::default())
    }

    #[test]
    fn renders_number_list_on_one_line() {
        let list = branch(
            NodeKind::NumberList,
            vec![
                leaf(NodeKind::Number, "316"),
                leaf(NodeKind::Number, "332"),
                leaf(NodeKind::Number, "394"),
            ],
        );
        assert_eq!(render_number_list(&list, 1), "  numberList 316, 332, 394");
    }

    #[test]
    fn typed_keys_are_not_rendered() {
        let root = branch(
            NodeKind::Document,
            vec![branch(
                NodeKind::Declr,
                vec![leaf(NodeKind::NumberKey, "id"), leaf(NodeKind::Number, "99")],
            )],
        );
        let mut report = Report::new();
        let count = TreeValidator::new(&mut report).validate(&root);
        assert_eq!(count, 0);
        assert_eq!(report.lines().collect::<Vec<_>>(), vec!["  number 99"]);
    }

    #[test]
    fn siblings_do_not_share_depth() {
        let nested = branch(
            NodeKind::DeclrScope,
            vec![
                leaf(NodeKind::Ident, "outer"),
                branch(
                    NodeKind::Scope,
                    vec![branch(
                        NodeKind::Declr,
                        vec![leaf(NodeKind::IdentKey, "owner"), leaf(NodeKind::Ident, "DEN")],
                    )],
                ),
            ],
        );
        let sibling = branch(
            NodeKind::Declr,
            vec![leaf(NodeKind::BoolKey, "impassable"), leaf(NodeKind::Bool, "yes")],
        );
        let root = branch(NodeKind::Document, vec![nested, sibling]);

        let mut report = Report::new();
        TreeValidator::new(&mut report).validate(&root);
        assert_eq!(
            report.lines().collect::<Vec<_>>(),
            vec!["  ident outer", "    ident DEN", "  bool yes"]
        );
    }

    #[test]
    fn error_production_is_reported_not_rendered() {
        let root = branch(
            NodeKind::Document,
            vec![branch(
                NodeKind::Declr,
                vec![branch(
                    NodeKind::WrongValueType,
                    vec![leaf(NodeKind::Ident, "id"), leaf(NodeKind::String, "99")],
                )],
            )],
        );
        let mut report = Report::new();
        let count = TreeValidator::new(&mut report).validate(&root);
        assert_eq!(count, 1);
        assert_eq!(report.lines().count(), 0);
        let diagnostic = report.diagnostics().next().unwrap();
        assert_eq!(diagnostic.values, vec!["id", "99"]);
        assert_eq!(diagnostic.to_string(), "ERR_wrong_value_type: id = 99");
    }
}
