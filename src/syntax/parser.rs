//! statelint parser
//!
//! Runs the pest-generated parser over a document and converts the resulting
//! pairs into an owned [`Node`] tree. Purely syntactic: type mismatches show up
//! as `ERR_wrong_value_type` nodes, they are not errors here.

use std::sync::Arc;

use pest::{
    error::{Error, ErrorVariant, InputLocation, LineColLocation},
    iterators::{Pair, Pairs},
    Parser,
};
use pest_derive::Parser;
use tracing::debug;

use crate::diagnostics::{ErrorContext, SourceArc, StateError};
use crate::syntax::{Node, NodeKind, Span};
use crate::validation::grammar::{check_grammar, GrammarCheck};

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct StateParser;

/// The grammar text compiled into [`StateParser`].
pub const GRAMMAR_SOURCE: &str = include_str!("grammar.pest");

/// Entry rule every document must match from start to end.
pub const ENTRY_RULE: &str = "document";

// ============================================================================
// PUBLIC API
// ============================================================================

/// A checked, reusable parser for game-state documents.
///
/// Built once per run and shared read-only by everything that parses.
#[derive(Debug)]
pub struct StateGrammar {
    check: GrammarCheck,
}

impl StateGrammar {
    /// Checks the embedded grammar and returns the parser handle.
    ///
    /// Fails with [`StateError::Grammar`] when the rule set is inconsistent.
    pub fn new() -> Result<Self, StateError> {
        let check = check_grammar(GRAMMAR_SOURCE)?;
        if !check.is_valid() {
            return Err(StateError::grammar(&check.errors));
        }
        for warning in &check.warnings {
            tracing::warn!(%warning, "grammar check");
        }
        Ok(StateGrammar { check })
    }

    /// The consistency report produced while building the grammar.
    pub fn check(&self) -> &GrammarCheck {
        &self.check
    }

    /// Parses a whole document into its tree.
    pub fn parse(&self, source: &SourceArc) -> Result<Node, StateError> {
        parse(source)
    }
}

/// Parses a whole document without going through [`StateGrammar`].
pub fn parse(source: &SourceArc) -> Result<Node, StateError> {
    let text = source.inner().as_str();
    debug!(name = source.name(), bytes = text.len(), "parsing document");

    let mut pairs = StateParser::parse(Rule::document, text)
        .map_err(|e| convert_parse_error(e, source))?;
    let document = pairs.next().ok_or_else(|| {
        StateError::parse(
            "parser produced no document",
            source,
            Span { start: 0, end: 0 },
        )
    })?;

    let builder = TreeBuilder { text };
    let span = get_span(&document);
    Ok(Node::branch(
        NodeKind::Document,
        builder.collect_children(document.into_inner()),
        span,
    ))
}

// ============================================================================
// TREE BUILDERS
// ============================================================================

struct TreeBuilder<'i> {
    text: &'i str,
}

impl TreeBuilder<'_> {
    /// Converts sibling pairs, flattening `scope_body` and attaching trailing comments.
    fn collect_children(&self, pairs: Pairs<Rule>) -> Vec<Node> {
        let mut children: Vec<Node> = Vec::new();
        for pair in pairs {
            match pair.as_rule() {
                Rule::scope_body => children.extend(self.collect_children(pair.into_inner())),
                Rule::COMMENT => self.attach_comment(&mut children, &pair),
                _ => children.extend(self.build_node(pair)),
            }
        }
        children
    }

    fn build_node(&self, pair: Pair<Rule>) -> Option<Node> {
        let span = get_span(&pair);
        let kind = match pair.as_rule() {
            Rule::declr => NodeKind::Declr,
            Rule::declr_scope => NodeKind::DeclrScope,
            Rule::err_wrong_value_type => NodeKind::WrongValueType,
            Rule::scope => NodeKind::Scope,
            Rule::number_list => NodeKind::NumberList,

            Rule::number_key => return Some(terminal(NodeKind::NumberKey, &pair)),
            Rule::string_key => return Some(terminal(NodeKind::StringKey, &pair)),
            Rule::ident_key => return Some(terminal(NodeKind::IdentKey, &pair)),
            Rule::bool_key => return Some(terminal(NodeKind::BoolKey, &pair)),
            Rule::number | Rule::int => return Some(terminal(NodeKind::Number, &pair)),
            Rule::ident => return Some(terminal(NodeKind::Ident, &pair)),
            Rule::date => return Some(terminal(NodeKind::Date, &pair)),
            Rule::boolean => return Some(terminal(NodeKind::Bool, &pair)),
            Rule::string => {
                let raw = pair.as_str();
                let content = raw
                    .strip_prefix('"')
                    .and_then(|s| s.strip_suffix('"'))
                    .unwrap_or(raw);
                return Some(Node::terminal(NodeKind::String, content, span));
            }

            // EOI and anything silent
            _ => return None,
        };
        Some(Node::branch(kind, self.collect_children(pair.into_inner()), span))
    }

    /// A comment on the line a declaration ends on becomes its annotation.
    fn attach_comment(&self, children: &mut [Node], comment: &Pair<Rule>) {
        let Some(last) = children.last_mut() else {
            return;
        };
        if !last.kind.is_declaration() || last.comment.is_some() {
            return;
        }
        let start = comment.as_span().start();
        let between = self.text.get(last.span.end..start).unwrap_or("\n");
        if between.contains('\n') {
            return;
        }
        let text = comment.as_str().trim_start_matches('#').trim();
        last.comment = Some(text.to_string());
    }
}

fn terminal(kind: NodeKind, pair: &Pair<Rule>) -> Node {
    Node::terminal(kind, pair.as_str(), get_span(pair))
}

// ============================================================================
// UTILITIES
// ============================================================================

fn get_span(pair: &Pair<Rule>) -> Span {
    Span {
        start: pair.as_span().start(),
        end: pair.as_span().end(),
    }
}

/// Human-readable rule names for pest's "expected ..." messages.
fn rule_display_name(rule: &Rule) -> String {
    let name = match rule {
        Rule::document | Rule::declr => "declaration",
        Rule::declr_scope => "scoped declaration",
        Rule::number_list => "number list",
        Rule::scope_body => "declaration",
        Rule::scope => "'{'",
        Rule::err_wrong_value_type => "declaration",
        Rule::number | Rule::int => "number",
        Rule::string => "string",
        Rule::ident => "identifier",
        Rule::boolean => "yes/no",
        Rule::date => "date",
        Rule::EOI => "end of input",
        other => return format!("{:?}", other),
    };
    name.to_string()
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

fn is_trivia(rule: &Rule) -> bool {
    matches!(rule, Rule::COMMENT | Rule::WHITESPACE)
}

fn convert_parse_error(error: Error<Rule>, source: &SourceArc) -> StateError {
    let span = match error.location {
        InputLocation::Pos(pos) => Span {
            start: pos,
            end: pos,
        },
        InputLocation::Span((start, end)) => Span { start, end },
    };
    let (line, col) = match error.line_col {
        LineColLocation::Pos(pos) => pos,
        LineColLocation::Span(start, _) => start,
    };

    let mut error = error;
    let mut nothing_expected = false;
    if let ErrorVariant::ParsingError {
        positives,
        negatives,
    } = &mut error.variant
    {
        positives.retain(|rule| !is_trivia(rule));
        negatives.retain(|rule| !is_trivia(rule));
        nothing_expected = positives.is_empty() && negatives.is_empty();
    }
    let expected = if nothing_expected {
        "unexpected input".to_string()
    } else {
        error.renamed_rules(rule_display_name).variant.message().into_owned()
    };
    let help = if expected.contains("'{'") {
        Some("a key followed by '=' needs a value or a { ... } block")
    } else if source.inner()[span.start.min(source.inner().len())..].starts_with('}') {
        Some("this closing brace has no matching '{'")
    } else {
        None
    };

    let mut ctx = ErrorContext::with_source_and_span(Arc::clone(source), span);
    if let Some(help) = help {
        ctx = ctx.with_help(help);
    }
    StateError::Parse {
        message: format!("{} at line {}, column {}", expected, line, col),
        ctx,
    }
}
