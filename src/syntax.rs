//! Parse tree for game-state documents.
//!
//! The grammar in `syntax/grammar.pest` is compiled by `pest_derive`; the
//! [`parser`] module turns its pairs into the owned [`Node`] tree defined here.
//! Every node carries its classification ([`NodeKind`]), the literal text for
//! terminals, and its children in document order.

use std::fmt;

use serde::Serialize;

pub mod parser;

/// Represents a span in the source code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Classification of a parse tree node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    #[serde(rename = "document")]
    Document,
    #[serde(rename = "scope")]
    Scope,
    #[serde(rename = "declr")]
    Declr,
    #[serde(rename = "declrScope")]
    DeclrScope,
    #[serde(rename = "numberList")]
    NumberList,
    #[serde(rename = "ERR_wrong_value_type")]
    WrongValueType,
    #[serde(rename = "varNumber")]
    NumberKey,
    #[serde(rename = "varString")]
    StringKey,
    #[serde(rename = "varIdent")]
    IdentKey,
    #[serde(rename = "varBool")]
    BoolKey,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "ident")]
    Ident,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "date")]
    Date,
}

impl NodeKind {
    /// The rule name used in tree dumps and validator reports.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Scope => "scope",
            NodeKind::Declr => "declr",
            NodeKind::DeclrScope => "declrScope",
            NodeKind::NumberList => "numberList",
            NodeKind::WrongValueType => "ERR_wrong_value_type",
            NodeKind::NumberKey => "varNumber",
            NodeKind::StringKey => "varString",
            NodeKind::IdentKey => "varIdent",
            NodeKind::BoolKey => "varBool",
            NodeKind::Number => "number",
            NodeKind::Ident => "ident",
            NodeKind::String => "string",
            NodeKind::Bool => "bool",
            NodeKind::Date => "date",
        }
    }

    /// Scalar values, including generic keys of scoped declarations.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            NodeKind::Number | NodeKind::Ident | NodeKind::String | NodeKind::Bool | NodeKind::Date
        )
    }

    /// Keys that belong to one of the closed key categories.
    pub fn is_typed_key(&self) -> bool {
        matches!(
            self,
            NodeKind::NumberKey | NodeKind::StringKey | NodeKind::IdentKey | NodeKind::BoolKey
        )
    }

    pub fn is_error(&self) -> bool {
        self.name().starts_with("ERR")
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self, NodeKind::Declr | NodeKind::DeclrScope)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value category a typed key expects.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ValueKind {
    Number,
    String,
    Ident,
    Bool,
}

impl ValueKind {
    pub fn from_key(kind: NodeKind) -> Option<ValueKind> {
        match kind {
            NodeKind::NumberKey => Some(ValueKind::Number),
            NodeKind::StringKey => Some(ValueKind::String),
            NodeKind::IdentKey => Some(ValueKind::Ident),
            NodeKind::BoolKey => Some(ValueKind::Bool),
            _ => None,
        }
    }
}

/// Outcome of matching a `declr` against the typed alternatives.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Classification {
    /// The key's category matched its value.
    Valid(ValueKind),
    /// No typed alternative matched; the catch-all error production did.
    TypeMismatch,
}

/// A node of the parse tree.
///
/// `value` is only set on terminals (keys and scalars); containers and
/// declarations carry their structure through `children`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
    pub span: Span,
    /// Trailing `#` comment on the line the declaration ends on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn terminal(kind: NodeKind, value: impl Into<String>, span: Span) -> Self {
        Node {
            kind,
            value: value.into(),
            span,
            comment: None,
            children: Vec::new(),
        }
    }

    pub fn branch(kind: NodeKind, children: Vec<Node>, span: Span) -> Self {
        Node {
            kind,
            value: String::new(),
            span,
            comment: None,
            children,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.children.is_empty() && (self.kind.is_scalar() || self.kind.is_typed_key())
    }

    /// The key of a declaration or error production.
    pub fn key(&self) -> Option<&Node> {
        match self.kind {
            NodeKind::Declr => self.children.first().and_then(|first| {
                if first.kind == NodeKind::WrongValueType {
                    first.key()
                } else {
                    Some(first)
                }
            }),
            NodeKind::DeclrScope | NodeKind::WrongValueType => self.children.first(),
            _ => None,
        }
    }

    /// Tags a `declr` (or a bare error production) as valid or mismatched.
    pub fn classify(&self) -> Option<Classification> {
        match self.kind {
            NodeKind::WrongValueType => Some(Classification::TypeMismatch),
            NodeKind::Declr => {
                let first = self.children.first()?;
                if first.kind == NodeKind::WrongValueType {
                    return Some(Classification::TypeMismatch);
                }
                ValueKind::from_key(first.kind).map(Classification::Valid)
            }
            _ => None,
        }
    }

    /// Terminal values below (and including) this node, depth-first in document order.
    pub fn flatten_values(&self) -> Vec<String> {
        let mut values: Vec<String> = self.children.iter().flat_map(Node::flatten_values).collect();
        if !self.value.is_empty() {
            values.push(self.value.clone());
        }
        values
    }

    /// Raw tree dump, one node per line.
    pub fn dump(&self) -> String {
        self.to_string()
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{}{}", "  ".repeat(depth), self.kind)?;
        if self.is_terminal() {
            write!(f, " {:?}", self.value)?;
        }
        if let Some(comment) = &self.comment {
            write!(f, "  # {}", comment)?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}
