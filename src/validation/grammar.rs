//! Consistency checks over the grammar text before any document is parsed.
//!
//! `pest_derive` already rejects grammars it cannot compile, but it accepts rule
//! sets that break the assumptions the validator relies on: overlapping key
//! categories, or a `declr` whose error fallback is not the last alternative.

pub mod parser;
pub mod validators;

use crate::StateError;

// =====================
// Core Data Structures
// =====================

/// One `name = { ... }` definition from the grammar text.
#[derive(Debug, Clone)]
pub struct GrammarRule {
    pub name: String,
    /// Rule body between the outer braces.
    pub definition: String,
    pub line_number: usize,
    /// Rule names referenced by the body, in order, string literals excluded.
    pub references: Vec<String>,
    /// References that only appear under a `!` lookahead.
    pub negated_references: Vec<String>,
    /// Contents of the double-quoted literals in the body.
    pub literals: Vec<String>,
}

#[derive(Debug, Default)]
pub struct GrammarCheck {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub struct GrammarConstants {
    pub built_ins: &'static [&'static str],
    pub required_rules: &'static [&'static str],
    pub key_categories: &'static [&'static str],
    pub declaration_rule: &'static str,
    pub error_rule: &'static str,
}

pub const GRAMMAR_CONSTANTS: GrammarConstants = GrammarConstants {
    built_ins: &[
        "SOI",
        "EOI",
        "WHITESPACE",
        "COMMENT",
        "ANY",
        "NEWLINE",
        "ASCII_DIGIT",
        "ASCII_ALPHA",
        "ASCII_ALPHANUMERIC",
        "PUSH",
        "POP",
        "PEEK",
        "DROP",
    ],
    required_rules: &[
        "document",
        "scope_body",
        "scope",
        "declr",
        "declr_scope",
        "number_list",
        "err_wrong_value_type",
    ],
    key_categories: &["number_key", "string_key", "ident_key", "bool_key"],
    declaration_rule: "declr",
    error_rule: "err_wrong_value_type",
};

// =====================
// Traits
// =====================

pub trait CheckReporter {
    fn report_error(&mut self, message: impl Into<String>);
    fn report_warning(&mut self, message: impl Into<String>);
}

impl CheckReporter for GrammarCheck {
    fn report_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
    fn report_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

impl GrammarCheck {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

// =====================
// Public API
// =====================

/// Checks grammar text for rule consistency.
///
/// Returns `Err` only when the text contains no rules at all; every other
/// problem is collected into the returned [`GrammarCheck`].
pub fn check_grammar(content: &str) -> Result<GrammarCheck, StateError> {
    let mut result = GrammarCheck::new();
    let rules = parser::GrammarParser::new().parse_rules(content)?;

    use validators::GrammarValidators;
    GrammarValidators::check_duplicate_patterns(&rules, &mut result);
    GrammarValidators::check_rule_references(&rules, &mut result);
    GrammarValidators::check_required_rules(&rules, &mut result);
    GrammarValidators::check_key_disjointness(&rules, &mut result);
    GrammarValidators::check_error_fallback_last(&rules, &mut result);

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::GRAMMAR_SOURCE;

    #[test]
    fn embedded_grammar_is_consistent() {
        let result = check_grammar(GRAMMAR_SOURCE).unwrap();
        assert!(result.is_valid(), "{:?}", result.errors);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn empty_grammar_is_rejected() {
        assert!(check_grammar("   \n").is_err());
    }
}
