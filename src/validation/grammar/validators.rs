use std::collections::{BTreeMap, BTreeSet, HashSet};

// Domain modules with aliases
use crate::validation::grammar::{
    parser::split_alternatives, CheckReporter, GrammarCheck, GrammarRule, GRAMMAR_CONSTANTS,
};

type Rules = BTreeMap<String, GrammarRule>;

/// Validates grammar rules for various correctness issues
/// Each validator focuses on a single validation concern
pub struct GrammarValidators;

impl GrammarValidators {
    /// Warns about rules whose bodies are identical.
    pub fn check_duplicate_patterns(rules: &Rules, result: &mut GrammarCheck) {
        let mut seen: BTreeMap<String, &str> = BTreeMap::new();

        for rule in rules.values() {
            let normalized = rule.definition.split_whitespace().collect::<Vec<_>>().join(" ");
            match seen.get(&normalized) {
                Some(first) => result.report_warning(format!(
                    "Rule '{}' has the same pattern as '{}': {}",
                    rule.name, first, normalized
                )),
                None => {
                    seen.insert(normalized, &rule.name);
                }
            }
        }
    }

    /// Reports references to rules that are neither defined nor pest built-ins.
    pub fn check_rule_references(rules: &Rules, result: &mut GrammarCheck) {
        for rule in rules.values() {
            for reference in &rule.references {
                if rules.contains_key(reference)
                    || GRAMMAR_CONSTANTS.built_ins.contains(&reference.as_str())
                {
                    continue;
                }
                result.report_error(format!(
                    "Rule '{}' (line {}) references undefined rule '{}'",
                    rule.name, rule.line_number, reference
                ));
            }
        }
    }

    /// Reports rules the parse tree builder depends on that are missing.
    pub fn check_required_rules(rules: &Rules, result: &mut GrammarCheck) {
        for &required in GRAMMAR_CONSTANTS.required_rules {
            if rules.contains_key(required) {
                continue;
            }
            result.report_error(format!(
                "Required rule '{}' is missing from the grammar",
                required
            ));
        }
    }

    /// Reports key literals that belong to more than one key category.
    pub fn check_key_disjointness(rules: &Rules, result: &mut GrammarCheck) {
        let mut owners: BTreeMap<String, Vec<&str>> = BTreeMap::new();

        for &category in GRAMMAR_CONSTANTS.key_categories {
            let Some(rule) = rules.get(category) else {
                continue;
            };
            let mut visited = HashSet::new();
            for literal in Self::key_literals(rule, rules, &mut visited) {
                owners.entry(literal).or_default().push(category);
            }
        }

        for (key, categories) in owners {
            if categories.len() < 2 {
                continue;
            }
            result.report_error(format!(
                "Key '{}' belongs to more than one key category: {}",
                key,
                categories.join(", ")
            ));
        }
    }

    /// Literals reachable from `rule` through non-negated references.
    fn key_literals<'r>(
        rule: &'r GrammarRule,
        rules: &'r Rules,
        visited: &mut HashSet<&'r str>,
    ) -> BTreeSet<String> {
        let mut literals: BTreeSet<String> = rule.literals.iter().cloned().collect();
        if !visited.insert(rule.name.as_str()) {
            return literals;
        }
        for reference in &rule.references {
            if rule.negated_references.contains(reference) {
                continue;
            }
            if let Some(referenced) = rules.get(reference) {
                literals.extend(Self::key_literals(referenced, rules, visited));
            }
        }
        literals
    }

    /// The error production must be the last alternative of the declaration rule.
    ///
    /// Any typed alternative placed after it would never be tried.
    pub fn check_error_fallback_last(rules: &Rules, result: &mut GrammarCheck) {
        let declaration = GRAMMAR_CONSTANTS.declaration_rule;
        let error_rule = GRAMMAR_CONSTANTS.error_rule;
        let Some(rule) = rules.get(declaration) else {
            return;
        };

        let alternatives = split_alternatives(&rule.definition);
        let fallback = alternatives
            .iter()
            .position(|alt| alt.split_whitespace().any(|token| token == error_rule));

        match fallback {
            None => result.report_error(format!(
                "Rule '{}' has no '{}' fallback alternative",
                declaration, error_rule
            )),
            Some(index) if index + 1 != alternatives.len() => result.report_error(format!(
                "'{}' must be the last alternative of '{}' (found at position {} of {})",
                error_rule,
                declaration,
                index + 1,
                alternatives.len()
            )),
            Some(_) => {}
        }
    }
}
