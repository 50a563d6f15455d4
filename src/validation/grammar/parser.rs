use std::collections::BTreeMap;

use regex::Regex;

use crate::validation::grammar::GrammarRule;
use crate::StateError;

/// Splits pest grammar text into rule definitions.
///
/// Works on two aligned copies of the text: `cleaned` has `//` comments blanked
/// out, `masked` additionally blanks the contents of string and char literals so
/// braces, bars and identifiers inside literals are never mistaken for syntax.
pub struct GrammarParser {
    rule_start: Regex,
    identifier: Regex,
    literal: Regex,
}

impl Default for GrammarParser {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarParser {
    pub fn new() -> Self {
        Self {
            rule_start: Regex::new(r"(?m)^[ \t]*([A-Za-z_][A-Za-z0-9_]*)[ \t]*=[ \t]*[_@$!]?[ \t]*\{")
                .expect("rule start pattern is valid"),
            identifier: Regex::new(r"(!\s*)?\b([A-Za-z_][A-Za-z0-9_]*)\b")
                .expect("identifier pattern is valid"),
            literal: Regex::new(r#""((?:[^"\\]|\\.)*)""#).expect("literal pattern is valid"),
        }
    }

    pub fn parse_rules(&self, content: &str) -> Result<BTreeMap<String, GrammarRule>, StateError> {
        if content.trim().is_empty() {
            return Err(StateError::grammar(&["grammar text is empty".to_string()]));
        }

        let (cleaned, masked) = mask_text(content);
        let mut rules = BTreeMap::new();

        for cap in self.rule_start.captures_iter(&masked) {
            let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
                continue;
            };
            let body_start = whole.end();
            let Some(body_end) = find_closing_brace(&masked, body_start) else {
                return Err(StateError::grammar(&[format!(
                    "rule '{}' has no closing brace",
                    name.as_str()
                )]));
            };

            let rule = self.build_rule(
                name.as_str(),
                &cleaned[body_start..body_end],
                &masked[body_start..body_end],
                line_of(&masked, whole.start()),
            );
            rules.insert(rule.name.clone(), rule);
        }

        if rules.is_empty() {
            return Err(StateError::grammar(&["grammar text contains no rules".to_string()]));
        }
        Ok(rules)
    }

    fn build_rule(&self, name: &str, definition: &str, masked: &str, line_number: usize) -> GrammarRule {
        let mut references: Vec<String> = Vec::new();
        let mut negated_references: Vec<String> = Vec::new();
        for cap in self.identifier.captures_iter(masked) {
            let Some(ident) = cap.get(2) else { continue };
            let ident = ident.as_str().to_string();
            if cap.get(1).is_some() && !negated_references.contains(&ident) {
                negated_references.push(ident.clone());
            }
            if !references.contains(&ident) {
                references.push(ident);
            }
        }

        let literals = self
            .literal
            .captures_iter(definition)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .collect();

        GrammarRule {
            name: name.to_string(),
            definition: definition.trim().to_string(),
            line_number,
            references,
            negated_references,
            literals,
        }
    }
}

/// Top-level `|` alternatives of a rule body, trimmed.
pub fn split_alternatives(definition: &str) -> Vec<String> {
    let (_, masked) = mask_text(definition);
    let mut alternatives = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (index, ch) in masked.char_indices() {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '|' if depth == 0 => {
                alternatives.push(definition[start..index].trim().to_string());
                start = index + 1;
            }
            _ => {}
        }
    }
    alternatives.push(definition[start..].trim().to_string());
    alternatives
}

#[derive(Clone, Copy, PartialEq)]
enum ScanState {
    Code,
    Str,
    Char,
    Comment,
}

/// Returns `(cleaned, masked)` copies with identical byte offsets.
fn mask_text(content: &str) -> (String, String) {
    let mut cleaned = String::with_capacity(content.len());
    let mut masked = String::with_capacity(content.len());
    let mut state = ScanState::Code;
    let mut escaped = false;
    let mut chars = content.chars().peekable();

    let blank = |s: &mut String, c: char| {
        if c == '\n' {
            s.push('\n');
        } else {
            s.extend(std::iter::repeat(' ').take(c.len_utf8()));
        }
    };

    while let Some(c) = chars.next() {
        match state {
            ScanState::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    state = ScanState::Comment;
                    blank(&mut cleaned, c);
                    blank(&mut masked, c);
                }
                '"' | '\'' => {
                    state = if c == '"' { ScanState::Str } else { ScanState::Char };
                    cleaned.push(c);
                    masked.push(c);
                }
                _ => {
                    cleaned.push(c);
                    masked.push(c);
                }
            },
            ScanState::Str | ScanState::Char => {
                let quote = if state == ScanState::Str { '"' } else { '\'' };
                if !escaped && c == quote {
                    state = ScanState::Code;
                    cleaned.push(c);
                    masked.push(c);
                } else {
                    escaped = !escaped && c == '\\';
                    cleaned.push(c);
                    blank(&mut masked, c);
                }
            }
            ScanState::Comment => {
                if c == '\n' {
                    state = ScanState::Code;
                }
                blank(&mut cleaned, c);
                blank(&mut masked, c);
            }
        }
    }
    (cleaned, masked)
}

/// Offset of the `}` closing a body that starts at `start` (just after its `{`).
fn find_closing_brace(masked: &str, start: usize) -> Option<usize> {
    let mut depth = 1i32;
    for (offset, ch) in masked[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}
