// tests/validator_tests.rs

use statelint::diagnostics::to_error_source;
use statelint::syntax::parser::parse;
use statelint::validation::{validate, Report, ReportEntry};
use statelint::NodeKind;

fn check(text: &str) -> Report {
    let tree = parse(&to_error_source("test.txt", text)).unwrap();
    validate(&tree)
}

fn lines(report: &Report) -> Vec<&str> {
    report.lines().collect()
}

#[test]
fn test_valid_declaration_has_no_diagnostics() {
    let report = check("id=99");
    assert!(report.is_clean());
    assert_eq!(lines(&report), vec!["  number 99"]);
}

#[test]
fn test_mismatch_is_reported_with_flattened_values() {
    let report = check("id=\"99\"");
    let diagnostics: Vec<_> = report.diagnostics().collect();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, NodeKind::WrongValueType);
    assert_eq!(diagnostics[0].values, vec!["id", "99"]);
    assert_eq!(report.lines().count(), 0);
}

#[test]
fn test_nested_scopes_indent_by_declaration_depth() {
    let report = check("resources={ aluminium=6 }");
    assert_eq!(lines(&report), vec!["  ident resources", "    number 6"]);
}

#[test]
fn test_number_list_is_one_line() {
    let report = check("provinces = { 316 332 394 }");
    assert_eq!(
        lines(&report),
        vec!["  ident provinces", "  numberList 316, 332, 394"]
    );
}

#[test]
fn test_empty_scope_emits_only_its_key() {
    let report = check("x = {}");
    assert!(report.is_clean());
    assert_eq!(lines(&report), vec!["  ident x"]);
}

#[test]
fn test_empty_document_emits_nothing() {
    let report = check("");
    assert!(report.entries.is_empty());
}

#[test]
fn test_output_follows_document_order() {
    let report = check("manpower = \"many\"\nowner = DEN\nimpassable = 3");
    let rendered: Vec<String> = report
        .entries
        .iter()
        .map(|entry| match entry {
            ReportEntry::Line(line) => line.clone(),
            ReportEntry::Diagnostic(d) => d.to_string(),
        })
        .collect();
    assert_eq!(
        rendered,
        vec![
            "ERR_wrong_value_type: manpower = many",
            "  ident DEN",
            "ERR_wrong_value_type: impassable = 3",
        ]
    );
}

#[test]
fn test_full_state_document_renders_every_scalar() {
    let report = check(include_str!("fixtures/state_99.txt"));
    assert!(report.is_clean());
    assert_eq!(
        lines(&report),
        vec![
            "  ident state",
            "    number 99",
            "    string STATE_99",
            "    number 1672235",
            "    ident resources",
            "      number 6",
            "    ident town",
            "    ident history",
            "      ident DEN",
            "      ident victory_points",
            "      numberList 6364, 3",
            "      ident buildings",
            "        number 8",
            "        number 3",
            "        number 2",
            "        number 394",
            "          number 3",
            "        number 6364",
            "          number 1",
            "      ident DEN",
            "    ident provinces",
            "    numberList 316, 332, 394, 399, 3206, 3277, 3341, 6235, 6364, 11251",
        ]
    );
}

#[test]
fn test_mismatched_fixture() {
    let report = check(include_str!("fixtures/mismatched.txt"));
    let diagnostics: Vec<String> = report.diagnostics().map(|d| d.to_string()).collect();
    assert_eq!(
        diagnostics,
        vec![
            "ERR_wrong_value_type: id = 42",
            "ERR_wrong_value_type: impassable = maybe",
        ]
    );
    assert_eq!(
        lines(&report),
        vec!["  ident state", "    ident GER", "    number 1000"]
    );
}

#[test]
fn test_validation_is_deterministic() {
    let text = include_str!("fixtures/mismatched.txt");
    assert_eq!(check(text), check(text));
}
