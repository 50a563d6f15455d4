// tests/parser_tests.rs

use statelint::diagnostics::{to_error_source, ErrorType};
use statelint::syntax::parser::{parse, StateGrammar};
use statelint::{Classification, Node, NodeKind, ValueKind};

const STATE_99: &str = include_str!("fixtures/state_99.txt");

// A helper to parse a string that is expected to be valid.
fn parse_ok(text: &str) -> Node {
    parse(&to_error_source("test.txt", text)).unwrap()
}

fn first_declr(tree: &Node) -> &Node {
    tree.children
        .iter()
        .find(|n| n.kind == NodeKind::Declr)
        .expect("document has a declaration")
}

#[test]
fn test_numeric_key_with_number_is_valid() {
    let tree = parse_ok("id=99");
    let declr = first_declr(&tree);
    assert_eq!(declr.classify(), Some(Classification::Valid(ValueKind::Number)));
}

#[test]
fn test_numeric_key_with_string_is_mismatch() {
    let tree = parse_ok("id=\"99\"");
    let declr = first_declr(&tree);
    assert_eq!(declr.classify(), Some(Classification::TypeMismatch));
    assert_eq!(declr.children[0].kind, NodeKind::WrongValueType);
    assert_eq!(declr.flatten_values(), vec!["id", "99"]);
}

#[test]
fn test_each_key_category_accepts_its_value() {
    let cases = [
        ("manpower = 1672235", ValueKind::Number),
        ("buildings_max_level_factor = 1.5", ValueKind::Number),
        ("name = \"STATE_99\"", ValueKind::String),
        ("owner = DEN", ValueKind::Ident),
        ("state_category = town", ValueKind::Ident),
        ("impassable = yes", ValueKind::Bool),
        ("set_demilitarized_zone = no", ValueKind::Bool),
    ];
    for (text, expected) in cases {
        let tree = parse_ok(text);
        assert_eq!(
            first_declr(&tree).classify(),
            Some(Classification::Valid(expected)),
            "{}",
            text
        );
    }
}

#[test]
fn test_wrong_categories_become_error_nodes() {
    for text in [
        "name = STATE_99",
        "impassable = maybe",
        "manpower = lots",
        "id = 99abc",
        "has_dlc = 3",
    ] {
        let tree = parse_ok(text);
        assert_eq!(
            first_declr(&tree).classify(),
            Some(Classification::TypeMismatch),
            "{}",
            text
        );
    }
}

#[test]
fn test_unknown_key_is_type_mismatch() {
    // Keys outside every category only parse through the catch-all.
    let tree = parse_ok("victory_points = 3");
    assert_eq!(first_declr(&tree).classify(), Some(Classification::TypeMismatch));
}

#[test]
fn test_empty_scope_parses() {
    let tree = parse_ok("x = {}");
    let scoped = &tree.children[0];
    assert_eq!(scoped.kind, NodeKind::DeclrScope);
    let scope = &scoped.children[1];
    assert_eq!(scope.kind, NodeKind::Scope);
    assert!(scope.children.is_empty());
}

#[test]
fn test_child_order_is_document_order() {
    let tree = parse_ok("x = { level = 1 level = 2 level = 3 }");
    let scope = &tree.children[0].children[1];
    let values: Vec<_> = scope
        .children
        .iter()
        .map(|declr| declr.children[1].value.as_str())
        .collect();
    assert_eq!(values, vec!["1", "2", "3"]);
}

#[test]
fn test_full_state_document() {
    let tree = parse_ok(STATE_99);
    assert_eq!(tree.children.len(), 1);

    let state = &tree.children[0];
    assert_eq!(state.kind, NodeKind::DeclrScope);
    assert_eq!(state.key().map(|k| k.value.as_str()), Some("state"));

    let body = &state.children[1];
    let resources = body
        .children
        .iter()
        .find(|n| n.key().is_some_and(|k| k.value == "resources"))
        .unwrap();
    let aluminium = &resources.children[1].children[0];
    assert_eq!(aluminium.comment.as_deref(), Some("was: 10"));

    let provinces = body.children.last().unwrap();
    let list = &provinces.children[1].children[0];
    assert_eq!(list.kind, NodeKind::NumberList);
    assert_eq!(list.children.len(), 10);
}

#[test]
fn test_dump_shows_kinds_and_values() {
    let dump = parse_ok("resources = { aluminium = 6 }").dump();
    assert_eq!(
        dump,
        "document\n  declrScope\n    ident \"resources\"\n    scope\n      declr\n        varNumber \"aluminium\"\n        number \"6\"\n"
    );
}

#[test]
fn test_grammar_parses_same_as_free_function() {
    let grammar = StateGrammar::new().unwrap();
    let source = to_error_source("state_99.txt", STATE_99);
    assert_eq!(grammar.parse(&source).unwrap(), parse(&source).unwrap());
}

#[test]
fn test_unbalanced_brace_fails() {
    let err = parse(&to_error_source("bad.txt", "state = { id = 1 } }")).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Parse);
}

#[test]
fn test_unterminated_string_fails() {
    let err = parse(&to_error_source("bad.txt", "name = \"oops")).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Parse);
}

#[test]
fn test_byte_order_mark_is_whitespace() {
    let tree = parse_ok("\u{FEFF}id = 1");
    assert_eq!(tree.children.len(), 1);
}
