use egg_runtime::State;
use indoc::indoc;

use crate::analyze::check;
use crate::parser::{self, ParseOutput};

fn parse_ok(src: &str) -> ParseOutput {
    let mut bytes = src.as_bytes();
    let mut ps = State::new(&mut bytes);
    parser::parse(&mut ps).expect("grammar should parse")
}

#[test]
fn clean_grammar_has_no_diagnostics() {
    let parsed = parse_ok(indoc! {"
        a = b 'x'
        b = 'y'
    "});
    let diagnostics = check(&parsed);
    assert!(diagnostics.is_empty());
}

#[test]
fn duplicate_rule_is_an_error_with_the_first_site_attached() {
    let parsed = parse_ok(indoc! {"
        a = 'x'
        a = 'y'
    "});
    let diagnostics = check(&parsed);
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.len(), 1);

    let diag = diagnostics.iter().next().unwrap();
    assert_eq!(diag.message, "rule `a` is defined more than once");
    assert_eq!(diag.range, 8..9);
    assert_eq!(diag.related.len(), 1);
    assert_eq!(diag.related[0].range, 0..1);
    assert_eq!(diag.related[0].message, "`a` first defined here");
}

#[test]
fn each_unresolved_reference_is_reported() {
    let parsed = parse_ok(indoc! {"
        a = b c b
        c = 'x'
    "});
    let diagnostics = check(&parsed);
    assert_eq!(diagnostics.len(), 2);
    for diag in diagnostics.iter() {
        assert_eq!(diag.message, "reference to undefined rule `b`");
    }
}

#[test]
fn rendered_diagnostics_point_into_the_source() {
    let src = indoc! {"
        a = 'x'
        a = 'y'
    "};
    let parsed = parse_ok(src);
    let rendered = check(&parsed).printer().source(src).render();
    assert!(rendered.contains("error: rule `a` is defined more than once"));
    assert!(rendered.contains("a = 'y'"));
}

#[test]
fn plain_rendering_without_source() {
    let parsed = parse_ok("a = b");
    let rendered = check(&parsed).printer().render();
    assert_eq!(rendered, "error: reference to undefined rule `b`");
}
