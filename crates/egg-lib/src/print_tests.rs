use egg_runtime::State;
use indoc::indoc;

use crate::ast::Grammar;
use crate::normalize::normalize;
use crate::parser;
use crate::print::print;

fn parse_ok(src: &str) -> Grammar {
    let mut bytes = src.as_bytes();
    let mut ps = State::new(&mut bytes);
    parser::parse(&mut ps).expect("grammar should parse").grammar
}

/// Printing and re-parsing must give back the same tree.
fn round_trip(src: &str) {
    let original = parse_ok(src);
    let printed = print(&original);
    let mut bytes = printed.as_bytes();
    let mut ps = State::new(&mut bytes);
    let reparsed = parser::parse(&mut ps)
        .unwrap_or_else(|| panic!("printed form should parse:\n{}", printed))
        .grammar;
    assert_eq!(original, reparsed, "printed form:\n{}", printed);
}

#[test]
fn round_trips_literals_and_classes() {
    round_trip(r#"a = 'x' "abc" [a-z0-9_] . ;"#);
}

#[test]
fn round_trips_escapes() {
    round_trip(r#"a = '\n' "tab\there" [-']"#);
    round_trip(r"a = [\[\]a-z]");
}

#[test]
fn round_trips_quantifiers_and_prefixes() {
    round_trip("a = 'x'? 'y'* 'z'+ &'p' !'q'");
}

#[test]
fn round_trips_precedence() {
    round_trip("a = ('x' | 'y')* 'z'");
    round_trip("a = 'x' ('y' 'z')+ | 'w'");
    round_trip("a = !('x' | 'y')");
}

#[test]
fn round_trips_captures_binds_and_actions() {
    round_trip(indoc! {"
        sum : i64 = num:a '+' num:b { sum = a + b; }
        num : i64 = < [0-9]+ > { num = psCapture.parse().unwrap(); }
    "});
}

#[test]
fn round_trips_pre_block() {
    round_trip(indoc! {"
        { use std::fmt; }
        a = 'x'
    "});
}

#[test]
fn prints_normalized_grammar() {
    let mut grammar = parse_ok("s = 'a' 'b' 'c' | 'x' | 'y'");
    normalize(&mut grammar);
    insta::assert_snapshot!(print(&grammar), @r#"
    s = "abc" | [x-y]
    "#);
}

#[test]
fn prints_typed_rules_with_their_type() {
    let grammar = parse_ok("num : i64 = [0-9]+");
    insta::assert_snapshot!(print(&grammar), @"num : i64 = [0-9]+");
}
