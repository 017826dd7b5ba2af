use indoc::indoc;

use crate::{Error, Mode, Options, run};

fn run_src(src: &str, options: &Options) -> Result<String, Error> {
    let mut input = src.as_bytes();
    let mut out = Vec::new();
    run(&mut input, &mut out, options)?;
    Ok(String::from_utf8(out).expect("output is UTF-8"))
}

#[test]
fn compile_mode_emits_a_rule_function_per_rule() {
    let src = indoc! {"
        s = 'a'* 'b'
        t = s !.
    "};
    let out = run_src(src, &Options::default()).unwrap();
    assert!(out.contains("pub fn s(ps: &mut State<'_>) -> Match<()> {"));
    assert!(out.contains("pub fn t(ps: &mut State<'_>) -> Match<()> {"));
    assert!(out.contains("use egg_runtime::"));
}

#[test]
fn grammar_name_becomes_the_module() {
    let options = Options {
        grammar_name: "calc".to_string(),
        ..Options::default()
    };
    let out = run_src("s = 'a'", &options).unwrap();
    assert!(out.contains("pub mod calc {"));
}

#[test]
fn print_mode_re_emits_the_grammar() {
    let options = Options {
        mode: Mode::Print,
        normalize: true,
        ..Options::default()
    };
    let out = run_src("s = 'a' 'b' 'c'", &options).unwrap();
    assert_eq!(out, "s = \"abc\"\n");
}

#[test]
fn dump_ast_mode_serializes_the_tree() {
    let options = Options {
        mode: Mode::DumpAst,
        ..Options::default()
    };
    let out = run_src("s = 'a'?", &options).unwrap();
    assert!(out.contains("\"rules\""));
    assert!(out.contains("\"Opt\""));
}

#[test]
fn parse_failure_carries_the_report() {
    let err = run_src("s = [x", &Options::default()).unwrap_err();
    match err {
        Error::Parse(report) => {
            assert!(report.starts_with("Parse failure 6 bytes into the input:"));
            assert!(report.contains("line 1: s = [x"));
        }
        other => panic!("expected Parse, got {:?}", other),
    }
}

#[test]
fn invalid_grammar_carries_rendered_diagnostics() {
    let err = run_src("a = missing", &Options::default()).unwrap_err();
    match err {
        Error::Invalid(rendered) => {
            assert!(rendered.contains("reference to undefined rule `missing`"));
        }
        other => panic!("expected Invalid, got {:?}", other),
    }
}

#[test]
fn normalization_is_off_by_default() {
    let options = Options {
        mode: Mode::Print,
        ..Options::default()
    };
    let out = run_src("s = 'a' 'b'", &options).unwrap();
    assert_eq!(out, "s = 'a' 'b'\n");
}
