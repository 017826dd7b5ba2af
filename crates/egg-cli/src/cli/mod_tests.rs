use std::path::PathBuf;

use clap::ArgMatches;
use egg_lib::Mode;

use super::{RunParams, build_cli};

fn matches_for(argv: &[&str]) -> ArgMatches {
    build_cli()
        .try_get_matches_from(argv.iter().copied())
        .expect("argv parses")
}

#[test]
fn defaults_to_compile_mode_over_stdio() {
    let params = RunParams::from_matches(&matches_for(&["egg"]));
    assert_eq!(params.input, None);
    assert_eq!(params.output, None);
    assert_eq!(params.grammar_name, "");
    assert!(!params.normalize);
    assert_eq!(params.mode, Mode::Compile);
}

#[test]
fn print_flag_selects_print_mode() {
    let params = RunParams::from_matches(&matches_for(&["egg", "-p"]));
    assert_eq!(params.mode, Mode::Print);
}

#[test]
fn dump_ast_flag_selects_dump_mode() {
    let params = RunParams::from_matches(&matches_for(&["egg", "--dump-ast"]));
    assert_eq!(params.mode, Mode::DumpAst);
}

#[test]
fn print_and_dump_ast_conflict() {
    let result = build_cli().try_get_matches_from(["egg", "-p", "--dump-ast"]);
    assert!(result.is_err());
}

#[test]
fn paths_names_and_flags_are_extracted() {
    let params = RunParams::from_matches(&matches_for(&[
        "egg",
        "grammar.egg",
        "-o",
        "parser.rs",
        "-g",
        "calc",
        "-n",
    ]));
    assert_eq!(params.input, Some(PathBuf::from("grammar.egg")));
    assert_eq!(params.output, Some(PathBuf::from("parser.rs")));
    assert_eq!(params.grammar_name, "calc");
    assert!(params.normalize);
    assert_eq!(params.mode, Mode::Compile);
}

#[test]
fn long_flags_match_their_short_forms() {
    let short = RunParams::from_matches(&matches_for(&["egg", "-n", "-p"]));
    let long = RunParams::from_matches(&matches_for(&["egg", "--normalize", "--print"]));
    assert_eq!(short.normalize, long.normalize);
    assert_eq!(short.mode, long.mode);
}
