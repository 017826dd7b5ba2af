//! Argument builders for the egg command.
//!
//! Each function returns a `clap::Arg` composed into the command in
//! `build_cli`.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Grammar file (positional; stdin if omitted).
pub fn input_arg() -> Arg {
    Arg::new("input")
        .value_name("GRAMMAR")
        .value_parser(value_parser!(PathBuf))
        .help("Grammar file (reads stdin if omitted)")
}

/// Write output to file (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write output to file (stdout if omitted)")
}

/// Module name for the generated rules (-g/--grammar).
pub fn grammar_name_arg() -> Arg {
    Arg::new("grammar_name")
        .short('g')
        .long("grammar")
        .value_name("NAME")
        .default_value("")
        .help("Wrap the generated rules in a module with this name")
}

/// Normalize the grammar tree before output (-n/--normalize).
pub fn normalize_arg() -> Arg {
    Arg::new("normalize")
        .short('n')
        .long("normalize")
        .action(ArgAction::SetTrue)
        .help("Canonicalize the grammar before emitting")
}

/// Pretty-print instead of compiling (-p/--print).
pub fn print_arg() -> Arg {
    Arg::new("print")
        .short('p')
        .long("print")
        .action(ArgAction::SetTrue)
        .conflicts_with("dump_ast")
        .help("Re-emit the grammar in Egg syntax instead of compiling")
}

/// Dump the grammar tree as JSON (--dump-ast).
pub fn dump_ast_arg() -> Arg {
    Arg::new("dump_ast")
        .long("dump-ast")
        .action(ArgAction::SetTrue)
        .help("Dump the parsed grammar tree as JSON")
}
