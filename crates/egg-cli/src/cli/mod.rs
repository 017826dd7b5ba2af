//! Command definition and parameter extraction.

mod args;

#[cfg(test)]
mod mod_tests;

use std::path::PathBuf;

use clap::{ArgMatches, Command};
use egg_lib::Mode;

pub fn build_cli() -> Command {
    Command::new("egg")
        .about("Parser generator for Parsing Expression Grammars")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(args::input_arg())
        .arg(args::output_arg())
        .arg(args::grammar_name_arg())
        .arg(args::normalize_arg())
        .arg(args::print_arg())
        .arg(args::dump_ast_arg())
}

/// Everything `run` needs, pulled out of the matches.
#[derive(Debug)]
pub struct RunParams {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub grammar_name: String,
    pub normalize: bool,
    pub mode: Mode,
}

impl RunParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let mode = if m.get_flag("print") {
            Mode::Print
        } else if m.get_flag("dump_ast") {
            Mode::DumpAst
        } else {
            Mode::Compile
        };
        Self {
            input: m.get_one::<PathBuf>("input").cloned(),
            output: m.get_one::<PathBuf>("output").cloned(),
            grammar_name: m
                .get_one::<String>("grammar_name")
                .cloned()
                .unwrap_or_default(),
            normalize: m.get_flag("normalize"),
            mode,
        }
    }
}
