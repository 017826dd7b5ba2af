//! Egg: a parser generator for Parsing Expression Grammars.
//!
//! Reads a grammar describing a PEG — rules, matchers, semantic actions,
//! typed rule values — and emits a self-contained Rust module with one
//! matching function per rule, running over the `egg-runtime` buffer.
//!
//! # Example
//!
//! ```
//! use egg_lib::{Mode, Options};
//!
//! let mut grammar: &[u8] = b"digits = [0-9]+";
//! let mut out = Vec::new();
//! egg_lib::run(&mut grammar, &mut out, &Options::default()).expect("valid grammar");
//!
//! let code = String::from_utf8(out).unwrap();
//! assert!(code.contains("pub fn digits"));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod ast;
pub mod diagnostics;
pub mod emit;
pub mod normalize;
pub mod parser;
pub mod print;
pub mod report;

#[cfg(test)]
mod analyze_tests;
#[cfg(test)]
mod eval;
#[cfg(test)]
mod pipeline_tests;
#[cfg(test)]
mod print_tests;
#[cfg(test)]
mod report_tests;

use std::io::{Read, Write};

use egg_runtime::State;

pub use ast::{ClassRange, Grammar, Matcher, Rule};

/// What to do with a parsed grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Emit the generated parser.
    #[default]
    Compile,
    /// Re-emit the grammar in Egg syntax.
    Print,
    /// Dump the grammar tree as JSON.
    DumpAst,
}

/// The contract the orchestrator hands to the pipeline.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Module the generated rules are wrapped in; empty means none.
    pub grammar_name: String,
    /// Canonicalize the tree before output.
    pub normalize: bool,
    pub mode: Mode,
}

/// Errors from a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The grammar did not parse; carries the rendered failure report.
    #[error("{0}")]
    Parse(String),
    /// The grammar parsed but analysis rejected it; carries rendered
    /// diagnostics.
    #[error("{0}")]
    Invalid(String),
    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Runs the whole pipeline: parse, analyze, optionally normalize, then
/// compile, print, or dump into `out`.
pub fn run(input: &mut dyn Read, out: &mut dyn Write, options: &Options) -> Result<(), Error> {
    let mut ps = State::new(input);

    let Some(parsed) = parser::parse(&mut ps) else {
        return Err(Error::Parse(report::failure_report(&mut ps)));
    };

    let diagnostics = analyze::check(&parsed);
    if diagnostics.has_errors() {
        let source = ps.string(0, ps.max_read());
        let rendered = diagnostics.printer().source(&source).render();
        return Err(Error::Invalid(rendered));
    }

    let mut grammar = parsed.grammar;
    if options.normalize {
        normalize::normalize(&mut grammar);
    }

    let mut text = match options.mode {
        Mode::Compile => emit::emit(
            &grammar,
            emit::Config {
                grammar_name: options.grammar_name.clone(),
            },
        ),
        Mode::Print => print::print(&grammar),
        Mode::DumpAst => serde_json::to_string_pretty(&grammar)?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    out.write_all(text.as_bytes())?;
    Ok(())
}
