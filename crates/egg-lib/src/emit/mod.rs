//! Code generation.
//!
//! Walks a grammar tree and emits a standalone Rust module implementing it
//! as a recursive-descent PEG parser over `egg-runtime`. One `pub fn` per
//! rule, named after the rule, with signature
//! `fn(&mut State<'_>) -> Match<T>`.

mod emitter;


pub use emitter::Emitter;

/// Configuration for code emission.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Module the generated rules are wrapped in; empty emits them at the
    /// top level of the file.
    pub grammar_name: String,
}

/// Emits the generated parser for `grammar` as Rust source text.
pub fn emit(grammar: &crate::ast::Grammar, config: Config) -> String {
    Emitter::new(grammar, config).emit()
}
