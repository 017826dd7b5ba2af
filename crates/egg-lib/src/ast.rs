//! Grammar tree.
//!
//! Matchers form an owned tree; rules refer to each other by name through
//! the grammar's rule index, never by pointer. Construction happens in the
//! parser, rewriting in the normalizer, and everything downstream walks the
//! tree read-only.

use indexmap::IndexMap;
use serde::Serialize;

/// One byte interval of a character class; single characters have `lo == hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassRange {
    pub lo: u8,
    pub hi: u8,
}

impl ClassRange {
    pub fn new(lo: u8, hi: u8) -> Self {
        Self { lo, hi }
    }

    pub fn single(c: u8) -> Self {
        Self { lo: c, hi: c }
    }
}

/// A node of the grammar tree.
///
/// `Class` carries its intervals in insertion order and matches their
/// union; an empty `Class` matches nothing and is the canonical
/// always-fail matcher. `Action` is not a matcher in the parsing sense:
/// it holds verbatim target-language text emitted at its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Matcher {
    /// Match one byte exactly.
    Char(u8),
    /// Match a byte string, byte for byte.
    Str(Vec<u8>),
    /// Match one byte in the union of intervals.
    Class(Vec<ClassRange>),
    /// Invoke a named rule, optionally binding its value.
    Ref {
        name: String,
        binding: Option<String>,
    },
    /// Match any one byte except end of input.
    Any,
    /// Match without consuming.
    Empty,
    /// Verbatim semantic action text.
    Action(String),
    /// Zero or one.
    Opt(Box<Matcher>),
    /// Zero or more, greedy.
    Star(Box<Matcher>),
    /// One or more, greedy.
    Plus(Box<Matcher>),
    /// Concatenation.
    Seq(Vec<Matcher>),
    /// Ordered choice.
    Alt(Vec<Matcher>),
    /// Positive lookahead; zero-width.
    Look(Box<Matcher>),
    /// Negative lookahead; zero-width.
    Not(Box<Matcher>),
    /// Capture the matched substring for surrounding actions.
    Capture(Box<Matcher>),
}

impl Matcher {
    pub fn opt(inner: Matcher) -> Matcher {
        Matcher::Opt(Box::new(inner))
    }

    pub fn star(inner: Matcher) -> Matcher {
        Matcher::Star(Box::new(inner))
    }

    pub fn plus(inner: Matcher) -> Matcher {
        Matcher::Plus(Box::new(inner))
    }

    pub fn look(inner: Matcher) -> Matcher {
        Matcher::Look(Box::new(inner))
    }

    pub fn not(inner: Matcher) -> Matcher {
        Matcher::Not(Box::new(inner))
    }

    pub fn capture(inner: Matcher) -> Matcher {
        Matcher::Capture(Box::new(inner))
    }

    pub fn reference(name: impl Into<String>) -> Matcher {
        Matcher::Ref {
            name: name.into(),
            binding: None,
        }
    }
}

/// A named, optionally typed matcher. `ty` is a verbatim target-language
/// type expression; `None` means the rule returns the unit value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub name: String,
    pub ty: Option<String>,
    pub body: Matcher,
}

/// An ordered set of rules plus the verbatim `pre`/`post` blocks emitted
/// around the generated code.
///
/// The index map is both the rule order and the name index. Inserting a
/// duplicate name replaces the body but keeps the original position; the
/// analysis pass rejects duplicates before anything downstream runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Grammar {
    pub rules: IndexMap<String, Rule>,
    pub pre: Option<String>,
    pub post: Option<String>,
}

impl Grammar {
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.insert(rule.name.clone(), rule);
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }
}
