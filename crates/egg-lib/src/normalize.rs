//! Grammar tree canonicalization.
//!
//! A single bottom-up rewriter. Each node is reduced to a fixpoint after
//! its children have been rewritten: sequences and alternations flatten,
//! adjacent literal text in a sequence fuses into one string, adjacent
//! character alternatives fuse into one class, and trivial identities
//! disappear. PEG semantics — choice order, greediness, failure points —
//! are preserved, and actions stay anchored between their neighbors.

use crate::ast::{ClassRange, Grammar, Matcher};

/// Rewrites every rule body in place.
pub fn normalize(grammar: &mut Grammar) {
    for rule in grammar.rules.values_mut() {
        let body = std::mem::replace(&mut rule.body, Matcher::Empty);
        rule.body = normalize_matcher(body);
    }
}

/// Rewrites one matcher tree, bottom-up.
pub fn normalize_matcher(m: Matcher) -> Matcher {
    let m = match m {
        Matcher::Opt(inner) => Matcher::opt(normalize_matcher(*inner)),
        Matcher::Star(inner) => Matcher::star(normalize_matcher(*inner)),
        Matcher::Plus(inner) => Matcher::plus(normalize_matcher(*inner)),
        Matcher::Look(inner) => Matcher::look(normalize_matcher(*inner)),
        Matcher::Not(inner) => Matcher::not(normalize_matcher(*inner)),
        Matcher::Capture(inner) => Matcher::capture(normalize_matcher(*inner)),
        Matcher::Seq(children) => {
            Matcher::Seq(children.into_iter().map(normalize_matcher).collect())
        }
        Matcher::Alt(children) => {
            Matcher::Alt(children.into_iter().map(normalize_matcher).collect())
        }
        leaf => leaf,
    };
    reduce(m)
}

/// Applies the local rewrites until nothing changes.
fn reduce(mut m: Matcher) -> Matcher {
    loop {
        let (next, changed) = step(m);
        m = next;
        if !changed {
            return m;
        }
    }
}

fn step(m: Matcher) -> (Matcher, bool) {
    match m {
        Matcher::Str(s) if s.is_empty() => (Matcher::Empty, true),

        Matcher::Opt(inner) if *inner == Matcher::Empty => (Matcher::Empty, true),
        Matcher::Star(inner) if *inner == Matcher::Empty => (Matcher::Empty, true),
        Matcher::Plus(inner) if *inner == Matcher::Empty => (Matcher::Empty, true),
        Matcher::Look(inner) if *inner == Matcher::Empty => (Matcher::Empty, true),
        // The variant table has no dedicated always-fail tag; the empty
        // class matches nothing and plays that role.
        Matcher::Not(inner) if *inner == Matcher::Empty => (Matcher::Class(Vec::new()), true),

        Matcher::Seq(children) => {
            let (children, spliced) = splice(children, as_seq);
            let (mut children, merged) = merge_text(children);
            match children.len() {
                0 => (Matcher::Empty, true),
                1 => (children.remove(0), true),
                _ => (Matcher::Seq(children), spliced || merged),
            }
        }

        Matcher::Alt(children) => {
            let (children, spliced) = splice(children, as_alt);
            let (mut children, merged) = merge_classes(children);
            match children.len() {
                0 => (Matcher::Empty, true),
                1 => (children.remove(0), true),
                _ => (Matcher::Alt(children), spliced || merged),
            }
        }

        other => (other, false),
    }
}

fn as_seq(m: Matcher) -> Result<Vec<Matcher>, Matcher> {
    match m {
        Matcher::Seq(children) => Ok(children),
        other => Err(other),
    }
}

fn as_alt(m: Matcher) -> Result<Vec<Matcher>, Matcher> {
    match m {
        Matcher::Alt(children) => Ok(children),
        other => Err(other),
    }
}

/// Replaces each child of the same shape by its grandchildren, in place.
fn splice(
    children: Vec<Matcher>,
    unwrap: fn(Matcher) -> Result<Vec<Matcher>, Matcher>,
) -> (Vec<Matcher>, bool) {
    let mut out = Vec::with_capacity(children.len());
    let mut changed = false;
    for child in children {
        match unwrap(child) {
            Ok(grandchildren) => {
                changed = true;
                out.extend(grandchildren);
            }
            Err(other) => out.push(other),
        }
    }
    (out, changed)
}

/// Fuses neighboring `Char`/`Str` children of a sequence into one `Str`.
/// Anything else (actions, references, subtrees) is an anchor nothing
/// merges across.
fn merge_text(children: Vec<Matcher>) -> (Vec<Matcher>, bool) {
    let mut out: Vec<Matcher> = Vec::with_capacity(children.len());
    let mut changed = false;
    for child in children {
        if is_text(&child) && out.last().is_some_and(is_text) {
            let prev = out.pop().unwrap_or(Matcher::Empty);
            let mut bytes = text_bytes(prev);
            bytes.extend(text_bytes(child));
            out.push(Matcher::Str(bytes));
            changed = true;
        } else {
            out.push(child);
        }
    }
    (out, changed)
}

fn is_text(m: &Matcher) -> bool {
    matches!(m, Matcher::Char(_) | Matcher::Str(_))
}

fn text_bytes(m: Matcher) -> Vec<u8> {
    match m {
        Matcher::Char(c) => vec![c],
        Matcher::Str(s) => s,
        _ => Vec::new(),
    }
}

/// Fuses neighboring `Char`/`Class` alternatives into one `Class` holding
/// their union: insertion order is preserved, overlapping or touching
/// intervals combine.
fn merge_classes(children: Vec<Matcher>) -> (Vec<Matcher>, bool) {
    let mut out: Vec<Matcher> = Vec::with_capacity(children.len());
    let mut changed = false;
    for child in children {
        if is_class_like(&child) && out.last().is_some_and(is_class_like) {
            let prev = out.pop().unwrap_or(Matcher::Empty);
            let mut ranges = class_ranges(prev);
            for r in class_ranges(child) {
                add_range(&mut ranges, r);
            }
            out.push(Matcher::Class(ranges));
            changed = true;
        } else {
            out.push(child);
        }
    }
    (out, changed)
}

fn is_class_like(m: &Matcher) -> bool {
    matches!(m, Matcher::Char(_) | Matcher::Class(_))
}

fn class_ranges(m: Matcher) -> Vec<ClassRange> {
    match m {
        Matcher::Char(c) => vec![ClassRange::single(c)],
        Matcher::Class(ranges) => ranges,
        _ => Vec::new(),
    }
}

fn add_range(ranges: &mut Vec<ClassRange>, r: ClassRange) {
    for existing in ranges.iter_mut() {
        if touches(*existing, r) {
            existing.lo = existing.lo.min(r.lo);
            existing.hi = existing.hi.max(r.hi);
            return;
        }
    }
    ranges.push(r);
}

fn touches(a: ClassRange, b: ClassRange) -> bool {
    a.lo <= b.hi.saturating_add(1) && b.lo <= a.hi.saturating_add(1)
}
