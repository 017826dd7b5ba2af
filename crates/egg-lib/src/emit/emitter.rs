//! The rule-function emitter.
//!
//! Emission is continuation-based: every matcher is written as statements
//! into the current block against an `on_fail` statement list that
//! restores the position and transfers control (a `return fail()` at rule
//! top level, a labeled `break` inside optional, repetition, choice and
//! negative-lookahead scopes). Success always falls through. Labeled
//! blocks give capture and bind variables exactly the lexical extent of
//! the branch that introduced them.

use std::fmt::Write;

use super::Config;
use crate::ast::{ClassRange, Grammar, Matcher, Rule};

pub struct Emitter<'g> {
    grammar: &'g Grammar,
    config: Config,
    output: String,
    indent: usize,
    next_id: u32,
}

impl<'g> Emitter<'g> {
    pub fn new(grammar: &'g Grammar, config: Config) -> Self {
        Self {
            grammar,
            config,
            output: String::new(),
            indent: 0,
            next_id: 0,
        }
    }

    /// Emits the whole generated file.
    pub fn emit(mut self) -> String {
        let grammar = self.grammar;
        let module_name = self.config.grammar_name.clone();

        self.line("// @generated by egg. Do not edit.");
        self.blank();
        self.line(
            "#![allow(non_snake_case, unused_imports, unused_labels, unused_mut, \
             unused_variables, unreachable_code)]",
        );
        self.blank();

        if !module_name.is_empty() {
            self.line(&format!("pub mod {} {{", module_name));
            self.indent += 1;
        }
        self.line("use egg_runtime::{Match, State, any, byte, fail, in_range, matched};");

        if let Some(pre) = &grammar.pre {
            self.blank();
            self.raw(pre);
        }

        for rule in grammar.rules.values() {
            self.blank();
            self.emit_rule(rule);
        }

        if let Some(post) = &grammar.post {
            self.blank();
            self.raw(post);
        }

        if !module_name.is_empty() {
            self.indent -= 1;
            self.line("}");
        }
        self.output
    }

    fn emit_rule(&mut self, rule: &Rule) {
        let ty = rule.ty.as_deref().unwrap_or("()");
        self.line(&format!(
            "pub fn {}(ps: &mut State<'_>) -> Match<{}> {{",
            rule.name, ty
        ));
        self.indent += 1;
        self.line("let psStart = ps.pos;");
        if rule.ty.is_some() {
            self.line(&format!("let mut {}: {} = Default::default();", rule.name, ty));
        }

        let on_fail = vec![
            "ps.pos = psStart;".to_string(),
            "return fail();".to_string(),
        ];
        self.emit_matcher(&rule.body, &on_fail);

        if rule.ty.is_some() {
            self.line(&format!("matched({})", rule.name));
        } else {
            self.line("matched(())");
        }
        self.indent -= 1;
        self.line("}");
    }

    fn emit_matcher(&mut self, m: &Matcher, on_fail: &[String]) {
        match m {
            Matcher::Empty => {}
            Matcher::Char(c) => {
                self.line(&format!("if !byte::<{}>(ps).is_match() {{", byte_literal(*c)));
                self.fail_block(on_fail);
            }
            Matcher::Str(bytes) => self.emit_str(bytes, on_fail),
            Matcher::Class(ranges) => self.emit_class(ranges, on_fail),
            Matcher::Any => {
                self.line("if !any(ps).is_match() {");
                self.fail_block(on_fail);
            }
            Matcher::Ref { name, binding } => self.emit_ref(name, binding.as_deref(), on_fail),
            Matcher::Action(text) => self.line(&format!("{{{}}}", text)),
            Matcher::Opt(inner) => self.emit_opt(inner),
            Matcher::Star(inner) => self.emit_star(inner),
            Matcher::Plus(inner) => self.emit_plus(inner, on_fail),
            Matcher::Seq(children) => self.emit_seq(children, on_fail),
            Matcher::Alt(branches) => self.emit_alt(branches, on_fail),
            Matcher::Look(inner) => self.emit_look(inner, on_fail),
            Matcher::Not(inner) => self.emit_not(inner, on_fail),
            Matcher::Capture(inner) => self.emit_capture(inner, on_fail),
        }
    }

    /// Sequential byte checks; the position advances only on a full match.
    fn emit_str(&mut self, bytes: &[u8], on_fail: &[String]) {
        if bytes.is_empty() {
            return;
        }
        let checks: Vec<String> = bytes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                if i == 0 {
                    format!("ps.at(ps.pos) == {}", byte_literal(c))
                } else {
                    format!("ps.at(ps.pos + {}) == {}", i, byte_literal(c))
                }
            })
            .collect();
        self.line(&format!("if {} {{", checks.join(" && ")));
        self.indent += 1;
        self.line(&format!("ps.pos += {};", bytes.len()));
        self.indent -= 1;
        self.line("} else {");
        self.fail_block(on_fail);
    }

    fn emit_class(&mut self, ranges: &[ClassRange], on_fail: &[String]) {
        match ranges {
            // The empty class matches nothing.
            [] => {
                for stmt in on_fail {
                    self.line(stmt);
                }
            }
            [r] if r.lo < r.hi => {
                self.line(&format!(
                    "if !in_range::<{}, {}>(ps).is_match() {{",
                    byte_literal(r.lo),
                    byte_literal(r.hi)
                ));
                self.fail_block(on_fail);
            }
            _ => {
                let c = self.fresh("psC");
                self.line(&format!("let {} = ps.at(ps.pos);", c));
                let tests: Vec<String> = ranges
                    .iter()
                    .map(|r| {
                        if r.lo == r.hi {
                            format!("{} == {}", c, byte_literal(r.lo))
                        } else {
                            format!(
                                "({} <= {c} && {c} <= {})",
                                byte_literal(r.lo),
                                byte_literal(r.hi)
                            )
                        }
                    })
                    .collect();
                self.line(&format!("if {} {{", tests.join(" || ")));
                self.indent += 1;
                self.line("ps.pos += 1;");
                self.indent -= 1;
                self.line("} else {");
                self.fail_block(on_fail);
            }
        }
    }

    /// Rule calls go through `self::` so a rule's value local (named after
    /// the rule) can never shadow the function it recurses into.
    fn emit_ref(&mut self, name: &str, binding: Option<&str>, on_fail: &[String]) {
        match binding {
            None => {
                self.line(&format!("if !self::{}(ps).is_match() {{", name));
                self.fail_block(on_fail);
            }
            Some(var) => {
                let val = self.fresh("psVal");
                self.line(&format!("let mut {} = Default::default();", var));
                self.line(&format!("match self::{}(ps) {{", name));
                self.indent += 1;
                self.line(&format!("Match::Matched({val}) => {var} = {val},"));
                self.line("Match::Failed => {");
                self.indent += 1;
                for stmt in on_fail {
                    self.line(stmt);
                }
                self.indent -= 1;
                self.line("}");
                self.indent -= 1;
                self.line("}");
            }
        }
    }

    fn emit_opt(&mut self, inner: &Matcher) {
        let label = self.fresh_label("opt");
        let save = self.fresh("psSave");
        self.line(&format!("{}: {{", label));
        self.indent += 1;
        self.line(&format!("let {} = ps.pos;", save));
        let on_fail = vec![
            format!("ps.pos = {};", save),
            format!("break {};", label),
        ];
        self.emit_matcher(inner, &on_fail);
        self.indent -= 1;
        self.line("}");
    }

    fn emit_star(&mut self, inner: &Matcher) {
        let label = self.fresh_label("rep");
        let save = self.fresh("psSave");
        self.line(&format!("{}: loop {{", label));
        self.indent += 1;
        self.line(&format!("let {} = ps.pos;", save));
        let on_fail = vec![
            format!("ps.pos = {};", save),
            format!("break {};", label),
        ];
        self.emit_matcher(inner, &on_fail);
        // A successful iteration that consumed nothing would loop forever.
        self.line(&format!("if ps.pos == {} {{", save));
        self.indent += 1;
        self.line(&format!("break {};", label));
        self.indent -= 1;
        self.line("}");
        self.indent -= 1;
        self.line("}");
    }

    /// One mandatory iteration of the loop body, then the loop.
    fn emit_plus(&mut self, inner: &Matcher, on_fail: &[String]) {
        self.emit_matcher(inner, on_fail);
        self.emit_star(inner);
    }

    fn emit_seq(&mut self, children: &[Matcher], on_fail: &[String]) {
        let save = self.fresh("psSave");
        self.line(&format!("let {} = ps.pos;", save));
        let mut child_fail = vec![format!("ps.pos = {};", save)];
        child_fail.extend(on_fail.iter().cloned());
        for child in children {
            self.emit_matcher(child, &child_fail);
        }
    }

    /// Each branch runs in its own labeled scope against the choice's entry
    /// position; the first success skips past the remaining branches.
    fn emit_alt(&mut self, branches: &[Matcher], on_fail: &[String]) {
        let label = self.fresh_label("alt");
        let save = self.fresh("psSave");
        self.line(&format!("{}: {{", label));
        self.indent += 1;
        self.line(&format!("let {} = ps.pos;", save));
        for (i, branch) in branches.iter().enumerate() {
            let branch_label = format!("{}_{}", label, i);
            self.line(&format!("{}: {{", branch_label));
            self.indent += 1;
            let branch_fail = vec![
                format!("ps.pos = {};", save),
                format!("break {};", branch_label),
            ];
            self.emit_matcher(branch, &branch_fail);
            self.line(&format!("break {};", label));
            self.indent -= 1;
            self.line("}");
        }
        self.line(&format!("ps.pos = {};", save));
        for stmt in on_fail {
            self.line(stmt);
        }
        self.indent -= 1;
        self.line("}");
    }

    /// Zero-width: the position is restored whether the inner matcher
    /// succeeds (lookahead holds) or fails (whole matcher fails).
    fn emit_look(&mut self, inner: &Matcher, on_fail: &[String]) {
        let save = self.fresh("psSave");
        self.line(&format!("let {} = ps.pos;", save));
        let mut inner_fail = vec![format!("ps.pos = {};", save)];
        inner_fail.extend(on_fail.iter().cloned());
        self.emit_matcher(inner, &inner_fail);
        self.line(&format!("ps.pos = {};", save));
    }

    /// Like positive lookahead with success and failure swapped.
    fn emit_not(&mut self, inner: &Matcher, on_fail: &[String]) {
        let label = self.fresh_label("not");
        let save = self.fresh("psSave");
        self.line(&format!("{}: {{", label));
        self.indent += 1;
        self.line(&format!("let {} = ps.pos;", save));
        let inner_fail = vec![
            format!("ps.pos = {};", save),
            format!("break {};", label),
        ];
        self.emit_matcher(inner, &inner_fail);
        self.line(&format!("ps.pos = {};", save));
        for stmt in on_fail {
            self.line(stmt);
        }
        self.indent -= 1;
        self.line("}");
    }

    /// `psCatch`/`psCatchLen`/`psCapture` stay visible to later siblings;
    /// the captured matcher runs in a block of its own so the names a
    /// nested capture introduces die before the trailing lines read
    /// `psCatch`.
    fn emit_capture(&mut self, inner: &Matcher, on_fail: &[String]) {
        self.line("let psCatch = ps.pos;");
        self.line("{");
        self.indent += 1;
        self.emit_matcher(inner, on_fail);
        self.indent -= 1;
        self.line("}");
        self.line("let psCatchLen = ps.pos - psCatch;");
        self.line("let psCapture = ps.string(psCatch, psCatchLen);");
    }

    /// Closes an `if ... {` header with the failure statements as its body.
    fn fail_block(&mut self, on_fail: &[String]) {
        self.indent += 1;
        for stmt in on_fail {
            self.line(stmt);
        }
        self.indent -= 1;
        self.line("}");
    }

    fn fresh(&mut self, prefix: &str) -> String {
        let id = self.next_id;
        self.next_id += 1;
        format!("{}{}", prefix, id)
    }

    fn fresh_label(&mut self, kind: &str) -> String {
        let id = self.next_id;
        self.next_id += 1;
        format!("'{}{}", kind, id)
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn blank(&mut self) {
        self.output.push('\n');
    }

    /// Verbatim block (`pre`/`post`), no reindentation.
    fn raw(&mut self, text: &str) {
        let _ = writeln!(self.output, "{}", text.trim_matches('\n'));
    }
}

/// Rust byte-literal text for `c`, readable where printable.
fn byte_literal(c: u8) -> String {
    match c {
        b'\n' => "b'\\n'".to_string(),
        b'\r' => "b'\\r'".to_string(),
        b'\t' => "b'\\t'".to_string(),
        b'\\' => "b'\\\\'".to_string(),
        b'\'' => "b'\\''".to_string(),
        0x20..=0x7e => format!("b'{}'", c as char),
        _ => format!("0x{:02x}", c),
    }
}
