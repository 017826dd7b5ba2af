//! Productions of the Egg surface grammar.
//!
//! One `p_*` function per production. Every function either consumes the
//! construct and returns `Matched`, or restores `ps.pos` to where it was
//! called and returns `Failed`.

use egg_runtime::Match::{Failed, Matched};
use egg_runtime::{Match, State, byte, fail, matched};

use super::{NameSpan, ParseOutput};
use crate::ast::{ClassRange, Grammar, Matcher, Rule};

pub(super) struct Parser<'i, 's> {
    ps: &'s mut State<'i>,
    rule_spans: Vec<NameSpan>,
    ref_spans: Vec<NameSpan>,
}

impl<'i, 's> Parser<'i, 's> {
    pub(super) fn new(ps: &'s mut State<'i>) -> Self {
        Self {
            ps,
            rule_spans: Vec::new(),
            ref_spans: Vec::new(),
        }
    }

    pub(super) fn run(mut self) -> Option<ParseOutput> {
        match self.p_grammar() {
            Matched(grammar) => Some(ParseOutput {
                grammar,
                rule_spans: self.rule_spans,
                ref_spans: self.ref_spans,
            }),
            Failed => None,
        }
    }

    /// `grammar := _ action? _ (rule _)+ action? _ EOF`
    ///
    /// The leading action is the `pre` block, the trailing one the `post`
    /// block. A trailing action reachable as a term of the last rule's body
    /// binds to that rule instead; this is a property of the surface
    /// language, not of this parser.
    fn p_grammar(&mut self) -> Match<Grammar> {
        let mut grammar = Grammar::default();

        self.skip_ws();
        grammar.pre = self.p_action().value();
        self.skip_ws();

        match self.p_rule() {
            Matched(rule) => grammar.add_rule(rule),
            Failed => return fail(),
        }
        loop {
            let save = self.ps.pos;
            self.skip_ws();
            match self.p_rule() {
                Matched(rule) => grammar.add_rule(rule),
                Failed => {
                    self.ps.pos = save;
                    break;
                }
            }
        }

        self.skip_ws();
        grammar.post = self.p_action().value();
        self.skip_ws();

        if self.ps.at(self.ps.pos) != 0 {
            return fail();
        }
        matched(grammar)
    }

    /// `rule := ident _ (':' type)? '=' _ alt` — the type is everything
    /// between the `:` and the `=`, trimmed, taken verbatim.
    fn p_rule(&mut self) -> Match<Rule> {
        let start = self.ps.pos;
        let Matched(name) = self.p_ident() else {
            return fail();
        };
        let name_end = self.ps.pos;

        self.skip_ws();
        let mut ty = None;
        if byte::<b':'>(self.ps).is_match() {
            let ty_start = self.ps.pos;
            loop {
                match self.ps.at(self.ps.pos) {
                    b'=' => break,
                    0 => {
                        self.ps.pos = start;
                        return fail();
                    }
                    _ => self.ps.pos += 1,
                }
            }
            let text = self.ps.string(ty_start, self.ps.pos - ty_start);
            ty = Some(text.trim().to_string());
        }

        if !byte::<b'='>(self.ps).is_match() {
            self.ps.pos = start;
            return fail();
        }
        self.skip_ws();

        let Matched(body) = self.p_alt() else {
            self.ps.pos = start;
            return fail();
        };

        self.rule_spans.push(NameSpan {
            name: name.clone(),
            span: start..name_end,
        });
        matched(Rule { name, ty, body })
    }

    /// `alt := seq (_ '|' _ seq)*` — a singleton collapses to its branch.
    fn p_alt(&mut self) -> Match<Matcher> {
        let Matched(first) = self.p_seq() else {
            return fail();
        };
        let mut branches = vec![first];
        loop {
            let save = self.ps.pos;
            self.skip_ws();
            if !byte::<b'|'>(self.ps).is_match() {
                self.ps.pos = save;
                break;
            }
            self.skip_ws();
            match self.p_seq() {
                Matched(branch) => branches.push(branch),
                Failed => {
                    self.ps.pos = save;
                    break;
                }
            }
        }
        matched(if branches.len() == 1 {
            branches.remove(0)
        } else {
            Matcher::Alt(branches)
        })
    }

    /// `seq := term (_ term)*` — a singleton collapses to its term. The
    /// sequence stops before anything that starts the next rule definition.
    fn p_seq(&mut self) -> Match<Matcher> {
        let Matched(first) = self.p_term() else {
            return fail();
        };
        let mut terms = vec![first];
        loop {
            let save = self.ps.pos;
            self.skip_ws();
            if self.at_rule_start() {
                self.ps.pos = save;
                break;
            }
            match self.p_term() {
                Matched(term) => terms.push(term),
                Failed => {
                    self.ps.pos = save;
                    break;
                }
            }
        }
        matched(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Matcher::Seq(terms)
        })
    }

    /// Lookahead for `ident _ (':' <single-line type>)? '='`. Pure: the
    /// position is restored regardless of the answer.
    fn at_rule_start(&mut self) -> bool {
        let save = self.ps.pos;
        let answer = self.rule_header_ahead();
        self.ps.pos = save;
        answer
    }

    fn rule_header_ahead(&mut self) -> bool {
        if !self.p_ident().is_match() {
            return false;
        }
        self.skip_ws();
        if byte::<b':'>(self.ps).is_match() {
            loop {
                match self.ps.at(self.ps.pos) {
                    b'=' => return true,
                    b'\n' | 0 => return false,
                    _ => self.ps.pos += 1,
                }
            }
        }
        self.ps.at(self.ps.pos) == b'='
    }

    /// `term := prefix unary`, `prefix := '&' _ | '!' _ | ε`
    fn p_term(&mut self) -> Match<Matcher> {
        let save = self.ps.pos;
        if byte::<b'&'>(self.ps).is_match() {
            self.skip_ws();
            return match self.p_unary() {
                Matched(inner) => matched(Matcher::look(inner)),
                Failed => {
                    self.ps.pos = save;
                    fail()
                }
            };
        }
        if byte::<b'!'>(self.ps).is_match() {
            self.skip_ws();
            return match self.p_unary() {
                Matched(inner) => matched(Matcher::not(inner)),
                Failed => {
                    self.ps.pos = save;
                    fail()
                }
            };
        }
        self.p_unary()
    }

    /// `unary := atom ('?' | '*' | '+' | ε)` — the suffix binds tightly,
    /// with no whitespace between atom and suffix.
    fn p_unary(&mut self) -> Match<Matcher> {
        let Matched(atom) = self.p_atom() else {
            return fail();
        };
        matched(match self.ps.at(self.ps.pos) {
            b'?' => {
                self.ps.pos += 1;
                Matcher::opt(atom)
            }
            b'*' => {
                self.ps.pos += 1;
                Matcher::star(atom)
            }
            b'+' => {
                self.ps.pos += 1;
                Matcher::plus(atom)
            }
            _ => atom,
        })
    }

    fn p_atom(&mut self) -> Match<Matcher> {
        match self.ps.at(self.ps.pos) {
            b'(' => self.p_group(),
            b'<' => self.p_capture(),
            b'{' => match self.p_action() {
                Matched(text) => matched(Matcher::Action(text)),
                Failed => fail(),
            },
            b'\'' => self.p_char_lit(),
            b'"' => self.p_str_lit(),
            b'[' => self.p_char_class(),
            b'.' => {
                self.ps.pos += 1;
                matched(Matcher::Any)
            }
            b';' => {
                self.ps.pos += 1;
                matched(Matcher::Empty)
            }
            _ => self.p_rule_ref(),
        }
    }

    fn p_group(&mut self) -> Match<Matcher> {
        let save = self.ps.pos;
        if !byte::<b'('>(self.ps).is_match() {
            return fail();
        }
        self.skip_ws();
        let Matched(inner) = self.p_alt() else {
            self.ps.pos = save;
            return fail();
        };
        self.skip_ws();
        if !byte::<b')'>(self.ps).is_match() {
            self.ps.pos = save;
            return fail();
        }
        matched(inner)
    }

    /// `capture := '<' _ alt _ '>'`
    fn p_capture(&mut self) -> Match<Matcher> {
        let save = self.ps.pos;
        if !byte::<b'<'>(self.ps).is_match() {
            return fail();
        }
        self.skip_ws();
        let Matched(inner) = self.p_alt() else {
            self.ps.pos = save;
            return fail();
        };
        self.skip_ws();
        if !byte::<b'>'>(self.ps).is_match() {
            self.ps.pos = save;
            return fail();
        }
        matched(Matcher::capture(inner))
    }

    /// `action := '{' balanced_braces '}'` — the text between the outer
    /// braces, verbatim. Braces inside target-language string literals are
    /// still counted (inherited limitation).
    fn p_action(&mut self) -> Match<String> {
        let save = self.ps.pos;
        if !byte::<b'{'>(self.ps).is_match() {
            return fail();
        }
        let start = self.ps.pos;
        let mut depth = 1usize;
        loop {
            match self.ps.at(self.ps.pos) {
                0 => {
                    self.ps.pos = save;
                    return fail();
                }
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            self.ps.pos += 1;
        }
        let text = self.ps.string(start, self.ps.pos - start);
        self.ps.pos += 1;
        matched(text)
    }

    /// `rule_ref := ident (':' _ ident)?` — the second ident binds the
    /// rule's value. The colon must follow the name immediately, which is
    /// what keeps references distinct from a typed rule header.
    fn p_rule_ref(&mut self) -> Match<Matcher> {
        let start = self.ps.pos;
        let Matched(name) = self.p_ident() else {
            return fail();
        };
        let name_end = self.ps.pos;

        let mut binding = None;
        if byte::<b':'>(self.ps).is_match() {
            self.skip_ws();
            match self.p_ident() {
                Matched(var) => binding = Some(var),
                Failed => self.ps.pos = name_end,
            }
        }

        self.ref_spans.push(NameSpan {
            name: name.clone(),
            span: start..name_end,
        });
        matched(Matcher::Ref { name, binding })
    }

    fn p_char_lit(&mut self) -> Match<Matcher> {
        let save = self.ps.pos;
        if !byte::<b'\''>(self.ps).is_match() {
            return fail();
        }
        let Matched(c) = self.p_char(b'\'') else {
            self.ps.pos = save;
            return fail();
        };
        if !byte::<b'\''>(self.ps).is_match() {
            self.ps.pos = save;
            return fail();
        }
        matched(Matcher::Char(c))
    }

    fn p_str_lit(&mut self) -> Match<Matcher> {
        let save = self.ps.pos;
        if !byte::<b'"'>(self.ps).is_match() {
            return fail();
        }
        let mut bytes = Vec::new();
        loop {
            if byte::<b'"'>(self.ps).is_match() {
                return matched(Matcher::Str(bytes));
            }
            match self.p_char(b'"') {
                Matched(c) => bytes.push(c),
                Failed => {
                    self.ps.pos = save;
                    return fail();
                }
            }
        }
    }

    /// `char_class := '[' (char ('-' char)?)* ']'` — `[]` is legal and
    /// matches nothing.
    fn p_char_class(&mut self) -> Match<Matcher> {
        let save = self.ps.pos;
        if !byte::<b'['>(self.ps).is_match() {
            return fail();
        }
        let mut ranges = Vec::new();
        loop {
            if byte::<b']'>(self.ps).is_match() {
                return matched(Matcher::Class(ranges));
            }
            let Matched(lo) = self.p_char(b']') else {
                self.ps.pos = save;
                return fail();
            };
            if byte::<b'-'>(self.ps).is_match() {
                let Matched(hi) = self.p_char(b']') else {
                    self.ps.pos = save;
                    return fail();
                };
                ranges.push(ClassRange::new(lo, hi));
            } else {
                ranges.push(ClassRange::single(lo));
            }
        }
    }

    /// `char := escape | any byte except the active delimiter / '\'`
    fn p_char(&mut self, delim: u8) -> Match<u8> {
        let c = self.ps.at(self.ps.pos);
        if c == b'\\' {
            let decoded = match self.ps.at(self.ps.pos + 1) {
                b'n' => b'\n',
                b'r' => b'\r',
                b't' => b'\t',
                b'\'' => b'\'',
                b'"' => b'"',
                b'\\' => b'\\',
                b'[' => b'[',
                b']' => b']',
                _ => return fail(),
            };
            self.ps.pos += 2;
            return matched(decoded);
        }
        if c == 0 || c == delim {
            return fail();
        }
        self.ps.pos += 1;
        matched(c)
    }

    /// `ident := [A-Za-z_][A-Za-z_0-9]*`
    fn p_ident(&mut self) -> Match<String> {
        let start = self.ps.pos;
        let c = self.ps.at(start);
        if !(c.is_ascii_alphabetic() || c == b'_') {
            return fail();
        }
        self.ps.pos += 1;
        loop {
            let c = self.ps.at(self.ps.pos);
            if c.is_ascii_alphanumeric() || c == b'_' {
                self.ps.pos += 1;
            } else {
                break;
            }
        }
        matched(self.ps.string(start, self.ps.pos - start))
    }

    /// `_ := (space | tab | newline | '#' ... newline)*`
    fn skip_ws(&mut self) {
        loop {
            match self.ps.at(self.ps.pos) {
                b' ' | b'\t' | b'\n' => self.ps.pos += 1,
                b'#' => {
                    self.ps.pos += 1;
                    loop {
                        match self.ps.at(self.ps.pos) {
                            0 => break,
                            b'\n' => {
                                self.ps.pos += 1;
                                break;
                            }
                            _ => self.ps.pos += 1,
                        }
                    }
                }
                _ => break,
            }
        }
    }
}
