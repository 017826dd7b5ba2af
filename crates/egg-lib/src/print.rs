//! Grammar pretty-printing in Egg surface syntax.
//!
//! The dual of the parser, used by the `--print` mode to show what a
//! grammar looks like after normalization. Parentheses appear only where
//! precedence demands them; literals are re-escaped so the output parses
//! back to an equivalent tree.

use crate::ast::{ClassRange, Grammar, Matcher, Rule};

/// Precedence contexts, loosest to tightest: a child whose own level is
/// below the context gets parenthesized.
const ALT: u8 = 0;
const SEQ: u8 = 1;
const UNARY: u8 = 2;
const ATOM: u8 = 3;

pub fn print(grammar: &Grammar) -> String {
    let mut out = String::new();
    if let Some(pre) = &grammar.pre {
        out.push('{');
        out.push_str(pre);
        out.push_str("}\n\n");
    }
    for rule in grammar.rules.values() {
        out.push_str(&print_rule(rule));
        out.push('\n');
    }
    if let Some(post) = &grammar.post {
        out.push_str("\n{");
        out.push_str(post);
        out.push_str("}\n");
    }
    out
}

fn print_rule(rule: &Rule) -> String {
    match &rule.ty {
        Some(ty) => format!("{} : {} = {}", rule.name, ty, render(&rule.body, ALT)),
        None => format!("{} = {}", rule.name, render(&rule.body, ALT)),
    }
}

fn level(m: &Matcher) -> u8 {
    match m {
        Matcher::Alt(branches) if branches.len() > 1 => ALT,
        Matcher::Seq(children) if children.len() > 1 => SEQ,
        Matcher::Alt(_) | Matcher::Seq(_) => ATOM,
        Matcher::Opt(_)
        | Matcher::Star(_)
        | Matcher::Plus(_)
        | Matcher::Look(_)
        | Matcher::Not(_) => UNARY,
        _ => ATOM,
    }
}

fn render(m: &Matcher, context: u8) -> String {
    let text = match m {
        Matcher::Char(c) => format!("'{}'", escape_char(*c, b'\'')),
        Matcher::Str(bytes) => {
            let inner: String = bytes.iter().map(|&c| escape_char(c, b'"')).collect();
            format!("\"{}\"", inner)
        }
        Matcher::Class(ranges) => {
            let inner: String = ranges.iter().map(render_class_range).collect();
            format!("[{}]", inner)
        }
        Matcher::Ref { name, binding } => match binding {
            Some(var) => format!("{}:{}", name, var),
            None => name.clone(),
        },
        Matcher::Any => ".".to_string(),
        Matcher::Empty => ";".to_string(),
        Matcher::Action(text) => format!("{{{}}}", text),
        Matcher::Opt(inner) => format!("{}?", render(inner, ATOM)),
        Matcher::Star(inner) => format!("{}*", render(inner, ATOM)),
        Matcher::Plus(inner) => format!("{}+", render(inner, ATOM)),
        Matcher::Look(inner) => format!("&{}", render(inner, ATOM)),
        Matcher::Not(inner) => format!("!{}", render(inner, ATOM)),
        Matcher::Capture(inner) => format!("< {} >", render(inner, ALT)),
        Matcher::Seq(children) => children
            .iter()
            .map(|c| render(c, UNARY))
            .collect::<Vec<_>>()
            .join(" "),
        Matcher::Alt(branches) => branches
            .iter()
            .map(|b| render(b, SEQ))
            .collect::<Vec<_>>()
            .join(" | "),
    };
    if level(m) < context {
        format!("( {} )", text)
    } else {
        text
    }
}

fn render_class_range(r: &ClassRange) -> String {
    if r.lo == r.hi {
        // A lone `-` would read as a range separator; spell it as the
        // one-element range `---`.
        if r.lo == b'-' {
            "---".to_string()
        } else {
            escape_char(r.lo, b']')
        }
    } else {
        format!(
            "{}-{}",
            escape_char(r.lo, b']'),
            escape_char(r.hi, b']')
        )
    }
}

/// Escapes `c` for a literal delimited by `delim`.
fn escape_char(c: u8, delim: u8) -> String {
    match c {
        b'\n' => "\\n".to_string(),
        b'\r' => "\\r".to_string(),
        b'\t' => "\\t".to_string(),
        b'\\' => "\\\\".to_string(),
        b'[' if delim == b']' => "\\[".to_string(),
        b']' if delim == b']' => "\\]".to_string(),
        _ if c == delim => format!("\\{}", delim as char),
        _ => (c as char).to_string(),
    }
}
