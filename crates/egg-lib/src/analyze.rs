//! Post-parse checks: duplicate rule names and unresolved references.
//!
//! Runs on the span side-tables the parser collected, before the
//! normalizer or emitter see the grammar. Anything reported here aborts
//! the pipeline; generating code for an unresolved reference would only
//! move the failure into the generated parser's build.

use indexmap::IndexMap;

use crate::ast::Grammar;
use crate::diagnostics::Diagnostics;
use crate::parser::{NameSpan, ParseOutput};

pub fn check(parsed: &ParseOutput) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    check_duplicates(&parsed.rule_spans, &mut diagnostics);
    check_references(&parsed.grammar, &parsed.ref_spans, &mut diagnostics);
    diagnostics
}

fn check_duplicates(rule_spans: &[NameSpan], diagnostics: &mut Diagnostics) {
    let mut first_seen: IndexMap<&str, std::ops::Range<usize>> = IndexMap::new();
    for site in rule_spans {
        match first_seen.get(site.name.as_str()) {
            Some(original) => {
                diagnostics
                    .error(
                        format!("rule `{}` is defined more than once", site.name),
                        site.span.clone(),
                    )
                    .related_to(
                        format!("`{}` first defined here", site.name),
                        original.clone(),
                    )
                    .emit();
            }
            None => {
                first_seen.insert(site.name.as_str(), site.span.clone());
            }
        }
    }
}

fn check_references(grammar: &Grammar, ref_spans: &[NameSpan], diagnostics: &mut Diagnostics) {
    for site in ref_spans {
        if grammar.rule(&site.name).is_none() {
            diagnostics
                .error(
                    format!("reference to undefined rule `{}`", site.name),
                    site.span.clone(),
                )
                .emit();
        }
    }
}
