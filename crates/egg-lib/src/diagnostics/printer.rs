//! Rendering of analysis diagnostics.
//!
//! With source text attached, each diagnostic becomes an annotated
//! snippet (primary span plus any related spans) rendered through
//! annotate-snippets. Without it, rendering falls back to one
//! `severity: message` line per diagnostic.

use std::ops::Range;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity};

/// Builder for rendering a diagnostics collection.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    /// Attaches the grammar source the spans point into.
    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    /// Names the input in the snippet header.
    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let Some(source) = self.source else {
            return self
                .diagnostics
                .iter()
                .map(|diag| diag.to_string())
                .collect::<Vec<_>>()
                .join("\n");
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let mut out = String::new();
        for diag in self.diagnostics.iter() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&self.render_one(diag, source, &renderer));
        }
        out
    }

    fn render_one(
        &self,
        diag: &DiagnosticMessage,
        source: &'s str,
        renderer: &Renderer,
    ) -> String {
        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(caret_span(&diag.range, source.len()))
                .label(&diag.message),
        );
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        for related in &diag.related {
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(caret_span(&related.range, source.len()))
                    .label(&related.message),
            );
        }

        let title = match diag.severity {
            Severity::Error => Level::ERROR,
            Severity::Warning => Level::WARNING,
        };
        renderer
            .render(&[title.primary_title(&diag.message).element(snippet)])
            .to_string()
    }
}

/// Widens a zero-width span to one byte so the annotation has a column to
/// sit on.
fn caret_span(range: &Range<usize>, limit: usize) -> Range<usize> {
    if range.is_empty() {
        range.start..(range.start + 1).min(limit)
    } else {
        range.clone()
    }
}
