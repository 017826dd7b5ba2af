//! Diagnostic message types.

use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A secondary span attached to a diagnostic.
#[derive(Debug, Clone)]
pub struct RelatedInfo {
    pub range: Range<usize>,
    pub message: String,
}

impl RelatedInfo {
    pub fn new(range: Range<usize>, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

/// One diagnostic: severity, primary span, message, related spans.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub severity: Severity,
    pub range: Range<usize>,
    pub message: String,
    pub related: Vec<RelatedInfo>,
}

impl DiagnosticMessage {
    pub fn new(severity: Severity, range: Range<usize>, message: impl Into<String>) -> Self {
        Self {
            severity,
            range,
            message: message.into(),
            related: Vec::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}
