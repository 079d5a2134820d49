//! Generic diagnostic building blocks, shared by any sink that needs
//! to accumulate "something happened at this location" records.
//!
//! Grounded in `faxc_util::diagnostic` (`Level`, `Diagnostic`,
//! `DiagnosticBuilder`). MiniC's own error-code registry and sticky
//! "passed" flag live in `minic_sem::diagnostics`, one layer up, since
//! those are domain-specific; this module only supplies the reusable
//! shape.

use crate::span::Span;
use std::fmt;

/// Severity of a recorded diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Log,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Log => write!(f, "log"),
        }
    }
}

/// One recorded diagnostic: a severity, an optional numeric code, a
/// location, and a message. `code` is `None` for trace-style log
/// entries, which have no error-code registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub code: Option<u32>,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn error(code: u32, span: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            level: Level::Error,
            code: Some(code),
            span,
            message: message.into(),
        }
    }

    pub fn log(span: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            level: Level::Log,
            code: None,
            span,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.level, self.code) {
            (Level::Error, Some(code)) => {
                write!(
                    f,
                    "Error type {} at Line {}: {}.",
                    code, self.span.line, self.message
                )
            }
            _ => write!(f, "semantics log at Line {}: {}", self.span.line, self.message),
        }
    }
}

/// Fluent constructor for a [`Diagnostic`], mirroring the donor's
/// `DiagnosticBuilder` chaining style.
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    pub fn error(code: u32, span: Span, message: impl Into<String>) -> Self {
        DiagnosticBuilder {
            diagnostic: Diagnostic::error(code, span, message),
        }
    }

    pub fn log(span: Span, message: impl Into<String>) -> Self {
        DiagnosticBuilder {
            diagnostic: Diagnostic::log(span, message),
        }
    }

    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_matches_original_format() {
        let d = Diagnostic::error(1, Span::new(3), "No def var: a");
        assert_eq!(d.to_string(), "Error type 1 at Line 3: No def var: a.");
    }

    #[test]
    fn log_display_matches_original_format() {
        let d = Diagnostic::log(Span::new(5), "Exp");
        assert_eq!(d.to_string(), "semantics log at Line 5: Exp");
    }

    #[test]
    fn builder_produces_equivalent_diagnostic() {
        let built = DiagnosticBuilder::error(7, Span::new(1), "op type not match").build();
        let direct = Diagnostic::error(7, Span::new(1), "op type not match");
        assert_eq!(built, direct);
    }
}
