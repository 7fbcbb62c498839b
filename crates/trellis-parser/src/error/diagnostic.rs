//! The core diagnostic type.
//!
//! A [`Diagnostic`] represents a single warning (or escalated error) with an
//! optional code, labeled source spans, and help text.

use std::fmt;

use trellis_core::span::Span;

use crate::error::{Category, ErrorCode, Label, Severity};

/// A diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// warning[W006]: connection endpoint `Backend` is not declared
///   --> diagram.tls:3:7
///    |
///  3 | S3 -> Backend
///    |       ^^^^^^^ unknown node
///    |
///    = help: declare `Backend` or fix the spelling
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use trellis_parser::error::{Diagnostic, ErrorCode};
    /// # use trellis_parser::Span;
    ///
    /// let diag = Diagnostic::warning("unmatched `}`")
    ///     .with_code(ErrorCode::W003)
    ///     .with_label(Span::new(10..11), "no open container")
    ///     .with_help("remove the extra brace");
    /// assert!(diag.severity().is_warning());
    /// ```
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Family of the diagnostic, derived from its code.
    pub fn category(&self) -> Option<Category> {
        self.code.map(|code| code.category())
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Returns the first primary label's span, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Returns the same diagnostic with its severity raised to an error.
    pub fn into_error(mut self) -> Self {
        self.severity = Severity::Error;
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "warning[W001]: message" or "warning: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(Severity::Warning, "test warning");

        assert!(diag.severity().is_warning());
        assert_eq!(diag.message(), "test warning");
        assert!(diag.code().is_none());
        assert!(diag.category().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_labels() {
        let diag = Diagnostic::warning("node declared twice")
            .with_code(ErrorCode::W005)
            .with_secondary_label(Span::new(0..2), "first declared here")
            .with_label(Span::new(10..12), "duplicate");

        assert_eq!(diag.labels().len(), 2);
        assert_eq!(diag.primary_span(), Some(Span::new(10..12)));
    }

    #[test]
    fn test_diagnostic_display_with_code() {
        let diag = Diagnostic::warning("unmatched `}`").with_code(ErrorCode::W003);
        assert_eq!(diag.to_string(), "warning[W003]: unmatched `}`");
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        let diag = Diagnostic::error("strict mode");
        assert_eq!(diag.to_string(), "error: strict mode");
    }

    #[test]
    fn test_into_error() {
        let diag = Diagnostic::warning("cycle")
            .with_code(ErrorCode::W100)
            .into_error();
        assert!(diag.severity().is_error());
        assert_eq!(diag.category(), Some(Category::Structural));
        assert_eq!(diag.to_string(), "error[W100]: cycle");
    }
}
