//! Severity levels for diagnostics.

use std::fmt;

/// The severity level of a diagnostic.
///
/// The parser and layout engine only ever produce warnings; the input is
/// always turned into a usable graph. [`Severity::Error`] exists for outer
/// surfaces that escalate warnings, such as a strict command-line mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A problem that prevents the diagram from being accepted.
    Error,

    /// A non-fatal issue; the offending construct was skipped or repaired.
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}
