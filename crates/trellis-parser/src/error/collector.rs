//! Collector for accumulating diagnostics while a stage runs.

use crate::error::Diagnostic;

/// Accumulates diagnostics so a stage can keep going after a problem.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        log::debug!(diagnostic:% = diagnostic; "Diagnostic emitted");
        self.diagnostics.push(diagnostic);
    }

    /// Moves all diagnostics of `other` into this collector.
    pub fn extend(&mut self, other: DiagnosticCollector) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Returns `true` if any collected diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity().is_error())
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Finish collection and return the diagnostics in emission order.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
