//! Error types for Trellis operations.
//!
//! Parsing and layout never fail on diagram input; their problems are
//! returned as diagnostics. [`TrellisError`] covers the outer surfaces:
//! files, configuration, strict-mode rejection and export.

use std::io;

use thiserror::Error;

use trellis_parser::error::Diagnostic;

/// The main error type for Trellis operations.
///
/// # Diagnostic Variants
///
/// The `Strict` variant carries the diagnostics that caused the rejection
/// together with the source text, so callers can render them with source
/// snippets.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{} diagnostic(s) reported in strict mode", diagnostics.len())]
    Strict {
        diagnostics: Vec<Diagnostic>,
        src: String,
    },

    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),
}

impl TrellisError {
    /// Create a new `Strict` error with the associated source code.
    pub fn new_strict_error(diagnostics: Vec<Diagnostic>, src: impl Into<String>) -> Self {
        Self::Strict {
            diagnostics,
            src: src.into(),
        }
    }
}
