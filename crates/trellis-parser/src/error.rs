//! Diagnostic system for the Trellis parser and layout engine.
//!
//! Nothing in the pipeline fails on bad input. Problems are reported as
//! [`Diagnostic`]s carrying a severity, an [`ErrorCode`], labelled source
//! spans and optional help text, and the offending construct is skipped.
//!
//! # Example
//!
//! ```
//! # use trellis_parser::error::{Diagnostic, ErrorCode, Category};
//! # use trellis_parser::Span;
//!
//! let diag = Diagnostic::warning("node `S3` is declared more than once")
//!     .with_code(ErrorCode::W005)
//!     .with_label(Span::new(40..42), "duplicate declaration")
//!     .with_secondary_label(Span::new(4..6), "first declared here");
//!
//! assert_eq!(diag.category(), Some(Category::Syntax));
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::{Category, ErrorCode};
pub use label::Label;
pub use severity::Severity;
