//! # Trellis Parser
//!
//! Parser for the Trellis diagram language: labelled nodes with bracketed
//! property lists, brace-delimited containers and `->`/`<->` connections.
//!
//! Parsing never fails. Anything the parser cannot make sense of is reported
//! as a [`Diagnostic`](error::Diagnostic) next to the graph it could build.
//!
//! ## Usage
//!
//! ```
//! # use trellis_parser::parse;
//! let source = r#"
//!     Frontend [icon: monitor] {
//!         S3 [icon: aws-s3]
//!     }
//!     API [icon: server]
//!     S3 -> API: "assets"
//! "#;
//!
//! let output = parse(source);
//! assert!(output.diagnostics.is_empty());
//! assert_eq!(output.graph.node_count(), 3);
//! assert_eq!(output.graph.edges().len(), 1);
//! ```

mod builder;
pub mod error;
mod lexer;
mod properties;
mod span;
mod tokens;

pub use lexer::{Lexer, classify, tokenize};
pub use properties::parse_properties;
pub use span::{Span, Spanned};
pub use tokens::{ClassifiedLine, ConnectionToken, Declaration, LineKind};

use trellis_core::graph::Graph;

use builder::Builder;
use error::Diagnostic;

/// Result of parsing a source text.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    /// Everything that could be built from the source.
    pub graph: Graph,
    /// Warnings in source order, followed by endpoint resolution warnings.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse source text into a graph.
///
/// Runs the pipeline:
///
/// 1. **Tokenize** - Split the source into classified logical lines
/// 2. **Build** - Create nodes using the container stack, collect connections
/// 3. **Resolve** - Turn connections into edges between declared nodes
///
/// # Example
///
/// ```
/// # use trellis_parser::{parse, error::ErrorCode};
/// let output = parse("A [icon: x]\nA -> Missing");
/// assert_eq!(output.graph.node_count(), 1);
/// assert_eq!(output.diagnostics[0].code(), Some(ErrorCode::W006));
/// ```
pub fn parse(source: &str) -> ParseOutput {
    log::info!(bytes = source.len(); "Parsing diagram source");

    let mut builder = Builder::new();
    for line in tokenize(source) {
        builder.process(line);
    }
    let (graph, diagnostics) = builder.finish();

    log::info!(
        nodes = graph.node_count(),
        edges = graph.edges().len(),
        diagnostics = diagnostics.len();
        "Parsing complete"
    );
    log::trace!(graph:? = graph; "Parsed graph");

    ParseOutput { graph, diagnostics }
}
