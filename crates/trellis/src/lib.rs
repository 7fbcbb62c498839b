//! Trellis - Layered layout for nested architecture diagrams.
//!
//! Trellis reads a small bracket/brace diagram language, builds a graph of
//! nodes, containers and connections, and assigns every box a rank, a size
//! and a position. Drawing is left to the consumer of the laid-out graph.
//!
//! ```
//! use trellis::{DiagramBuilder, identifier::NodeId};
//!
//! let source = r#"
//! Frontend [icon: monitor] {
//!   Web App [icon: browser]
//! }
//! API [icon: server]
//! Web App -> API: "calls"
//! "#;
//!
//! let diagram = DiagramBuilder::default().build(source).unwrap();
//! assert!(diagram.diagnostics.is_empty());
//!
//! let web = diagram.graph.node(&NodeId::new("Frontend.Web App")).unwrap();
//! assert_eq!(web.rank(), Some(0));
//! ```

pub mod config;
pub mod export;
pub mod layout;

mod error;

pub use trellis_core::{geometry, graph, identifier, span};
pub use trellis_parser::{ParseOutput, error::Diagnostic};

pub use error::TrellisError;

use log::{info, trace};

use config::AppConfig;
use graph::Graph;
use layout::Engine;

/// A parsed and laid-out diagram with every diagnostic reported on the way.
#[derive(Debug, Clone)]
pub struct Diagram {
    pub graph: Graph,
    /// Parser warnings first, then layout warnings.
    pub diagnostics: Vec<Diagnostic>,
}

/// Builder for parsing and laying out Trellis diagrams.
///
/// # Examples
///
/// ```
/// use trellis::{DiagramBuilder, config::AppConfig};
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// // Parse only
/// let output = builder.parse("A [x: 1]\nB [x: 1]\nA -> B");
/// assert_eq!(output.graph.node_count(), 2);
///
/// // Lay out the parsed graph
/// let mut graph = output.graph;
/// let warnings = builder.layout(&mut graph);
/// assert!(warnings.is_empty());
/// assert!(graph.bounds().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
    strict: bool,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            strict: false,
        }
    }

    /// Reject any diagram that produces a diagnostic.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse source text into a graph model.
    ///
    /// Never fails: problems in the input come back as diagnostics and the
    /// offending lines or edges are left out of the graph.
    pub fn parse(&self, source: &str) -> ParseOutput {
        trellis_parser::parse(source)
    }

    /// Lay out a graph in place using the configured layout settings.
    ///
    /// Returns the warnings raised while breaking cycles.
    pub fn layout(&self, graph: &mut Graph) -> Vec<Diagnostic> {
        Engine::new(self.config.layout().clone()).layout(graph)
    }

    /// Parse and lay out `source`.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Strict`] in strict mode when any diagnostic
    /// was reported.
    pub fn build(&self, source: &str) -> Result<Diagram, TrellisError> {
        let ParseOutput {
            mut graph,
            mut diagnostics,
        } = self.parse(source);
        diagnostics.extend(self.layout(&mut graph));
        trace!(graph:?; "Laid-out graph");

        if self.strict && !diagnostics.is_empty() {
            info!(diagnostics = diagnostics.len(); "Rejecting diagram in strict mode");
            return Err(TrellisError::new_strict_error(diagnostics, source));
        }

        info!(nodes = graph.node_count(), diagnostics = diagnostics.len(); "Diagram built");
        Ok(Diagram { graph, diagnostics })
    }
}
