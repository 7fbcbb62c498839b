//! Layered layout for nested graphs.
//!
//! The layout runs in three passes, each usable on its own:
//!
//! 1. [`rank`] assigns every node a layer and breaks cycles.
//! 2. [`order`] orders the nodes of each layer within every containment scope.
//! 3. [`assign_coordinates`] sizes containers and places every box.
//!
//! [`Engine`] runs all three and writes the results into the graph.

mod order;
mod position;
mod rank;
mod scope;

pub use order::{DEFAULT_ORDERING_SWEEPS, Ordering, order, order_with_sweeps};
pub use position::{Placement, assign_coordinates};
pub use rank::{Ranking, rank};
pub use scope::{ContainmentScope, containment_scopes};

use log::{info, trace};

use trellis_core::graph::Graph;
use trellis_parser::error::Diagnostic;

use crate::config::LayoutConfig;

/// Runs the layout passes with one configuration.
///
/// # Examples
///
/// ```
/// use trellis::{config::LayoutConfig, layout::Engine};
/// use trellis_core::identifier::NodeId;
///
/// let mut graph = trellis_parser::parse("A [x: 1]\nB [x: 1]\nA -> B").graph;
/// let warnings = Engine::new(LayoutConfig::default()).layout(&mut graph);
///
/// assert!(warnings.is_empty());
/// let a = graph.node(&NodeId::new("A")).unwrap();
/// let b = graph.node(&NodeId::new("B")).unwrap();
/// assert!(a.rank() < b.rank());
/// assert!(a.position().unwrap().x() < b.position().unwrap().x());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: LayoutConfig,
}

impl Engine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `graph` in place.
    ///
    /// Any previous layout is cleared first, so running this twice gives the
    /// same result. Returns one `W100` warning per edge ignored to break a
    /// cycle; those edges are flagged with [`Edge::is_back_edge`].
    ///
    /// [`Edge::is_back_edge`]: trellis_core::graph::Edge::is_back_edge
    pub fn layout(&self, graph: &mut Graph) -> Vec<Diagnostic> {
        info!(nodes = graph.node_count(), edges = graph.edges().len(); "Laying out graph");
        graph.clear_layout();

        let ranking = rank(graph);
        trace!(max_rank:? = ranking.max_rank(); "Ranking");

        let ordering = order_with_sweeps(graph, &ranking, self.config.ordering_sweeps());
        let placement = assign_coordinates(graph, &ranking, &ordering, &self.config);
        trace!(placement:?; "Placement");

        for node in graph.nodes_mut() {
            node.set_rank(ranking.rank(node.id()));
            if let Some(bounds) = placement.bounds(node.id()) {
                node.set_size(bounds.to_size());
                node.set_position(Some(bounds.min_point()));
            }
        }
        for (index, edge) in graph.edges_mut().enumerate() {
            edge.set_back_edge(ranking.is_back_edge(index));
        }

        info!(bounds:? = graph.bounds(); "Layout complete");
        ranking.into_diagnostics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{geometry::Size, identifier::NodeId};
    use trellis_parser::{error::ErrorCode, parse};

    #[test]
    fn test_layout_writes_results() {
        let mut graph = parse("A [x: 1]\nB [x: 1]\nC [x: 1]\nA -> B\nB -> C\nC -> A").graph;
        let warnings = Engine::default().layout(&mut graph);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), Some(ErrorCode::W100));
        let flagged: Vec<bool> = graph.edges().iter().map(|edge| edge.is_back_edge()).collect();
        assert_eq!(flagged, vec![false, false, true]);
        for node in graph.nodes() {
            assert!(node.rank().is_some());
            assert!(node.position().is_some());
        }
    }

    #[test]
    fn test_layout_is_idempotent() {
        let source = "Box {\n P [x: 1]\n Q [x: 1]\n}\nOut [x: 1]\nP -> Q\nQ -> Out";
        let mut graph = parse(source).graph;
        let engine = Engine::default();

        engine.layout(&mut graph);
        let first: Vec<_> = graph.nodes().map(|node| node.bounds()).collect();
        engine.layout(&mut graph);
        let second: Vec<_> = graph.nodes().map(|node| node.bounds()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_container_grows_with_children() {
        let mut graph = parse("Box {\n P [x: 1]\n Q [x: 1]\n P -> Q\n}").graph;
        Engine::default().layout(&mut graph);

        let size = graph.node(&NodeId::new("Box")).unwrap().size();
        // Two leaves and one rank gap, plus padding and header.
        assert_eq!(size, Size::new(200.0 + 80.0 + 200.0 + 60.0, 120.0 + 60.0 + 30.0));
    }
}
