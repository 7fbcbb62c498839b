//! Rank assignment.
//!
//! Ranks are computed over atoms: leaves and containers without children.
//! An edge between two nodes becomes a constraint between every atom below
//! its source and every atom below its target. Cycles are broken by a
//! depth-first search over the atom graph in declaration order; an edge
//! that produced a back constraint is flagged and left out of ranking
//! entirely. The remaining constraints form a DAG that is ranked by longest
//! path.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};
use petgraph::{
    Direction,
    algo::toposort,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use trellis_core::{graph::Graph, identifier::NodeId};
use trellis_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};

/// Ranks of all nodes plus the edges ignored to break cycles.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    ranks: HashMap<NodeId, usize>,
    back_edges: Vec<usize>,
    diagnostics: Vec<Diagnostic>,
}

impl Ranking {
    /// Rank of a node. Containers take the smallest rank among their atoms.
    pub fn rank(&self, id: &NodeId) -> Option<usize> {
        self.ranks.get(id).copied()
    }

    /// Indices into [`Graph::edges`] of the edges flagged as back-edges.
    pub fn back_edges(&self) -> &[usize] {
        &self.back_edges
    }

    pub fn is_back_edge(&self, edge_index: usize) -> bool {
        self.back_edges.contains(&edge_index)
    }

    /// Highest rank in the graph, or `None` for an empty graph.
    pub fn max_rank(&self) -> Option<usize> {
        self.ranks.values().copied().max()
    }

    /// One `W100` warning per back-edge.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// The atom constraint graph: atoms as nodes, one edge per constraint
/// weighted with the index of the graph edge that produced it.
struct AtomGraph<'g> {
    graph: DiGraph<&'g NodeId, usize>,
    /// Atoms below each node, in declaration order.
    atoms_below: HashMap<&'g NodeId, Vec<NodeIndex>>,
}

impl<'g> AtomGraph<'g> {
    fn new(model: &'g Graph) -> Self {
        let mut graph = DiGraph::new();
        let mut atoms_below: HashMap<&'g NodeId, Vec<NodeIndex>> = HashMap::new();

        for node in model.nodes() {
            let is_atom = !node.is_container() || model.children(node.id()).next().is_none();
            if !is_atom {
                continue;
            }
            let index = graph.add_node(node.id());
            atoms_below.entry(node.id()).or_default().push(index);
            for ancestor in model.ancestors(node.id()) {
                atoms_below.entry(ancestor.id()).or_default().push(index);
            }
        }

        for (edge_index, edge) in model.edges().iter().enumerate() {
            let (Some(sources), Some(targets)) = (
                atoms_below.get(edge.source()),
                atoms_below.get(edge.target()),
            ) else {
                continue;
            };
            let shared = sources.iter().any(|atom| targets.contains(atom));
            if shared {
                trace!(source:% = edge.source(), target:% = edge.target(); "Edge shares atoms, no constraint");
                continue;
            }
            for &source in sources {
                for &target in targets {
                    graph.add_edge(source, target, edge_index);
                }
            }
        }

        Self { graph, atoms_below }
    }

    /// Finds back constraints with an iterative DFS that starts from atoms
    /// in declaration order and follows constraints in insertion order.
    ///
    /// Returns the indices of the graph edges owning a back constraint.
    fn back_edges(&self) -> HashSet<usize> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnStack,
            Done,
        }

        let successors = |node: NodeIndex| {
            let mut out: Vec<_> = self
                .graph
                .edges_directed(node, Direction::Outgoing)
                .map(|edge| (edge.id(), edge.target(), *edge.weight()))
                .collect();
            // petgraph walks the adjacency list newest first.
            out.sort_by_key(|(id, _, _)| *id);
            out
        };

        let mut marks = vec![Mark::Unvisited; self.graph.node_count()];
        let mut back = HashSet::new();

        for start in self.graph.node_indices() {
            if marks[start.index()] != Mark::Unvisited {
                continue;
            }
            marks[start.index()] = Mark::OnStack;
            let mut stack = vec![(start, successors(start), 0usize)];

            while let Some((node, next, cursor)) = stack.last_mut() {
                let Some(&(_, target, edge_index)) = next.get(*cursor) else {
                    marks[node.index()] = Mark::Done;
                    stack.pop();
                    continue;
                };
                *cursor += 1;
                match marks[target.index()] {
                    Mark::Unvisited => {
                        marks[target.index()] = Mark::OnStack;
                        stack.push((target, successors(target), 0));
                    }
                    Mark::OnStack => {
                        back.insert(edge_index);
                    }
                    Mark::Done => {}
                }
            }
        }
        back
    }

    /// Longest-path ranks over the constraints not owned by `excluded`.
    fn longest_path(&self, excluded: &HashSet<usize>) -> Vec<usize> {
        let dag = self.graph.filter_map(
            |_, &id| Some(id),
            |_, &edge_index| (!excluded.contains(&edge_index)).then_some(edge_index),
        );

        let mut ranks = vec![0; dag.node_count()];
        match toposort(&dag, None) {
            Ok(order) => {
                for node in order {
                    for edge in dag.edges_directed(node, Direction::Outgoing) {
                        let candidate = ranks[node.index()] + 1;
                        let target = edge.target().index();
                        ranks[target] = ranks[target].max(candidate);
                    }
                }
            }
            Err(cycle) => {
                // Unreachable after back-edge removal; fall back to a single rank.
                log::error!(node:% = dag[cycle.node_id()]; "Cycle left after back-edge removal");
            }
        }
        ranks
    }
}

/// Assign a rank to every node of `graph`.
///
/// Bidirectional edges rank in declared source to target order. Edges whose
/// endpoints share atoms (self-loops, or a node connected to one of its own
/// containers) impose no constraint.
///
/// # Examples
///
/// ```
/// # use trellis::layout::rank;
/// # use trellis_core::identifier::NodeId;
/// let output = trellis_parser::parse("A [x: 1]\nB [x: 1]\nC [x: 1]\nA -> B -> C -> A");
/// let ranking = rank(&output.graph);
///
/// assert_eq!(ranking.back_edges(), &[2]);
/// assert_eq!(ranking.rank(&NodeId::new("C")), Some(2));
/// ```
pub fn rank(graph: &Graph) -> Ranking {
    let atoms = AtomGraph::new(graph);
    let back = atoms.back_edges();
    let atom_ranks = atoms.longest_path(&back);

    let mut ranks = HashMap::with_capacity(graph.node_count());
    for node in graph.nodes() {
        let rank = atoms
            .atoms_below
            .get(node.id())
            .and_then(|below| below.iter().map(|atom| atom_ranks[atom.index()]).min())
            .unwrap_or(0);
        ranks.insert(node.id().clone(), rank);
    }

    let mut back_edges: Vec<usize> = back.into_iter().collect();
    back_edges.sort_unstable();

    let mut diagnostics = DiagnosticCollector::new();
    for &edge_index in &back_edges {
        let edge = &graph.edges()[edge_index];
        diagnostics.emit(
            Diagnostic::warning(format!(
                "edge `{} -> {}` closes a cycle and is ignored for ranking",
                edge.source(),
                edge.target()
            ))
            .with_code(ErrorCode::W100)
            .with_label(edge.span(), "back-edge")
            .with_help("the edge is still drawn; reverse it if the flow should run the other way"),
        );
    }

    debug!(
        atoms = atoms.graph.node_count(),
        constraints = atoms.graph.edge_count(),
        back_edges = back_edges.len();
        "Ranks assigned"
    );

    Ranking {
        ranks,
        back_edges,
        diagnostics: diagnostics.finish(),
    }
}
