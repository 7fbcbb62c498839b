//! Within-rank ordering.
//!
//! Each containment scope is ordered on its own. The members of a scope are
//! grouped into local layers by rank, starting in declaration order, and
//! then reordered by alternating barycenter sweeps over the edges lifted to
//! the scope's members. Only edges between adjacent local layers take part,
//! both for the barycenters and for the crossing count. The layering with
//! the fewest crossings seen is kept.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use log::{debug, trace};

use trellis_core::{graph::Graph, identifier::NodeId};

use super::{
    rank::Ranking,
    scope::{ContainmentScope, containment_scopes, lift},
};

/// Number of sweeps used by [`order`].
pub const DEFAULT_ORDERING_SWEEPS: usize = 24;

/// Local layers of one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ScopeOrder {
    layers: Vec<Vec<NodeId>>,
    crossings: usize,
}

/// Ordered local layers for every containment scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ordering {
    root: ScopeOrder,
    containers: IndexMap<NodeId, ScopeOrder>,
}

impl Ordering {
    /// Local layers of the scope owned by `container`, or of the root scope
    /// for `None`. Empty when the scope has no members.
    pub fn layers(&self, container: Option<&NodeId>) -> &[Vec<NodeId>] {
        self.scope(container)
            .map(|scope| scope.layers.as_slice())
            .unwrap_or_default()
    }

    /// Crossings left between adjacent layers of a scope.
    pub fn crossings(&self, container: Option<&NodeId>) -> usize {
        self.scope(container).map_or(0, |scope| scope.crossings)
    }

    fn scope(&self, container: Option<&NodeId>) -> Option<&ScopeOrder> {
        match container {
            Some(id) => self.containers.get(id),
            None => Some(&self.root),
        }
    }
}

/// Order every scope with [`DEFAULT_ORDERING_SWEEPS`] sweeps.
pub fn order(graph: &Graph, ranking: &Ranking) -> Ordering {
    order_with_sweeps(graph, ranking, DEFAULT_ORDERING_SWEEPS)
}

/// Order every scope, running at most `sweeps` barycenter sweeps per scope.
///
/// Deterministic: the same graph and ranking always give the same ordering.
pub fn order_with_sweeps(graph: &Graph, ranking: &Ranking, sweeps: usize) -> Ordering {
    let mut ordering = Ordering::default();
    for scope in containment_scopes(graph) {
        let scope_order = order_scope(graph, ranking, &scope, sweeps);
        trace!(
            container:? = scope.container(),
            layers = scope_order.layers.len(),
            crossings = scope_order.crossings;
            "Ordered scope"
        );
        match scope.container() {
            Some(id) => {
                ordering.containers.insert(id.clone(), scope_order);
            }
            None => ordering.root = scope_order,
        }
    }
    debug!(scopes = ordering.containers.len() + 1; "Scopes ordered");
    ordering
}

/// Layers as member indices, plus edges between adjacent layers.
struct ScopeLayers {
    layers: Vec<Vec<usize>>,
    /// `gaps[l]` holds `(upper, lower)` pairs with `upper` in layer `l` and
    /// `lower` in layer `l + 1`.
    gaps: Vec<Vec<(usize, usize)>>,
}

impl ScopeLayers {
    fn new(graph: &Graph, ranking: &Ranking, scope: &ContainmentScope) -> Self {
        let members = scope.node_ids();
        let member_ranks: Vec<usize> = members
            .iter()
            .map(|id| ranking.rank(id).unwrap_or(0))
            .collect();

        // Local layers are the distinct ranks in increasing order.
        let distinct: BTreeSet<usize> = member_ranks.iter().copied().collect();
        let layer_of_rank: HashMap<usize, usize> = distinct
            .into_iter()
            .enumerate()
            .map(|(layer, rank)| (rank, layer))
            .collect();
        let layer_of: Vec<usize> = member_ranks.iter().map(|rank| layer_of_rank[rank]).collect();

        let mut layers = vec![Vec::new(); layer_of_rank.len()];
        for (member, &layer) in layer_of.iter().enumerate() {
            layers[layer].push(member);
        }

        let index_of: HashMap<&NodeId, usize> = members
            .iter()
            .enumerate()
            .map(|(index, id)| (id, index))
            .collect();
        let mut gaps = vec![Vec::new(); layers.len().saturating_sub(1)];
        for edge in graph.edges() {
            let endpoints = (
                lift(graph, scope.container(), edge.source()).and_then(|id| index_of.get(id)),
                lift(graph, scope.container(), edge.target()).and_then(|id| index_of.get(id)),
            );
            let (Some(&a), Some(&b)) = endpoints else {
                continue;
            };
            let (upper, lower) = if layer_of[a] < layer_of[b] { (a, b) } else { (b, a) };
            if layer_of[lower] == layer_of[upper] + 1 {
                gaps[layer_of[upper]].push((upper, lower));
            }
        }

        Self { layers, gaps }
    }

    fn positions(&self, member_count: usize) -> Vec<usize> {
        let mut positions = vec![0; member_count];
        for layer in &self.layers {
            for (position, &member) in layer.iter().enumerate() {
                positions[member] = position;
            }
        }
        positions
    }

    fn crossings(&self, positions: &[usize]) -> usize {
        self.gaps
            .iter()
            .map(|edges| {
                let mut count = 0;
                for (i, &(u1, v1)) in edges.iter().enumerate() {
                    for &(u2, v2) in &edges[i + 1..] {
                        let upper = positions[u1].cmp(&positions[u2]);
                        let lower = positions[v1].cmp(&positions[v2]);
                        if upper.is_ne() && lower.is_ne() && upper != lower {
                            count += 1;
                        }
                    }
                }
                count
            })
            .sum()
    }

    /// Reorder `layer` by the mean position of its neighbours across `gap`.
    ///
    /// Members without neighbours keep their current position as their
    /// barycenter. The sort is stable, so ties keep the current order.
    fn sort_by_barycenter(&mut self, layer: usize, gap: usize, positions: &[usize]) {
        let mut sums: HashMap<usize, (usize, usize)> = HashMap::new();
        for &(upper, lower) in &self.gaps[gap] {
            let (member, neighbour) = if gap == layer { (upper, lower) } else { (lower, upper) };
            let entry = sums.entry(member).or_default();
            entry.0 += positions[neighbour];
            entry.1 += 1;
        }

        let barycenter = |member: usize| match sums.get(&member) {
            Some(&(sum, count)) => sum as f32 / count as f32,
            None => positions[member] as f32,
        };
        self.layers[layer].sort_by(|&a, &b| barycenter(a).total_cmp(&barycenter(b)));
    }
}

fn order_scope(
    graph: &Graph,
    ranking: &Ranking,
    scope: &ContainmentScope,
    sweeps: usize,
) -> ScopeOrder {
    let mut layers = ScopeLayers::new(graph, ranking, scope);
    let member_count = scope.len();

    let mut best = layers.layers.clone();
    let mut best_crossings = layers.crossings(&layers.positions(member_count));
    let layer_count = layers.layers.len();

    for sweep in 0..sweeps {
        if best_crossings == 0 {
            break;
        }
        if sweep % 2 == 0 {
            for layer in 1..layer_count {
                let positions = layers.positions(member_count);
                layers.sort_by_barycenter(layer, layer - 1, &positions);
            }
        } else {
            for layer in (0..layer_count.saturating_sub(1)).rev() {
                let positions = layers.positions(member_count);
                layers.sort_by_barycenter(layer, layer, &positions);
            }
        }

        let crossings = layers.crossings(&layers.positions(member_count));
        if crossings < best_crossings {
            best_crossings = crossings;
            best = layers.layers.clone();
        }
    }

    let members = scope.node_ids();
    ScopeOrder {
        layers: best
            .into_iter()
            .map(|layer| layer.into_iter().map(|member| members[member].clone()).collect())
            .collect(),
        crossings: best_crossings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::rank::rank;
    use trellis_parser::parse;

    fn ordered(source: &str) -> (Graph, Ordering) {
        let graph = parse(source).graph;
        let ranking = rank(&graph);
        let ordering = order(&graph, &ranking);
        (graph, ordering)
    }

    fn names(layer: &[NodeId]) -> Vec<&str> {
        layer.iter().map(NodeId::as_str).collect()
    }

    #[test]
    fn test_declaration_order_without_edges() {
        let (_, ordering) = ordered("C [x: 1]\nA [x: 1]\nB [x: 1]");
        let layers = ordering.layers(None);
        assert_eq!(layers.len(), 1);
        assert_eq!(names(&layers[0]), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_removes_simple_crossing() {
        let (_, ordering) = ordered("A [x: 1]\nB [x: 1]\nC [x: 1]\nD [x: 1]\nA -> D\nB -> C");
        let layers = ordering.layers(None);
        assert_eq!(names(&layers[0]), vec!["A", "B"]);
        assert_eq!(names(&layers[1]), vec!["D", "C"]);
        assert_eq!(ordering.crossings(None), 0);
    }

    #[test]
    fn test_zero_sweeps_keeps_declaration_order() {
        let graph = parse("A [x: 1]\nB [x: 1]\nC [x: 1]\nD [x: 1]\nA -> D\nB -> C").graph;
        let ordering = order_with_sweeps(&graph, &rank(&graph), 0);
        assert_eq!(names(&ordering.layers(None)[1]), vec!["C", "D"]);
        assert_eq!(ordering.crossings(None), 1);
    }

    #[test]
    fn test_scopes_are_ordered_separately() {
        let source = "Box {\n P [x: 1]\n Q [x: 1]\n R [x: 1]\n}\nOut [x: 1]\nP -> R\nOut -> Q";
        let (_, ordering) = ordered(source);

        let inner = ordering.layers(Some(&NodeId::new("Box")));
        assert_eq!(inner.len(), 2);
        assert_eq!(names(&inner[0]), vec!["Box.P"]);
        assert_eq!(names(&inner[1]), vec!["Box.Q", "Box.R"]);

        // `Out -> Q` lifts to `Out -> Box` at the root, and both rank 0.
        let root = ordering.layers(None);
        assert_eq!(root.len(), 1);
        assert_eq!(names(&root[0]), vec!["Box", "Out"]);
    }

    #[test]
    fn test_rank_gaps_are_compressed() {
        let source = "X [x: 1]\nBox {\n In [x: 1]\n Deep [x: 1]\n}\nM [x: 1]\nX -> In\nIn -> M\nM -> Deep";
        let (_, ordering) = ordered(source);
        // Box holds ranks 1 and 3 only.
        let inner = ordering.layers(Some(&NodeId::new("Box")));
        assert_eq!(inner.len(), 2);
        assert_eq!(names(&inner[1]), vec!["Box.Deep"]);
        assert_eq!(ordering.layers(None).len(), 3);
        assert!(ordering.layers(Some(&NodeId::new("missing"))).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let source = "A [x: 1]\nB [x: 1]\nC [x: 1]\nD [x: 1]\nE [x: 1]\nA -> E\nB -> D\nC -> D\nA -> C";
        let (_, first) = ordered(source);
        let (_, second) = ordered(source);
        assert_eq!(first, second);
    }
}
