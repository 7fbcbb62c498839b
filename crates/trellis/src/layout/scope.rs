//! Containment scopes.
//!
//! A containment scope groups the nodes that share a parent: the root scope
//! holds the top-level nodes and every container with children has a scope
//! of its own. Ordering and coordinate assignment both work one scope at a
//! time.

use trellis_core::{
    graph::{Graph, Node},
    identifier::NodeId,
};

/// The direct children of one container, or the top-level nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainmentScope {
    container: Option<NodeId>,
    nodes: Vec<NodeId>,
}

impl ContainmentScope {
    /// Returns the container owning this scope, or `None` for the root scope.
    pub fn container(&self) -> Option<&NodeId> {
        self.container.as_ref()
    }

    /// Returns the member ids in declaration order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Collects all non-empty scopes, deepest containers first and the root
/// scope last.
///
/// A container is always listed before the scope that contains it, so sizes
/// computed for one scope are ready when its parent scope is processed.
pub fn containment_scopes(graph: &Graph) -> Vec<ContainmentScope> {
    let mut containers: Vec<(usize, &Node)> = graph
        .nodes()
        .filter(|node| node.is_container() && graph.children(node.id()).next().is_some())
        .map(|node| (graph.depth(node.id()), node))
        .collect();
    // Stable, so equal depths keep declaration order.
    containers.sort_by(|(a, _), (b, _)| b.cmp(a));

    let mut scopes: Vec<ContainmentScope> = containers
        .into_iter()
        .map(|(_, container)| ContainmentScope {
            container: Some(container.id().clone()),
            nodes: graph
                .children(container.id())
                .map(|child| child.id().clone())
                .collect(),
        })
        .collect();

    let roots: Vec<NodeId> = graph.roots().map(|node| node.id().clone()).collect();
    if !roots.is_empty() {
        scopes.push(ContainmentScope {
            container: None,
            nodes: roots,
        });
    }
    scopes
}

/// Maps `id` to the member of the scope owned by `container` that is `id`
/// itself or one of its ancestors.
///
/// Returns `None` when `id` is not inside that scope, including when `id` is
/// the container itself.
pub fn lift<'g>(graph: &'g Graph, container: Option<&NodeId>, id: &NodeId) -> Option<&'g NodeId> {
    let mut current = graph.node(id)?;
    loop {
        if current.parent() == container {
            return Some(current.id());
        }
        current = graph.node(current.parent()?)?;
    }
}
