//! The node/container/edge model shared by the parser, the layout engine and
//! renderers.
//!
//! A [`Graph`] owns every [`Node`] in declaration order together with the
//! resolved [`Edge`]s between them. Containers are ordinary nodes of kind
//! [`NodeKind::Container`]; the containment forest is encoded through each
//! node's parent reference.
//!
//! Positions, sizes and ranks are written only by the layout engine. Until
//! layout runs, [`Node::position`] and [`Node::rank`] are `None`.

use indexmap::IndexMap;
use serde::{Serialize, Serializer, ser::SerializeStruct};
use thiserror::Error;

use crate::{
    geometry::{Bounds, Point, Size},
    identifier::NodeId,
    span::Span,
};

/// Property key that overrides a node's display label.
pub const LABEL_PROPERTY: &str = "label";

/// Default size of a leaf node before layout.
pub const DEFAULT_LEAF_SIZE: Size = Size::new(200.0, 120.0);

/// Default size of a container with no children.
pub const DEFAULT_CONTAINER_SIZE: Size = Size::new(360.0, 240.0);

/// Whether a node was declared as a plain box or as a container with a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Leaf,
    Container,
}

impl NodeKind {
    /// Size used for this kind before any layout configuration applies.
    pub fn default_size(self) -> Size {
        match self {
            Self::Leaf => DEFAULT_LEAF_SIZE,
            Self::Container => DEFAULT_CONTAINER_SIZE,
        }
    }
}

/// A declared node or container.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    id: NodeId,
    label: String,
    kind: NodeKind,
    parent: Option<NodeId>,
    properties: IndexMap<String, String>,
    rank: Option<usize>,
    position: Option<Point>,
    size: Size,
    #[serde(skip)]
    span: Span,
}

impl Node {
    /// Creates a node with the default size for its kind.
    ///
    /// The display label is the `label` property when present, otherwise the
    /// local name with `.`, `-` and `_` turned into spaces.
    pub fn new(
        id: NodeId,
        kind: NodeKind,
        parent: Option<NodeId>,
        properties: IndexMap<String, String>,
        span: Span,
    ) -> Self {
        let label = display_label(&id, &properties);
        Self {
            id,
            label,
            kind,
            parent,
            properties,
            rank: None,
            position: None,
            size: kind.default_size(),
            span,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Returns the name this node was declared with.
    pub fn local_name(&self) -> &str {
        self.id.local_name()
    }

    /// Returns the text a renderer should show for this node.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_container(&self) -> bool {
        self.kind == NodeKind::Container
    }

    pub fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }

    /// Returns the value of a single property, if set.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Layer assigned by the layout engine.
    pub fn rank(&self) -> Option<usize> {
        self.rank
    }

    /// Absolute top-left corner assigned by the layout engine.
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the span of the declaration in the source text.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the laid out box, or `None` before layout.
    pub fn bounds(&self) -> Option<Bounds> {
        self.position
            .map(|position| Bounds::new_from_top_left(position, self.size))
    }

    /// Merges `properties` into this node, later values winning.
    ///
    /// The display label is recomputed since `label` may have changed.
    pub fn merge_properties(&mut self, properties: IndexMap<String, String>) {
        self.properties.extend(properties);
        self.label = display_label(&self.id, &self.properties);
    }

    pub fn set_rank(&mut self, rank: Option<usize>) {
        self.rank = rank;
    }

    pub fn set_position(&mut self, position: Option<Point>) {
        self.position = position;
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }
}

/// Derives the display label of a node.
fn display_label(id: &NodeId, properties: &IndexMap<String, String>) -> String {
    if let Some(label) = properties.get(LABEL_PROPERTY) {
        return label.clone();
    }
    id.local_name()
        .replace(['.', '-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Direction semantics of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// `A -> B`
    Directed,
    /// `A <-> B`
    Bidirectional,
}

/// A resolved connection between two nodes.
#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    source: NodeId,
    target: NodeId,
    kind: EdgeKind,
    label: Option<String>,
    #[serde(rename = "back_edge")]
    is_back_edge: bool,
    #[serde(skip)]
    span: Span,
}

impl Edge {
    pub fn new(
        source: NodeId,
        target: NodeId,
        kind: EdgeKind,
        label: Option<String>,
        span: Span,
    ) -> Self {
        Self {
            source,
            target,
            kind,
            label,
            is_back_edge: false,
            span,
        }
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// `true` when ranking ignored this edge to break a cycle.
    pub fn is_back_edge(&self) -> bool {
        self.is_back_edge
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn set_back_edge(&mut self, is_back_edge: bool) {
        self.is_back_edge = is_back_edge;
    }
}

/// Errors raised when a mutation would break a graph invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node `{0}` already exists")]
    DuplicateNode(NodeId),

    #[error("parent `{parent}` of node `{node}` does not exist")]
    UnknownParent { node: NodeId, parent: NodeId },

    #[error("edge endpoint `{0}` does not exist")]
    UnknownEndpoint(NodeId),
}

/// Nodes, containers and edges of one diagram.
///
/// # Examples
///
/// ```
/// use indexmap::IndexMap;
/// use trellis_core::{
///     graph::{Edge, EdgeKind, Graph, Node, NodeKind},
///     identifier::NodeId,
///     span::Span,
/// };
///
/// let mut graph = Graph::new();
/// let frontend = NodeId::new("Frontend");
/// let s3 = frontend.create_nested("S3");
///
/// graph
///     .add_node(Node::new(frontend.clone(), NodeKind::Container, None, IndexMap::new(), Span::default()))
///     .unwrap();
/// graph
///     .add_node(Node::new(s3.clone(), NodeKind::Leaf, Some(frontend.clone()), IndexMap::new(), Span::default()))
///     .unwrap();
/// graph
///     .add_edge(Edge::new(s3.clone(), frontend.clone(), EdgeKind::Directed, None, Span::default()))
///     .unwrap();
///
/// assert_eq!(graph.children(&frontend).count(), 1);
/// assert!(graph.is_ancestor(&frontend, &s3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    title: Option<String>,
    nodes: IndexMap<NodeId, Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// Adds a node after the ones already present.
    ///
    /// # Errors
    ///
    /// Fails when the id is taken or the parent has not been added yet.
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.nodes.contains_key(node.id()) {
            return Err(GraphError::DuplicateNode(node.id().clone()));
        }
        if let Some(parent) = node.parent() {
            if !self.nodes.contains_key(parent) {
                return Err(GraphError::UnknownParent {
                    node: node.id().clone(),
                    parent: parent.clone(),
                });
            }
        }
        self.nodes.insert(node.id().clone(), node);
        Ok(())
    }

    /// Adds an edge between two existing nodes.
    ///
    /// # Errors
    ///
    /// Fails when either endpoint is not a node of this graph.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        for endpoint in [edge.source(), edge.target()] {
            if !self.nodes.contains_key(endpoint) {
                return Err(GraphError::UnknownEndpoint(endpoint.clone()));
            }
        }
        self.edges.push(edge);
        Ok(())
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Returns the declaration index of a node.
    pub fn node_index(&self, id: &NodeId) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// Iterates over all nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.edges.iter_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over the direct children of `id` in declaration order.
    pub fn children<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .values()
            .filter(move |node| node.parent() == Some(id))
    }

    /// Iterates over nodes without a parent in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|node| node.parent().is_none())
    }

    /// Iterates over nodes whose local name is `name`.
    pub fn nodes_with_local_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> {
        self.nodes
            .values()
            .filter(move |node| node.local_name() == name)
    }

    /// Iterates from the parent of `id` up to its top-level ancestor.
    pub fn ancestors<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = &'a Node> + use<'a> {
        let mut current = self.nodes.get(id).and_then(|node| node.parent());
        std::iter::from_fn(move || {
            let node = self.nodes.get(current?)?;
            current = node.parent();
            Some(node)
        })
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `descendant`.
    pub fn is_ancestor(&self, ancestor: &NodeId, descendant: &NodeId) -> bool {
        self.ancestors(descendant)
            .any(|node| node.id() == ancestor)
    }

    /// Nesting depth of a node; top-level nodes have depth 0.
    pub fn depth(&self, id: &NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Position of a node relative to its parent's top-left corner.
    ///
    /// Top-level nodes return their absolute position. Returns `None` before
    /// layout.
    pub fn relative_position(&self, id: &NodeId) -> Option<Point> {
        let node = self.nodes.get(id)?;
        let position = node.position()?;
        match node.parent().and_then(|parent| self.nodes.get(parent)) {
            Some(parent) => Some(position.sub_point(parent.position()?)),
            None => Some(position),
        }
    }

    /// Bounding box of all top-level boxes, or `None` before layout.
    pub fn bounds(&self) -> Option<Bounds> {
        self.roots()
            .filter_map(Node::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Resets ranks, positions, sizes and back-edge flags.
    pub fn clear_layout(&mut self) {
        for node in self.nodes.values_mut() {
            node.rank = None;
            node.position = None;
            node.size = node.kind.default_size();
        }
        for edge in &mut self.edges {
            edge.is_back_edge = false;
        }
    }
}

impl Serialize for Graph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nodes: Vec<&Node> = self.nodes.values().collect();
        let mut state = serializer.serialize_struct("Graph", 3)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("nodes", &nodes)?;
        state.serialize_field("edges", &self.edges)?;
        state.end()
    }
}
