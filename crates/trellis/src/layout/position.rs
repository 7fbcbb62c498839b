//! Coordinate assignment and container sizing.
//!
//! Scopes are placed bottom-up, deepest containers first, so a container's
//! size is known before the scope holding it is laid out. Within a scope the
//! local layers advance along the primary axis and the members of a layer
//! line up along the secondary axis, each layer centred on the widest one.
//! Positions are relative to the scope's content origin until a final
//! top-down pass turns them into absolute coordinates.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, trace};

use trellis_core::{
    geometry::{Bounds, Insets, Point, Size},
    graph::{Graph, NodeKind},
    identifier::NodeId,
};

use super::{
    order::Ordering,
    rank::Ranking,
    scope::{ContainmentScope, containment_scopes},
};
use crate::config::{LayoutConfig, Orientation};

/// Absolute boxes for every node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    boxes: IndexMap<NodeId, Bounds>,
}

impl Placement {
    pub fn bounds(&self, id: &NodeId) -> Option<Bounds> {
        self.boxes.get(id).copied()
    }

    /// Top-left corner of a node's box.
    pub fn position(&self, id: &NodeId) -> Option<Point> {
        self.bounds(id).map(Bounds::min_point)
    }

    pub fn size(&self, id: &NodeId) -> Option<Size> {
        self.bounds(id).map(Bounds::to_size)
    }

    /// Iterates over all boxes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, Bounds)> {
        self.boxes.iter().map(|(id, bounds)| (id, *bounds))
    }

    /// Box enclosing everything, or `None` when nothing was placed.
    pub fn total_bounds(&self) -> Option<Bounds> {
        self.boxes.values().copied().reduce(|acc, bounds| acc.merge(&bounds))
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Splits sizes and points into the rank axis and the cross axis.
#[derive(Debug, Clone, Copy)]
struct Axes(Orientation);

impl Axes {
    /// Size with the primary extent as width.
    fn along(self, size: Size) -> Size {
        match self.0 {
            Orientation::LeftToRight => size,
            Orientation::TopToBottom => size.transpose(),
        }
    }

    /// `(primary, secondary)` extents of `size`.
    fn split(self, size: Size) -> (f32, f32) {
        let size = self.along(size);
        (size.width(), size.height())
    }

    fn size(self, primary: f32, secondary: f32) -> Size {
        self.along(Size::new(primary, secondary))
    }

    fn point(self, primary: f32, secondary: f32) -> Point {
        let size = self.size(primary, secondary);
        Point::new(size.width(), size.height())
    }
}

/// Place every node of `graph`.
///
/// Leaves take `leaf_size` and childless containers take `container_size`.
/// A container with children is as large as its children's bounding box
/// plus `container_padding` on every side and `container_header` on top.
/// The root scope starts at (`margin`, `margin`).
///
/// A scope missing from `ordering` is laid out by rank in declaration order.
pub fn assign_coordinates(
    graph: &Graph,
    ranking: &Ranking,
    ordering: &Ordering,
    config: &LayoutConfig,
) -> Placement {
    let axes = Axes(config.orientation());
    let insets = Insets::uniform(config.container_padding())
        .with_top(config.container_padding() + config.container_header());

    let mut sizes: HashMap<&NodeId, Size> = graph
        .nodes()
        .map(|node| {
            let size = match node.kind() {
                NodeKind::Leaf => config.leaf_size(),
                NodeKind::Container => config.container_size(),
            };
            (node.id(), size)
        })
        .collect();
    let mut relative: HashMap<&NodeId, Point> = HashMap::with_capacity(graph.node_count());

    for scope in containment_scopes(graph) {
        let layers = scope_layers(&scope, ranking, ordering);
        let (content, offsets) = place_scope(&layers, &sizes, axes, config);

        let origin = match scope.container() {
            Some(container) => {
                let size = content.add_padding(insets);
                trace!(container:% = container, width = size.width(), height = size.height(); "Sized container");
                if let Some(node) = graph.node(container) {
                    sizes.insert(node.id(), size);
                }
                insets.origin()
            }
            None => Point::new(config.margin(), config.margin()),
        };

        for (id, offset) in offsets {
            if let Some(node) = graph.node(id) {
                relative.insert(node.id(), origin.add_point(offset));
            }
        }
    }

    // Parents are declared before their children, so one pass suffices.
    let mut boxes: IndexMap<NodeId, Bounds> = IndexMap::with_capacity(graph.node_count());
    for node in graph.nodes() {
        let offset = relative.get(node.id()).copied().unwrap_or_default();
        let origin = node
            .parent()
            .and_then(|parent| boxes.get(parent))
            .map_or(Point::default(), |parent| parent.min_point());
        let size = sizes.get(node.id()).copied().unwrap_or_else(|| node.size());
        boxes.insert(
            node.id().clone(),
            Bounds::new_from_top_left(offset, size).translate(origin),
        );
    }

    debug!(placed = boxes.len(); "Coordinates assigned");
    Placement { boxes }
}

/// The ordered local layers of a scope.
fn scope_layers<'s>(
    scope: &'s ContainmentScope,
    ranking: &Ranking,
    ordering: &'s Ordering,
) -> Vec<Vec<&'s NodeId>> {
    let ordered = ordering.layers(scope.container());
    if !ordered.is_empty() {
        return ordered.iter().map(|layer| layer.iter().collect()).collect();
    }

    let mut by_rank: Vec<(usize, Vec<&NodeId>)> = Vec::new();
    for id in scope.node_ids() {
        let rank = ranking.rank(id).unwrap_or(0);
        match by_rank.binary_search_by_key(&rank, |(r, _)| *r) {
            Ok(index) => by_rank[index].1.push(id),
            Err(index) => by_rank.insert(index, (rank, vec![id])),
        }
    }
    by_rank.into_iter().map(|(_, layer)| layer).collect()
}

/// Lays out one scope relative to its content origin.
///
/// Returns the content size and the offset of each member.
fn place_scope<'s>(
    layers: &[Vec<&'s NodeId>],
    sizes: &HashMap<&NodeId, Size>,
    axes: Axes,
    config: &LayoutConfig,
) -> (Size, Vec<(&'s NodeId, Point)>) {
    let extent = |id: &NodeId| axes.split(sizes.get(id).copied().unwrap_or_default());

    let thickness: Vec<f32> = layers
        .iter()
        .map(|layer| layer.iter().map(|&id| extent(id).0).fold(0.0, f32::max))
        .collect();
    let lengths: Vec<f32> = layers
        .iter()
        .map(|layer| {
            let sum: f32 = layer.iter().map(|&id| extent(id).1).sum();
            sum + config.node_spacing() * layer.len().saturating_sub(1) as f32
        })
        .collect();
    let content_secondary = lengths.iter().copied().fold(0.0, f32::max);

    let mut offsets = Vec::new();
    let mut primary = 0.0;
    for ((layer, &band), &length) in layers.iter().zip(&thickness).zip(&lengths) {
        let mut secondary = (content_secondary - length) / 2.0;
        for &id in layer {
            let (along, across) = extent(id);
            offsets.push((id, axes.point(primary + (band - along) / 2.0, secondary)));
            secondary += across + config.node_spacing();
        }
        primary += band + config.rank_spacing();
    }

    let content_primary = if layers.is_empty() {
        0.0
    } else {
        primary - config.rank_spacing()
    };
    (axes.size(content_primary, content_secondary), offsets)
}
