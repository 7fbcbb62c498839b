//! Configuration types for Trellis layout.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file. Every field is optional; a missing field keeps its default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`LayoutConfig`] - Spacing, padding, default sizes and flow direction.
//! - [`Orientation`] - Axis along which ranks advance.
//!
//! # Example
//!
//! ```
//! # use trellis::config::{AppConfig, Orientation};
//! let config = AppConfig::default();
//! assert_eq!(config.layout().orientation(), Orientation::LeftToRight);
//! assert!(config.validate().is_ok());
//! ```

use serde::Deserialize;

use trellis_core::{
    geometry::Size,
    graph::{DEFAULT_CONTAINER_SIZE, DEFAULT_LEAF_SIZE},
};

use crate::{TrellisError, layout::DEFAULT_ORDERING_SWEEPS};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given layout configuration.
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Checks that every configured value can be laid out.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), TrellisError> {
        self.layout.validate()
    }
}

/// Direction in which ranks advance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    /// Rank 0 on the left, later ranks to the right.
    #[default]
    LeftToRight,
    /// Rank 0 at the top, later ranks below.
    TopToBottom,
}

/// Spacing and sizing parameters for the layout engine.
///
/// # Example
///
/// ```
/// # use trellis::config::{LayoutConfig, Orientation};
/// let config: LayoutConfig = toml::from_str(r#"
///     rank_spacing = 120
///     orientation = "top-to-bottom"
///     leaf_size = { width = 160, height = 90 }
/// "#).unwrap();
///
/// assert_eq!(config.rank_spacing(), 120.0);
/// assert_eq!(config.node_spacing(), 50.0);
/// assert_eq!(config.orientation(), Orientation::TopToBottom);
/// assert_eq!(config.leaf_size().width(), 160.0);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Gap between consecutive ranks along the primary axis.
    rank_spacing: f32,
    /// Gap between neighbours within one rank.
    node_spacing: f32,
    /// Space between a container's edge and its children.
    container_padding: f32,
    /// Extra space on a container's top edge for its label.
    container_header: f32,
    /// Offset of the whole diagram from the origin.
    margin: f32,
    orientation: Orientation,
    leaf_size: Size,
    /// Size of a container that has no children.
    container_size: Size,
    /// Upper bound on barycenter sweeps per scope.
    ordering_sweeps: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rank_spacing: 80.0,
            node_spacing: 50.0,
            container_padding: 30.0,
            container_header: 30.0,
            margin: 50.0,
            orientation: Orientation::default(),
            leaf_size: DEFAULT_LEAF_SIZE,
            container_size: DEFAULT_CONTAINER_SIZE,
            ordering_sweeps: DEFAULT_ORDERING_SWEEPS,
        }
    }
}

impl LayoutConfig {
    pub fn rank_spacing(&self) -> f32 {
        self.rank_spacing
    }

    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    pub fn container_padding(&self) -> f32 {
        self.container_padding
    }

    pub fn container_header(&self) -> f32 {
        self.container_header
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn leaf_size(&self) -> Size {
        self.leaf_size
    }

    pub fn container_size(&self) -> Size {
        self.container_size
    }

    pub fn ordering_sweeps(&self) -> usize {
        self.ordering_sweeps
    }

    /// Set the gap between ranks
    pub fn with_rank_spacing(mut self, spacing: f32) -> Self {
        self.rank_spacing = spacing;
        self
    }

    /// Set the gap between neighbours in a rank
    pub fn with_node_spacing(mut self, spacing: f32) -> Self {
        self.node_spacing = spacing;
        self
    }

    /// Set the padding inside containers
    pub fn with_container_padding(mut self, padding: f32) -> Self {
        self.container_padding = padding;
        self
    }

    /// Set the label band on top of containers
    pub fn with_container_header(mut self, header: f32) -> Self {
        self.container_header = header;
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_leaf_size(mut self, size: Size) -> Self {
        self.leaf_size = size;
        self
    }

    pub fn with_container_size(mut self, size: Size) -> Self {
        self.container_size = size;
        self
    }

    pub fn with_ordering_sweeps(mut self, sweeps: usize) -> Self {
        self.ordering_sweeps = sweeps;
        self
    }

    fn validate(&self) -> Result<(), TrellisError> {
        let lengths = [
            ("rank_spacing", self.rank_spacing),
            ("node_spacing", self.node_spacing),
            ("container_padding", self.container_padding),
            ("container_header", self.container_header),
            ("margin", self.margin),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(TrellisError::Config(format!(
                    "`layout.{name}` must be a finite, non-negative number, got {value}"
                )));
            }
        }

        let sizes = [
            ("leaf_size", self.leaf_size),
            ("container_size", self.container_size),
        ];
        for (name, size) in sizes {
            let valid = [size.width(), size.height()]
                .iter()
                .all(|side| side.is_finite() && *side > 0.0);
            if !valid {
                return Err(TrellisError::Config(format!(
                    "`layout.{name}` must have a positive width and height"
                )));
            }
        }
        Ok(())
    }
}
