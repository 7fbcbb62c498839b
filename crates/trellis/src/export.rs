//! Export of laid-out graphs.
//!
//! Trellis stops at positioned boxes; drawing them is left to whoever
//! consumes the output. The [`Exporter`] trait is the seam for that hand-off
//! and [`json::JsonExporter`] is the built-in backend.
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ parse
//! Graph Model
//!     ↓ layout
//! Positioned Graph Model
//!     ↓ export (this module)
//! Output
//! ```

pub mod json;

use trellis_core::graph::Graph;

use crate::TrellisError;

/// Abstraction for export backends.
pub trait Exporter {
    /// Writes `graph` in the backend's format.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Export`] when serialisation fails and
    /// [`TrellisError::Io`] when writing fails.
    fn export_graph(&mut self, graph: &Graph) -> Result<(), TrellisError>;
}
