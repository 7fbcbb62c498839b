//! JSON export.
//!
//! The document has a `title`, a `nodes` array in declaration order and an
//! `edges` array. Each node carries `id`, `label`, `kind`, `parent`,
//! `properties`, `rank`, `position` (`{x, y}` or `null`) and `size`
//! (`{width, height}`). Each edge carries `source`, `target`, `kind`, `label`
//! and `back_edge`.

use std::io::Write;

use log::debug;

use trellis_core::graph::Graph;

use super::Exporter;
use crate::TrellisError;

/// Writes graphs as JSON to any [`Write`] sink.
#[derive(Debug)]
pub struct JsonExporter<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonExporter<W> {
    /// Creates a compact exporter.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
        }
    }

    /// Indent the output.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Exporter for JsonExporter<W> {
    fn export_graph(&mut self, graph: &Graph) -> Result<(), TrellisError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, graph)?;
        } else {
            serde_json::to_writer(&mut self.writer, graph)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        debug!(nodes = graph.node_count(), pretty = self.pretty; "Graph exported as JSON");
        Ok(())
    }
}

/// Serialises `graph` to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns [`TrellisError::Export`] if serialisation fails.
pub fn to_json(graph: &Graph) -> Result<String, TrellisError> {
    Ok(serde_json::to_string_pretty(graph)?)
}
