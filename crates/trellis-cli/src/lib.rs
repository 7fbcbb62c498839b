//! Trellis CLI library
//!
//! This module contains the core CLI logic for the Trellis diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use config::{ConfigError, load_config};

use std::{
    fs::{self, File},
    io::{self, BufWriter},
};

use log::info;

use trellis::{
    Diagnostic, DiagramBuilder, TrellisError,
    export::{Exporter, json::JsonExporter},
};

/// What a successful run leaves behind for reporting.
#[derive(Debug)]
pub struct RunSummary {
    /// The input text, for rendering diagnostics with snippets.
    pub source: String,
    /// Warnings that did not stop the run.
    pub diagnostics: Vec<Diagnostic>,
}

/// Run the Trellis CLI application
///
/// This function processes the input file through the Trellis pipeline
/// and writes the laid-out graph as JSON to the output file, or to stdout
/// when no output file is given.
///
/// # Errors
///
/// Returns `TrellisError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Any diagnostic when `--strict` is set
/// - Serialisation errors
pub fn run(args: &Args) -> Result<RunSummary, TrellisError> {
    info!(
        input_path = args.input,
        output_path:? = args.output,
        strict = args.strict;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config).with_strict(args.strict);
    let diagram = builder.build(&source)?;

    match &args.output {
        Some(path) => {
            let mut exporter = JsonExporter::new(BufWriter::new(File::create(path)?)).with_pretty(true);
            exporter.export_graph(&diagram.graph)?;
            info!(output_file = path; "JSON exported successfully");
        }
        None => {
            let mut exporter = JsonExporter::new(io::stdout().lock()).with_pretty(true);
            exporter.export_graph(&diagram.graph)?;
        }
    }

    Ok(RunSummary {
        source,
        diagnostics: diagram.diagnostics,
    })
}
