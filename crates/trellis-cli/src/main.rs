//! Trellis CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info, warn};
use miette::{Diagnostic as MietteDiagnostic, GraphicalReportHandler};

use trellis_cli::{
    Args,
    error_adapter::{DiagnosticAdapter, to_reportables},
};

fn render(reporter: &GraphicalReportHandler, diagnostic: &dyn MietteDiagnostic) -> String {
    let mut writer = String::new();
    reporter
        .render_report(&mut writer, diagnostic)
        .expect("Writing to String buffer is infallible");
    writer
}

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Trellis");
    debug!(args:?; "Parsed arguments");

    let reporter = GraphicalReportHandler::new();
    match trellis_cli::run(&args) {
        Ok(summary) => {
            for diagnostic in &summary.diagnostics {
                let adapter = DiagnosticAdapter::new(diagnostic, &summary.source);
                warn!("{}", render(&reporter, &adapter));
            }
            info!(warnings = summary.diagnostics.len(); "Completed successfully");
        }
        Err(err) => {
            // Render each diagnostic independently
            for reportable in to_reportables(&err) {
                error!("{}", render(&reporter, &reportable));
            }
            process::exit(1);
        }
    }
}
