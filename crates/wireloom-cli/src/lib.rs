//! CLI logic for the Wireloom harness diagram tool.
//!
//! This module contains the core CLI logic for the Wireloom harness
//! diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;

use wireloom::{HarnessBuilder, OutputFormat, WireloomError};

/// Run the Wireloom CLI application
///
/// This function processes the input file through the Wireloom pipeline
/// and renders the requested image formats plus the graph description
/// next to them.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `WireloomError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing and connection-resolution errors
/// - Graph emission errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), WireloomError> {
    info!(input_path = args.input; "Processing harness");

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;

    // Parse the requested output formats
    let formats = args
        .format
        .iter()
        .map(|format| format.parse::<OutputFormat>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| WireloomError::Config(err.to_string()))?;

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    // Process the harness using the HarnessBuilder API
    let builder = HarnessBuilder::new(app_config);
    let harness = builder.parse(&source)?;

    let stem = output_stem(args);
    builder.render(&harness, &stem, &formats)?;

    info!(output_stem = stem.display().to_string(); "Diagram exported successfully");

    Ok(())
}

/// The output path stem: `--output` when given, else the input path with
/// its extension dropped.
fn output_stem(args: &Args) -> PathBuf {
    match &args.output {
        Some(output) => PathBuf::from(output),
        None => Path::new(&args.input).with_extension(""),
    }
}
