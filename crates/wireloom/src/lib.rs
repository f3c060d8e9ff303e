//! Wireloom - wiring harness diagrams from a YAML description language.
//!
//! Parsing, resolution, and graph emission for harness descriptions:
//! connectors, cables, ferrules, and the point-to-point connections between
//! them become a Graphviz graph with per-pin ports and color-coded wires.

pub mod config;

mod error;
mod export;
mod graph;
mod label;

pub use wireloom_core::{colors, harness, pins};

pub use error::WireloomError;
pub use export::OutputFormat;

use std::path::Path;

use log::{debug, info, trace};

use dot_structures::Graph;
use graphviz_rust::printer::{DotPrinter, PrinterContext};

use wireloom_core::harness::Harness;

use config::AppConfig;
use graph::GraphEmitter;

/// Builder for parsing and rendering Wireloom harness descriptions.
///
/// This provides an API for processing harness documents through parsing,
/// connection resolution, graph emission, and rendering stages.
///
/// # Examples
///
/// ```rust,no_run
/// use wireloom::{HarnessBuilder, config::AppConfig};
///
/// let source = "nodes:\n  X1:\n    num_pins: 2\n";
///
/// // With custom config
/// let config = AppConfig::default();
/// let builder = HarnessBuilder::new(config);
///
/// // Parse source to a finalized harness
/// let harness = builder.parse(source)
///     .expect("Failed to parse");
///
/// // Emit the harness as Graphviz DOT text
/// let dot = builder.render_dot(&harness)
///     .expect("Failed to emit");
///
/// // Or use default config
/// let builder = HarnessBuilder::default();
/// ```
#[derive(Default)]
pub struct HarnessBuilder {
    config: AppConfig,
}

impl HarnessBuilder {
    /// Create a new harness builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including style settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse YAML source into a finalized harness.
    ///
    /// This deserializes the document sections and resolves every
    /// connection entry, instantiating implicit ferrules on the way, to
    /// produce a fully explicit harness model.
    ///
    /// # Errors
    ///
    /// Returns `WireloomError` for invalid YAML, entity-definition
    /// violations, and connection-resolution failures.
    pub fn parse(&self, source: &str) -> Result<Harness, WireloomError> {
        info!("Parsing harness document");

        let harness = wireloom_parser::parse(source)?;

        debug!("Harness document parsed successfully");
        trace!(harness:?; "Parsed harness");

        Ok(harness)
    }

    /// Emit the abstract graph for a finalized harness.
    ///
    /// The graph carries one styled node per connector and per cable and
    /// one edge per visible connection end; it is the renderer-agnostic
    /// form handed to the Graphviz toolchain.
    ///
    /// # Errors
    ///
    /// Returns `WireloomError` for configuration errors (unknown color
    /// mode), color-lookup failures, and invariant violations such as
    /// loops on a connector with no port side.
    pub fn build_graph(&self, harness: &Harness) -> Result<Graph, WireloomError> {
        info!("Emitting harness graph");

        let color_mode = self.config.style().color_mode()?;
        let emitter = GraphEmitter::new(harness, color_mode, self.config.style());
        let graph = emitter.emit()?;

        debug!("Graph emitted successfully");
        Ok(graph)
    }

    /// Render a finalized harness to Graphviz DOT text.
    ///
    /// # Errors
    ///
    /// Returns `WireloomError` for the same conditions as
    /// [`build_graph`](Self::build_graph).
    pub fn render_dot(&self, harness: &Harness) -> Result<String, WireloomError> {
        let graph = self.build_graph(harness)?;
        Ok(graph.print(&mut PrinterContext::default()))
    }

    /// Render a finalized harness to image files and a graph description.
    ///
    /// Asks the external Graphviz renderer to materialize one image per
    /// requested format at `<stem>.<ext>`, and writes the serialized graph
    /// description to `<stem>.gv`.
    ///
    /// # Errors
    ///
    /// Returns `WireloomError` for emission failures and for render or I/O
    /// failures reported by the Graphviz toolchain.
    pub fn render(
        &self,
        harness: &Harness,
        stem: &Path,
        formats: &[OutputFormat],
    ) -> Result<(), WireloomError> {
        let graph = self.build_graph(harness)?;

        info!(stem = stem.display().to_string(), formats = formats.len(); "Rendering diagram");
        export::export(&graph, stem, formats)?;

        info!("Diagram rendered successfully");
        Ok(())
    }
}
