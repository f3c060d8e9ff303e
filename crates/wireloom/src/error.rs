//! Error types for Wireloom operations.
//!
//! This module provides the main error type [`WireloomError`] which wraps
//! the error conditions that can occur while processing a harness document
//! into a rendered diagram.

use std::io;

use thiserror::Error;

use wireloom_core::colors::ColorError;
use wireloom_parser::error::ParseError;

/// The main error type for Wireloom operations.
///
/// Every variant is fatal: the first violated invariant aborts the run and
/// no partial diagram is produced.
#[derive(Debug, Error)]
pub enum WireloomError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Color error: {0}")]
    Color(#[from] ColorError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for WireloomError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
