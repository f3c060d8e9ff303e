//! Parser for Wireloom harness descriptions.
//!
//! This crate turns YAML source text into a finalized
//! [`Harness`](wireloom_core::harness::Harness) in two stages: the
//! [`document`] module deserializes the raw document (tolerating absent or
//! misshapen sections), and the [`resolve`] module materializes entities
//! and resolves the compact connection syntax into explicit connection
//! records.

pub mod document;
pub mod error;
pub mod resolve;

pub use error::ParseError;

use wireloom_core::harness::Harness;

/// Parses YAML source into a finalized harness.
///
/// # Errors
///
/// Returns [`ParseError`] for invalid YAML, entity-definition violations,
/// and connection-resolution failures. The first violated invariant aborts
/// the parse.
pub fn parse(source: &str) -> Result<Harness, ParseError> {
    let document = document::parse_document(source)?;
    resolve::resolve(&document)
}
