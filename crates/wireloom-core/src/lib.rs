//! Wireloom Core Types and Definitions
//!
//! This crate provides the foundational types for the Wireloom harness
//! description language. It includes:
//!
//! - **Pins**: Pin identifiers and pin-range expansion ([`pins`] module)
//! - **Colors**: Wire color codes, lookup tables, and display modes
//!   ([`colors`] module)
//! - **Harness**: The harness data model — connectors, cables, and the
//!   connections between them ([`harness`] module)

pub mod colors;
pub mod harness;
pub mod pins;
