//! Error types for document parsing and connection resolution.
//!
//! Every variant is fatal: the run aborts on the first violated invariant
//! and produces no partial output. Absent document sections are reported as
//! warnings during parsing, not as errors.

use thiserror::Error;

use wireloom_core::harness::ModelError;

/// The error type for the parsing and resolution stages.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid {section} entry '{name}': {source}")]
    Entity {
        section: &'static str,
        name: String,
        source: serde_yaml::Error,
    },

    #[error("{section} entry has a non-string name")]
    NonStringKey { section: &'static str },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("connection element must be a mapping with exactly one designator key")]
    InvalidElement,

    #[error("connection entry must have 2 or 3 elements, got {0}")]
    WrongConnectionLength(usize),

    #[error(
        "bad connection definition ({from}, {via}, {to}): expected connector, cable, connector"
    )]
    BadTripleDesignators {
        from: String,
        via: String,
        to: String,
    },

    #[error("wrong designators in pair connection ({from}, {to})")]
    WrongDesignators { from: String, to: String },

    #[error("loop connection must reference the same connector on both sides, got '{from}' and '{to}'")]
    LoopDesignatorMismatch { from: String, to: String },

    #[error("pin list length mismatch in connection involving '{0}'")]
    LengthMismatch(String),

    #[error("no ferrule specification found for '{0}'")]
    MissingFerruleSpec(String),
}
