//! Adapters turning pipeline errors into miette reportables.
//!
//! Wireloom errors carry no source spans (the failure modes are semantic,
//! not syntactic), so each error maps to a single diagnostic with a help
//! text chosen per error class.

use miette::Diagnostic;
use thiserror::Error;

use wireloom::WireloomError;
use wireloom_parser::ParseError;

/// A single reportable diagnostic for terminal rendering.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct Reportable {
    message: String,

    #[help]
    help: Option<String>,
}

/// Converts a pipeline error into the diagnostics to render.
pub fn to_reportables(err: &WireloomError) -> Vec<Reportable> {
    vec![Reportable {
        message: err.to_string(),
        help: help_for(err),
    }]
}

fn help_for(err: &WireloomError) -> Option<String> {
    let help = match err {
        WireloomError::Parse(parse) => match parse {
            ParseError::Yaml(_) => "the input file must be a YAML mapping with nodes, wires, ferrules, and connections sections",
            ParseError::WrongConnectionLength(_) => {
                "a connection is either [connector, cable, connector] or a two-element pair"
            }
            ParseError::LengthMismatch(_) => {
                "every side of a connection must expand to the same number of pins"
            }
            ParseError::WrongDesignators { .. } | ParseError::BadTripleDesignators { .. } => {
                "designators must name declared nodes, wires, or ferrule specs"
            }
            _ => return None,
        },
        WireloomError::Config(_) => "check the TOML configuration file",
        WireloomError::Export(_) => "is the Graphviz 'dot' executable installed and on PATH?",
        _ => return None,
    };
    Some(help.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reportable_carries_message() {
        let err = WireloomError::Graph("boom".to_string());
        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        assert_eq!(reportables[0].to_string(), "Graph error: boom");
    }

    #[test]
    fn test_arity_errors_get_help() {
        let err = WireloomError::Parse(ParseError::LengthMismatch("W1".to_string()));
        let reportables = to_reportables(&err);
        assert!(reportables[0].help.is_some());
    }
}
