//! The raw document layer.
//!
//! A harness document is a YAML mapping with four top-level sections:
//! `nodes` and `wires` (name → attribute mappings), `ferrules` (name →
//! attribute template, instantiated only through pair connections), and
//! `connections` (an ordered sequence of connection entries). A section
//! that is absent, or whose value has the wrong container shape, is treated
//! as empty and reported with a warning.

use indexmap::IndexMap;
use log::warn;
use serde::Deserialize;
use serde_yaml::Value;

use wireloom_core::{
    harness::{CableSpec, ConnectorSpec},
    pins::{PinSpec, PinToken},
};

use crate::error::ParseError;

/// The raw input document, sections resolved but connections unprocessed.
#[derive(Debug, Default)]
pub struct Document {
    pub nodes: IndexMap<String, ConnectorSpec>,
    pub wires: IndexMap<String, CableSpec>,
    pub ferrules: IndexMap<String, ConnectorSpec>,
    pub connections: Vec<ConnectionEntry>,
}

/// One raw connection entry; valid entries have two or three elements.
pub type ConnectionEntry = Vec<ElementSpec>;

/// One element of a connection entry.
///
/// Either a single-key mapping of designator → pin designator(s), or a bare
/// designator string — shorthand for `{designator: designator}`, used to
/// reference ferrule specs and loops by name alone.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ElementSpec {
    Shorthand(String),
    Pins(IndexMap<String, PinSpec>),
}

impl ElementSpec {
    /// Resolves this element to its designator and pin designator.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidElement`] when a mapping element does
    /// not have exactly one key.
    pub fn designator(&self) -> Result<(&str, PinSpec), ParseError> {
        match self {
            ElementSpec::Shorthand(name) => {
                Ok((name, PinSpec::One(PinToken::Text(name.clone()))))
            }
            ElementSpec::Pins(pins) => {
                if pins.len() != 1 {
                    return Err(ParseError::InvalidElement);
                }
                let (name, spec) = pins.iter().next().expect("length checked above");
                Ok((name, spec.clone()))
            }
        }
    }
}

/// Parses YAML source into a raw [`Document`].
pub fn parse_document(source: &str) -> Result<Document, ParseError> {
    let root: Value = serde_yaml::from_str(source)?;

    Ok(Document {
        nodes: mapping_section(&root, "nodes")?,
        wires: mapping_section(&root, "wires")?,
        ferrules: mapping_section(&root, "ferrules")?,
        connections: sequence_section(&root, "connections")?,
    })
}

/// Extracts a name → entity section, tolerating absence and wrong shapes.
fn mapping_section<T>(root: &Value, section: &'static str) -> Result<IndexMap<String, T>, ParseError>
where
    T: serde::de::DeserializeOwned,
{
    let mapping = match root.get(section) {
        Some(Value::Mapping(mapping)) => mapping,
        Some(_) => {
            warn!(section = section; "section has the wrong shape, treating as empty");
            return Ok(IndexMap::new());
        }
        None => {
            warn!(section = section; "no section found");
            return Ok(IndexMap::new());
        }
    };

    if mapping.is_empty() {
        warn!(section = section; "section is empty");
    }

    mapping
        .iter()
        .map(|(key, value)| {
            let name = key
                .as_str()
                .ok_or(ParseError::NonStringKey { section })?
                .to_string();
            let entity = serde_yaml::from_value(value.clone()).map_err(|source| {
                ParseError::Entity {
                    section,
                    name: name.clone(),
                    source,
                }
            })?;
            Ok((name, entity))
        })
        .collect()
}

/// Extracts the ordered connection-entry section.
fn sequence_section(root: &Value, section: &'static str) -> Result<Vec<ConnectionEntry>, ParseError> {
    let sequence = match root.get(section) {
        Some(Value::Sequence(sequence)) => sequence,
        Some(_) => {
            warn!(section = section; "section has the wrong shape, treating as empty");
            return Ok(Vec::new());
        }
        None => {
            warn!(section = section; "no section found");
            return Ok(Vec::new());
        }
    };

    if sequence.is_empty() {
        warn!(section = section; "section is empty");
    }

    sequence
        .iter()
        .enumerate()
        .map(|(index, value)| {
            serde_yaml::from_value(value.clone()).map_err(|source| ParseError::Entity {
                section,
                name: index.to_string(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_document() {
        let source = r#"
nodes:
  X1:
    type: Molex
    num_pins: 2
wires:
  W1:
    colors: [RD, BK]
ferrules:
  F_crimp:
    type: Crimp
    color: RD
connections:
  - - X1: [1, 2]
    - W1: [1, 2]
    - X1: [2, 1]
"#;
        let document = parse_document(source).unwrap();
        assert_eq!(document.nodes.len(), 1);
        assert_eq!(document.wires.len(), 1);
        assert_eq!(document.ferrules.len(), 1);
        assert_eq!(document.connections.len(), 1);
        assert_eq!(document.connections[0].len(), 3);
    }

    #[test]
    fn test_absent_sections_resolve_to_empty() {
        let document = parse_document("nodes:\n  X1: {}\n").unwrap();
        assert_eq!(document.nodes.len(), 1);
        assert!(document.wires.is_empty());
        assert!(document.ferrules.is_empty());
        assert!(document.connections.is_empty());
    }

    #[test]
    fn test_wrong_shape_section_resolves_to_empty() {
        let document = parse_document("nodes: [X1, X2]\nwires: scalar\n").unwrap();
        assert!(document.nodes.is_empty());
        assert!(document.wires.is_empty());
    }

    #[test]
    fn test_unknown_entity_key_is_rejected() {
        let source = "nodes:\n  X1:\n    pincount: 4\n";
        assert!(matches!(
            parse_document(source),
            Err(ParseError::Entity { section: "nodes", .. })
        ));
    }

    #[test]
    fn test_shorthand_element() {
        let source = "connections:\n  - - F_crimp\n    - W1: 1-4\n";
        let document = parse_document(source).unwrap();
        let (name, pins) = document.connections[0][0].designator().unwrap();
        assert_eq!(name, "F_crimp");
        assert_eq!(pins, PinSpec::One(PinToken::Text("F_crimp".to_string())));
    }

    #[test]
    fn test_multi_key_element_is_rejected() {
        let source = "connections:\n  - - X1: 1\n      X2: 2\n    - W1: 1\n";
        let document = parse_document(source).unwrap();
        assert!(matches!(
            document.connections[0][0].designator(),
            Err(ParseError::InvalidElement)
        ));
    }
}
