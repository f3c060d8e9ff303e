//! Connection resolution.
//!
//! The resolver materializes the document's `nodes` and `wires` sections
//! into a [`Harness`], then walks the `connections` sequence in document
//! order, classifying every entry by shape and by which registries its
//! designators belong to. Triples become aligned pin-to-wire-to-pin
//! records, pairs become one-sided records, loops, or implicit ferrule
//! instantiations.

use log::{debug, trace};

use wireloom_core::{
    harness::{Cable, Category, Connector, Endpoint, Harness},
    pins::{self, Pin},
};

use crate::{
    document::{ConnectionEntry, Document, ElementSpec},
    error::ParseError,
};

/// How a pair connection's two designators classify against the
/// connector/cable/ferrule-spec registries. Checked in this order; the
/// first matching combination wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairKind {
    ConnectorCable,
    CableConnector,
    ConnectorConnector,
    FerruleCable,
    CableFerrule,
}

/// Resolves a raw document into a finalized harness.
pub fn resolve(document: &Document) -> Result<Harness, ParseError> {
    Resolver::new(document).run()
}

/// One resolution pass over a document.
///
/// Owns the ferrule-naming counter, so repeated runs over the same document
/// yield identical `F1..FN` names.
struct Resolver<'doc> {
    document: &'doc Document,
    harness: Harness,
    ferrule_counter: u32,
}

impl<'doc> Resolver<'doc> {
    fn new(document: &'doc Document) -> Self {
        Self {
            document,
            harness: Harness::new(),
            ferrule_counter: 0,
        }
    }

    fn run(mut self) -> Result<Harness, ParseError> {
        for (name, spec) in &self.document.nodes {
            self.harness
                .add_connector(Connector::new(name.clone(), spec.clone())?);
        }
        for (name, spec) in &self.document.wires {
            self.harness
                .add_cable(Cable::new(name.clone(), spec.clone())?);
        }

        for entry in &self.document.connections {
            match entry.len() {
                3 => self.resolve_triple(entry)?,
                2 => self.resolve_pair(entry)?,
                other => return Err(ParseError::WrongConnectionLength(other)),
            }
        }

        Ok(self.harness)
    }

    /// Resolves a `[connector, cable, connector]` entry into one record
    /// per aligned pin triple.
    fn resolve_triple(&mut self, entry: &ConnectionEntry) -> Result<(), ParseError> {
        let (from_name, from_spec) = entry[0].designator()?;
        let (via_name, via_spec) = entry[1].designator()?;
        let (to_name, to_spec) = entry[2].designator()?;

        if !self.harness.has_connector(from_name)
            || !self.harness.has_cable(via_name)
            || !self.harness.has_connector(to_name)
        {
            return Err(ParseError::BadTripleDesignators {
                from: from_name.to_string(),
                via: via_name.to_string(),
                to: to_name.to_string(),
            });
        }

        let from_pins = pins::expand(&from_spec);
        let via_pins = pins::expand(&via_spec);
        let to_pins = pins::expand(&to_spec);

        if from_pins.len() != via_pins.len() || via_pins.len() != to_pins.len() {
            return Err(ParseError::LengthMismatch(via_name.to_string()));
        }

        trace!(
            from = from_name,
            via = via_name,
            to = to_name,
            count = from_pins.len();
            "Resolving triple connection"
        );

        for ((from_pin, via_pin), to_pin) in from_pins.into_iter().zip(via_pins).zip(to_pins) {
            self.harness.connect(
                via_name,
                Some(Endpoint::new(from_name, from_pin)),
                &via_pin,
                Some(Endpoint::new(to_name, to_pin)),
            )?;
        }

        Ok(())
    }

    /// Resolves a two-element entry: a one-sided connection, a loop, or a
    /// ferrule instantiation.
    fn resolve_pair(&mut self, entry: &ConnectionEntry) -> Result<(), ParseError> {
        let (a_name, a_spec) = entry[0].designator()?;
        let (b_name, b_spec) = entry[1].designator()?;
        let a_name = a_name.to_string();
        let b_name = b_name.to_string();

        let kind = self.classify_pair(&a_name, &b_name)?;
        debug!(from = a_name, to = b_name, kind:? = kind; "Classified pair connection");

        let a_pins = pins::expand(&a_spec);
        let b_pins = pins::expand(&b_spec);

        match kind {
            PairKind::ConnectorCable => {
                self.check_lengths(&a_name, &a_pins, &b_pins)?;
                for (pin, via_pin) in a_pins.into_iter().zip(b_pins) {
                    self.harness.connect(
                        &b_name,
                        Some(Endpoint::new(a_name.as_str(), pin)),
                        &via_pin,
                        None,
                    )?;
                }
            }
            PairKind::CableConnector => {
                self.check_lengths(&a_name, &a_pins, &b_pins)?;
                for (via_pin, pin) in a_pins.into_iter().zip(b_pins) {
                    self.harness.connect(
                        &a_name,
                        None,
                        &via_pin,
                        Some(Endpoint::new(b_name.as_str(), pin)),
                    )?;
                }
            }
            PairKind::ConnectorConnector => {
                if a_name != b_name {
                    return Err(ParseError::LoopDesignatorMismatch {
                        from: a_name,
                        to: b_name,
                    });
                }
                self.check_lengths(&a_name, &a_pins, &b_pins)?;
                for (from_pin, to_pin) in a_pins.into_iter().zip(b_pins) {
                    self.harness.add_loop(&a_name, from_pin, to_pin)?;
                }
            }
            PairKind::FerruleCable => {
                self.instantiate_ferrules(&a_name, &b_name, b_pins, true)?;
            }
            PairKind::CableFerrule => {
                self.instantiate_ferrules(&b_name, &a_name, a_pins, false)?;
            }
        }

        Ok(())
    }

    fn classify_pair(&self, a: &str, b: &str) -> Result<PairKind, ParseError> {
        let harness = &self.harness;
        let ferrules = &self.document.ferrules;

        if harness.has_connector(a) && harness.has_cable(b) {
            Ok(PairKind::ConnectorCable)
        } else if harness.has_cable(a) && harness.has_connector(b) {
            Ok(PairKind::CableConnector)
        } else if harness.has_connector(a) && harness.has_connector(b) {
            Ok(PairKind::ConnectorConnector)
        } else if ferrules.contains_key(a) && harness.has_cable(b) {
            Ok(PairKind::FerruleCable)
        } else if harness.has_cable(a) && ferrules.contains_key(b) {
            Ok(PairKind::CableFerrule)
        } else {
            Err(ParseError::WrongDesignators {
                from: a.to_string(),
                to: b.to_string(),
            })
        }
    }

    fn check_lengths(&self, designator: &str, a: &[Pin], b: &[Pin]) -> Result<(), ParseError> {
        if a.len() != b.len() {
            return Err(ParseError::LengthMismatch(designator.to_string()));
        }
        Ok(())
    }

    /// Synthesizes one single-pin ferrule per wire pin and connects it.
    ///
    /// `ferrule_is_source` selects the direction: a ferrule-first pair puts
    /// the ferrule on the source side of each record, a cable-first pair on
    /// the destination side.
    fn instantiate_ferrules(
        &mut self,
        spec_name: &str,
        cable_name: &str,
        wire_pins: Vec<Pin>,
        ferrule_is_source: bool,
    ) -> Result<(), ParseError> {
        let spec = self
            .document
            .ferrules
            .get(spec_name)
            .ok_or_else(|| ParseError::MissingFerruleSpec(spec_name.to_string()))?;

        for wire_pin in wire_pins {
            self.ferrule_counter += 1;
            let name = format!("F{}", self.ferrule_counter);

            let mut spec = spec.clone();
            spec.category = Some(Category::Ferrule);
            self.harness
                .add_connector(Connector::new(name.as_str(), spec)?);

            debug!(ferrule = name, cable = cable_name; "Instantiated ferrule");

            let endpoint = Some(Endpoint::new(name.as_str(), Pin::Number(1)));
            if ferrule_is_source {
                self.harness.connect(cable_name, endpoint, &wire_pin, None)?;
            } else {
                self.harness.connect(cable_name, None, &wire_pin, endpoint)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;
    use wireloom_core::harness::WireRef;

    fn resolve_source(source: &str) -> Result<Harness, ParseError> {
        resolve(&parse_document(source)?)
    }

    #[test]
    fn test_triple_resolution_alignment() {
        let harness = resolve_source(
            r#"
nodes:
  A:
    num_pins: 3
  B:
    num_pins: 3
wires:
  W:
    num_wires: 3
    color_code: DIN
connections:
  - - A: [1, 2, 3]
    - W: [1, 2, 3]
    - B: [3, 2, 1]
"#,
        )
        .unwrap();

        let connections = harness.cable("W").unwrap().connections();
        assert_eq!(connections.len(), 3);

        let expected = [(1, 1, 3), (2, 2, 2), (3, 3, 1)];
        for (connection, (from, via, to)) in connections.iter().zip(expected) {
            assert_eq!(
                connection.from,
                Some(Endpoint::new("A", Pin::Number(from)))
            );
            assert_eq!(connection.via, WireRef::Wire(via));
            assert_eq!(connection.to, Some(Endpoint::new("B", Pin::Number(to))));
        }
    }

    #[test]
    fn test_triple_with_unknown_designator() {
        let err = resolve_source(
            "nodes:\n  A: {num_pins: 1}\nwires:\n  W: {num_wires: 1}\nconnections:\n  - [{A: 1}, {W: 1}, {C: 1}]\n",
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::BadTripleDesignators { .. }));
    }

    #[test]
    fn test_triple_length_mismatch() {
        let err = resolve_source(
            "nodes:\n  A: {num_pins: 3}\nwires:\n  W: {num_wires: 3}\nconnections:\n  - [{A: 1-3}, {W: 1-2}, {A: 1-3}]\n",
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::LengthMismatch(_)));
    }

    #[test]
    fn test_one_sided_pair_connections() {
        let harness = resolve_source(
            r#"
nodes:
  X1:
    num_pins: 2
wires:
  W1:
    colors: [RD, BK]
connections:
  - - X1: [1, 2]
    - W1: [1, 2]
"#,
        )
        .unwrap();

        let connections = harness.cable("W1").unwrap().connections();
        assert_eq!(connections.len(), 2);
        for connection in connections {
            assert!(connection.from.is_some());
            assert_eq!(connection.to, None);
        }
    }

    #[test]
    fn test_cable_first_pair_connects_destination() {
        let harness = resolve_source(
            "nodes:\n  X1: {num_pins: 1}\nwires:\n  W1: {colors: [RD]}\nconnections:\n  - [{W1: 1}, {X1: 1}]\n",
        )
        .unwrap();

        let connections = harness.cable("W1").unwrap().connections();
        assert_eq!(connections[0].from, None);
        assert_eq!(
            connections[0].to,
            Some(Endpoint::new("X1", Pin::Number(1)))
        );
    }

    #[test]
    fn test_loop_pair_registers_loops_not_connections() {
        let harness = resolve_source(
            r#"
nodes:
  X1:
    num_pins: 4
wires:
  W1:
    colors: [RD]
connections:
  - - X1: [1, 2]
    - X1: [4, 3]
"#,
        )
        .unwrap();

        let connector = harness.connector("X1").unwrap();
        assert_eq!(
            connector.loops(),
            &[
                (Pin::Number(1), Pin::Number(4)),
                (Pin::Number(2), Pin::Number(3)),
            ]
        );
        assert!(harness.cable("W1").unwrap().connections().is_empty());
    }

    #[test]
    fn test_ferrule_auto_naming_in_document_order() {
        let harness = resolve_source(
            r#"
nodes:
  X1:
    num_pins: 4
wires:
  W1:
    num_wires: 4
    color_code: DIN
ferrules:
  crimp:
    type: Crimp
    color: RD
connections:
  - - crimp
    - W1: [1, 2, 3]
  - - W1: 4
    - crimp
"#,
        )
        .unwrap();

        for (index, expected_pins) in [("F1", 1), ("F2", 1), ("F3", 1), ("F4", 1)] {
            let ferrule = harness.connector(index).unwrap();
            assert_eq!(ferrule.category(), Category::Ferrule);
            assert_eq!(ferrule.pinout().len(), expected_pins);
        }

        let connections = harness.cable("W1").unwrap().connections();
        assert_eq!(connections.len(), 4);

        // Ferrule-first pairs put the ferrule on the source side.
        assert_eq!(
            connections[0].from,
            Some(Endpoint::new("F1", Pin::Number(1)))
        );
        assert_eq!(connections[0].to, None);

        // Cable-first pairs put it on the destination side.
        assert_eq!(connections[3].from, None);
        assert_eq!(
            connections[3].to,
            Some(Endpoint::new("F4", Pin::Number(1)))
        );
        assert_eq!(connections[3].via, WireRef::Wire(4));
    }

    #[test]
    fn test_wrong_designators() {
        let err = resolve_source(
            "nodes:\n  X1: {num_pins: 1}\nwires:\n  W1: {colors: [RD]}\nconnections:\n  - [{Y1: 1}, {Z1: 1}]\n",
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::WrongDesignators { .. }));
    }

    #[test]
    fn test_wrong_entry_length() {
        let err = resolve_source(
            "nodes:\n  X1: {num_pins: 1}\nconnections:\n  - [{X1: 1}]\n",
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::WrongConnectionLength(1)));
    }

    #[test]
    fn test_connector_pair_with_different_names_is_rejected() {
        let err = resolve_source(
            "nodes:\n  X1: {num_pins: 1}\n  X2: {num_pins: 1}\nconnections:\n  - [{X1: 1}, {X2: 1}]\n",
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::LoopDesignatorMismatch { .. }));
    }

    #[test]
    fn test_shield_connection() {
        let harness = resolve_source(
            "nodes:\n  X1: {num_pins: 1}\nwires:\n  W1: {colors: [RD], shield: true}\nconnections:\n  - [{X1: 1}, {W1: s}]\n",
        )
        .unwrap();

        let connections = harness.cable("W1").unwrap().connections();
        assert_eq!(connections[0].via, WireRef::Shield);
    }

    #[test]
    fn test_resolution_is_reproducible() {
        let source = r#"
nodes:
  X1:
    num_pins: 2
wires:
  W1:
    colors: [RD, BK]
ferrules:
  crimp:
    color: BK
connections:
  - - crimp
    - W1: [1, 2]
"#;
        let document = parse_document(source).unwrap();
        let first = resolve(&document).unwrap();
        let second = resolve(&document).unwrap();

        let names = |h: &Harness| h.connectors().map(|c| c.name().to_string()).collect::<Vec<_>>();
        assert_eq!(names(&first), names(&second));
        assert_eq!(names(&first), vec!["X1", "F1", "F2"]);
    }
}
