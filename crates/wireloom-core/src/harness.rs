//! The harness data model.
//!
//! A [`Harness`] is the aggregate root of one run: it owns every
//! [`Connector`] and [`Cable`] by name, in declaration order. Entities are
//! constructed from validated spec records ([`ConnectorSpec`],
//! [`CableSpec`]) whose invariants are checked at construction time, and
//! are never removed once the document is processed.

use std::fmt;

use indexmap::IndexMap;
use log::trace;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    colors::{self, ColorError},
    pins::{Pin, PinToken},
};

/// Errors raised while building harness entities or recording connections.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("connector '{0}': cannot specify both pinout and num_pins")]
    PinoutConflict(String),

    #[error("cable '{0}': cannot define both mm2 and awg")]
    CrossSectionConflict(String),

    #[error("cable '{0}': unknown number of wires, specify num_wires or colors")]
    UnknownWireCount(String),

    #[error("cable '{cable}': wire {index} does not exist")]
    UnknownWire { cable: String, index: u32 },

    #[error("unknown connector '{0}'")]
    UnknownConnector(String),

    #[error("unknown cable '{0}'")]
    UnknownCable(String),

    #[error(transparent)]
    Color(#[from] ColorError),
}

/// The category of a connector.
///
/// Compared by value; the original tool's stringly category is a closed set
/// of two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// An ordinary multi-pin connector.
    #[default]
    Connector,
    /// A single-pin crimp ferrule, instantiated implicitly per wire end.
    Ferrule,
}

fn default_true() -> bool {
    true
}

/// Raw connector attributes as authored in the input document.
///
/// Invariants are checked when the spec is turned into a [`Connector`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectorSpec {
    #[serde(default)]
    pub category: Option<Category>,

    /// Connector type label, e.g. "Molex KK 254".
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub gender: Option<String>,

    #[serde(default)]
    pub num_pins: Option<usize>,

    /// Explicit pin labels, mutually exclusive with `num_pins`.
    #[serde(default)]
    pub pinout: Vec<PinToken>,

    /// Wire color abbreviation, used by ferrules.
    #[serde(default)]
    pub color: Option<String>,

    #[serde(default = "default_true")]
    pub show_name: bool,

    #[serde(rename = "show_num_pins", default = "default_true")]
    pub show_pin_count: bool,
}

/// A physical plug, socket, or ferrule with one or more pins.
#[derive(Debug, Clone)]
pub struct Connector {
    name: String,
    category: Category,
    kind: Option<String>,
    gender: Option<String>,
    color: Option<String>,
    pinout: Vec<String>,
    show_name: bool,
    show_pin_count: bool,
    loops: Vec<(Pin, Pin)>,
}

impl Connector {
    /// Builds a connector from its spec record.
    ///
    /// Exactly one of an explicit pinout or a pin count may be given; with
    /// neither, the connector defaults to a single unnamed pin.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PinoutConflict`] when both a pinout and a pin
    /// count are specified.
    pub fn new(name: impl Into<String>, spec: ConnectorSpec) -> Result<Self, ModelError> {
        let name = name.into();

        let pinout = if spec.pinout.is_empty() {
            let num_pins = match spec.num_pins {
                Some(n) if n > 0 => n,
                _ => 1,
            };
            vec![String::new(); num_pins]
        } else {
            if spec.num_pins.is_some() {
                return Err(ModelError::PinoutConflict(name));
            }
            spec.pinout.iter().map(PinToken::to_string).collect()
        };

        Ok(Self {
            name,
            category: spec.category.unwrap_or_default(),
            kind: spec.kind,
            gender: spec.gender,
            color: spec.color,
            pinout,
            show_name: spec.show_name,
            show_pin_count: spec.show_pin_count,
            loops: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Ordered pin display labels; unnamed pins are empty strings.
    pub fn pinout(&self) -> &[String] {
        &self.pinout
    }

    pub fn show_name(&self) -> bool {
        self.show_name
    }

    pub fn show_pin_count(&self) -> bool {
        self.show_pin_count
    }

    /// Internal jumpers between pin pairs on this connector.
    pub fn loops(&self) -> &[(Pin, Pin)] {
        &self.loops
    }

    fn add_loop(&mut self, from_pin: Pin, to_pin: Pin) {
        self.loops.push((from_pin, to_pin));
    }
}

/// Raw cable attributes as authored in the input document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CableSpec {
    /// Cable type label; `"bundle"` selects the dashed rendering style.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    /// Cross-sectional area in mm², mutually exclusive with `awg`.
    #[serde(default)]
    pub mm2: Option<f64>,

    /// Wire gauge (AWG), mutually exclusive with `mm2`.
    #[serde(default)]
    pub awg: Option<u32>,

    /// Annotate the cross-section with its AWG equivalent.
    #[serde(default)]
    pub show_equiv: bool,

    /// Physical length in meters.
    #[serde(default)]
    pub length: f64,

    #[serde(default)]
    pub num_wires: Option<usize>,

    #[serde(default)]
    pub shield: bool,

    /// Explicit wire color abbreviations.
    #[serde(default)]
    pub colors: Vec<String>,

    /// Named color-code standard to assign colors by position.
    #[serde(default)]
    pub color_code: Option<String>,

    #[serde(default = "default_true")]
    pub show_name: bool,

    #[serde(default = "default_true")]
    pub show_num_wires: bool,
}

/// A bundle of one or more colored wires, optionally shielded.
///
/// Owns the ordered [`Connection`] records appended during resolution.
#[derive(Debug, Clone)]
pub struct Cable {
    name: String,
    kind: Option<String>,
    mm2: Option<f64>,
    awg: Option<u32>,
    show_equiv: bool,
    length: f64,
    shield: bool,
    colors: Vec<String>,
    show_name: bool,
    show_num_wires: bool,
    connections: Vec<Connection>,
}

impl Cable {
    /// Builds a cable from its spec record.
    ///
    /// The wire count comes either from an explicit `num_wires` (with the
    /// colors drawn from the explicit list, a named color-code standard, or
    /// left unassigned), or implicitly from the length of the color list.
    /// A color source shorter than the wire count is cycled, then truncated
    /// to the exact count.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::CrossSectionConflict`] when both `mm2` and
    /// `awg` are given, [`ModelError::UnknownWireCount`] when neither a
    /// wire count nor colors are given, and a [`ColorError`] for an unknown
    /// color-code standard.
    pub fn new(name: impl Into<String>, spec: CableSpec) -> Result<Self, ModelError> {
        let name = name.into();

        if spec.mm2.is_some() && spec.awg.is_some() {
            return Err(ModelError::CrossSectionConflict(name));
        }

        let colors = match spec.num_wires {
            Some(num_wires) => {
                let source = if !spec.colors.is_empty() {
                    spec.colors
                } else if let Some(code) = &spec.color_code {
                    colors::color_code(code)?
                        .iter()
                        .map(|c| c.to_string())
                        .collect()
                } else {
                    // No colors defined; unnamed wires.
                    vec![String::new(); num_wires]
                };
                colors::cycle_to_count(&source, num_wires)
            }
            None => {
                if spec.colors.is_empty() {
                    return Err(ModelError::UnknownWireCount(name));
                }
                spec.colors
            }
        };

        Ok(Self {
            name,
            kind: spec.kind,
            mm2: spec.mm2,
            awg: spec.awg,
            show_equiv: spec.show_equiv,
            length: spec.length,
            shield: spec.shield,
            colors,
            show_name: spec.show_name,
            show_num_wires: spec.show_num_wires,
            connections: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn mm2(&self) -> Option<f64> {
        self.mm2
    }

    pub fn awg(&self) -> Option<u32> {
        self.awg
    }

    pub fn show_equiv(&self) -> bool {
        self.show_equiv
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn shield(&self) -> bool {
        self.shield
    }

    /// Ordered wire color abbreviations; one entry per wire.
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn num_wires(&self) -> usize {
        self.colors.len()
    }

    pub fn show_name(&self) -> bool {
        self.show_name
    }

    pub fn show_num_wires(&self) -> bool {
        self.show_num_wires
    }

    /// Connection records in resolution order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// The color abbreviation of a wire position, when it is a numbered
    /// wire within range.
    pub fn wire_color(&self, via: &WireRef) -> Option<&str> {
        match via {
            WireRef::Wire(index) => self.colors.get(*index as usize - 1).map(String::as_str),
            WireRef::Shield => None,
        }
    }
}

/// A wire position inside a cable: a numbered wire (1-based) or the shield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireRef {
    Wire(u32),
    Shield,
}

impl WireRef {
    /// Classifies a via-pin: positive numbers are wire indices, anything
    /// else denotes the shield.
    pub fn from_pin(pin: &Pin) -> Self {
        match pin {
            Pin::Number(n) if *n > 0 => WireRef::Wire(*n as u32),
            _ => WireRef::Shield,
        }
    }
}

impl fmt::Display for WireRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireRef::Wire(n) => write!(f, "{n}"),
            WireRef::Shield => write!(f, "s"),
        }
    }
}

/// One visible end of a connection: a connector and the pin it attaches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub connector: String,
    pub pin: Pin,
}

impl Endpoint {
    pub fn new(connector: impl Into<String>, pin: Pin) -> Self {
        Self {
            connector: connector.into(),
            pin,
        }
    }
}

/// One resolved pin-to-wire-to-pin link.
///
/// A `None` side means the wire end attaches to nothing visible on that
/// side (one-sided pair connections).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub from: Option<Endpoint>,
    pub via: WireRef,
    pub to: Option<Endpoint>,
}

/// The aggregate root: every connector and cable of one harness, by name,
/// in declaration order.
///
/// Iteration order over connectors and cables is the insertion order; it
/// drives the order in which graph nodes are emitted and is an observable
/// contract.
#[derive(Debug, Default)]
pub struct Harness {
    connectors: IndexMap<String, Connector>,
    cables: IndexMap<String, Cable>,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_connector(&mut self, connector: Connector) {
        self.connectors.insert(connector.name().to_string(), connector);
    }

    pub fn add_cable(&mut self, cable: Cable) {
        self.cables.insert(cable.name().to_string(), cable);
    }

    pub fn connector(&self, name: &str) -> Option<&Connector> {
        self.connectors.get(name)
    }

    pub fn cable(&self, name: &str) -> Option<&Cable> {
        self.cables.get(name)
    }

    pub fn has_connector(&self, name: &str) -> bool {
        self.connectors.contains_key(name)
    }

    pub fn has_cable(&self, name: &str) -> bool {
        self.cables.contains_key(name)
    }

    /// Connectors in declaration order.
    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.connectors.values()
    }

    /// Cables in declaration order.
    pub fn cables(&self) -> impl Iterator<Item = &Cable> {
        self.cables.values()
    }

    /// Registers an internal jumper between two pins of one connector.
    pub fn add_loop(&mut self, connector: &str, from_pin: Pin, to_pin: Pin) -> Result<(), ModelError> {
        let connector = self
            .connectors
            .get_mut(connector)
            .ok_or_else(|| ModelError::UnknownConnector(connector.to_string()))?;
        connector.add_loop(from_pin, to_pin);
        Ok(())
    }

    /// Appends one connection record to the named cable.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownCable`] for an unregistered cable and
    /// [`ModelError::UnknownWire`] when a numbered wire position exceeds
    /// the cable's wire count.
    pub fn connect(
        &mut self,
        cable: &str,
        from: Option<Endpoint>,
        via: &Pin,
        to: Option<Endpoint>,
    ) -> Result<(), ModelError> {
        let cable = self
            .cables
            .get_mut(cable)
            .ok_or_else(|| ModelError::UnknownCable(cable.to_string()))?;

        let via = WireRef::from_pin(via);
        if let WireRef::Wire(index) = via {
            if index as usize > cable.colors.len() {
                return Err(ModelError::UnknownWire {
                    cable: cable.name.clone(),
                    index,
                });
            }
        }

        trace!(cable = cable.name, via:? = via; "Recording connection");
        cable.connections.push(Connection { from, via, to });
        Ok(())
    }
}

/// The AWG equivalent of a cross-section in mm², when the section is one
/// of the standard sizes.
pub fn awg_equivalent(mm2: f64) -> Option<u32> {
    // Match on hundredths to sidestep float formatting.
    match (mm2 * 100.0).round() as i64 {
        9 => Some(28),
        14 => Some(26),
        25 => Some(24),
        34 => Some(22),
        50 => Some(21),
        75 => Some(20),
        100 => Some(18),
        150 => Some(16),
        250 => Some(14),
        400 => Some(12),
        600 => Some(10),
        1000 => Some(8),
        1600 => Some(6),
        2500 => Some(4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pins(tokens: &[&str]) -> Vec<PinToken> {
        tokens.iter().map(|t| PinToken::Text(t.to_string())).collect()
    }

    #[test]
    fn test_connector_defaults_to_single_unnamed_pin() {
        let connector = Connector::new("X1", ConnectorSpec::default()).unwrap();
        assert_eq!(connector.pinout(), &[String::new()]);
        assert_eq!(connector.category(), Category::Connector);
        assert!(connector.show_name());
    }

    #[test]
    fn test_connector_num_pins() {
        let spec = ConnectorSpec {
            num_pins: Some(3),
            ..ConnectorSpec::default()
        };
        let connector = Connector::new("X1", spec).unwrap();
        assert_eq!(connector.pinout().len(), 3);
    }

    #[test]
    fn test_connector_pinout_and_num_pins_conflict() {
        let spec = ConnectorSpec {
            num_pins: Some(2),
            pinout: pins(&["GND", "VCC"]),
            ..ConnectorSpec::default()
        };
        assert!(matches!(
            Connector::new("X1", spec),
            Err(ModelError::PinoutConflict(_))
        ));
    }

    #[test]
    fn test_cable_mm2_awg_conflict() {
        let spec = CableSpec {
            mm2: Some(0.25),
            awg: Some(24),
            colors: vec!["RD".to_string()],
            ..CableSpec::default()
        };
        assert!(matches!(
            Cable::new("W1", spec),
            Err(ModelError::CrossSectionConflict(_))
        ));
    }

    #[test]
    fn test_cable_wire_count_from_colors() {
        let spec = CableSpec {
            colors: vec!["RD".to_string(), "BK".to_string()],
            ..CableSpec::default()
        };
        let cable = Cable::new("W1", spec).unwrap();
        assert_eq!(cable.num_wires(), 2);
    }

    #[test]
    fn test_cable_color_code_cycling() {
        let spec = CableSpec {
            num_wires: Some(23),
            color_code: Some("DIN".to_string()),
            ..CableSpec::default()
        };
        let cable = Cable::new("W1", spec).unwrap();
        assert_eq!(cable.num_wires(), 23);
        assert_eq!(cable.colors()[22], "GN");
        assert_eq!(cable.colors()[10], cable.colors()[0]);
    }

    #[test]
    fn test_cable_unknown_color_code() {
        let spec = CableSpec {
            num_wires: Some(4),
            color_code: Some("XYZ".to_string()),
            ..CableSpec::default()
        };
        assert!(matches!(
            Cable::new("W1", spec),
            Err(ModelError::Color(ColorError::UnknownColorCode(_)))
        ));
    }

    #[test]
    fn test_cable_without_count_or_colors() {
        assert!(matches!(
            Cable::new("W1", CableSpec::default()),
            Err(ModelError::UnknownWireCount(_))
        ));
    }

    #[test]
    fn test_cable_dummy_colors() {
        let spec = CableSpec {
            num_wires: Some(3),
            ..CableSpec::default()
        };
        let cable = Cable::new("W1", spec).unwrap();
        assert_eq!(cable.colors(), &[String::new(), String::new(), String::new()]);
    }

    #[test]
    fn test_connect_validates_wire_index() {
        let mut harness = Harness::new();
        harness.add_cable(
            Cable::new(
                "W1",
                CableSpec {
                    colors: vec!["RD".to_string()],
                    ..CableSpec::default()
                },
            )
            .unwrap(),
        );

        let err = harness.connect("W1", None, &Pin::Number(2), None);
        assert!(matches!(err, Err(ModelError::UnknownWire { index: 2, .. })));

        harness.connect("W1", None, &Pin::Number(1), None).unwrap();
        assert_eq!(harness.cable("W1").unwrap().connections().len(), 1);
    }

    #[test]
    fn test_shield_wire_ref() {
        assert_eq!(
            WireRef::from_pin(&Pin::Label("s".to_string())),
            WireRef::Shield
        );
        assert_eq!(WireRef::from_pin(&Pin::Number(3)), WireRef::Wire(3));
    }

    #[test]
    fn test_awg_equivalent() {
        assert_eq!(awg_equivalent(0.25), Some(24));
        assert_eq!(awg_equivalent(1.0), Some(18));
        assert_eq!(awg_equivalent(3.3), None);
    }

    #[test]
    fn test_harness_iteration_order() {
        let mut harness = Harness::new();
        for name in ["X3", "X1", "X2"] {
            harness.add_connector(Connector::new(name, ConnectorSpec::default()).unwrap());
        }
        let names: Vec<&str> = harness.connectors().map(Connector::name).collect();
        assert_eq!(names, vec!["X3", "X1", "X2"]);
    }
}
