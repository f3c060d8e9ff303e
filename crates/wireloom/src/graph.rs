//! Graph emission.
//!
//! The [`GraphEmitter`] projects a finalized
//! [`Harness`](wireloom_core::harness::Harness) into an abstract
//! [`dot_structures::Graph`]: one record-labelled node per connector, one
//! HTML-table node per cable, and one edge per visible connection end.
//! Port sides are derived from the full connection set before any label is
//! built, and emission never mutates the harness, so re-emitting an
//! unchanged harness yields an identical graph.

use std::fmt::Write as _;

use dot_generator::*;
use dot_structures::*;
use indexmap::IndexMap;
use log::{debug, trace};

use wireloom_core::{
    colors::{self, ColorMode, ColorScheme},
    harness::{self, Cable, Category, Connection, Connector, Harness, WireRef},
};

use crate::{
    config::StyleConfig,
    error::WireloomError,
    label::{self, CableLabel, RecordCell, ShieldRow, WireRow},
};

/// Derived port sides of a connector.
///
/// A connector gains a right-side port when it appears as a connection
/// source with a visible pin, and a left-side port when it appears as a
/// destination.
#[derive(Debug, Clone, Copy, Default)]
struct PortSides {
    left: bool,
    right: bool,
}

/// Projects a finalized harness into an abstract Graphviz graph.
pub struct GraphEmitter<'h> {
    harness: &'h Harness,
    color_mode: ColorMode,
    font: String,
    background: String,
}

impl<'h> GraphEmitter<'h> {
    pub fn new(harness: &'h Harness, color_mode: ColorMode, style: &StyleConfig) -> Self {
        Self {
            harness,
            color_mode,
            font: style.font().to_string(),
            background: style.background().to_string(),
        }
    }

    /// Builds the abstract graph: global attributes, connector and cable
    /// nodes in declaration order, loop self-edges, and connection edges.
    pub fn emit(&self) -> Result<Graph, WireloomError> {
        let sides = self.derive_port_sides();
        let mut stmts = self.global_attributes();

        for connector in self.harness.connectors() {
            let side = sides.get(connector.name()).copied().unwrap_or_default();
            match connector.category() {
                Category::Ferrule => stmts.push(self.ferrule_node(connector, side)?),
                Category::Connector => {
                    stmts.push(self.connector_node(connector, side));
                    self.loop_edges(connector, side, &mut stmts)?;
                }
            }
        }

        for cable in self.harness.cables() {
            self.cable_statements(cable, &mut stmts)?;
        }

        debug!(statements = stmts.len(); "Graph emitted");

        Ok(Graph::Graph {
            id: Id::Plain("harness".to_string()),
            strict: false,
            stmts,
        })
    }

    /// Scans every connection once, before any label is built; a connector
    /// label depends on the final state of both sides.
    fn derive_port_sides(&self) -> IndexMap<&'h str, PortSides> {
        let mut sides: IndexMap<&'h str, PortSides> = IndexMap::new();
        for cable in self.harness.cables() {
            for connection in cable.connections() {
                if let Some(from) = &connection.from {
                    sides.entry(from.connector.as_str()).or_default().right = true;
                }
                if let Some(to) = &connection.to {
                    sides.entry(to.connector.as_str()).or_default().left = true;
                }
            }
        }
        trace!(connectors = sides.len(); "Derived port sides");
        sides
    }

    fn global_attributes(&self) -> Vec<Stmt> {
        vec![
            Stmt::GAttribute(GraphAttributes::Graph(vec![
                attr!("rankdir", "LR"),
                attr!("ranksep", "2"),
                esc_attr("bgcolor", &self.background),
                attr!("nodesep", "0.33"),
                esc_attr("fontname", &self.font),
            ])),
            Stmt::GAttribute(GraphAttributes::Node(vec![
                attr!("shape", "record"),
                attr!("style", "filled"),
                attr!("fillcolor", "white"),
                esc_attr("fontname", &self.font),
            ])),
            Stmt::GAttribute(GraphAttributes::Edge(vec![
                attr!("style", "bold"),
                esc_attr("fontname", &self.font),
            ])),
        ]
    }

    /// An ordinary connector: a nested record label with the name, an
    /// attribute row, and per-pin port columns on the sides in use.
    fn connector_node(&self, connector: &Connector, sides: PortSides) -> Stmt {
        let mut info = vec![
            RecordCell::text(connector.kind().unwrap_or_default()),
            RecordCell::text(connector.gender().unwrap_or_default()),
        ];
        if connector.show_pin_count() {
            info.push(RecordCell::text(format!("{}-pin", connector.pinout().len())));
        }

        let mut left = Vec::new();
        let mut middle = Vec::new();
        let mut right = Vec::new();
        for (position, pin_label) in connector.pinout().iter().enumerate() {
            let port_number = position + 1;
            if sides.left {
                left.push(RecordCell::port(
                    format!("p{port_number}l"),
                    port_number.to_string(),
                ));
            }
            middle.push(RecordCell::text(pin_label.clone()));
            if sides.right {
                right.push(RecordCell::port(
                    format!("p{port_number}r"),
                    port_number.to_string(),
                ));
            }
        }

        let cells = vec![
            RecordCell::text(if connector.show_name() {
                connector.name()
            } else {
                ""
            }),
            RecordCell::Group(info),
            RecordCell::Group(vec![
                RecordCell::Group(left),
                RecordCell::Group(middle),
                RecordCell::Group(right),
            ]),
        ];

        Stmt::Node(Node {
            id: node_ref(connector.name()),
            attributes: vec![esc_attr("label", &label::flatten_record(&cells))],
        })
    }

    /// A ferrule: a two-cell bar with the type/color description on the
    /// side without the wire and a thin colored bar between the cells.
    fn ferrule_node(&self, connector: &Connector, sides: PortSides) -> Result<Stmt, WireloomError> {
        let mut description = Vec::new();
        if let Some(kind) = connector.kind() {
            description.push(kind.to_string());
        }
        if let Some(color) = connector.color() {
            let translated = self.color_mode.translate(color)?;
            if !translated.is_empty() {
                description.push(translated);
            }
        }
        let description = label::escape_html(&description.join(" "));

        let left = if sides.right { description.as_str() } else { "" };
        let right = if sides.left { description.as_str() } else { "" };

        let bar = match connector.color() {
            Some(color) if !color.is_empty() => {
                let hex = ColorMode::new(ColorScheme::Hex, true).translate(color)?;
                format!(r#"<td bgcolor="{hex}" border="1" sides="LR" width="4"></td>"#)
            }
            _ => String::new(),
        };

        let html = format!(
            r#"<table border="1" cellborder="0" cellspacing="0" cellpadding="2"><tr><td port="p1l">{left}</td>{bar}<td port="p1r">{right}</td></tr></table>"#
        );

        Ok(Stmt::Node(Node {
            id: node_ref(connector.name()),
            attributes: vec![
                attr!("shape", "none"),
                attr!("style", "filled"),
                attr!("margin", "0"),
                attr!("orientation", if sides.left { "0" } else { "180" }),
                html_attr("label", &html),
            ],
        }))
    }

    /// Internal jumpers render as same-side self-edges on the single side
    /// the connector has ports on.
    fn loop_edges(
        &self,
        connector: &Connector,
        sides: PortSides,
        stmts: &mut Vec<Stmt>,
    ) -> Result<(), WireloomError> {
        if connector.loops().is_empty() {
            return Ok(());
        }

        let (side, compass) = if sides.left {
            ('l', "w")
        } else if sides.right {
            ('r', "e")
        } else {
            return Err(WireloomError::Graph(format!(
                "connector '{}' has loops but no port side to anchor them",
                connector.name()
            )));
        };

        for (from_pin, to_pin) in connector.loops() {
            stmts.push(edge_stmt(
                port_ref(connector.name(), &format!("p{from_pin}{side}"), compass),
                port_ref(connector.name(), &format!("p{to_pin}{side}"), compass),
                "#000000",
            ));
        }
        Ok(())
    }

    /// Emits the edges of one cable and its label node, filling the
    /// label's endpoint fields from the connection records.
    fn cable_statements(&self, cable: &Cable, stmts: &mut Vec<Stmt>) -> Result<(), WireloomError> {
        let hidden_bundle = cable.kind() == Some("bundle") && !cable.show_name();
        let mut cable_label = CableLabel {
            name: (!hidden_bundle).then(|| cable.name().to_string()),
            attributes: cable_attributes(cable),
            wires: cable
                .colors()
                .iter()
                .map(|color| WireRow {
                    color: color.clone(),
                    ..WireRow::default()
                })
                .collect(),
            shield: cable.shield().then(ShieldRow::default),
        };

        let mut edges = Vec::new();
        for connection in cable.connections() {
            let color = edge_color(cable, connection);
            let anchor = wire_anchor(&connection.via);

            if let Some(from) = &connection.from {
                let is_ferrule = self.is_ferrule(&from.connector)?;
                let source = if is_ferrule {
                    compass_ref(&from.connector, "e")
                } else {
                    port_ref(&from.connector, &format!("p{}r", from.pin), "e")
                };
                edges.push(edge_stmt(source, port_ref(cable.name(), &anchor, "w"), &color));

                if !is_ferrule {
                    if let Some((left, _)) = endpoint_cells(&mut cable_label, &connection.via) {
                        *left = Some(format!("{}:{}", from.connector, from.pin));
                    }
                }
            }

            if let Some(to) = &connection.to {
                let is_ferrule = self.is_ferrule(&to.connector)?;
                let target = if is_ferrule {
                    compass_ref(&to.connector, "w")
                } else {
                    port_ref(&to.connector, &format!("p{}l", to.pin), "w")
                };
                edges.push(edge_stmt(port_ref(cable.name(), &anchor, "e"), target, &color));

                if !is_ferrule {
                    if let Some((_, right)) = endpoint_cells(&mut cable_label, &connection.via) {
                        *right = Some(format!("{}:{}", to.connector, to.pin));
                    }
                }
            }
        }

        let html = cable_label.to_html(self.color_mode)?;
        let style = if cable.kind() == Some("bundle") {
            "filled,dashed"
        } else {
            "filled"
        };

        stmts.extend(edges);
        stmts.push(Stmt::Node(Node {
            id: node_ref(cable.name()),
            attributes: vec![
                html_attr("label", &html),
                attr!("shape", "box"),
                esc_attr("style", style),
                attr!("margin", "0"),
                attr!("fillcolor", "white"),
            ],
        }));

        Ok(())
    }

    fn is_ferrule(&self, connector: &str) -> Result<bool, WireloomError> {
        let connector = self.harness.connector(connector).ok_or_else(|| {
            WireloomError::Graph(format!(
                "connection references unknown connector '{connector}'"
            ))
        })?;
        Ok(connector.category() == Category::Ferrule)
    }
}

/// The filtered cable attribute cells, in display order.
fn cable_attributes(cable: &Cable) -> Vec<String> {
    let mut attributes = Vec::new();
    if cable.show_num_wires() {
        attributes.push(format!("{}x", cable.num_wires()));
    }
    if let Some(mm2) = cable.mm2() {
        let mut section = format!("{mm2} mm²");
        if cable.show_equiv() {
            if let Some(awg) = harness::awg_equivalent(mm2) {
                let _ = write!(section, " ({awg} AWG)");
            }
        }
        attributes.push(section);
    }
    if let Some(awg) = cable.awg() {
        attributes.push(awg.to_string());
    }
    if cable.shield() {
        attributes.push("+ S".to_string());
    }
    if cable.length() > 0.0 {
        attributes.push(format!("{} m", cable.length()));
    }
    attributes
}

/// Three-segment coloring for numbered wires with a known hex color;
/// plain black otherwise, and always for shield connections.
fn edge_color(cable: &Cable, connection: &Connection) -> String {
    match cable.wire_color(&connection.via).and_then(colors::hex_code) {
        Some(hex) => format!("#000000:{hex}:#000000"),
        None => "#000000".to_string(),
    }
}

/// The cable-side port anchor of a wire position.
fn wire_anchor(via: &WireRef) -> String {
    match via {
        WireRef::Wire(index) => CableLabel::wire_port(*index),
        WireRef::Shield => CableLabel::SHIELD_PORT.to_string(),
    }
}

/// The endpoint cells a connection fills, by wire position.
fn endpoint_cells<'a>(
    label: &'a mut CableLabel,
    via: &WireRef,
) -> Option<(&'a mut Option<String>, &'a mut Option<String>)> {
    match via {
        WireRef::Wire(index) => label
            .wires
            .get_mut(*index as usize - 1)
            .map(|row| (&mut row.left, &mut row.right)),
        WireRef::Shield => label
            .shield
            .as_mut()
            .map(|row| (&mut row.left, &mut row.right)),
    }
}

fn esc_attr(key: &str, value: &str) -> Attribute {
    Attribute(
        Id::Plain(key.to_string()),
        Id::Escaped(format!("\"{}\"", value.replace('"', "\\\""))),
    )
}

fn html_attr(key: &str, value: &str) -> Attribute {
    Attribute(Id::Plain(key.to_string()), Id::Html(format!("<{value}>")))
}

fn node_ref(name: &str) -> NodeId {
    NodeId(Id::Escaped(format!("\"{}\"", name.replace('"', "\\\""))), None)
}

fn port_ref(name: &str, anchor: &str, compass: &str) -> NodeId {
    NodeId(
        Id::Escaped(format!("\"{}\"", name.replace('"', "\\\""))),
        Some(Port(
            Some(Id::Plain(anchor.to_string())),
            Some(compass.to_string()),
        )),
    )
}

fn compass_ref(name: &str, compass: &str) -> NodeId {
    NodeId(
        Id::Escaped(format!("\"{}\"", name.replace('"', "\\\""))),
        Some(Port(None, Some(compass.to_string()))),
    )
}

fn edge_stmt(from: NodeId, to: NodeId, color: &str) -> Stmt {
    Stmt::Edge(Edge {
        ty: EdgeTy::Pair(Vertex::N(from), Vertex::N(to)),
        attributes: vec![esc_attr("color", color)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphviz_rust::printer::{DotPrinter, PrinterContext};

    fn emit_dot(source: &str) -> String {
        let harness = wireloom_parser::parse(source).unwrap();
        let emitter = GraphEmitter::new(&harness, ColorMode::default(), &StyleConfig::default());
        emitter
            .emit()
            .unwrap()
            .print(&mut PrinterContext::default())
    }

    const BASIC: &str = r#"
nodes:
  X1:
    num_pins: 2
  X2:
    num_pins: 2
wires:
  W1:
    colors: [RD, BK]
connections:
  - - X1: [1, 2]
    - W1: [1, 2]
    - X2: [1, 2]
"#;

    #[test]
    fn test_port_sides_drive_record_columns() {
        let dot = emit_dot(BASIC);
        // X1 is only ever a source: right ports, no left ports.
        assert!(dot.contains("<p1r>"));
        assert!(dot.contains("X1|{2-pin}|{{<p1r>1|<p2r>2}}"));
        // X2 is only ever a destination: left ports.
        assert!(dot.contains("X2|{2-pin}|{{<p1l>1|<p2l>2}}"));
    }

    #[test]
    fn test_edges_and_colors() {
        let dot = emit_dot(BASIC);
        assert!(dot.contains("\"#000000:#ff0000:#000000\""));
        assert!(dot.contains("\"#000000:#000000:#000000\""));
    }

    #[test]
    fn test_emission_is_idempotent() {
        let harness = wireloom_parser::parse(BASIC).unwrap();
        let emitter = GraphEmitter::new(&harness, ColorMode::default(), &StyleConfig::default());
        let first = emitter.emit().unwrap().print(&mut PrinterContext::default());
        let second = emitter.emit().unwrap().print(&mut PrinterContext::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_ferrule_orientation_follows_wire_side() {
        let dot = emit_dot(
            r#"
nodes:
  X1:
    num_pins: 2
wires:
  W1:
    colors: [RD, BK]
ferrules:
  crimp:
    type: Crimp
    color: RD
connections:
  - - crimp
    - W1: [1, 2]
"#,
        );
        // Ferrules are sources here: wire side east, description west.
        assert!(dot.contains("orientation=180"));
        assert!(dot.contains(r#"<td port="p1l">Crimp RD</td>"#));
        assert!(dot.contains(r##"bgcolor="#FF0000""##));
    }

    #[test]
    fn test_loops_need_a_port_side() {
        let harness = wireloom_parser::parse(
            "nodes:\n  X1: {num_pins: 2}\nconnections:\n  - [{X1: 1}, {X1: 2}]\n",
        )
        .unwrap();
        let emitter = GraphEmitter::new(&harness, ColorMode::default(), &StyleConfig::default());
        let err = emitter.emit().unwrap_err();
        assert!(matches!(err, WireloomError::Graph(_)));
    }

    #[test]
    fn test_loops_render_on_the_side_in_use() {
        let dot = emit_dot(
            r#"
nodes:
  X1:
    num_pins: 4
wires:
  W1:
    colors: [RD, BK]
connections:
  - - X1: [1, 2]
    - W1: [1, 2]
  - - X1: [3, 4]
    - X1: [4, 3]
"#,
        );
        // X1 only has right-side ports, so loops anchor east.
        assert!(dot.contains("p3r:e"));
        assert!(dot.contains("p4r:e"));
    }

    #[test]
    fn test_endpoint_substitution_in_cable_label() {
        let dot = emit_dot(BASIC);
        assert!(dot.contains("<td>X1:1</td>"));
        assert!(dot.contains("<td>X2:2</td>"));
    }

    #[test]
    fn test_bundle_with_hidden_name_skips_name_row() {
        let dot = emit_dot(
            r#"
nodes:
  X1:
    num_pins: 1
wires:
  W1:
    type: bundle
    show_name: false
    colors: [RD]
connections:
  - - X1: 1
    - W1: 1
"#,
        );
        assert!(dot.contains("filled,dashed"));
        assert!(!dot.contains(r#"<tr><td colspan="1">W1</td></tr>"#));
        // The attribute row survives.
        assert!(dot.contains("<td>1x</td>"));
    }

    #[test]
    fn test_shield_edges_are_plain_black() {
        let harness = wireloom_parser::parse(
            r#"
nodes:
  X1:
    num_pins: 1
wires:
  W1:
    colors: [RD]
    shield: true
connections:
  - - X1: 1
    - W1: s
"#,
        )
        .unwrap();
        let emitter = GraphEmitter::new(&harness, ColorMode::default(), &StyleConfig::default());
        let dot = emitter.emit().unwrap().print(&mut PrinterContext::default());
        assert!(dot.contains("ws:w"));
        assert!(!dot.contains("#000000:#ff0000:#000000"));
    }

    #[test]
    fn test_pin_anchor_helpers() {
        let NodeId(id, port) = port_ref("X1", "p1r", "e");
        assert_eq!(id, Id::Escaped("\"X1\"".to_string()));
        let Port(anchor, compass) = port.expect("port is set");
        assert_eq!(anchor, Some(Id::Plain("p1r".to_string())));
        assert_eq!(compass, Some("e".to_string()));
    }
}
