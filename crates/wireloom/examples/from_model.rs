//! Example: Creating a diagram from the harness model
//!
//! This example demonstrates how to programmatically build a harness
//! using the model types directly, without parsing a YAML document.

use wireloom::{
    HarnessBuilder,
    harness::{Cable, CableSpec, Connector, ConnectorSpec, Endpoint, Harness},
    pins::Pin,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building harness from the model...\n");

    let mut harness = Harness::new();

    // Two three-pin connectors
    harness.add_connector(Connector::new(
        "X1",
        ConnectorSpec {
            kind: Some("Molex KK 254".to_string()),
            gender: Some("female".to_string()),
            num_pins: Some(3),
            ..ConnectorSpec::default()
        },
    )?);
    harness.add_connector(Connector::new(
        "X2",
        ConnectorSpec {
            kind: Some("Molex KK 254".to_string()),
            gender: Some("male".to_string()),
            num_pins: Some(3),
            ..ConnectorSpec::default()
        },
    )?);

    // A three-wire cable colored by the DIN standard
    harness.add_cable(Cable::new(
        "W1",
        CableSpec {
            num_wires: Some(3),
            color_code: Some("DIN".to_string()),
            mm2: Some(0.25),
            show_equiv: true,
            length: 0.3,
            ..CableSpec::default()
        },
    )?);

    // Wire the connectors straight through
    for pin in 1..=3 {
        harness.connect(
            "W1",
            Some(Endpoint::new("X1", Pin::Number(pin))),
            &Pin::Number(pin),
            Some(Endpoint::new("X2", Pin::Number(pin))),
        )?;
    }

    // Emit the harness as Graphviz DOT text
    let builder = HarnessBuilder::default();
    let dot = builder.render_dot(&harness)?;

    println!("DOT generated successfully!");
    println!("DOT length: {} bytes", dot.len());

    // Write to file
    let output_path = "from_model_output.gv";
    std::fs::write(output_path, &dot)?;
    println!("Graph description written to: {output_path}");

    Ok(())
}
