//! Label construction for connector and cable nodes.
//!
//! Connector nodes carry Graphviz record labels built from a nested cell
//! structure; cable nodes carry HTML-like table labels built from a
//! structured per-wire row model whose endpoint fields are filled in by
//! the emitter before the markup is generated.

use std::fmt::Write;

use wireloom_core::colors::{ColorError, ColorMode, ColorScheme};

/// One cell of a nested record label.
#[derive(Debug, Clone)]
pub enum RecordCell {
    /// A plain text field; empty text is omitted from the output.
    Text(String),
    /// A text field tagged with a port anchor.
    Port { anchor: String, text: String },
    /// A nested group, rendered inside braces; empty groups are omitted.
    Group(Vec<RecordCell>),
}

impl RecordCell {
    pub fn text(text: impl Into<String>) -> Self {
        RecordCell::Text(text.into())
    }

    pub fn port(anchor: impl Into<String>, text: impl Into<String>) -> Self {
        RecordCell::Port {
            anchor: anchor.into(),
            text: text.into(),
        }
    }
}

/// Flattens nested record cells into Graphviz record-label syntax.
///
/// Fields are joined with `|`; groups recurse inside `{}`. Empty leaves
/// and groups that flatten to nothing are omitted entirely rather than
/// emitted as blank fields.
pub fn flatten_record(cells: &[RecordCell]) -> String {
    let mut fields = Vec::new();
    for cell in cells {
        match cell {
            RecordCell::Text(text) => {
                if !text.is_empty() {
                    fields.push(escape_record(text));
                }
            }
            RecordCell::Port { anchor, text } => {
                fields.push(format!("<{anchor}>{}", escape_record(text)));
            }
            RecordCell::Group(group) => {
                let inner = flatten_record(group);
                if !inner.is_empty() {
                    fields.push(format!("{{{inner}}}"));
                }
            }
        }
    }
    fields.join("|")
}

/// Escapes record-label metacharacters in a text field.
fn escape_record(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '{' | '}' | '|' | '<' | '>') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escapes HTML-label metacharacters in cell text.
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// One wire row of a cable label.
///
/// The endpoint fields start empty and are filled by the emitter once all
/// connections are known; fields with no matching connection stay empty.
#[derive(Debug, Clone, Default)]
pub struct WireRow {
    /// Wire color abbreviation; empty for an unnamed wire.
    pub color: String,
    /// `connector:pin` of the source endpoint.
    pub left: Option<String>,
    /// `connector:pin` of the destination endpoint.
    pub right: Option<String>,
}

/// The shield row of a shielded cable label.
#[derive(Debug, Clone, Default)]
pub struct ShieldRow {
    pub left: Option<String>,
    pub right: Option<String>,
}

/// Structured model of a cable node label.
///
/// Rendered to an HTML-like table only after the emitter has filled every
/// endpoint field, so wire text can never collide with markup.
#[derive(Debug, Clone)]
pub struct CableLabel {
    /// Header name; `None` skips the name row (hidden-name bundles).
    pub name: Option<String>,
    /// Non-empty attribute cells, in display order.
    pub attributes: Vec<String>,
    /// One row per wire, in wire order.
    pub wires: Vec<WireRow>,
    /// Shield row, present when the cable is shielded.
    pub shield: Option<ShieldRow>,
}

impl CableLabel {
    /// The port anchor of a numbered wire (1-based).
    pub fn wire_port(index: u32) -> String {
        format!("w{index}")
    }

    /// The port anchor of the shield bar.
    pub const SHIELD_PORT: &'static str = "ws";

    /// Renders the label to Graphviz HTML-table markup.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::UnknownColor`] when a non-empty wire color is
    /// missing from the lookup table the display mode needs.
    pub fn to_html(&self, mode: ColorMode) -> Result<String, ColorError> {
        let hex = ColorMode::new(ColorScheme::Hex, false);
        let mut html = String::new();

        html.push_str(r#"<table border="0" cellspacing="0" cellpadding="0">"#);

        // Name and attribute header.
        let colspan = self.attributes.len().max(1);
        html.push_str(r#"<tr><td><table border="0" cellspacing="0" cellpadding="3" cellborder="1">"#);
        if let Some(name) = &self.name {
            let _ = write!(
                html,
                r#"<tr><td colspan="{colspan}">{}</td></tr>"#,
                escape_html(name)
            );
        }
        if !self.attributes.is_empty() {
            html.push_str("<tr>");
            for attribute in &self.attributes {
                let _ = write!(html, "<td>{}</td>", escape_html(attribute));
            }
            html.push_str("</tr>");
        }
        html.push_str("</table></td></tr>");

        // Spacer between the header and the conductor table.
        html.push_str("<tr><td>&nbsp;</td></tr>");

        html.push_str(r#"<tr><td><table border="0" cellspacing="0" cellborder="0">"#);
        for (position, wire) in self.wires.iter().enumerate() {
            let port = Self::wire_port(position as u32 + 1);
            let display = mode.translate(&wire.color)?;

            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(wire.left.as_deref().unwrap_or_default()),
                escape_html(&display),
                escape_html(wire.right.as_deref().unwrap_or_default()),
            );

            let bgcolor = hex.translate(&wire.color)?;
            let bgcolor = if bgcolor.is_empty() {
                String::new()
            } else {
                format!(r#" bgcolor="{bgcolor}""#)
            };
            let _ = write!(
                html,
                r#"<tr><td colspan="3" cellpadding="0" height="6"{bgcolor} border="2" sides="tb" port="{port}"></td></tr>"#,
            );
        }

        if let Some(shield) = &self.shield {
            html.push_str("<tr><td>&nbsp;</td></tr>");
            let _ = write!(
                html,
                "<tr><td>{}</td><td>Shield</td><td>{}</td></tr>",
                escape_html(shield.left.as_deref().unwrap_or_default()),
                escape_html(shield.right.as_deref().unwrap_or_default()),
            );
            let _ = write!(
                html,
                r#"<tr><td colspan="3" cellpadding="0" height="6" border="2" sides="b" port="{}"></td></tr>"#,
                Self::SHIELD_PORT,
            );
        }

        html.push_str("<tr><td>&nbsp;</td></tr>");
        html.push_str("</table></td></tr>");
        html.push_str("</table>");

        Ok(html)
    }
}
