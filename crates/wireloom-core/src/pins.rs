//! Pin identifiers and pin-range expansion.
//!
//! Connection entries reference pins with a compact, human-authored syntax:
//! a single scalar, a list of scalars, or a range token such as `"3-5"`.
//! [`expand`] resolves any of these into a flat, ordered list of [`Pin`]s.

use std::fmt;

use serde::Deserialize;

/// A resolved pin identifier.
///
/// Pins are numeric wherever the source token parses as an integer, and
/// plain labels otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pin {
    /// A numbered pin, as used by port anchors.
    Number(i64),
    /// A named pin that did not parse as a number.
    Label(String),
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pin::Number(n) => write!(f, "{n}"),
            Pin::Label(s) => write!(f, "{s}"),
        }
    }
}

/// A raw pin token as it appears in the input document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PinToken {
    Number(i64),
    Text(String),
}

impl fmt::Display for PinToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinToken::Number(n) => write!(f, "{n}"),
            PinToken::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A pin designator: either a single token or an ordered list of tokens.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PinSpec {
    One(PinToken),
    Many(Vec<PinToken>),
}

/// Expands a pin designator into a flat ordered list of pins.
///
/// Each token is either a literal (number or label) or an inclusive range
/// `"A-B"` with numeric endpoints. Ranges may ascend (`"3-5"` → 3, 4, 5)
/// or descend (`"5-3"` → 5, 4, 3); a degenerate range (`"4-4"`) yields its
/// single endpoint. A token that merely looks like a range but fails
/// numeric parsing passes through unchanged as a label.
pub fn expand(spec: &PinSpec) -> Vec<Pin> {
    let tokens = match spec {
        PinSpec::One(token) => std::slice::from_ref(token),
        PinSpec::Many(tokens) => tokens.as_slice(),
    };

    let mut pins = Vec::new();
    for token in tokens {
        match token {
            PinToken::Number(n) => pins.push(Pin::Number(*n)),
            PinToken::Text(text) => expand_token(text, &mut pins),
        }
    }
    pins
}

/// Expands a single text token, handling range syntax.
fn expand_token(text: &str, pins: &mut Vec<Pin>) {
    if let Some((start, end)) = parse_range(text) {
        if start <= end {
            pins.extend((start..=end).map(Pin::Number));
        } else {
            pins.extend((end..=start).rev().map(Pin::Number));
        }
        return;
    }

    match text.parse::<i64>() {
        Ok(n) => pins.push(Pin::Number(n)),
        Err(_) => pins.push(Pin::Label(text.to_string())),
    }
}

/// Parses `"A-B"` with both halves numeric; anything else is not a range.
fn parse_range(text: &str) -> Option<(i64, i64)> {
    let (a, b) = text.split_once('-')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}
