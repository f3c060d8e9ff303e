//! Wire color codes, lookup tables, and display modes.
//!
//! Wire colors are referenced by two-letter abbreviations (`"RD"`, `"BK"`,
//! …). This module resolves named color-code standards to ordered palettes,
//! cycles a palette to a requested wire count, and translates abbreviations
//! into the display form selected by a [`ColorMode`].

use std::str::FromStr;

use thiserror::Error;

/// Errors raised by color-code resolution and translation.
///
/// All of these are fatal: an unknown standard or mode is a configuration
/// error, and an abbreviation missing from a lookup table means the input
/// document references a color this tool does not know.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("unknown color code standard '{0}'")]
    UnknownColorCode(String),

    #[error("unknown color mode '{0}'")]
    UnknownColorMode(String),

    #[error("unknown color abbreviation '{0}'")]
    UnknownColor(String),
}

/// Resolves a named color-code standard to its ordered palette.
///
/// Supported standards: `DIN` (DIN 47100), `IEC` (IEC 60757), and `BW`
/// (black/white alternation).
pub fn color_code(name: &str) -> Result<&'static [&'static str], ColorError> {
    match name {
        "DIN" => Ok(&["WH", "BN", "GN", "YE", "GY", "PK", "BU", "RD", "BK", "VT"]),
        "IEC" => Ok(&["BN", "RD", "OG", "YE", "GN", "BU", "VT", "GY", "WH", "BK"]),
        "BW" => Ok(&["BK", "WH"]),
        other => Err(ColorError::UnknownColorCode(other.to_string())),
    }
}

/// Tiles a palette until it covers `count` entries, then truncates to
/// exactly `count`.
///
/// An empty input yields an empty output regardless of `count`.
pub fn cycle_to_count(colors: &[String], count: usize) -> Vec<String> {
    if colors.is_empty() {
        return Vec::new();
    }
    colors.iter().cycle().take(count).cloned().collect()
}

/// The display scheme for a wire color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    /// The two-letter abbreviation itself.
    Short,
    /// The full English color name.
    Full,
    /// The hex triplet.
    Hex,
    /// The German two-letter abbreviation.
    Ger,
}

/// A display mode: a [`ColorScheme`] plus letter casing.
///
/// Parsed from the eight mode strings of the input format: the scheme name
/// in lowercase selects lowercase output (`"hex"` → `#ff0000`), in
/// uppercase uppercase output (`"HEX"` → `#FF0000`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMode {
    scheme: ColorScheme,
    uppercase: bool,
}

impl ColorMode {
    pub const fn new(scheme: ColorScheme, uppercase: bool) -> Self {
        Self { scheme, uppercase }
    }

    /// Translates a color abbreviation into this mode's display string.
    ///
    /// An empty color (no color assigned) translates to an empty string in
    /// every mode.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::UnknownColor`] when the abbreviation is missing
    /// from the lookup table the scheme needs.
    pub fn translate(&self, color: &str) -> Result<String, ColorError> {
        if color.is_empty() {
            return Ok(String::new());
        }

        let translated = match self.scheme {
            ColorScheme::Short => color,
            ColorScheme::Full => lookup(color, full_name)?,
            ColorScheme::Hex => lookup(color, hex_code)?,
            ColorScheme::Ger => lookup(color, german)?,
        };

        Ok(if self.uppercase {
            translated.to_uppercase()
        } else {
            translated.to_lowercase()
        })
    }
}

impl Default for ColorMode {
    /// The input format's default mode is `SHORT`.
    fn default() -> Self {
        Self::new(ColorScheme::Short, true)
    }
}

impl FromStr for ColorMode {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(Self::new(ColorScheme::Short, false)),
            "SHORT" => Ok(Self::new(ColorScheme::Short, true)),
            "full" => Ok(Self::new(ColorScheme::Full, false)),
            "FULL" => Ok(Self::new(ColorScheme::Full, true)),
            "hex" => Ok(Self::new(ColorScheme::Hex, false)),
            "HEX" => Ok(Self::new(ColorScheme::Hex, true)),
            "ger" => Ok(Self::new(ColorScheme::Ger, false)),
            "GER" => Ok(Self::new(ColorScheme::Ger, true)),
            other => Err(ColorError::UnknownColorMode(other.to_string())),
        }
    }
}

fn lookup(
    color: &str,
    table: fn(&str) -> Option<&'static str>,
) -> Result<&'static str, ColorError> {
    table(color).ok_or_else(|| ColorError::UnknownColor(color.to_string()))
}

/// The hex triplet for a color abbreviation, lowercase.
pub fn hex_code(color: &str) -> Option<&'static str> {
    match color {
        "BK" => Some("#000000"),
        "WH" => Some("#ffffff"),
        "GY" => Some("#999999"),
        "PK" => Some("#ff66cc"),
        "RD" => Some("#ff0000"),
        "OG" => Some("#ff8000"),
        "YE" => Some("#ffff00"),
        "GN" => Some("#00ff00"),
        "TQ" => Some("#00ffff"),
        "BU" => Some("#0066ff"),
        "VT" => Some("#8000ff"),
        "BN" => Some("#666600"),
        _ => None,
    }
}

fn full_name(color: &str) -> Option<&'static str> {
    match color {
        "BK" => Some("black"),
        "WH" => Some("white"),
        "GY" => Some("grey"),
        "PK" => Some("pink"),
        "RD" => Some("red"),
        "OG" => Some("orange"),
        "YE" => Some("yellow"),
        "GN" => Some("green"),
        "TQ" => Some("turquoise"),
        "BU" => Some("blue"),
        "VT" => Some("violet"),
        "BN" => Some("brown"),
        _ => None,
    }
}

fn german(color: &str) -> Option<&'static str> {
    match color {
        "BK" => Some("sw"),
        "WH" => Some("ws"),
        "GY" => Some("gr"),
        "PK" => Some("rs"),
        "RD" => Some("rt"),
        "OG" => Some("or"),
        "YE" => Some("ge"),
        "GN" => Some("gn"),
        "TQ" => Some("tk"),
        "BU" => Some("bl"),
        "VT" => Some("vi"),
        "BN" => Some("br"),
        _ => None,
    }
}
