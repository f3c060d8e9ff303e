//! Configuration types for Wireloom diagram rendering.
//!
//! This module provides configuration structures that control how harness
//! diagrams are styled. All types implement [`serde::Deserialize`] for
//! flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`StyleConfig`] - Visual styling options: color display mode, font,
//!   and background color.
//!
//! # Example
//!
//! ```
//! # use wireloom::config::AppConfig;
//! // Use default configuration
//! let config = AppConfig::default();
//! assert!(config.style().color_mode().is_ok());
//! ```

use serde::Deserialize;

use wireloom_core::colors::{ColorError, ColorMode};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified style configuration.
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Fields that are not set fall back to the defaults of the original
/// format: `SHORT` color display, `arial`, white background.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Wire color display mode, as one of the mode strings
    /// (`short`/`SHORT`/`full`/`FULL`/`hex`/`HEX`/`ger`/`GER`).
    #[serde(default)]
    color_mode: Option<String>,

    /// Font family for all diagram text.
    #[serde(default)]
    font: Option<String>,

    /// Diagram background color.
    #[serde(default)]
    background: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed [`ColorMode`], defaulting to `SHORT`.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::UnknownColorMode`] when the configured mode
    /// string is not one of the recognized modes.
    pub fn color_mode(&self) -> Result<ColorMode, ColorError> {
        match self.color_mode.as_deref() {
            Some(mode) => mode.parse(),
            None => Ok(ColorMode::default()),
        }
    }

    /// Returns the configured font family.
    pub fn font(&self) -> &str {
        self.font.as_deref().unwrap_or("arial")
    }

    /// Returns the configured background color.
    pub fn background(&self) -> &str {
        self.background.as_deref().unwrap_or("white")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wireloom_core::colors::{ColorMode, ColorScheme};

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(
            config.style().color_mode().unwrap(),
            ColorMode::new(ColorScheme::Short, true)
        );
        assert_eq!(config.style().font(), "arial");
        assert_eq!(config.style().background(), "white");
    }

    #[test]
    fn test_unknown_color_mode_is_fatal() {
        let style = StyleConfig {
            color_mode: Some("sepia".to_string()),
            ..StyleConfig::default()
        };
        assert!(style.color_mode().is_err());
    }
}
