//! Graph export through the Graphviz toolchain.
//!
//! The finishing stage of a run: the abstract graph is handed to the
//! external `dot` executable for layout and rasterization, once per
//! requested output format, and the serialized graph description is always
//! written next to the images as `<stem>.gv`.

use std::{fs, io, path::Path, str::FromStr};

use graphviz_rust::{
    cmd::{CommandArg, Format},
    exec,
    printer::{DotPrinter, PrinterContext},
};
use log::info;

use dot_structures::Graph;

/// A supported output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
    Pdf,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
        }
    }

    fn to_graphviz(self) -> Format {
        match self {
            OutputFormat::Png => Format::Png,
            OutputFormat::Svg => Format::Svg,
            OutputFormat::Pdf => Format::Pdf,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

/// Renders the graph to every requested format at the given path stem and
/// saves the graph description as `<stem>.gv`.
pub fn export(graph: &Graph, stem: &Path, formats: &[OutputFormat]) -> Result<(), Error> {
    for format in formats {
        let output = stem.with_extension(format.extension());
        exec(
            graph.clone(),
            &mut PrinterContext::default(),
            vec![
                format.to_graphviz().into(),
                CommandArg::Output(output.display().to_string()),
            ],
        )
        .map_err(Error::Io)?;
        info!(output = output.display().to_string(); "Rendered diagram");
    }

    let dot = graph.print(&mut PrinterContext::default());
    fs::write(stem.with_extension("gv"), dot).map_err(Error::Io)?;

    Ok(())
}

#[derive(Debug)]
pub enum Error {
    Render(String),
    UnknownFormat(String),
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::UnknownFormat(format) => write!(f, "Unknown output format: {format}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) | Self::UnknownFormat(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("png".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("svg".parse::<OutputFormat>().unwrap(), OutputFormat::Svg);
        assert_eq!("pdf".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert!(matches!(
            "bmp".parse::<OutputFormat>(),
            Err(Error::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_format_display_round_trips() {
        for format in [OutputFormat::Png, OutputFormat::Svg, OutputFormat::Pdf] {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
    }
}
