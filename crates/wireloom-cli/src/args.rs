//! Command-line argument definitions for the Wireloom CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, output formats,
//! configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Wireloom harness diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input harness YAML file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path stem for the output files (defaults to the input path with its
    /// extension dropped)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output image formats (png, svg, pdf)
    #[arg(short, long, value_delimiter = ',', default_values_t = [String::from("png"), String::from("svg")])]
    pub format: Vec<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_formats() {
        let args = Args::parse_from(["wireloom", "harness.yml"]);
        assert_eq!(args.format, vec!["png", "svg"]);
        assert_eq!(args.output, None);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_comma_separated_formats() {
        let args = Args::parse_from(["wireloom", "harness.yml", "--format", "svg,pdf"]);
        assert_eq!(args.format, vec!["svg", "pdf"]);
    }
}
