//! Command-line argument definitions for the Procanvas CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Each [`Command`] reads a diagram (or an interaction script)
//! and writes an SVG, an export document or a validation report.

use clap::{Parser, Subcommand};

use procanvas::export::ExportFormat;

/// Command-line arguments for the Procanvas diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

/// What to do with the diagram.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a diagram file to SVG
    Render {
        /// Path to the input diagram (JSON, or XML)
        input: String,

        /// Path to the output SVG file
        #[arg(short, long, default_value = "out.svg")]
        output: String,

        /// Zoom percentage, overriding the configured one
        #[arg(long)]
        zoom: Option<u32>,
    },

    /// Convert a diagram file to JSON or BPMN XML
    Export {
        /// Path to the input diagram (JSON, or XML)
        input: String,

        /// Output format
        #[arg(short, long, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Output path, defaults to the input name with the format's extension
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check a diagram for structural problems
    Validate {
        /// Path to the input diagram (JSON, or XML)
        input: String,
    },

    /// Apply a scripted sequence of editor inputs and render the result
    Replay {
        /// Path to a JSON array of editor inputs
        script: String,

        /// Diagram to start from, empty if omitted
        #[arg(short, long)]
        diagram: Option<String>,

        /// Path to the output SVG file
        #[arg(short, long, default_value = "out.svg")]
        output: String,

        /// Also write the resulting diagram as JSON to this path
        #[arg(long)]
        save: Option<String>,
    },

    /// Write the built-in sample diagram
    Sample {
        /// Output path
        #[arg(short, long, default_value = "sample.json")]
        output: String,

        /// Output format
        #[arg(short, long, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
    },
}
