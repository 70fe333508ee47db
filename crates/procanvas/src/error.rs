//! Error types for procanvas operations.
//!
//! Editing itself never fails: a malformed gesture is a no-op. Errors only
//! come from the edges of the system, i.e. reading or writing diagram files,
//! loading configuration and checking a diagram before it is accepted.

use std::io;

use thiserror::Error;

use crate::validate::ValidationIssue;

/// The main error type for procanvas operations.
#[derive(Debug, Error)]
pub enum ProcanvasError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The diagram failed validation. Holds every issue found, errors first.
    #[error("Diagram has {} validation issue(s)", .0.len())]
    Invalid(Vec<ValidationIssue>),
}

/// Failure to turn external text into a diagram.
///
/// A failed import leaves the diagram being edited untouched.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid diagram JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("input is not an XML document, expected it to start with `<?xml`")]
    NotXml,
}

/// Failure to serialize a diagram.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize diagram to JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write diagram XML: {0}")]
    Xml(String),
}
