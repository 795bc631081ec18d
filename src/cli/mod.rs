//! CLI support for sqlweave
//!
//! Provides programmatic access to the CLI commands for embedding in other
//! tools.

mod convert;
mod render;

pub use convert::{json_to_value, value_to_json};
pub use render::{execute_check, execute_render, RenderOptions, RenderResult};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Template failed to compile; holds the parse log
    InvalidTemplate(String),
    /// Parameter JSON parsing error
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// Parameters were valid JSON but not an object
    ParamsNotObject,
    /// No template provided
    NoInput,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::InvalidTemplate(log) => write!(f, "Invalid template:\n{}", log),
            CliError::Json(e) => write!(f, "Invalid parameter JSON: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::ParamsNotObject => {
                write!(f, "Parameters must be a JSON object of name/value pairs.")
            }
            CliError::NoInput => {
                write!(f, "No template provided. Pass a file or pipe one to stdin.")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
