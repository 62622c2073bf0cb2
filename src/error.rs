//! Error types and handling infrastructure for fountview.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types. `anyhow` is only used at the binary boundary in `main.rs`.
//!
//! ## Design Principles
//!
//! - **User-friendly messages**: Errors should provide actionable feedback
//! - **Context preservation**: Include relevant information for debugging
//! - **Consistency**: Standardized Result type across all modules

use std::path::PathBuf;
use thiserror::Error;

/// Faults raised by the Fountain parser for inputs outside its contract.
///
/// The parser accepts every string except the cases listed here; each variant
/// carries enough position information for the UI to point at the problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input contains a NUL character
    #[error("Control character U+{code:04X} at line {line}, column {column}")]
    ControlCharacter { code: u32, line: usize, column: usize },

    /// Input exceeds the configured document size limit
    #[error("Document is {size} bytes, limit is {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },
}

/// The main error type for fountview operations.
#[derive(Error, Debug)]
pub enum FountviewError {
    /// File system related errors (file not found, permission denied, etc.)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File not found specifically (common case for user feedback)
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Path exists but is not a regular file
    #[error("Path is not a regular file: {path}")]
    NotAFile { path: PathBuf },

    /// Screenplay file is not valid UTF-8
    #[error("File is not valid UTF-8 text: {path}")]
    NotUtf8 { path: PathBuf },

    /// The parsing engine could not be loaded
    #[error("Parser failed to load: {message}")]
    ParserLoad { message: String },

    /// The parsing engine rejected a document
    #[error("Render failed: {0}")]
    Parse(#[from] ParseError),

    /// The render bridge is gone or never became ready
    #[error("Render bridge unavailable: {message}")]
    BridgeUnavailable { message: String },

    /// UI and terminal related errors
    #[error("UI operation failed: {message}")]
    UIError { message: String },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

/// Standard Result type for fountview operations.
pub type Result<T> = std::result::Result<T, FountviewError>;

impl FountviewError {
    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Create a ParserLoad error with a descriptive message
    pub fn parser_load(message: impl Into<String>) -> Self {
        Self::ParserLoad {
            message: message.into(),
        }
    }

    /// Create a BridgeUnavailable error with a descriptive message
    pub fn bridge(message: impl Into<String>) -> Self {
        Self::BridgeUnavailable {
            message: message.into(),
        }
    }

    /// Create a UIError with a descriptive message
    pub fn ui(message: impl Into<String>) -> Self {
        Self::UIError {
            message: message.into(),
        }
    }

    /// Map a failed terminal call to a UIError naming what was attempted.
    ///
    /// Use with `map_err` so terminal failures are not reported as file errors.
    pub fn terminal(action: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |err| Self::ui(format!("{action}: {err}"))
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for FountviewError {
    fn from(err: std::io::Error) -> Self {
        let message = match err.kind() {
            std::io::ErrorKind::NotFound => "File not found",
            std::io::ErrorKind::PermissionDenied => "Permission denied",
            _ => "IO operation failed",
        };
        Self::FileError {
            message: message.to_string(),
            source: err,
        }
    }
}
