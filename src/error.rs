//! Error types for the Priceload pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`ParseError`] - raw table parsing errors (spreadsheet and delimited)
//! - [`SchemaError`] - table schema errors (missing identifier column)
//! - [`DateFormatError`] - unparseable date headers
//! - [`LoadError`] - top-level pipeline errors
//! - [`ServerError`] - HTTP surface errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Cell-level normalization failures are deliberately NOT errors: an
//! unparseable price coerces to the missing marker and only shows up as a
//! reduced observation count downstream.

use thiserror::Error;

// =============================================================================
// Parse Errors
// =============================================================================

/// Errors while turning raw bytes into a [`crate::models::RawTable`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// Failed to read the input file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode the input bytes as text.
    #[error("Failed to decode input: {0}")]
    Encoding(String),

    /// The spreadsheet reader rejected the input.
    #[error("Invalid spreadsheet: {0}")]
    Spreadsheet(String),

    /// The delimited-text reader rejected the input.
    #[error("Invalid delimited text: {0}")]
    Delimited(String),

    /// Neither parser strategy accepted the input.
    #[error("Unrecognized table format (spreadsheet: {spreadsheet}; delimited: {delimited})")]
    UnrecognizedFormat {
        spreadsheet: String,
        delimited: String,
    },

    /// Input has no content at all.
    #[error("Input table is empty")]
    EmptyInput,

    /// Input has no header row.
    #[error("No column headers found")]
    NoHeaders,
}

// =============================================================================
// Schema Errors
// =============================================================================

/// Errors in the shape of a parsed table.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The required identifier column is absent.
    #[error("Missing required column '{expected}' (found: {})", found.join(", "))]
    MissingRegionColumn {
        expected: String,
        found: Vec<String>,
    },
}

// =============================================================================
// Date Format Errors
// =============================================================================

/// Errors while parsing date-labeled column headers.
#[derive(Debug, Error)]
pub enum DateFormatError {
    /// A header could not be parsed by any strategy.
    #[error("Column header '{label}' is not a recognizable date (expected {expected})")]
    UnparseableLabel { label: String, expected: String },
}

// =============================================================================
// Load Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the main error type returned by [`crate::transform::pipeline::load_bytes`].
/// Every fatal stage maps to exactly one variant; the pipeline never returns
/// a partial result alongside one of these.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Input is neither a valid spreadsheet nor valid delimited text.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Required identifier column missing.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Column headers cannot be parsed as dates under any strategy.
    #[error("Date format error: {0}")]
    DateFormat(#[from] DateFormatError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline failure surfaced over HTTP.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for date-header parsing.
pub type DateResult<T> = Result<T, DateFormatError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, LoadError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
