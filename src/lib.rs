//! # Priceload - commodity price table loading and reshaping
//!
//! Priceload ingests a wide commodity-price table (one row per region, one
//! column per date), cleans its mixed numeric/textual encodings, and
//! reshapes it into long-form observations for time-series analysis,
//! alongside a transposed summary for per-region statistics.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Price table │────▶│   Parser    │────▶│   Pipeline   │────▶│ Long + stats │
//! │ (xlsx/CSV)  │     │ (auto-fmt)  │     │ (clean/melt) │     │   (JSON)     │
//! └─────────────┘     └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use priceload::load_bytes;
//!
//! let result = load_bytes(&bytes)?;
//! for obs in result.long.iter() {
//!     println!("{} {} {}", obs.region, obs.date, obs.price);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain tables (RawTable, LongTable, SummaryTable)
//! - [`parser`] - Table parsing with format auto-detection
//! - [`validation`] - Schema checks and canonicalization
//! - [`transform`] - Normalization, reshaping, and the pipeline
//! - [`stats`] - Per-region descriptive statistics
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Validation
pub mod validation;

// Transformation
pub mod transform;

// Statistics
pub mod stats;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{DateFormatError, LoadError, ParseError, SchemaError, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    LongTable, Observation, RawCell, RawTable, SummaryTable, WideRow, WideTable, REGION_COLUMN,
    SEQUENCE_COLUMN, SOURCE_REGION_COLUMN,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    detect_delimiter, detect_encoding, parse_bytes, parse_path, ParsedTable, SourceFormat,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{apply_schema, locate_region_column};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::normalize::{normalize_price, MISSING_TOKEN};
pub use transform::pipeline::{load_bytes, load_path, DroppedRows, LoadResult, TableInfo};
pub use transform::reshape::{melt, transpose};

// =============================================================================
// Re-exports - Statistics
// =============================================================================

pub use stats::{describe, region_means, selection_metrics, DescribeRow, SelectionMetrics};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, UploadResponse};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
