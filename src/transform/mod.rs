//! Transformation module.
//!
//! This module turns a validated raw table into the derived views:
//! - Normalize: per-cell price cleanup
//! - Dates: date-header parsing with format fallback
//! - Reshape: wide-to-long melt and transposition
//! - Pipeline: the full load orchestration

pub mod dates;
pub mod normalize;
pub mod pipeline;
pub mod reshape;

pub use normalize::normalize_price;
pub use pipeline::*;
pub use reshape::{melt, transpose};
