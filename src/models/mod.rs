//! Domain models for the Priceload pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`RawCell`] / [`RawTable`] - input exactly as parsed, untyped
//! - [`WideTable`] - cleaned wide table, one row per region
//! - [`Observation`] / [`LongTable`] - long-form (region, date, price) rows
//! - [`SummaryTable`] - the wide table transposed, one row per date label
//!
//! A missing price is `Option::None` everywhere, never a sentinel number,
//! so a zero price stays distinct from "no data".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Source label of the identifier column, as exported upstream.
pub const SOURCE_REGION_COLUMN: &str = "Komoditas (Rp)";

/// Canonical label of the identifier column after renaming.
pub const REGION_COLUMN: &str = "Region";

/// Optional sequence column dropped during schema validation.
pub const SEQUENCE_COLUMN: &str = "No";

// =============================================================================
// Raw input
// =============================================================================

/// One untyped input cell.
///
/// Spreadsheet cells arrive typed (`Int`/`Float`), delimited-text cells as
/// `Text`. Serializes untagged so raw-table JSON reads like the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    /// Integer cell from a typed source.
    Int(i64),
    /// Floating-point cell from a typed source.
    Float(f64),
    /// Textual cell; may hold separators, the missing token, or noise.
    Text(String),
    /// Cell with no content.
    Empty,
}

impl RawCell {
    /// View the cell as trimmed text, if it has any.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawCell::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    Some(t.to_string())
                }
            }
            RawCell::Int(i) => Some(i.to_string()),
            RawCell::Float(f) => Some(f.to_string()),
            RawCell::Empty => None,
        }
    }

    /// Whether the cell carries no usable content.
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// An ordered table exactly as parsed: headers plus rows of raw cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    /// Column labels, in source order.
    pub headers: Vec<String>,
    /// Rows of cells; each row has `headers.len()` cells.
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    /// Create a table, padding or truncating each row to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<RawCell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.truncate(width);
                row.resize(width, RawCell::Empty);
                row
            })
            .collect();
        Self { headers, rows }
    }
}

// =============================================================================
// Cleaned wide table
// =============================================================================

/// One cleaned wide row: a region and its per-date prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WideRow {
    /// Region name (the row key).
    pub region: String,
    /// One normalized price per date label, `None` where missing.
    pub prices: Vec<Option<u64>>,
}

/// The cleaned wide table: trimmed date labels, one row per region, every
/// cell normalized to a non-negative price or missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WideTable {
    /// Date column labels, trimmed, in source order.
    pub date_labels: Vec<String>,
    /// One row per region that survived filtering.
    pub rows: Vec<WideRow>,
}

impl WideTable {
    /// Number of regions.
    pub fn region_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of date columns.
    pub fn date_count(&self) -> usize {
        self.date_labels.len()
    }
}

// =============================================================================
// Long-form observations
// =============================================================================

/// A single (region, date, price) observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Region name.
    pub region: String,
    /// Calendar date of the observation.
    pub date: NaiveDate,
    /// Non-negative price. Never missing: rows with missing price are
    /// excluded before observations are produced.
    pub price: u64,
}

/// Long-form table: observations sorted ascending by date (stable).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LongTable(pub Vec<Observation>);

impl LongTable {
    /// Number of observations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table holds no observations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over observations in date order.
    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.0.iter()
    }

    /// Unique region names, sorted alphabetically.
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = self.0.iter().map(|o| o.region.clone()).collect();
        regions.sort();
        regions.dedup();
        regions
    }

    /// Unique dates, in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.0.iter().map(|o| o.date).collect();
        dates.dedup();
        dates
    }

    /// Observations restricted to the given regions, order preserved.
    pub fn filter_regions<S: AsRef<str>>(&self, regions: &[S]) -> LongTable {
        let wanted: Vec<&str> = regions.iter().map(|r| r.as_ref()).collect();
        LongTable(
            self.0
                .iter()
                .filter(|o| wanted.contains(&o.region.as_str()))
                .cloned()
                .collect(),
        )
    }

    /// Observations on one date, sorted by price descending.
    pub fn on_date(&self, date: NaiveDate) -> Vec<&Observation> {
        let mut obs: Vec<&Observation> = self.0.iter().filter(|o| o.date == date).collect();
        obs.sort_by(|a, b| b.price.cmp(&a.price));
        obs
    }
}

// =============================================================================
// Transposed summary table
// =============================================================================

/// The cleaned wide table with rows and columns swapped: one row per
/// original date label, one column per region. Feeds per-region
/// descriptive statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    /// Row keys: the original (trimmed) date column labels.
    pub labels: Vec<String>,
    /// Column keys: region names.
    pub regions: Vec<String>,
    /// Row-major cells: `cells[label_idx][region_idx]`.
    pub cells: Vec<Vec<Option<u64>>>,
}

impl SummaryTable {
    /// The non-missing price series of one region column.
    pub fn region_series(&self, region_idx: usize) -> Vec<u64> {
        self.cells
            .iter()
            .filter_map(|row| row.get(region_idx).copied().flatten())
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
