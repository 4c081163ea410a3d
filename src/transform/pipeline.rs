//! High-level loading pipeline.
//!
//! Combines all steps: parsing, schema validation, row filtering, cell
//! normalization, reshaping, date parsing, and the final sort — producing
//! the long-form table and the transposed summary in one call.
//!
//! The pipeline is strictly linear; every fatal step returns through `?`
//! and no partial result ever escapes. Cell-level problems never fail the
//! load — they are tallied into [`DroppedRows`] instead.
//!
//! # Example
//!
//! ```rust,ignore
//! use priceload::load_path;
//!
//! let result = load_path("Tabel Harga Berdasarkan Komoditas.xlsx")?;
//! println!("{} observations", result.long.len());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::logs::{log_info, log_success, log_warning};
use crate::error::PipelineResult;
use crate::models::{LongTable, Observation, RawTable, SummaryTable, WideRow, WideTable};
use crate::parser::{self, ParsedTable, SourceFormat};
use crate::transform::dates::parse_labels;
use crate::transform::normalize::normalize_price;
use crate::transform::reshape::{clean_label, melt, transpose};
use crate::validation::apply_schema;

/// Result of a complete load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadResult {
    /// Long-form observations, sorted ascending by date.
    pub long: LongTable,
    /// The cleaned wide table transposed (dates as rows, regions as columns).
    pub summary: SummaryTable,
    /// Source metadata and row accounting.
    pub info: TableInfo,
}

/// Metadata about a completed load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    /// Which parser strategy accepted the input.
    pub format: SourceFormat,
    /// Detected encoding (delimited inputs only).
    pub encoding: Option<String>,
    /// Detected delimiter (delimited inputs only).
    pub delimiter: Option<String>,
    /// Regions surviving cleanup.
    pub region_count: usize,
    /// Date columns in the source.
    pub date_count: usize,
    /// Observations in the long table.
    pub observation_count: usize,
    /// Rows and cells silently dropped along the way.
    pub dropped: DroppedRows,
}

/// Accounting of recoverable drops. These are not errors: they surface to
/// callers as reduced counts, nothing more.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedRows {
    /// Rows discarded for a blank region value.
    pub blank_region: usize,
    /// Rows discarded because every date cell was missing.
    pub empty_rows: usize,
    /// Melted rows discarded for a missing price.
    pub missing_prices: usize,
}

/// Load a table from raw bytes.
///
/// This is the main entry point for the pipeline. It:
/// 1. Parses the input (spreadsheet, then delimited fallback)
/// 2. Validates and canonicalizes the schema
/// 3. Normalizes every price cell
/// 4. Reshapes wide to long and parses the date headers
/// 5. Sorts observations and transposes the summary view
pub fn load_bytes(bytes: &[u8]) -> PipelineResult<LoadResult> {
    log_info("Reading input table...");
    let parsed = parser::parse_bytes(bytes)?;
    load_parsed(parsed)
}

/// Load a table from a file on disk.
pub fn load_path<P: AsRef<Path>>(path: P) -> PipelineResult<LoadResult> {
    log_info(format!("Reading {}...", path.as_ref().display()));
    let parsed = parser::parse_path(path)?;
    load_parsed(parsed)
}

fn load_parsed(parsed: ParsedTable) -> PipelineResult<LoadResult> {
    let ParsedTable {
        table,
        format,
        encoding,
        delimiter,
    } = parsed;

    log_success(format!(
        "Parsed {} columns, {} rows",
        table.headers.len(),
        table.rows.len()
    ));

    let rows_in = table.rows.len();
    let mut dropped = DroppedRows::default();

    // Required identifier column, canonical rename, sequence-column drop,
    // blank-region filtering.
    let table = apply_schema(table)?;
    dropped.blank_region = rows_in - table.rows.len();
    if dropped.blank_region > 0 {
        log_warning(format!(
            "{} rows dropped (blank region value)",
            dropped.blank_region
        ));
    }

    // Normalize every value cell and drop all-missing rows.
    let wide = normalize_wide(&table, &mut dropped);
    if dropped.empty_rows > 0 {
        log_warning(format!("{} rows dropped (no price data)", dropped.empty_rows));
    }
    log_success(format!(
        "{} regions x {} date columns after cleanup",
        wide.region_count(),
        wide.date_count()
    ));

    // Unpivot, then resolve the date headers for the whole column set.
    let melted = melt(&wide);
    let labels: Vec<String> = wide.date_labels.iter().map(|l| clean_label(l)).collect();
    let dates = parse_labels(&labels)?;

    // Melt order is column-major, so each block of `region_count` rows
    // shares one date column.
    let region_count = wide.region_count().max(1);
    let mut observations = Vec::with_capacity(melted.len());
    for (idx, row) in melted.into_iter().enumerate() {
        match row.price {
            Some(price) => observations.push(Observation {
                region: row.region,
                date: dates[idx / region_count],
                price,
            }),
            None => dropped.missing_prices += 1,
        }
    }

    // Stable sort: same-date observations keep reshape order.
    observations.sort_by_key(|o| o.date);
    let long = LongTable(observations);
    let summary = transpose(&wide);

    log_success(format!("{} observations ready", long.len()));

    let info = TableInfo {
        format,
        encoding,
        delimiter: delimiter.map(|d| d.to_string()),
        region_count: wide.region_count(),
        date_count: wide.date_count(),
        observation_count: long.len(),
        dropped,
    };

    Ok(LoadResult { long, summary, info })
}

/// Normalize every value cell of a canonicalized table, trimming labels
/// and dropping rows with no data at all.
fn normalize_wide(table: &RawTable, dropped: &mut DroppedRows) -> WideTable {
    let date_labels: Vec<String> = table
        .headers
        .iter()
        .skip(1)
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::with_capacity(table.rows.len());
    for raw_row in &table.rows {
        let Some(region) = raw_row[0].as_text() else {
            continue;
        };
        let prices: Vec<Option<u64>> = raw_row[1..].iter().map(normalize_price).collect();
        if prices.iter().all(Option::is_none) {
            dropped.empty_rows += 1;
            continue;
        }
        rows.push(WideRow { region, prices });
    }

    WideTable { date_labels, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_worked_example() {
        let csv = b"Komoditas (Rp),01/01/2024,02/01/2024\nJakarta,\"12,500\",-\n";
        let result = load_bytes(csv).unwrap();

        assert_eq!(result.long.len(), 1);
        let obs = &result.long.0[0];
        assert_eq!(obs.region, "Jakarta");
        assert_eq!(obs.date, ymd(2024, 1, 1));
        assert_eq!(obs.price, 12500);
        assert_eq!(result.info.dropped.missing_prices, 1);
    }

    #[test]
    fn test_schema_failure_yields_no_tables() {
        let csv = b"Provinsi,01/01/2024\nJakarta,100\n";
        let err = load_bytes(csv).unwrap_err();
        assert!(matches!(err, LoadError::Schema(_)));
    }

    #[test]
    fn test_full_grid_has_r_times_d_observations() {
        let csv = b"Komoditas (Rp),01/01/2024,02/01/2024,03/01/2024\n\
            Aceh,100,110,120\n\
            Bali,200,210,220\n";
        let result = load_bytes(csv).unwrap();
        assert_eq!(result.long.len(), 2 * 3);
        assert_eq!(result.info.region_count, 2);
        assert_eq!(result.info.date_count, 3);
    }

    #[test]
    fn test_sorted_ascending_with_stable_ties() {
        // Columns deliberately out of date order.
        let csv = b"Komoditas (Rp),02/01/2024,01/01/2024\n\
            Aceh,110,100\n\
            Bali,210,200\n";
        let result = load_bytes(csv).unwrap();

        let dates: Vec<NaiveDate> = result.long.iter().map(|o| o.date).collect();
        for pair in dates.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        // Ties keep source row order within a date.
        assert_eq!(result.long.0[0].region, "Aceh");
        assert_eq!(result.long.0[1].region, "Bali");
        assert_eq!(result.long.0[0].price, 100);
    }

    #[test]
    fn test_no_observation_has_missing_price() {
        let csv = b"Komoditas (Rp),01/01/2024,02/01/2024\n\
            Aceh,-,110\n\
            Bali,200,-\n\
            NTB,n/a,\n";
        let result = load_bytes(csv).unwrap();
        assert_eq!(result.long.len(), 2);
        assert_eq!(result.info.dropped.missing_prices, 2);
        // NTB had no usable cell at all and fell out earlier.
        assert_eq!(result.info.dropped.empty_rows, 1);
    }

    #[test]
    fn test_iso_headers_parse_via_fallback() {
        let csv = b"Komoditas (Rp),2024-01-01,2024-01-02\nAceh,100,110\n";
        let result = load_bytes(csv).unwrap();
        assert_eq!(result.long.0[0].date, ymd(2024, 1, 1));
        assert_eq!(result.long.0[1].date, ymd(2024, 1, 2));
    }

    #[test]
    fn test_unparseable_headers_fail() {
        let csv = b"Komoditas (Rp),first,second\nAceh,100,110\n";
        let err = load_bytes(csv).unwrap_err();
        assert!(matches!(err, LoadError::DateFormat(_)));
    }

    #[test]
    fn test_sequence_column_and_blank_regions() {
        let csv = b"No,Komoditas (Rp),01/01/2024\n\
            1,Aceh,100\n\
            2,,200\n";
        let result = load_bytes(csv).unwrap();
        assert_eq!(result.long.len(), 1);
        assert_eq!(result.info.dropped.blank_region, 1);
    }

    #[test]
    fn test_header_whitespace_tolerated() {
        let csv = b"Komoditas (Rp), 01/01/2024 ,02/01/2024\nAceh,100,110\n";
        let result = load_bytes(csv).unwrap();
        assert_eq!(result.long.0[0].date, ymd(2024, 1, 1));
        assert_eq!(result.summary.labels[0], "01/01/2024");
    }

    #[test]
    fn test_summary_is_transposed_wide() {
        let csv = b"Komoditas (Rp),01/01/2024,02/01/2024\n\
            Aceh,100,-\n\
            Bali,200,210\n";
        let result = load_bytes(csv).unwrap();
        assert_eq!(result.summary.regions, vec!["Aceh", "Bali"]);
        assert_eq!(result.summary.labels.len(), 2);
        assert_eq!(result.summary.cells[0], vec![Some(100), Some(200)]);
        assert_eq!(result.summary.cells[1], vec![None, Some(210)]);
    }

    #[test]
    fn test_load_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harga.csv");
        std::fs::write(&path, "Komoditas (Rp),01/01/2024\nAceh,\"12,500\"\n").unwrap();
        let result = load_path(&path).unwrap();
        assert_eq!(result.long.len(), 1);
        assert_eq!(result.long.0[0].price, 12500);
    }
}
