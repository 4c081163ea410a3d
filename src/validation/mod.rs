//! Table schema validation.
//!
//! The downstream reshape is meaningless without the region identifier
//! column, so its absence is fatal and detected before any cell work.
//! Validation also canonicalizes the table shape:
//!
//! - the source label `"Komoditas (Rp)"` is renamed to `"Region"`;
//! - the optional `"No"` sequence column is dropped (absent is fine);
//! - rows with an empty region value are discarded.

use crate::error::{SchemaError, SchemaResult};
use crate::models::{RawTable, REGION_COLUMN, SEQUENCE_COLUMN, SOURCE_REGION_COLUMN};

/// Locate the identifier column, comparing trimmed labels.
pub fn locate_region_column(headers: &[String]) -> SchemaResult<usize> {
    headers
        .iter()
        .position(|h| h.trim() == SOURCE_REGION_COLUMN)
        .ok_or_else(|| SchemaError::MissingRegionColumn {
            expected: SOURCE_REGION_COLUMN.to_string(),
            found: headers.to_vec(),
        })
}

/// Validate and canonicalize a raw table.
///
/// On success the returned table has `"Region"` as its first column,
/// no sequence column, and no rows with a blank region.
pub fn apply_schema(table: RawTable) -> SchemaResult<RawTable> {
    let region_idx = locate_region_column(&table.headers)?;
    let sequence_idx = table
        .headers
        .iter()
        .position(|h| h.trim() == SEQUENCE_COLUMN);

    // Region first, then every value column in source order.
    let mut order = vec![region_idx];
    order.extend((0..table.headers.len()).filter(|&i| {
        i != region_idx && Some(i) != sequence_idx
    }));

    let headers = order
        .iter()
        .map(|&i| {
            if i == region_idx {
                REGION_COLUMN.to_string()
            } else {
                table.headers[i].clone()
            }
        })
        .collect();

    let rows = table
        .rows
        .into_iter()
        .filter(|row| !row[region_idx].is_blank())
        .map(|row| order.iter().map(|&i| row[i].clone()).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawCell;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    fn table(headers: &[&str], rows: Vec<Vec<RawCell>>) -> RawTable {
        RawTable::new(headers.iter().map(|h| h.to_string()).collect(), rows)
    }

    #[test]
    fn test_missing_region_column_is_fatal() {
        let t = table(&["Harga", "01/01/2024"], vec![]);
        let err = apply_schema(t).unwrap_err();
        assert!(matches!(err, SchemaError::MissingRegionColumn { .. }));
        assert!(err.to_string().contains("Komoditas (Rp)"));
    }

    #[test]
    fn test_rename_and_sequence_drop() {
        let t = table(
            &["No", "Komoditas (Rp)", "01/01/2024"],
            vec![vec![text("1"), text("Aceh"), text("12,500")]],
        );
        let out = apply_schema(t).unwrap();
        assert_eq!(out.headers, vec!["Region", "01/01/2024"]);
        assert_eq!(out.rows[0], vec![text("Aceh"), text("12,500")]);
    }

    #[test]
    fn test_sequence_column_optional() {
        let t = table(
            &["Komoditas (Rp)", "01/01/2024"],
            vec![vec![text("Aceh"), text("100")]],
        );
        let out = apply_schema(t).unwrap();
        assert_eq!(out.headers, vec!["Region", "01/01/2024"]);
    }

    #[test]
    fn test_blank_region_rows_discarded() {
        let t = table(
            &["Komoditas (Rp)", "01/01/2024"],
            vec![
                vec![text("Aceh"), text("100")],
                vec![text("  "), text("200")],
                vec![RawCell::Empty, text("300")],
            ],
        );
        let out = apply_schema(t).unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0][0], text("Aceh"));
    }

    #[test]
    fn test_header_match_tolerates_surrounding_whitespace() {
        let t = table(
            &["  Komoditas (Rp) ", "01/01/2024"],
            vec![vec![text("Aceh"), text("100")]],
        );
        assert!(apply_schema(t).is_ok());
    }
}
