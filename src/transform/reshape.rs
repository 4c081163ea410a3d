//! Wide-to-long reshaping and transposition.
//!
//! The cleaned wide table (one row per region, one column per date) is
//! unpivoted into long form for time-series consumers, and separately
//! transposed (one row per date, one column per region) for descriptive
//! statistics.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{SummaryTable, WideTable};

/// Source headers sometimes carry stray spaces inside the date text.
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// One melted row before date parsing: (region, date label, price).
#[derive(Debug, Clone, PartialEq)]
pub struct MeltedRow {
    pub region: String,
    pub label: String,
    pub price: Option<u64>,
}

/// Strip every whitespace character embedded in a date label.
pub fn clean_label(label: &str) -> String {
    WHITESPACE.replace_all(label, "").into_owned()
}

/// Unpivot the wide table: one output row per (region, date column).
///
/// Iterates column-major — all regions of the first date column, then the
/// second, and so on — so the final stable date sort keeps each date's
/// regions in source row order.
pub fn melt(wide: &WideTable) -> Vec<MeltedRow> {
    let mut out = Vec::with_capacity(wide.region_count() * wide.date_count());
    for (col, label) in wide.date_labels.iter().enumerate() {
        let label = clean_label(label);
        for row in &wide.rows {
            out.push(MeltedRow {
                region: row.region.clone(),
                label: label.clone(),
                price: row.prices.get(col).copied().flatten(),
            });
        }
    }
    out
}

/// Swap rows and columns: date labels become row keys, regions columns.
pub fn transpose(wide: &WideTable) -> SummaryTable {
    let regions: Vec<String> = wide.rows.iter().map(|r| r.region.clone()).collect();
    let cells = wide
        .date_labels
        .iter()
        .enumerate()
        .map(|(col, _)| {
            wide.rows
                .iter()
                .map(|row| row.prices.get(col).copied().flatten())
                .collect()
        })
        .collect();
    SummaryTable {
        labels: wide.date_labels.clone(),
        regions,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WideRow;

    fn wide() -> WideTable {
        WideTable {
            date_labels: vec!["01/01/2024".into(), "02/01/2024".into()],
            rows: vec![
                WideRow {
                    region: "Aceh".into(),
                    prices: vec![Some(100), Some(110)],
                },
                WideRow {
                    region: "Bali".into(),
                    prices: vec![Some(200), Some(210)],
                },
            ],
        }
    }

    #[test]
    fn test_melt_row_count_and_order() {
        let melted = melt(&wide());
        // R x D rows, column-major.
        assert_eq!(melted.len(), 4);
        assert_eq!(melted[0].region, "Aceh");
        assert_eq!(melted[0].label, "01/01/2024");
        assert_eq!(melted[1].region, "Bali");
        assert_eq!(melted[1].label, "01/01/2024");
        assert_eq!(melted[2].label, "02/01/2024");
    }

    #[test]
    fn test_melt_keeps_missing_cells() {
        let mut w = wide();
        w.rows[1].prices[0] = None;
        let melted = melt(&w);
        assert_eq!(melted[1].price, None);
        assert_eq!(melted.len(), 4);
    }

    #[test]
    fn test_label_whitespace_removed() {
        assert_eq!(clean_label(" 01/01/2024 "), "01/01/2024");
        assert_eq!(clean_label("01 / 01 / 2024"), "01/01/2024");
    }

    #[test]
    fn test_transpose_shape() {
        let summary = transpose(&wide());
        assert_eq!(summary.labels.len(), 2);
        assert_eq!(summary.regions, vec!["Aceh", "Bali"]);
        assert_eq!(summary.cells[0], vec![Some(100), Some(200)]);
        assert_eq!(summary.cells[1], vec![Some(110), Some(210)]);
    }

    #[test]
    fn test_melt_round_trip() {
        // Re-pivoting the melted rows reconstructs the wide table exactly.
        let w = wide();
        let melted = melt(&w);

        let mut rebuilt = WideTable {
            date_labels: w.date_labels.clone(),
            rows: w
                .rows
                .iter()
                .map(|r| WideRow {
                    region: r.region.clone(),
                    prices: vec![None; w.date_count()],
                })
                .collect(),
        };
        for m in &melted {
            let col = rebuilt
                .date_labels
                .iter()
                .position(|l| clean_label(l) == m.label)
                .unwrap();
            let row = rebuilt
                .rows
                .iter_mut()
                .find(|r| r.region == m.region)
                .unwrap();
            row.prices[col] = m.price;
        }
        assert_eq!(rebuilt, w);
    }
}
