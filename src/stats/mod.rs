//! Descriptive statistics over the derived tables.
//!
//! The transposed summary table exists to feed these: per-region
//! five-number summaries plus mean and sample standard deviation, matching
//! the conventions of the usual dataframe `describe` (n-1 denominator,
//! linearly interpolated quantiles). Selection metrics and per-region
//! averages serve the comparison views downstream.

use serde::{Deserialize, Serialize};

use crate::models::{LongTable, SummaryTable};

/// Five-number summary (plus mean/std) for one region's price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeRow {
    pub region: String,
    /// Non-missing observation count.
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n-1). `None` when count < 2.
    pub std: Option<f64>,
    pub min: Option<u64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<u64>,
}

/// Aggregate metrics over a region selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionMetrics {
    pub mean: f64,
    pub highest: u64,
    pub lowest: u64,
}

/// Describe every region column of the summary table.
pub fn describe(summary: &SummaryTable) -> Vec<DescribeRow> {
    summary
        .regions
        .iter()
        .enumerate()
        .map(|(idx, region)| describe_series(region, &summary.region_series(idx)))
        .collect()
}

fn describe_series(region: &str, series: &[u64]) -> DescribeRow {
    if series.is_empty() {
        return DescribeRow {
            region: region.to_string(),
            count: 0,
            mean: None,
            std: None,
            min: None,
            q25: None,
            median: None,
            q75: None,
            max: None,
        };
    }

    let mut sorted = series.to_vec();
    sorted.sort_unstable();

    let n = sorted.len();
    let mean = sorted.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    let std = if n > 1 {
        let ss = sorted
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>();
        Some((ss / (n - 1) as f64).sqrt())
    } else {
        None
    };

    DescribeRow {
        region: region.to_string(),
        count: n,
        mean: Some(mean),
        std,
        min: Some(sorted[0]),
        q25: Some(quantile(&sorted, 0.25)),
        median: Some(quantile(&sorted, 0.5)),
        q75: Some(quantile(&sorted, 0.75)),
        max: Some(sorted[n - 1]),
    }
}

/// Linearly interpolated quantile of a sorted series.
fn quantile(sorted: &[u64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0] as f64;
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;
    let lower = sorted[lo] as f64;
    if frac == 0.0 {
        lower
    } else {
        lower + frac * (sorted[lo + 1] as f64 - lower)
    }
}

/// Average price per region, sorted descending by average.
pub fn region_means(long: &LongTable) -> Vec<(String, f64)> {
    let mut means: Vec<(String, f64)> = long
        .regions()
        .into_iter()
        .map(|region| {
            let prices: Vec<u64> = long
                .iter()
                .filter(|o| o.region == region)
                .map(|o| o.price)
                .collect();
            let mean = prices.iter().map(|&p| p as f64).sum::<f64>() / prices.len() as f64;
            (region, mean)
        })
        .collect();
    means.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    means
}

/// Mean / highest / lowest over a region selection's observations.
///
/// Returns `None` when the selection matches no observations.
pub fn selection_metrics<S: AsRef<str>>(long: &LongTable, regions: &[S]) -> Option<SelectionMetrics> {
    let selected = long.filter_regions(regions);
    if selected.is_empty() {
        return None;
    }
    let prices: Vec<u64> = selected.iter().map(|o| o.price).collect();
    let sum: u64 = prices.iter().sum();
    Some(SelectionMetrics {
        mean: sum as f64 / prices.len() as f64,
        highest: *prices.iter().max().expect("non-empty"),
        lowest: *prices.iter().min().expect("non-empty"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Observation, SummaryTable};
    use chrono::NaiveDate;

    fn obs(region: &str, day: u32, price: u64) -> Observation {
        Observation {
            region: region.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            price,
        }
    }

    fn summary_one_region(values: Vec<Option<u64>>) -> SummaryTable {
        SummaryTable {
            labels: (0..values.len()).map(|i| format!("{:02}/01/2024", i + 1)).collect(),
            regions: vec!["Aceh".into()],
            cells: values.into_iter().map(|v| vec![v]).collect(),
        }
    }

    #[test]
    fn test_describe_known_series() {
        let rows = describe(&summary_one_region(vec![
            Some(10),
            Some(20),
            Some(30),
            Some(40),
        ]));
        let row = &rows[0];
        assert_eq!(row.count, 4);
        assert_eq!(row.mean, Some(25.0));
        // Sample std of {10,20,30,40}: sqrt(500/3)
        assert!((row.std.unwrap() - 12.909944487358056).abs() < 1e-9);
        assert_eq!(row.min, Some(10));
        assert_eq!(row.q25, Some(17.5));
        assert_eq!(row.median, Some(25.0));
        assert_eq!(row.q75, Some(32.5));
        assert_eq!(row.max, Some(40));
    }

    #[test]
    fn test_describe_skips_missing_cells() {
        let rows = describe(&summary_one_region(vec![Some(10), None, Some(30)]));
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].mean, Some(20.0));
    }

    #[test]
    fn test_describe_single_value_has_no_std() {
        let rows = describe(&summary_one_region(vec![Some(10)]));
        assert_eq!(rows[0].count, 1);
        assert_eq!(rows[0].std, None);
        assert_eq!(rows[0].median, Some(10.0));
    }

    #[test]
    fn test_describe_empty_region() {
        let rows = describe(&summary_one_region(vec![None, None]));
        assert_eq!(rows[0].count, 0);
        assert_eq!(rows[0].mean, None);
        assert_eq!(rows[0].min, None);
    }

    #[test]
    fn test_region_means_sorted_descending() {
        let long = LongTable(vec![
            obs("Aceh", 1, 100),
            obs("Aceh", 2, 200),
            obs("Bali", 1, 500),
        ]);
        let means = region_means(&long);
        assert_eq!(means[0], ("Bali".to_string(), 500.0));
        assert_eq!(means[1], ("Aceh".to_string(), 150.0));
    }

    #[test]
    fn test_selection_metrics() {
        let long = LongTable(vec![
            obs("Aceh", 1, 100),
            obs("Bali", 1, 400),
            obs("Aceh", 2, 200),
        ]);
        let m = selection_metrics(&long, &["Aceh"]).unwrap();
        assert_eq!(m.mean, 150.0);
        assert_eq!(m.highest, 200);
        assert_eq!(m.lowest, 100);

        assert!(selection_metrics(&long, &["Papua"]).is_none());
    }
}
