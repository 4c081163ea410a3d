//! Date-header parsing with format fallback.
//!
//! Column headers carry the observation dates, so a header that fails to
//! parse poisons every downstream join — the whole column must parse under
//! one strategy or the load fails. Strategies form an explicit ordered
//! list, tried in sequence:
//!
//! 1. the strict upstream export format `DD/MM/YYYY`;
//! 2. generic inference over common date forms (ISO and friends).
//!
//! Each strategy is applied to the entire label set atomically; a single
//! failing label moves on to the next strategy rather than producing a
//! half-parsed column.

use chrono::NaiveDate;

use crate::error::{DateFormatError, DateResult};

/// The primary upstream export format.
const PRIMARY_FORMAT: &str = "%d/%m/%Y";

/// Formats the inference strategy accepts, tried in order per label.
const INFERRED_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%m/%d/%Y"];

/// One way of reading a date label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateStrategy {
    /// Exact strict format, no guessing.
    Exact(&'static str),
    /// Try each of [`INFERRED_FORMATS`] in turn.
    Infer,
}

impl DateStrategy {
    /// Parse one label under this strategy.
    pub fn parse(&self, label: &str) -> Option<NaiveDate> {
        match self {
            DateStrategy::Exact(fmt) => NaiveDate::parse_from_str(label, fmt).ok(),
            DateStrategy::Infer => INFERRED_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(label, fmt).ok()),
        }
    }

    fn describe(&self) -> String {
        match self {
            DateStrategy::Exact(_) => "DD/MM/YYYY".to_string(),
            DateStrategy::Infer => format!("one of {}", INFERRED_FORMATS.join(", ")),
        }
    }
}

/// The ordered strategy list used by the loader.
pub fn strategies() -> Vec<DateStrategy> {
    vec![DateStrategy::Exact(PRIMARY_FORMAT), DateStrategy::Infer]
}

/// Parse every label with the first strategy that covers the whole set.
///
/// Returns dates positionally matching `labels`. If no strategy parses
/// every label, the error names the first label the last strategy
/// rejected.
pub fn parse_labels(labels: &[String]) -> DateResult<Vec<NaiveDate>> {
    let strategies = strategies();
    let mut last_failure: Option<(String, String)> = None;

    for strategy in &strategies {
        let mut parsed = Vec::with_capacity(labels.len());
        let mut failed = None;
        for label in labels {
            match strategy.parse(label) {
                Some(date) => parsed.push(date),
                None => {
                    failed = Some(label.clone());
                    break;
                }
            }
        }
        match failed {
            None => return Ok(parsed),
            Some(label) => last_failure = Some((label, strategy.describe())),
        }
    }

    let (label, expected) = last_failure.unwrap_or_else(|| {
        // Empty label set parses trivially under the first strategy, so
        // reaching this point requires at least one failing label.
        (String::new(), strategies[0].describe())
    });
    Err(DateFormatError::UnparseableLabel { label, expected })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_primary_format() {
        let dates = parse_labels(&labels(&["01/01/2024", "15/02/2024"])).unwrap();
        assert_eq!(dates, vec![ymd(2024, 1, 1), ymd(2024, 2, 15)]);
    }

    #[test]
    fn test_iso_fallback() {
        // Strict DD/MM/YYYY fails on ISO labels; inference picks them up.
        let dates = parse_labels(&labels(&["2024-01-01", "2024-01-02"])).unwrap();
        assert_eq!(dates, vec![ymd(2024, 1, 1), ymd(2024, 1, 2)]);
    }

    #[test]
    fn test_column_is_atomic() {
        // One ISO label among DD/MM/YYYY labels forces the whole column
        // onto the inference strategy, which accepts both forms.
        let dates = parse_labels(&labels(&["01/01/2024", "2024-01-02"])).unwrap();
        assert_eq!(dates, vec![ymd(2024, 1, 1), ymd(2024, 1, 2)]);
    }

    #[test]
    fn test_unparseable_label_fails_with_offender() {
        let err = parse_labels(&labels(&["01/01/2024", "garbage"])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("garbage"));
    }

    #[test]
    fn test_day_month_order_is_primary() {
        // 03/02/2024 is ambiguous; the primary strategy reads day-first.
        let dates = parse_labels(&labels(&["03/02/2024"])).unwrap();
        assert_eq!(dates, vec![ymd(2024, 2, 3)]);
    }

    #[test]
    fn test_empty_label_set() {
        assert!(parse_labels(&[]).unwrap().is_empty());
    }
}
