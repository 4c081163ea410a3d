//! Price normalization.
//!
//! Converts one raw cell into either a clean non-negative price or the
//! missing marker. Source tables mix typed numerics, digit strings with
//! thousands separators, the `-` placeholder, blanks, and the occasional
//! footnote — everything unusable coerces silently to `None`. This is the
//! one stage of the pipeline that is allowed to swallow bad input.

use crate::models::RawCell;

/// Token upstream exports use for "no data".
pub const MISSING_TOKEN: &str = "-";

/// Normalize one raw cell into a price.
///
/// - `Text`: trim, strip thousands-separator commas; empty or `-` is
///   missing; otherwise integer conversion, missing on failure.
/// - `Int`: taken as-is.
/// - `Float`: truncated toward zero (spreadsheet numerics arrive as f64).
/// - `Empty`, negatives, NaN: missing.
///
/// Never fails: the result is a valid non-negative price or `None`.
pub fn normalize_price(cell: &RawCell) -> Option<u64> {
    match cell {
        RawCell::Empty => None,
        RawCell::Int(i) => u64::try_from(*i).ok(),
        RawCell::Float(f) => {
            if f.is_finite() && *f >= 0.0 {
                Some(f.trunc() as u64)
            } else {
                None
            }
        }
        RawCell::Text(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() || cleaned == MISSING_TOKEN {
                return None;
            }
            // Parse signed first so "-5" is a number (then rejected as
            // negative) rather than lumped in with textual noise.
            let value: i64 = cleaned.parse().ok()?;
            u64::try_from(value).ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    #[test]
    fn test_separators_removed() {
        assert_eq!(normalize_price(&text("12,500")), Some(12500));
        assert_eq!(normalize_price(&text("1,234,567")), Some(1234567));
    }

    #[test]
    fn test_surrounding_whitespace_stripped() {
        assert_eq!(normalize_price(&text("  13250 ")), Some(13250));
        assert_eq!(normalize_price(&text(" 12,500\t")), Some(12500));
    }

    #[test]
    fn test_missing_token_and_blank() {
        assert_eq!(normalize_price(&text("-")), None);
        assert_eq!(normalize_price(&text("")), None);
        assert_eq!(normalize_price(&text("   ")), None);
        assert_eq!(normalize_price(&RawCell::Empty), None);
    }

    #[test]
    fn test_non_numeric_is_missing() {
        assert_eq!(normalize_price(&text("n/a")), None);
        assert_eq!(normalize_price(&text("12.500*")), None);
        assert_eq!(normalize_price(&text("harga")), None);
    }

    #[test]
    fn test_idempotent_on_clean_integers() {
        assert_eq!(normalize_price(&text("12500")), Some(12500));
        assert_eq!(normalize_price(&text("0")), Some(0));
        assert_eq!(normalize_price(&RawCell::Int(12500)), Some(12500));
    }

    #[test]
    fn test_negative_is_missing() {
        assert_eq!(normalize_price(&text("-5")), None);
        assert_eq!(normalize_price(&text("-1,000")), None);
        assert_eq!(normalize_price(&RawCell::Int(-5)), None);
        assert_eq!(normalize_price(&RawCell::Float(-1.0)), None);
    }

    #[test]
    fn test_float_truncates() {
        assert_eq!(normalize_price(&RawCell::Float(12500.0)), Some(12500));
        assert_eq!(normalize_price(&RawCell::Float(12500.9)), Some(12500));
        assert_eq!(normalize_price(&RawCell::Float(f64::NAN)), None);
    }

    #[test]
    fn test_zero_is_a_price_not_missing() {
        assert_eq!(normalize_price(&text("0")), Some(0));
        assert_eq!(normalize_price(&RawCell::Int(0)), Some(0));
    }
}
