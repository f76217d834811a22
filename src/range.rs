//! Numeric range parsing for rule rows.
//!
//! Rule tables store sizes and budgets as free-form strings ("600-850",
//! "1,200 – 1,500", "900"). This module turns them into closed, half-open,
//! or fully open [`NumericRange`] values without ever failing: unparseable
//! input is an open range, not an error.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// First run of `digits[.digits]`, optionally followed by `-digits[.digits]`.
/// Input is pre-stripped of whitespace/commas and dash-normalized, so the
/// grammar stays this small.
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)(?:-(\d+(?:\.\d+)?))?").expect("range pattern is valid")
});

/// Unicode dash variants that appear in imported rule data.
const DASH_VARIANTS: [char; 3] = ['\u{2013}', '\u{2014}', '\u{2212}'];

/// An inclusive numeric range with optional bounds.
///
/// `None` on a bound means "unconstrained on that side"; both `None` is the
/// open range produced for input that carries no number at all.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    /// The fully open range.
    pub const OPEN: Self = Self { min: None, max: None };

    /// Build a range from explicit bounds. Out-of-order bounds are swapped
    /// so the `min <= max` invariant holds.
    pub fn from_bounds(min: Option<f64>, max: Option<f64>) -> Self {
        match (min, max) {
            (Some(lo), Some(hi)) if lo > hi => Self { min: Some(hi), max: Some(lo) },
            _ => Self { min, max },
        }
    }

    /// True when neither bound is present.
    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Inclusive containment; a missing bound never excludes.
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|lo| value >= lo) && self.max.is_none_or(|hi| value <= hi)
    }

    /// True when the range has a lower bound and `value` meets it. Used for
    /// budget-tier thresholds, where only the floor of a band matters.
    pub fn clears_min(&self, value: f64) -> bool {
        self.min.is_some_and(|lo| value >= lo)
    }
}

/// Parse a free-form range string.
///
/// Strips commas and whitespace, normalizes en/em dashes and the minus sign
/// to an ASCII hyphen, lowercases, then matches the first `low-high` pair or
/// single number. A single number yields `min == max`. Anything that does
/// not parse to a finite number falls back to `None` for that bound; this
/// function never errors.
pub fn parse_range(raw: &str) -> NumericRange {
    let mut cleaned = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == ',' || c.is_whitespace() {
            continue;
        }
        if DASH_VARIANTS.contains(&c) {
            cleaned.push('-');
        } else {
            cleaned.push(c.to_ascii_lowercase());
        }
    }

    let Some(caps) = RANGE_RE.captures(&cleaned) else {
        return NumericRange::OPEN;
    };

    let low = caps.get(1).and_then(|m| finite(m.as_str()));
    let high = caps.get(2).and_then(|m| finite(m.as_str()));

    match (low, high) {
        (Some(lo), None) if caps.get(2).is_none() => NumericRange::from_bounds(Some(lo), Some(lo)),
        (lo, hi) => NumericRange::from_bounds(lo, hi),
    }
}

/// Parse to f64, rejecting non-finite results (overflowing digit runs).
fn finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("600-850", Some(600.0), Some(850.0))]
    #[case("900", Some(900.0), Some(900.0))]
    #[case("", None, None)]
    #[case("600\u{2013}850", Some(600.0), Some(850.0))] // en dash
    #[case("600\u{2014}850", Some(600.0), Some(850.0))] // em dash
    #[case("600\u{2212}850", Some(600.0), Some(850.0))] // minus sign
    #[case("1,200 - 1,500", Some(1200.0), Some(1500.0))]
    #[case("  450  ", Some(450.0), Some(450.0))]
    #[case("12.5-18.75", Some(12.5), Some(18.75))]
    #[case("Sq Ft: 600-850", Some(600.0), Some(850.0))]
    #[case("approx 900 sqft", Some(900.0), Some(900.0))]
    #[case("no numbers here", None, None)]
    #[case("---", None, None)]
    fn parse_range_cases(#[case] raw: &str, #[case] min: Option<f64>, #[case] max: Option<f64>) {
        let range = parse_range(raw);
        check!(range.min == min, "input: {:?}", raw);
        check!(range.max == max, "input: {:?}", raw);
    }

    #[test]
    fn dash_variant_parses_identically_to_hyphen() {
        check!(parse_range("600\u{2013}850") == parse_range("600-850"));
    }

    #[test]
    fn out_of_order_bounds_are_swapped() {
        let range = parse_range("850-600");
        check!(range.min == Some(600.0));
        check!(range.max == Some(850.0));
    }

    #[rstest]
    #[case(600.0, true)]
    #[case(850.0, true)]
    #[case(599.9, false)]
    #[case(850.1, false)]
    fn contains_is_inclusive(#[case] value: f64, #[case] expected: bool) {
        let range = parse_range("600-850");
        check!(range.contains(value) == expected);
    }

    #[test]
    fn open_range_contains_everything() {
        check!(NumericRange::OPEN.contains(0.0));
        check!(NumericRange::OPEN.contains(f64::MAX));
        check!(NumericRange::OPEN.is_open());
        check!(!NumericRange::OPEN.clears_min(1.0));
    }

    #[test]
    fn clears_min_needs_a_floor() {
        let band = parse_range("2500000");
        check!(band.clears_min(2_500_000.0));
        check!(!band.clears_min(2_499_999.0));
    }
}
