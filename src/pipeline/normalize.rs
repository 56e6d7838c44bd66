use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::constants::PLACEHOLDER_TOKENS;

/// A numeric metric that is either a finite value or explicitly missing.
///
/// Missing is distinguishable from zero, and a `Value` is never NaN or
/// infinite; construction goes through [`Metric::from_f64`] which routes
/// non-finite numbers to `Missing`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Value(f64),
    Missing,
}

impl Metric {
    /// Wraps a number, mapping NaN and infinities to `Missing`.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Metric::Value(value)
        } else {
            Metric::Missing
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(v),
            Metric::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Metric::Missing)
    }
}

impl From<Option<f64>> for Metric {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Metric::Missing, Metric::from_f64)
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Value(v) => serializer.serialize_some(v),
            Metric::Missing => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Metric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Metric::from(Option::<f64>::deserialize(deserializer)?))
    }
}

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

/// Returns true for raw tokens that stand in for "no value": the em dash,
/// the Unicode replacement character, empty cells, and censored values such
/// as `<5`.
pub fn is_placeholder(raw: &str) -> bool {
    raw.is_empty() || raw.contains('<') || PLACEHOLDER_TOKENS.contains(&raw)
}

/// Parses a raw cell into a metric value.
///
/// Placeholder tokens and anything that fails a decimal parse become
/// `Missing`; so do non-finite parses, which keeps NaN out of downstream
/// arithmetic.
pub fn parse_metric(raw: &str) -> Metric {
    let trimmed = raw.trim();
    if is_placeholder(trimmed) {
        return Metric::Missing;
    }
    match trimmed.parse::<f64>() {
        Ok(v) => Metric::from_f64(v),
        Err(_) => Metric::Missing,
    }
}

/// Extracts a calendar year from a date cell.
///
/// Tries full-date formats first, then falls back to the first 4-digit year
/// anywhere in the string (which also covers period labels like
/// `2024 '19-'23` and month-resolution stamps like `2020-07`).
pub fn parse_year_from_date(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(chrono::Datelike::year(&date));
        }
    }

    YEAR_RE
        .find(trimmed)
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

/// Parses a bare year column (e.g. the poverty dataset's `Year`).
pub fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    match trimmed.parse::<i32>() {
        Ok(year) if (1000..=9999).contains(&year) => Some(year),
        _ => None,
    }
}
