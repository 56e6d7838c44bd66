use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pipeline::normalize::{parse_metric, parse_year, Metric};
use crate::pipeline::parser::RawRecord;

// Header schema of clean_poverty_data.csv
pub const ISO_COLUMN: &str = "ISO_Code";
pub const COUNTRY_COLUMN: &str = "Country";
pub const YEAR_COLUMN: &str = "Year";
pub const RATE_COLUMN: &str = "Poverty_Rate";

/// One (country, year) poverty rate observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PovertyRow {
    pub iso_code: String,
    pub country: String,
    pub year: Option<i32>,
    pub poverty_rate: Metric,
}

/// Parses clean_poverty_data.csv rows; rows without an ISO code are dropped
/// (the map layer keys on it).
pub fn parse_rows(records: &[RawRecord]) -> Vec<PovertyRow> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        let iso_code = record.get_or_empty(ISO_COLUMN).trim().to_string();
        if iso_code.is_empty() {
            continue;
        }
        out.push(PovertyRow {
            iso_code,
            country: record.get_or_empty(COUNTRY_COLUMN).trim().to_string(),
            year: parse_year(record.get_or_empty(YEAR_COLUMN)),
            poverty_rate: parse_metric(record.get_or_empty(RATE_COLUMN)),
        });
    }
    debug!("Parsed {} poverty rows", out.len());
    out
}
