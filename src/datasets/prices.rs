use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pipeline::normalize::{parse_metric, parse_year_from_date, Metric};
use crate::pipeline::parser::RawRecord;

// Header schema of combined_country_food_prices.csv
pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";
pub const PRICE_COLUMN: &str = "usdprice";
pub const COUNTRY_COLUMN: &str = "Source_Country";
pub const REGION_COLUMN: &str = "admin1";
pub const CITY_COLUMN: &str = "admin2";
pub const MARKET_COLUMN: &str = "market";
pub const COMMODITY_COLUMN: &str = "commodity";
pub const UNIT_COLUMN: &str = "unit";
pub const DATE_COLUMN: &str = "date";

/// One market price observation from the combined food price dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodPriceRow {
    pub latitude: Metric,
    pub longitude: Metric,
    pub usd_price: Metric,
    pub country: String,
    pub region: String,
    pub city: String,
    pub market: String,
    pub commodity: String,
    pub unit: String,
    /// Year extracted from the date column; `None` when the date is
    /// unparseable, which keeps the row out of year-bucketed aggregates.
    pub year: Option<i32>,
}

/// Converts raw records into typed price rows.
///
/// Rows without a country key are dropped (they cannot be grouped); a bad
/// numeric cell only blanks that one metric.
pub fn parse_rows(records: &[RawRecord]) -> Vec<FoodPriceRow> {
    let mut out = Vec::with_capacity(records.len());
    let mut dropped = 0usize;
    for record in records {
        let country = record.get_or_empty(COUNTRY_COLUMN).trim().to_string();
        if country.is_empty() {
            dropped += 1;
            continue;
        }
        out.push(FoodPriceRow {
            latitude: parse_metric(record.get_or_empty(LATITUDE_COLUMN)),
            longitude: parse_metric(record.get_or_empty(LONGITUDE_COLUMN)),
            usd_price: parse_metric(record.get_or_empty(PRICE_COLUMN)),
            country,
            region: record.get_or_empty(REGION_COLUMN).trim().to_string(),
            city: record.get_or_empty(CITY_COLUMN).trim().to_string(),
            market: record.get_or_empty(MARKET_COLUMN).trim().to_string(),
            commodity: record.get_or_empty(COMMODITY_COLUMN).trim().to_string(),
            unit: record.get_or_empty(UNIT_COLUMN).trim().to_string(),
            year: parse_year_from_date(record.get_or_empty(DATE_COLUMN)),
        });
    }
    if dropped > 0 {
        debug!("Dropped {} price rows without a country key", dropped);
    }
    out
}
