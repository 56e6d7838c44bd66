use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{DEFAULT_MARKET_CAP, DETAIL_TABLE_LIMIT};
use crate::datasets::prices::FoodPriceRow;
use crate::output::MapDatum;
use crate::pipeline::filter::{
    cap_rows_per_subject, is_excluded_commodity, is_plausible_price, PriceBand,
};

/// User selections for the food price dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceFilters {
    pub band: PriceBand,
    /// Maximum market entries kept per country.
    pub per_country_cap: usize,
}

impl Default for PriceFilters {
    fn default() -> Self {
        Self {
            band: PriceBand::All,
            per_country_cap: DEFAULT_MARKET_CAP,
        }
    }
}

/// One row of the per-country market detail table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEntry {
    pub commodity: String,
    pub year: Option<i32>,
    pub market: String,
    pub region: String,
    pub city: String,
    pub price_usd: Option<f64>,
    pub unit: String,
}

/// Domain cleanup applied once after parsing: drops non-food commodities and
/// rows whose price is missing or implausibly high.
pub fn clean_rows(rows: Vec<FoodPriceRow>) -> Vec<FoodPriceRow> {
    let before = rows.len();
    let cleaned: Vec<FoodPriceRow> = rows
        .into_iter()
        .filter(|row| !is_excluded_commodity(&row.commodity) && is_plausible_price(row.usd_price))
        .collect();
    debug!("Price cleanup kept {}/{} rows", cleaned.len(), before);
    cleaned
}

/// Applies the interactive filters: price band, then most-recent-first cap
/// per country.
pub fn apply_filters(rows: Vec<FoodPriceRow>, filters: &PriceFilters) -> Vec<FoodPriceRow> {
    let banded: Vec<FoodPriceRow> = rows
        .into_iter()
        .filter(|row| {
            row.usd_price
                .value()
                .is_some_and(|price| filters.band.contains(price))
        })
        .collect();

    cap_rows_per_subject(
        banded,
        filters.per_country_cap,
        |row| row.country.clone(),
        |row| row.year,
    )
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

/// Map-layer points for the filtered rows: one marker per market entry,
/// colored by price on the rendering side.
pub fn map_points(rows: &[FoodPriceRow]) -> Vec<MapDatum> {
    rows.iter()
        .map(|row| {
            let price = row.usd_price.value();
            let hover_text = format!(
                "{}\nRegion: {}\nCity: {}\nMarket: {}\nPrice: ${:.2}",
                row.country,
                or_na(&row.region),
                or_na(&row.city),
                or_na(&row.market),
                price.unwrap_or(0.0)
            );
            MapDatum {
                location: row.country.clone(),
                value: price,
                hover_text,
            }
        })
        .collect()
}

/// Market detail table for a clicked country: most recent entries first,
/// capped for display.
pub fn country_detail(rows: &[FoodPriceRow], country: &str) -> Vec<MarketEntry> {
    let selected: Vec<FoodPriceRow> = rows
        .iter()
        .filter(|row| row.country == country)
        .cloned()
        .collect();

    let mut sorted = selected;
    sorted.sort_by_key(|row| std::cmp::Reverse(row.year.unwrap_or(i32::MIN)));

    sorted
        .into_iter()
        .take(DETAIL_TABLE_LIMIT)
        .map(|row| MarketEntry {
            commodity: row.commodity,
            year: row.year,
            market: row.market,
            region: row.region,
            city: row.city,
            price_usd: row.usd_price.value(),
            unit: row.unit,
        })
        .collect()
}
