use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    EXCLUDED_COMMODITY_KEYWORDS, LOW_PRICE_BAND_MAX, LOW_PRICE_BAND_MIN, PRICE_UPPER_CUTOFF,
};
use crate::pipeline::normalize::Metric;

/// Returns true when a commodity name matches the non-food exclusion list
/// (wages, fuel, and labour entries that leak into the price dataset).
pub fn is_excluded_commodity(commodity: &str) -> bool {
    let lowered = commodity.to_lowercase();
    EXCLUDED_COMMODITY_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// Returns true when a price metric is present and below the upper cutoff.
pub fn is_plausible_price(price: Metric) -> bool {
    match price.value() {
        Some(v) => v < PRICE_UPPER_CUTOFF,
        None => false,
    }
}

/// User-selectable price sub-range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriceBand {
    #[default]
    All,
    /// $0.5 - $10, inclusive on both ends.
    Low,
    /// Above $10.
    High,
}

impl PriceBand {
    pub fn contains(self, price: f64) -> bool {
        match self {
            PriceBand::All => true,
            PriceBand::Low => (LOW_PRICE_BAND_MIN..=LOW_PRICE_BAND_MAX).contains(&price),
            PriceBand::High => price > LOW_PRICE_BAND_MAX,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "all" => Some(PriceBand::All),
            "low" => Some(PriceBand::Low),
            "high" => Some(PriceBand::High),
            _ => None,
        }
    }
}

/// Sorts rows by year descending (stable, missing years last) and keeps at
/// most `cap` rows per subject, preserving relative order among equal years.
///
/// The result is ordered by subject first appearance after the sort, the way
/// the capped groups are handed to the map layer.
pub fn cap_rows_per_subject<T, S, Y>(
    mut rows: Vec<T>,
    cap: usize,
    subject_fn: S,
    year_fn: Y,
) -> Vec<T>
where
    S: Fn(&T) -> String,
    Y: Fn(&T) -> Option<i32>,
{
    rows.sort_by_key(|row| std::cmp::Reverse(year_fn(row).unwrap_or(i32::MIN)));

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<T>> = HashMap::new();
    for row in rows {
        let subject = subject_fn(&row);
        let group = groups.entry(subject.clone()).or_insert_with(|| {
            order.push(subject);
            Vec::new()
        });
        if group.len() < cap {
            group.push(row);
        }
    }

    order
        .into_iter()
        .flat_map(|subject| groups.remove(&subject).unwrap_or_default())
        .collect()
}
