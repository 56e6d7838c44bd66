/// Dataset name constants to ensure consistency across the codebase.
/// These names tie CLI commands, config entries, and log lines together.

// Dataset names (used in CLI, config, and snapshot labels)
pub const FOOD_PRICES_DATASET: &str = "food_prices";
pub const GHI_SCORES_DATASET: &str = "ghi_scores";
pub const GHI_TRENDS_DATASET: &str = "ghi_trends";
pub const GHI_INDICATORS_DATASET: &str = "ghi_indicators";
pub const POVERTY_DATASET: &str = "poverty";

/// Raw tokens that stand in for "no value" in the source files. Any token
/// containing `<` (e.g. `<5`) is also treated as missing.
pub const PLACEHOLDER_TOKENS: &[&str] = &["—", "\u{FFFD}"];

/// Commodity keywords that mark a price row as non-food (case-insensitive
/// substring match).
pub const EXCLUDED_COMMODITY_KEYWORDS: &[&str] = &["wage", "fuel", "diesel", "labour", "labor"];

/// Prices at or above this cutoff (USD) are treated as data errors and dropped.
pub const PRICE_UPPER_CUTOFF: f64 = 50.0;

/// Bounds of the "low" price band selection ($0.5 - $10, inclusive).
pub const LOW_PRICE_BAND_MIN: f64 = 0.5;
pub const LOW_PRICE_BAND_MAX: f64 = 10.0;

/// Default cap on market entries kept per country.
pub const DEFAULT_MARKET_CAP: usize = 100;

/// Maximum rows shown in a country's market detail table.
pub const DETAIL_TABLE_LIMIT: usize = 20;
