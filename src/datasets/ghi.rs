use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::pipeline::normalize::{parse_metric, Metric};
use crate::pipeline::parser::RawRecord;

/// Country column of ghi_scores_cleaned.csv. The odd phrasing is the file's
/// actual header.
pub const SCORE_COUNTRY_COLUMN: &str = "Country with data from";
pub const ABSOLUTE_CHANGE_COLUMN: &str = "Absolute change since 2016";
pub const PERCENT_CHANGE_COLUMN: &str = "% change since 2016";

/// Country column of ghi_scores_lat_long.csv.
pub const TREND_COUNTRY_COLUMN: &str = "Country";
pub const TREND_LAT_COLUMN: &str = "lat";
pub const TREND_LONG_COLUMN: &str = "long";

/// The four GHI reporting periods. Each report year summarizes a reference
/// window (e.g. the 2024 score draws on 2019-2023 data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GhiPeriod {
    Y2000,
    Y2008,
    Y2016,
    Y2024,
}

impl GhiPeriod {
    pub const ALL: [GhiPeriod; 4] = [
        GhiPeriod::Y2000,
        GhiPeriod::Y2008,
        GhiPeriod::Y2016,
        GhiPeriod::Y2024,
    ];

    /// Column header in ghi_scores_cleaned.csv.
    pub fn score_column(self) -> &'static str {
        match self {
            GhiPeriod::Y2000 => "2000 '98-'02",
            GhiPeriod::Y2008 => "2008 '06-'10",
            GhiPeriod::Y2016 => "2016 '14-'18",
            GhiPeriod::Y2024 => "2024 '19-'23",
        }
    }

    /// Column header in ghi_scores_lat_long.csv (bare report year).
    pub fn trend_column(self) -> &'static str {
        match self {
            GhiPeriod::Y2000 => "2000",
            GhiPeriod::Y2008 => "2008",
            GhiPeriod::Y2016 => "2016",
            GhiPeriod::Y2024 => "2024",
        }
    }

    pub fn year(self) -> i32 {
        match self {
            GhiPeriod::Y2000 => 2000,
            GhiPeriod::Y2008 => 2008,
            GhiPeriod::Y2016 => 2016,
            GhiPeriod::Y2024 => 2024,
        }
    }

    /// Resolves a report year given on the command line.
    pub fn from_year(year: i32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.year() == year)
            .ok_or_else(|| {
                PipelineError::InvalidSelection(format!(
                    "no GHI report for year {year}; available: 2000, 2008, 2016, 2024"
                ))
            })
    }
}

/// One country row of the cleaned GHI score table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhiScoreRow {
    pub country: String,
    scores: [Metric; 4],
    /// Change columns as published in the source file. The views recompute
    /// percent change through the aggregation engine; these are retained for
    /// cross-checking the published numbers.
    pub absolute_change_since_2016: Metric,
    pub percent_change_since_2016: Metric,
}

impl GhiScoreRow {
    pub fn score(&self, period: GhiPeriod) -> Metric {
        match period {
            GhiPeriod::Y2000 => self.scores[0],
            GhiPeriod::Y2008 => self.scores[1],
            GhiPeriod::Y2016 => self.scores[2],
            GhiPeriod::Y2024 => self.scores[3],
        }
    }
}

/// One country row of the lat/long trend table used by the choropleth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhiTrendRow {
    pub country: String,
    scores: [Metric; 4],
    pub latitude: Metric,
    pub longitude: Metric,
}

impl GhiTrendRow {
    pub fn score(&self, period: GhiPeriod) -> Metric {
        match period {
            GhiPeriod::Y2000 => self.scores[0],
            GhiPeriod::Y2008 => self.scores[1],
            GhiPeriod::Y2016 => self.scores[2],
            GhiPeriod::Y2024 => self.scores[3],
        }
    }

    /// Score history as (report year, score) pairs, oldest first.
    pub fn history(&self) -> Vec<(i32, Metric)> {
        GhiPeriod::ALL
            .into_iter()
            .map(|period| (period.year(), self.score(period)))
            .collect()
    }
}

fn period_scores(record: &RawRecord, column: fn(GhiPeriod) -> &'static str) -> [Metric; 4] {
    let mut scores = [Metric::Missing; 4];
    for (slot, period) in scores.iter_mut().zip(GhiPeriod::ALL) {
        *slot = parse_metric(record.get_or_empty(column(period)));
    }
    scores
}

/// Parses ghi_scores_cleaned.csv rows; rows without a country name are
/// dropped.
pub fn parse_score_rows(records: &[RawRecord]) -> Vec<GhiScoreRow> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        let country = record.get_or_empty(SCORE_COUNTRY_COLUMN).trim().to_string();
        if country.is_empty() {
            continue;
        }
        out.push(GhiScoreRow {
            country,
            scores: period_scores(record, GhiPeriod::score_column),
            absolute_change_since_2016: parse_metric(record.get_or_empty(ABSOLUTE_CHANGE_COLUMN)),
            percent_change_since_2016: parse_metric(record.get_or_empty(PERCENT_CHANGE_COLUMN)),
        });
    }
    debug!("Parsed {} GHI score rows", out.len());
    out
}

/// Parses ghi_scores_lat_long.csv rows; rows without a country name are
/// dropped.
pub fn parse_trend_rows(records: &[RawRecord]) -> Vec<GhiTrendRow> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        let country = record.get_or_empty(TREND_COUNTRY_COLUMN).trim().to_string();
        if country.is_empty() {
            continue;
        }
        out.push(GhiTrendRow {
            country,
            scores: period_scores(record, GhiPeriod::trend_column),
            latitude: parse_metric(record.get_or_empty(TREND_LAT_COLUMN)),
            longitude: parse_metric(record.get_or_empty(TREND_LONG_COLUMN)),
        });
    }
    debug!("Parsed {} GHI trend rows", out.len());
    out
}
