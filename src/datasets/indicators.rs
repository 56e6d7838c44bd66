use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::pipeline::normalize::{parse_metric, Metric};
use crate::pipeline::parser::RawRecord;
use crate::pipeline::severity::{SeverityScale, PREVALENCE_SCALE, UNDERNOURISHMENT_SCALE};

pub const COUNTRY_COLUMN: &str = "Country";

/// The three GHI component indicators published per country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    Undernourishment,
    ChildWasting,
    ChildMortality,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [
        Indicator::Undernourishment,
        Indicator::ChildWasting,
        Indicator::ChildMortality,
    ];

    /// Display label, which is also the column-name prefix in the source file.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::Undernourishment => "Undernourishment (% of population)",
            Indicator::ChildWasting => "Child wasting (% of children under five years old)",
            Indicator::ChildMortality => "Child mortality (% of children under five years old)",
        }
    }

    /// Reference periods available for this indicator, most recent first.
    /// Child mortality is reported for single years, the others for ranges.
    pub fn periods(self) -> &'static [&'static str] {
        match self {
            Indicator::Undernourishment => &["'21-'23", "'15-'17", "'07-'09", "'00-'02"],
            Indicator::ChildWasting => &["'19-'23", "'14-'18", "'06-'10", "'98-'02"],
            Indicator::ChildMortality => &["2022", "2016", "2008", "2000"],
        }
    }

    pub fn default_period(self) -> &'static str {
        self.periods()[0]
    }

    /// Exact column header for a period, or an error for a period this
    /// indicator is not published for.
    pub fn column(self, period: &str) -> Result<String> {
        if self.periods().contains(&period) {
            Ok(format!("{} {}", self.label(), period))
        } else {
            Err(PipelineError::InvalidSelection(format!(
                "indicator '{}' has no period '{}'; available: {}",
                self.label(),
                period,
                self.periods().join(", ")
            )))
        }
    }

    /// Severity scale used to color this indicator's chart.
    pub fn scale(self) -> &'static SeverityScale {
        match self {
            Indicator::Undernourishment => &UNDERNOURISHMENT_SCALE,
            Indicator::ChildWasting | Indicator::ChildMortality => &PREVALENCE_SCALE,
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "undernourishment" => Ok(Indicator::Undernourishment),
            "child-wasting" | "wasting" => Ok(Indicator::ChildWasting),
            "child-mortality" | "mortality" => Ok(Indicator::ChildMortality),
            _ => Err(PipelineError::InvalidSelection(format!(
                "unknown indicator '{name}'; expected undernourishment, child-wasting, or child-mortality"
            ))),
        }
    }
}

/// One country row of the indicator table, with every indicator/period cell
/// normalized at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub country: String,
    values: HashMap<String, Metric>,
}

impl IndicatorRow {
    /// Value of one indicator for one reference period.
    pub fn value(&self, indicator: Indicator, period: &str) -> Result<Metric> {
        let column = indicator.column(period)?;
        Ok(self.values.get(&column).copied().unwrap_or(Metric::Missing))
    }
}

/// Parses ghi_indicators_cleaned.csv rows.
///
/// The file's first data row repeats the units under each header and is
/// skipped; rows without a country name are dropped.
pub fn parse_rows(records: &[RawRecord]) -> Vec<IndicatorRow> {
    let mut out = Vec::with_capacity(records.len());
    for record in records.iter().skip(1) {
        let country = record.get_or_empty(COUNTRY_COLUMN).trim().to_string();
        if country.is_empty() {
            continue;
        }
        let mut values = HashMap::new();
        for indicator in Indicator::ALL {
            for period in indicator.periods() {
                let column = format!("{} {}", indicator.label(), period);
                values.insert(column.clone(), parse_metric(record.get_or_empty(&column)));
            }
        }
        out.push(IndicatorRow { country, values });
    }
    debug!("Parsed {} indicator rows", out.len());
    out
}
