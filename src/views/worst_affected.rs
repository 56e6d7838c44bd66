use crate::datasets::ghi::{GhiPeriod, GhiScoreRow};
use crate::datasets::indicators::{Indicator, IndicatorRow};
use crate::error::Result;
use crate::output::BarDatum;
use crate::pipeline::aggregate::{mean, percent_change};
use crate::pipeline::normalize::Metric;
use crate::pipeline::severity::GHI_SCALE;

/// GHI bar chart for one reporting period: one bar per country, colored by
/// severity band. Countries without a score keep their bar slot with a null
/// value and the no-data color.
pub fn ghi_bar_chart(rows: &[GhiScoreRow], period: GhiPeriod) -> Vec<BarDatum> {
    rows.iter()
        .map(|row| {
            let score = row.score(period);
            BarDatum {
                label: row.country.clone(),
                value: score.value(),
                color: GHI_SCALE.color_for(score).to_string(),
            }
        })
        .collect()
}

/// Indicator bar chart for one indicator and reference period. Rows with a
/// missing value are excluded entirely, matching the indicator page.
pub fn indicator_bar_chart(
    rows: &[IndicatorRow],
    indicator: Indicator,
    period: &str,
) -> Result<Vec<BarDatum>> {
    let scale = indicator.scale();
    let mut out = Vec::new();
    for row in rows {
        let value = row.value(indicator, period)?;
        if let Some(v) = value.value() {
            out.push(BarDatum {
                label: row.country.clone(),
                value: Some(v),
                color: scale.color_for(value).to_string(),
            });
        }
    }
    Ok(out)
}

/// Percent change in GHI score from the 2016 report to the 2024 report, per
/// country, computed through the aggregation engine rather than trusted from
/// the published change column.
pub fn change_since_2016(rows: &[GhiScoreRow]) -> Vec<(String, Metric)> {
    rows.iter()
        .map(|row| {
            let change = percent_change(row.score(GhiPeriod::Y2016), row.score(GhiPeriod::Y2024));
            (row.country.clone(), change)
        })
        .collect()
}

/// Mean percent change since 2016 across countries, skipping countries where
/// the change is undefined.
pub fn average_change_since_2016(rows: &[GhiScoreRow]) -> Metric {
    mean(change_since_2016(rows).into_iter().map(|(_, change)| change))
}
