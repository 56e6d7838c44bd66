use serde::{Deserialize, Serialize};

use crate::datasets::poverty::PovertyRow;
use crate::output::{MapDatum, SeriesPoint};
use crate::pipeline::aggregate::{aggregate, cagr, group_by, percent_change};
use crate::pipeline::normalize::Metric;

/// A country's poverty trajectory for the drill-down panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PovertyHistory {
    pub iso_code: String,
    pub country: String,
    /// Observations with a known year, oldest first.
    pub points: Vec<SeriesPoint>,
    /// Percent change from the first to the last observed rate.
    pub overall_change: Metric,
    /// Compound annual growth rate of the poverty rate over the observed
    /// span; negative means poverty is falling.
    pub annual_growth_rate: Metric,
}

/// Distinct years with at least one observation, ascending. Drives the map's
/// animation slider.
pub fn observed_years(rows: &[PovertyRow]) -> Vec<i32> {
    let mut years: Vec<i32> = rows.iter().filter_map(|row| row.year).collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Choropleth frame for one year, keyed by ISO code. Rows with a missing
/// year never enter a frame.
pub fn frame_for_year(rows: &[PovertyRow], year: i32) -> Vec<MapDatum> {
    rows.iter()
        .filter(|row| row.year == Some(year))
        .map(|row| {
            let rate = row.poverty_rate.value();
            let hover_text = match rate {
                Some(v) => format!("{}\nPoverty: {:.1}%", row.country, v),
                None => format!("{}\nPoverty: no data", row.country),
            };
            MapDatum {
                location: row.iso_code.clone(),
                value: rate,
                hover_text,
            }
        })
        .collect()
}

/// Poverty history for a clicked country, or `None` when the ISO code has no
/// rows.
pub fn country_history(rows: &[PovertyRow], iso_code: &str) -> Option<PovertyHistory> {
    let mut selected: Vec<&PovertyRow> = rows
        .iter()
        .filter(|row| row.iso_code == iso_code)
        .collect();
    if selected.is_empty() {
        return None;
    }
    selected.sort_by_key(|row| row.year.unwrap_or(i32::MIN));

    let country = selected
        .iter()
        .map(|row| row.country.clone())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| iso_code.to_string());

    // Year-bucketed series; rows with a missing year stay out of it
    let series: Vec<(i32, Metric)> = selected
        .iter()
        .filter_map(|row| row.year.map(|year| (year, row.poverty_rate)))
        .collect();

    let observed: Vec<&(i32, Metric)> =
        series.iter().filter(|(_, rate)| !rate.is_missing()).collect();
    let overall_change = match (observed.first(), observed.last()) {
        (Some((first_year, first)), Some((last_year, last))) if first_year != last_year => {
            percent_change(*first, *last)
        }
        _ => Metric::Missing,
    };

    Some(PovertyHistory {
        iso_code: iso_code.to_string(),
        country,
        points: series
            .iter()
            .map(|(year, rate)| SeriesPoint {
                year: *year,
                value: rate.value(),
            })
            .collect(),
        overall_change,
        annual_growth_rate: cagr(&series),
    })
}

/// Mean poverty rate per year across countries: the global trend line.
/// Years where every country is missing produce a missing mean, preserved so
/// the chart shows a gap rather than a zero dip.
pub fn average_rate_by_year(rows: &[PovertyRow]) -> Vec<(i32, Metric)> {
    let mut observations: Vec<(i32, Metric)> = rows
        .iter()
        .filter_map(|row| row.year.map(|year| (year, row.poverty_rate)))
        .collect();
    observations.sort_by_key(|(year, _)| *year);

    group_by(observations, |(year, _)| *year)
        .into_iter()
        .map(|group| {
            let agg = aggregate(group.members.iter().map(|(_, rate)| *rate));
            (group.key, agg.mean)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::poverty::parse_rows;
    use crate::pipeline::parser::parse_csv;

    const CSV: &str = "\
ISO_Code,Country,Year,Poverty_Rate
TCD,Chad,2003,61.9
TCD,Chad,2011,38.8
TCD,Chad,2018,30.9
NER,Niger,2011,50.3
NER,Niger,2018,45.4
SOM,Somalia,2017,—
";

    fn rows() -> Vec<PovertyRow> {
        parse_rows(&parse_csv(CSV).unwrap())
    }

    #[test]
    fn test_observed_years_sorted_unique() {
        assert_eq!(observed_years(&rows()), vec![2003, 2011, 2017, 2018]);
    }

    #[test]
    fn test_frame_for_year() {
        let frame = frame_for_year(&rows(), 2018);
        assert_eq!(frame.len(), 2);
        assert_eq!(frame[0].location, "TCD");
        assert_eq!(frame[0].value, Some(30.9));
        assert!(frame[0].hover_text.contains("30.9%"));
    }

    #[test]
    fn test_frame_keeps_missing_rate_as_null() {
        let frame = frame_for_year(&rows(), 2017);
        assert_eq!(frame.len(), 1);
        assert_eq!(frame[0].value, None);
    }

    #[test]
    fn test_country_history() {
        let history = country_history(&rows(), "TCD").unwrap();
        assert_eq!(history.country, "Chad");
        assert_eq!(history.points.len(), 3);
        assert_eq!(history.points[0].year, 2003);

        // (30.9 - 61.9) / 61.9 * 100 ≈ -50.08
        let change = history.overall_change.value().unwrap();
        assert!((change + 50.08).abs() < 0.01, "got {}", change);

        // (30.9/61.9)^(1/15) - 1 ≈ -4.52% per year
        let rate = history.annual_growth_rate.value().unwrap();
        assert!((rate + 4.52).abs() < 0.01, "got {}", rate);
    }

    #[test]
    fn test_history_with_single_observation_has_missing_rates() {
        let history = country_history(&rows(), "SOM").unwrap();
        assert_eq!(history.points.len(), 1);
        assert_eq!(history.overall_change, Metric::Missing);
        assert_eq!(history.annual_growth_rate, Metric::Missing);
    }

    #[test]
    fn test_unknown_iso_code() {
        assert!(country_history(&rows(), "XXX").is_none());
    }

    #[test]
    fn test_average_rate_by_year() {
        let averages = average_rate_by_year(&rows());
        assert_eq!(averages.len(), 4);
        // 2011: mean of Chad 38.8 and Niger 50.3
        assert_eq!(averages[1].0, 2011);
        assert!((averages[1].1.value().unwrap() - 44.55).abs() < 1e-9);
        // 2017: only Somalia, whose rate is missing
        assert_eq!(averages[2], (2017, Metric::Missing));
    }
}
