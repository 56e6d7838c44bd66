use serde::{Deserialize, Serialize};

use crate::datasets::ghi::{GhiPeriod, GhiTrendRow};
use crate::output::{MapDatum, SeriesPoint};
use crate::pipeline::normalize::Metric;

/// A country's GHI score history for the drill-down panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryHistory {
    pub country: String,
    pub scores: Vec<SeriesPoint>,
}

/// Choropleth layer for one reporting period: one region per country, keyed
/// by country name. A missing score stays null rather than being coerced to
/// zero, so the map can show a no-data fill instead of a false "low hunger".
pub fn choropleth(rows: &[GhiTrendRow], period: GhiPeriod) -> Vec<MapDatum> {
    rows.iter()
        .map(|row| {
            let score = row.score(period);
            let hover_text = match score.value() {
                Some(v) => format!("{}\nGHI: {:.1}", row.country, v),
                None => format!("{}\nGHI: no data", row.country),
            };
            MapDatum {
                location: row.country.clone(),
                value: score.value(),
                hover_text,
            }
        })
        .collect()
}

/// Score history for a clicked country, or `None` when the country is not in
/// the dataset.
pub fn country_history(rows: &[GhiTrendRow], country: &str) -> Option<CountryHistory> {
    let row = rows.iter().find(|row| row.country == country)?;
    Some(CountryHistory {
        country: row.country.clone(),
        scores: row
            .history()
            .into_iter()
            .map(|(year, score)| SeriesPoint {
                year,
                value: score.value(),
            })
            .collect(),
    })
}

/// Mean GHI score across countries for one period; the headline "global
/// hunger level" figure. Countries without a score are excluded.
pub fn global_average(rows: &[GhiTrendRow], period: GhiPeriod) -> Metric {
    crate::pipeline::aggregate::mean(rows.iter().map(|row| row.score(period)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::ghi::parse_trend_rows;
    use crate::pipeline::parser::parse_csv;

    const CSV: &str = "\
Country,2000,2008,2016,2024,lat,long
Chad,50.5,44.7,36.4,36.4,15.45,18.73
Somalia,63.3,59.1,—,44.1,5.15,46.2
";

    fn rows() -> Vec<GhiTrendRow> {
        parse_trend_rows(&parse_csv(CSV).unwrap())
    }

    #[test]
    fn test_choropleth_values_and_hover() {
        let layer = choropleth(&rows(), GhiPeriod::Y2024);
        assert_eq!(layer.len(), 2);
        assert_eq!(layer[0].location, "Chad");
        assert_eq!(layer[0].value, Some(36.4));
        assert!(layer[0].hover_text.contains("GHI: 36.4"));
    }

    #[test]
    fn test_choropleth_missing_score_stays_null() {
        let layer = choropleth(&rows(), GhiPeriod::Y2016);
        assert_eq!(layer[1].value, None);
        assert!(layer[1].hover_text.contains("no data"));
    }

    #[test]
    fn test_country_history() {
        let history = country_history(&rows(), "Somalia").unwrap();
        assert_eq!(history.scores.len(), 4);
        assert_eq!(history.scores[0], SeriesPoint { year: 2000, value: Some(63.3) });
        assert_eq!(history.scores[2], SeriesPoint { year: 2016, value: None });

        assert!(country_history(&rows(), "Atlantis").is_none());
    }

    #[test]
    fn test_global_average_skips_missing() {
        let avg = global_average(&rows(), GhiPeriod::Y2016);
        // Only Chad has a 2016 score
        assert_eq!(avg, Metric::Value(36.4));
    }
}
