use crate::pipeline::normalize::Metric;

/// Color and label used when a value is missing; distinct from every numeric
/// band.
pub const NO_DATA_COLOR: &str = "#ccc";
pub const NO_DATA_LABEL: &str = "No Data";

/// One labeled interval of a severity scale. The interval is half-open:
/// `lower <= value < upper`, so adjacent bands share a boundary without
/// overlapping and every finite value lands in exactly one band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityBand {
    pub label: &'static str,
    pub color: &'static str,
    pub lower: f64,
    pub upper: f64,
}

impl SeverityBand {
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value < self.upper
    }
}

/// An ordered, contiguous, exhaustive classification scale for one metric.
#[derive(Debug, Clone, Copy)]
pub struct SeverityScale {
    pub metric: &'static str,
    pub bands: &'static [SeverityBand],
}

impl SeverityScale {
    /// Classifies a value into its band; `None` means no data.
    pub fn classify(&self, value: Metric) -> Option<&'static SeverityBand> {
        let v = value.value()?;
        self.bands.iter().find(|band| band.contains(v))
    }

    pub fn color_for(&self, value: Metric) -> &'static str {
        self.classify(value).map_or(NO_DATA_COLOR, |band| band.color)
    }

    pub fn label_for(&self, value: Metric) -> &'static str {
        self.classify(value).map_or(NO_DATA_LABEL, |band| band.label)
    }
}

/// GHI score severity, per the Global Hunger Index report legend.
pub static GHI_SCALE: SeverityScale = SeverityScale {
    metric: "ghi_score",
    bands: &[
        SeverityBand {
            label: "Low Hunger (≤ 9.9)",
            color: "#2c7bb6",
            lower: f64::NEG_INFINITY,
            upper: 10.0,
        },
        SeverityBand {
            label: "Moderate Hunger (10.0 – 19.9)",
            color: "#abd9e9",
            lower: 10.0,
            upper: 20.0,
        },
        SeverityBand {
            label: "Serious Hunger (20.0 – 34.9)",
            color: "#ffffbf",
            lower: 20.0,
            upper: 35.0,
        },
        SeverityBand {
            label: "Alarming Hunger (35.0 – 49.9)",
            color: "#fdae61",
            lower: 35.0,
            upper: 50.0,
        },
        SeverityBand {
            label: "Extremely Alarming Hunger (≥ 50.0)",
            color: "#d7191c",
            lower: 50.0,
            upper: f64::INFINITY,
        },
    ],
};

/// Undernourishment (% of population) severity; same cutoffs as the GHI
/// scale with the sequential color ramp used by the indicator charts.
pub static UNDERNOURISHMENT_SCALE: SeverityScale = SeverityScale {
    metric: "undernourishment_pct",
    bands: &[
        SeverityBand {
            label: "Low (≤ 9.9)",
            color: "#ffffd4",
            lower: f64::NEG_INFINITY,
            upper: 10.0,
        },
        SeverityBand {
            label: "Moderate (10.0–19.9)",
            color: "#fed98e",
            lower: 10.0,
            upper: 20.0,
        },
        SeverityBand {
            label: "Serious (20.0–34.9)",
            color: "#fe9929",
            lower: 20.0,
            upper: 35.0,
        },
        SeverityBand {
            label: "Alarming (35.0–49.9)",
            color: "#d95f0e",
            lower: 35.0,
            upper: 50.0,
        },
        SeverityBand {
            label: "Extremely Alarming (≥ 50.0)",
            color: "#993404",
            lower: 50.0,
            upper: f64::INFINITY,
        },
    ],
};

/// Prevalence severity for child wasting and child mortality percentages.
pub static PREVALENCE_SCALE: SeverityScale = SeverityScale {
    metric: "prevalence_pct",
    bands: &[
        SeverityBand {
            label: "Very Low (< 2.5%)",
            color: "#ffffd4",
            lower: f64::NEG_INFINITY,
            upper: 2.5,
        },
        SeverityBand {
            label: "Low (2.5%–< 5%)",
            color: "#fed98e",
            lower: 2.5,
            upper: 5.0,
        },
        SeverityBand {
            label: "Medium (5%–< 10%)",
            color: "#fe9929",
            lower: 5.0,
            upper: 10.0,
        },
        SeverityBand {
            label: "High (10%–< 15%)",
            color: "#d95f0e",
            lower: 10.0,
            upper: 15.0,
        },
        SeverityBand {
            label: "Very High (≥ 15%)",
            color: "#993404",
            lower: 15.0,
            upper: f64::INFINITY,
        },
    ],
};
