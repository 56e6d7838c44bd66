use serde::{Deserialize, Serialize};

/// One bar of a bar-chart series. `value` is `None` when the underlying
/// metric is missing; the rendering layer draws a gap, never a zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarDatum {
    pub label: String,
    pub value: Option<f64>,
    pub color: String,
}

/// One region of a choropleth-style map layer, keyed by country name or ISO
/// code depending on the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDatum {
    pub location: String,
    pub value: Option<f64>,
    pub hover_text: String,
}

/// One point of a per-country time series (line charts).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: Option<f64>,
}
