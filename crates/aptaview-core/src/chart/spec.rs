//! Renderer-neutral chart description.
//!
//! Transforms produce plain data; a frontend maps it onto whatever
//! plotting toolkit it uses. The CLI prints it as JSON.

use serde::Serialize;

/// A fully resolved chart: axes, series, optional color mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<Series>,
    /// Color mapping for heatmap values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_range: Option<ValueRange>,
}

impl ChartSpec {
    /// The universal absent-signal result. Transforms return it when
    /// their inputs are missing or empty instead of erroring.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Category labels; empty for plain value axes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    pub scale: AxisScale,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Render top-to-bottom (used by the heatmap's y axis).
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub inverse: bool,
}

impl Axis {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn with_categories(label: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            label: Some(label.into()),
            categories,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    #[default]
    Linear,
    Logarithmic,
}

/// Whether a chart plots raw counts or percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisUnit {
    #[default]
    Count,
    Percentage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub kind: SeriesKind,
    pub data: SeriesData,
}

impl Series {
    pub fn line(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            color: None,
            kind: SeriesKind::Line,
            data: SeriesData::Values(values),
        }
    }

    pub fn bar(name: impl Into<String>, color: Option<&str>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            color: color.map(str::to_string),
            kind: SeriesKind::Bar,
            data: SeriesData::Values(values),
        }
    }

    /// Stacked bars layered in series order.
    pub fn stacked_bar(name: impl Into<String>, color: Option<&str>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            color: color.map(str::to_string),
            kind: SeriesKind::StackedBar,
            data: SeriesData::Values(values),
        }
    }

    /// Stacked segments with explicit per-position baselines, for
    /// stacks whose layering varies by position.
    pub fn stacked_segments(
        name: impl Into<String>,
        color: Option<&str>,
        segments: Vec<StackSegment>,
    ) -> Self {
        Self {
            name: name.into(),
            color: color.map(str::to_string),
            kind: SeriesKind::StackedBar,
            data: SeriesData::Segments(segments),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Line,
    Bar,
    StackedBar,
    Heatmap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesData {
    /// One value per x category.
    Values(Vec<f64>),
    /// Sparse heatmap cells.
    Cells(Vec<HeatmapCell>),
    /// Stacked segments with explicit baselines.
    Segments(Vec<StackSegment>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            Self::Values(v) => v.len(),
            Self::Cells(c) => c.len(),
            Self::Segments(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub x: usize,
    pub y: usize,
    pub value: f64,
}

/// One block of a stacked column: baseline plus height, both in axis
/// units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackSegment {
    pub position: usize,
    pub start: f64,
    pub height: f64,
}

/// Value-to-color interpolation range for heatmaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub low_color: String,
    pub high_color: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_spec_has_no_series() {
        assert!(ChartSpec::empty().is_empty());
    }

    #[test]
    fn serializes_compactly() {
        let spec = ChartSpec {
            title: None,
            x_axis: Axis::with_categories("Position", vec!["1".into(), "2".into()]),
            y_axis: Axis::labeled("Frequency"),
            series: vec![Series::line("A", vec![1.0, 2.0])],
            value_range: None,
        };
        let json = serde_json::to_value(&spec).unwrap();

        // Absent options and default flags stay out of the JSON.
        assert!(json.get("title").is_none());
        assert!(json["xAxis"].get("inverse").is_none());
        assert_eq!(json["series"][0]["data"], serde_json::json!([1.0, 2.0]));
    }
}
