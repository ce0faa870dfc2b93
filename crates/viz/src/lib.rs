//! # salesboard-viz
//!
//! Chart and KPI specifications for the sales dashboard.
//!
//! This crate turns computed views into what the rendering surface draws:
//! - Chart.js-shaped [`ChartSpec`]s, serializable to JSON
//! - Formatted KPI tiles and a tabular preview ([`DashboardSpec`])
//! - A self-contained HTML page embedding Chart.js

mod dashboard;
pub mod format;

pub use dashboard::{no_input_html, DashboardSpec, KpiTile, Panel, Preview, NO_INPUT_MESSAGE};

use salesboard_core::DashResult;
use serde::{Deserialize, Serialize};

/// Chart specification for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub chart_type: ChartKind,
    pub title: String,
    pub data: ChartData,
    pub options: ChartOptions,
}

/// Chart type for visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    /// Chart.js `type` string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
        }
    }
}

/// Chart data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// One color for the whole dataset, or one per data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Single(String),
    Each(Vec<String>),
}

impl Color {
    /// Cycle `palette` over `n` data points.
    #[must_use]
    pub fn cycled(palette: &[String], n: usize) -> Self {
        Color::Each(palette.iter().cycle().take(n).cloned().collect())
    }
}

/// A dataset in a chart. Field names follow Chart.js.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    /// `None` renders as a gap.
    pub data: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    /// Marker size for line charts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<u32>,
}

impl Dataset {
    #[must_use]
    pub fn new(label: impl Into<String>, data: Vec<Option<f64>>) -> Self {
        Self {
            label: label.into(),
            data,
            background_color: None,
            border_color: None,
            point_radius: None,
        }
    }
}

/// Chart rendering options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_label: Option<String>,
    pub show_legend: bool,
    /// Bars run left to right.
    pub horizontal: bool,
}

/// Escape HTML special characters to prevent XSS.
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Serialize for a `<script>` block without letting `</` close it.
pub(crate) fn script_json<T: Serialize>(value: &T) -> DashResult<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

impl ChartSpec {
    /// Create a new chart specification.
    #[must_use]
    pub fn new(chart_type: ChartKind, title: impl Into<String>) -> Self {
        Self {
            chart_type,
            title: title.into(),
            data: ChartData::default(),
            options: ChartOptions::default(),
        }
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.data.labels = labels;
        self
    }

    #[must_use]
    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.data.datasets.push(dataset);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    /// Chart.js config object (`type`, `data`, `options`) for this chart.
    #[must_use]
    pub fn chartjs_config(&self) -> serde_json::Value {
        let mut options = serde_json::json!({
            "responsive": true,
            "plugins": {
                "title": { "display": true, "text": self.title },
                "legend": { "display": self.options.show_legend },
            },
        });

        if self.options.horizontal {
            options["indexAxis"] = "y".into();
        }
        if self.chart_type != ChartKind::Pie {
            let (x, y) = (&self.options.x_axis_label, &self.options.y_axis_label);
            options["scales"] = serde_json::json!({
                "x": { "title": { "display": x.is_some(), "text": x } },
                "y": { "title": { "display": y.is_some(), "text": y } },
            });
        }

        serde_json::json!({
            "type": self.chart_type.as_str(),
            "data": self.data,
            "options": options,
        })
    }
}
