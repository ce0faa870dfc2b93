use crate::format::{format_count, format_currency, format_rating};
use crate::{escape_html, script_json, ChartKind, ChartOptions, ChartSpec, Color, Dataset};
use salesboard_core::{
    CityRating, DashResult, Dashboard, DashboardConfig, Kpis, MonthTotal, PaymentCount,
    ProductLineTotal, TransactionTable, ViewOutcome,
};
use serde::{Deserialize, Serialize};

/// Shown instead of the dashboard when there is no input file.
pub const NO_INPUT_MESSAGE: &str = "Please upload your Excel file to show the dashboard.";

const NO_DATA: &str = "no data";
const UNDEFINED: &str = "n/a";

/// One headline number, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiTile {
    pub title: String,
    pub value: String,
}

/// A dashboard slot: a chart, or the reason it could not be drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    Chart(ChartSpec),
    NoData { title: String, reason: String },
}

impl Panel {
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Panel::Chart(chart) => &chart.title,
            Panel::NoData { title, .. } => title,
        }
    }
}

/// Transaction Table rendered as display strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    pub columns: Vec<String>,
    /// Missing fields are empty strings.
    pub rows: Vec<Vec<String>>,
}

impl Preview {
    #[must_use]
    pub fn from_table(table: &TransactionTable, limit: Option<usize>) -> Self {
        Self {
            columns: table.columns().to_vec(),
            rows: table
                .to_records(limit)
                .iter()
                .map(|record| record.values().map(ToString::to_string).collect())
                .collect(),
        }
    }
}

/// Everything the rendering surface draws for one dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSpec {
    pub page_title: String,
    pub title: String,
    pub kpis: Vec<KpiTile>,
    pub panels: Vec<Panel>,
    pub preview: Preview,
}

impl DashboardSpec {
    /// Lay out tiles, charts and preview for a computed dashboard.
    #[must_use]
    pub fn build(dashboard: &Dashboard, config: &DashboardConfig) -> Self {
        let views = &dashboard.views;
        let palettes = &config.palettes;

        let panels = vec![
            panel("Monthly Sales", &views.monthly_revenue, |rows| {
                monthly_chart(rows, &palettes.monthly)
            }),
            panel("Product Sales", &views.product_line_revenue, |rows| {
                product_line_chart(rows, &palettes.product_line)
            }),
            panel("Rating by City", &views.city_rating, |rows| {
                city_chart(rows, &palettes.city)
            }),
            panel("Payment Methods", &views.payment_distribution, |rows| {
                payment_chart(rows, &palettes.payment)
            }),
        ];

        let unavailable = panels
            .iter()
            .filter(|p| matches!(p, Panel::NoData { .. }))
            .count();
        tracing::debug!(panels = panels.len(), unavailable, "built dashboard spec");

        Self {
            page_title: config.page_title.clone(),
            title: config.title.clone(),
            kpis: kpi_tiles(&views.kpis, &config.currency_symbol),
            panels,
            preview: Preview::from_table(&dashboard.table, config.preview_rows),
        }
    }

    pub fn to_json(&self) -> DashResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render a single HTML page that draws every chart with Chart.js.
    pub fn to_html(&self) -> DashResult<String> {
        let mut tiles = String::new();
        for tile in &self.kpis {
            tiles.push_str(&format!(
                "        <div class=\"kpi\"><h3>{}</h3><p>{}</p></div>\n",
                escape_html(&tile.title),
                escape_html(&tile.value)
            ));
        }

        let mut panels = String::new();
        let mut configs = Vec::new();
        for (idx, panel) in self.panels.iter().enumerate() {
            match panel {
                Panel::Chart(chart) => {
                    panels.push_str(&format!(
                        "        <div class=\"panel\"><canvas id=\"chart-{idx}\"></canvas></div>\n"
                    ));
                    configs.push(serde_json::json!({
                        "id": format!("chart-{idx}"),
                        "config": chart.chartjs_config(),
                    }));
                }
                Panel::NoData { title, reason } => {
                    let (title, reason) = (escape_html(title), escape_html(reason));
                    panels.push_str(&format!(
                        "        <div class=\"panel no-data\"><h3>{title}</h3>\
                         <p>{NO_DATA} ({reason})</p></div>\n"
                    ));
                }
            }
        }

        let charts = script_json(&configs)?;
        let preview = preview_table(&self.preview);

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{page_title}</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>
        .kpis, .panels {{ display: flex; flex-wrap: wrap; gap: 1rem; }}
        .kpi {{ flex: 1; text-align: center; }}
        .panel {{ flex: 1 1 45%; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <div class="kpis">
{tiles}    </div>
    <div class="panels">
{panels}    </div>
{preview}
    <script>
        for (const chart of {charts}) {{
            new Chart(document.getElementById(chart.id).getContext('2d'), chart.config);
        }}
    </script>
</body>
</html>"#,
            page_title = escape_html(&self.page_title),
            title = escape_html(&self.title),
        ))
    }
}

/// Page shown when no input file was provided.
#[must_use]
pub fn no_input_html(config: &DashboardConfig) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{}</title>
</head>
<body>
    <h1>{}</h1>
    <p>{NO_INPUT_MESSAGE}</p>
</body>
</html>"#,
        escape_html(&config.page_title),
        escape_html(&config.title)
    )
}

fn preview_table(preview: &Preview) -> String {
    let mut html = String::from("    <table class=\"preview\">\n        <tr>");
    for column in &preview.columns {
        html.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    html.push_str("</tr>\n");
    for row in &preview.rows {
        html.push_str("        <tr>");
        for value in row {
            html.push_str(&format!("<td>{}</td>", escape_html(value)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("    </table>");
    html
}

fn panel<T>(
    title: &str,
    view: &ViewOutcome<Vec<T>>,
    chart: impl FnOnce(&[T]) -> ChartSpec,
) -> Panel {
    match view {
        ViewOutcome::Ready(rows) => {
            let mut spec = chart(rows);
            spec.title = title.to_string();
            Panel::Chart(spec)
        }
        ViewOutcome::Unavailable(reason) => Panel::NoData {
            title: title.to_string(),
            reason: reason.clone(),
        },
    }
}

fn sum_value(outcome: &ViewOutcome<f64>, fmt: impl Fn(f64) -> String) -> String {
    match outcome {
        ViewOutcome::Ready(v) => fmt(*v),
        ViewOutcome::Unavailable(_) => NO_DATA.to_string(),
    }
}

fn kpi_tiles(kpis: &Kpis, currency: &str) -> Vec<KpiTile> {
    let tile = |title: &str, value: String| KpiTile {
        title: title.to_string(),
        value,
    };

    let rating = match &kpis.average_rating {
        ViewOutcome::Ready(Some(v)) => format_rating(*v),
        ViewOutcome::Ready(None) => UNDEFINED.to_string(),
        ViewOutcome::Unavailable(_) => NO_DATA.to_string(),
    };

    vec![
        tile(
            "Total Sales",
            sum_value(&kpis.total_revenue, |v| format_currency(v, currency)),
        ),
        tile("Products Sold", sum_value(&kpis.total_units, format_count)),
        tile(
            "Total COGS",
            sum_value(&kpis.total_cost, |v| format_currency(v, currency)),
        ),
        tile("Average Rating", rating),
    ]
}

fn monthly_chart(rows: &[MonthTotal], palette: &[String]) -> ChartSpec {
    let color = palette.first().cloned().unwrap_or_default();
    let mut dataset = Dataset::new("Total", rows.iter().map(|r| Some(r.total)).collect());
    dataset.background_color = Some(Color::Single(color.clone()));
    dataset.border_color = Some(Color::Single(color));
    dataset.point_radius = Some(4);

    ChartSpec::new(ChartKind::Line, "")
        .with_labels(rows.iter().map(|r| r.month.format("%Y-%m-%d").to_string()).collect())
        .with_dataset(dataset)
        .with_options(ChartOptions {
            x_axis_label: Some("Month".into()),
            y_axis_label: Some("Total".into()),
            ..ChartOptions::default()
        })
}

fn product_line_chart(rows: &[ProductLineTotal], palette: &[String]) -> ChartSpec {
    let mut dataset = Dataset::new("Total", rows.iter().map(|r| Some(r.total)).collect());
    dataset.background_color = Some(Color::cycled(palette, rows.len()));

    ChartSpec::new(ChartKind::Bar, "")
        .with_labels(rows.iter().map(|r| r.product_line.clone()).collect())
        .with_dataset(dataset)
        .with_options(ChartOptions {
            x_axis_label: Some("Product line".into()),
            y_axis_label: Some("Total".into()),
            ..ChartOptions::default()
        })
}

fn city_chart(rows: &[CityRating], palette: &[String]) -> ChartSpec {
    let mut dataset = Dataset::new("Rating", rows.iter().map(|r| r.rating).collect());
    dataset.background_color = Some(Color::cycled(palette, rows.len()));

    ChartSpec::new(ChartKind::Bar, "")
        .with_labels(rows.iter().map(|r| r.city.clone()).collect())
        .with_dataset(dataset)
        .with_options(ChartOptions {
            x_axis_label: Some("Rating".into()),
            y_axis_label: Some("City".into()),
            horizontal: true,
            ..ChartOptions::default()
        })
}

fn payment_chart(rows: &[PaymentCount], palette: &[String]) -> ChartSpec {
    let mut dataset = Dataset::new(
        "Transactions",
        rows.iter().map(|r| Some(r.count as f64)).collect(),
    );
    dataset.background_color = Some(Color::cycled(palette, rows.len()));

    ChartSpec::new(ChartKind::Pie, "")
        .with_labels(rows.iter().map(|r| r.payment.clone()).collect())
        .with_dataset(dataset)
        .with_options(ChartOptions {
            show_legend: true,
            ..ChartOptions::default()
        })
}
