//! # salesboard-cli
//!
//! Command-line front end for the sales dashboard pipeline.

use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use clap::Parser;
use colored::Colorize;
use salesboard_core::batch::{
    city_rating_batch, monthly_batch, payment_batch, product_line_batch, table_to_batch,
};
use salesboard_core::{DashResult, Dashboard, DashboardConfig, LoadOptions, Pipeline, ViewOutcome};
use salesboard_viz::{no_input_html, DashboardSpec, NO_INPUT_MESSAGE};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// salesboard - Retail sales dashboard from an Excel workbook
#[derive(Parser)]
#[command(name = "salesboard")]
#[command(
    author,
    version,
    about = "Retail sales dashboard from an Excel workbook",
    long_about = None
)]
struct Cli {
    /// Excel workbook (.xlsx) with one transaction per row
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Worksheet to read (default: first worksheet)
    #[arg(short, long, value_name = "NAME")]
    sheet: Option<String>,

    /// Output format (table, json, html)
    #[arg(short = 'f', long = "format", default_value = "table")]
    format: OutputFormat,

    /// Dashboard config file (JSON)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of dataset rows to preview
    #[arg(short, long, value_name = "N")]
    preview: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output format for the dashboard.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// Pretty tables (default)
    #[default]
    Table,
    /// Dashboard spec and views as JSON
    Json,
    /// Standalone HTML page
    Html,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let config = load_config(cli.config.as_deref(), cli.preview)?;

    let Some(file) = cli.file else {
        match cli.format {
            OutputFormat::Html => println!("{}", no_input_html(&config)),
            OutputFormat::Table | OutputFormat::Json => println!("{NO_INPUT_MESSAGE}"),
        }
        return Ok(());
    };

    let options = LoadOptions { sheet: cli.sheet };
    let dashboard = Pipeline::new(options)
        .run_path(&file)
        .with_context(|| format!("Failed to load workbook: {}", file.display()))?;

    print!("{}", render(&dashboard, &config, cli.format)?);
    Ok(())
}

/// Build the dashboard config from an optional file and CLI overrides.
fn load_config(path: Option<&Path>, preview: Option<usize>) -> Result<DashboardConfig> {
    let mut config = match path {
        Some(path) => DashboardConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if preview.is_some() {
        config.preview_rows = preview;
    }
    Ok(config)
}

/// Render a dashboard in the requested format.
fn render(dashboard: &Dashboard, config: &DashboardConfig, format: OutputFormat) -> Result<String> {
    let spec = DashboardSpec::build(dashboard, config);
    match format {
        OutputFormat::Table => render_table(dashboard, &spec, config),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "dashboard": spec,
                "views": dashboard.views,
            });
            Ok(format!("{}\n", serde_json::to_string_pretty(&json)?))
        }
        OutputFormat::Html => Ok(format!("{}\n", spec.to_html()?)),
    }
}

fn render_table(
    dashboard: &Dashboard,
    spec: &DashboardSpec,
    config: &DashboardConfig,
) -> Result<String> {
    let mut out = String::new();
    let views = &dashboard.views;

    writeln!(out, "{}\n", spec.title.cyan().bold())?;
    for tile in &spec.kpis {
        writeln!(out, "{:>16}  {}", tile.title.bold(), tile.value.green())?;
    }

    let missing: Vec<_> = dashboard.report.missing_columns().collect();
    if !missing.is_empty() {
        writeln!(
            out,
            "\n{} {}",
            "Missing columns:".yellow().bold(),
            missing.join(", ")
        )?;
    }

    view_section(
        &mut out,
        "Monthly Sales",
        &views.monthly_revenue,
        monthly_batch,
    )?;
    view_section(
        &mut out,
        "Product Sales",
        &views.product_line_revenue,
        product_line_batch,
    )?;
    view_section(
        &mut out,
        "Rating by City",
        &views.city_rating,
        city_rating_batch,
    )?;
    view_section(
        &mut out,
        "Payment Methods",
        &views.payment_distribution,
        payment_batch,
    )?;

    writeln!(out, "\n{}", "Dataset".cyan().bold())?;
    let preview = table_to_batch(&dashboard.table, config.preview_rows)?;
    if preview.num_columns() == 0 {
        writeln!(out, "(empty table)")?;
    } else {
        writeln!(out, "{}", pretty_format_batches(&[preview])?)?;
    }

    Ok(out)
}

fn view_section<T>(
    out: &mut String,
    title: &str,
    view: &ViewOutcome<Vec<T>>,
    to_batch: fn(&[T]) -> DashResult<RecordBatch>,
) -> Result<()> {
    writeln!(out, "\n{}", title.cyan().bold())?;
    match view {
        ViewOutcome::Ready(rows) => {
            let batch = to_batch(rows)?;
            writeln!(out, "{}", pretty_format_batches(&[batch])?)?;
        }
        ViewOutcome::Unavailable(reason) => {
            writeln!(out, "{} ({reason})", "no data".yellow())?;
        }
    }
    Ok(())
}
