//! # salesboard-core
//!
//! Normalization and aggregation for the retail sales dashboard.
//!
//! This crate provides:
//! - The canonical transaction schema and per-column coercion
//! - The normalized [`TransactionTable`] with its derived `Month` column
//! - Derived views (monthly revenue, product-line revenue, city rating,
//!   payment distribution) and scalar KPIs
//! - Arrow record batches for tabular previews
//! - Dashboard configuration
//!
//! ```
//! use salesboard_core::{TransactionTable, Field, compute_views, ViewOutcome};
//!
//! let table = TransactionTable::from_parts(
//!     vec!["Payment".to_string()],
//!     vec![vec![Field::Text("Cash".into())], vec![Field::Text("Cash".into())]],
//! );
//! let views = compute_views(&table);
//! assert!(views.payment_distribution.is_ready());
//! assert!(matches!(views.monthly_revenue, ViewOutcome::Unavailable(_)));
//! ```

/// Arrow conversions.
pub mod batch;
/// Cell coercion rules.
pub mod coerce;
/// Dashboard and load configuration.
pub mod config;
/// Error types and result aliases.
pub mod error;
/// Scalar KPIs.
pub mod kpi;
/// The end-to-end pipeline.
pub mod pipeline;
/// Canonical column names.
pub mod schema;
/// The normalized transaction table.
pub mod table;
/// Derived views.
pub mod views;

pub use config::{DashboardConfig, LoadOptions, Palettes};
pub use error::{DashError, DashResult};
pub use kpi::{compute_kpis, Kpis};
pub use pipeline::{load_workbook, Dashboard, Pipeline};
pub use table::{CoercionReport, ColumnReport, Field, Record, TransactionTable};
pub use views::{
    compute_views, CityRating, MonthTotal, PaymentCount, ProductLineTotal, ViewOutcome, Views,
};
