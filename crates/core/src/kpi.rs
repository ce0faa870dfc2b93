//! Scalar KPIs.

use crate::schema::{COGS, QUANTITY, RATING, TOTAL};
use crate::table::TransactionTable;
use crate::views::ViewOutcome;
use serde::{Deserialize, Serialize};

/// The four headline numbers. Each one is computed independently.
///
/// Sums over an empty or all-missing column are `0.0`; the mean of no
/// ratings is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Sum of `Total`.
    pub total_revenue: ViewOutcome<f64>,
    /// Sum of `Quantity`.
    pub total_units: ViewOutcome<f64>,
    /// Sum of `cogs`.
    pub total_cost: ViewOutcome<f64>,
    /// Mean of `Rating`.
    pub average_rating: ViewOutcome<Option<f64>>,
}

#[must_use]
pub fn compute_kpis(table: &TransactionTable) -> Kpis {
    Kpis {
        total_revenue: sum_column(table, TOTAL),
        total_units: sum_column(table, QUANTITY),
        total_cost: sum_column(table, COGS),
        average_rating: mean_column(table, RATING),
    }
}

fn sum_column(table: &TransactionTable, name: &str) -> ViewOutcome<f64> {
    match table.numbers(name) {
        Some(values) => ViewOutcome::Ready(values.flatten().fold(0.0, |acc, v| acc + v)),
        None => ViewOutcome::Unavailable(format!("missing column '{name}'")),
    }
}

fn mean_column(table: &TransactionTable, name: &str) -> ViewOutcome<Option<f64>> {
    let Some(values) = table.numbers(name) else {
        return ViewOutcome::Unavailable(format!("missing column '{name}'"));
    };

    let (sum, count) = values
        .flatten()
        .fold((0.0, 0u64), |(sum, count), v| (sum + v, count + 1));
    ViewOutcome::Ready((count > 0).then(|| sum / count as f64))
}
