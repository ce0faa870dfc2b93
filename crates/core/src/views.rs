//! Derived views over the Transaction Table.
//!
//! Each view is computed on its own: a column missing from the input makes
//! only the views that read it [`ViewOutcome::Unavailable`].

use crate::coerce::month_start;
use crate::kpi::{compute_kpis, Kpis};
use crate::schema::{CITY, DATE, PAYMENT, PRODUCT_LINE, RATING, TOTAL};
use crate::table::TransactionTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A view that is either computed or could not be built from the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum ViewOutcome<T> {
    Ready(T),
    /// Reason the view has no data, e.g. a missing column.
    Unavailable(String),
}

impl<T> ViewOutcome<T> {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, ViewOutcome::Ready(_))
    }

    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewOutcome::Ready(value) => Some(value),
            ViewOutcome::Unavailable(_) => None,
        }
    }
}

/// Summed revenue for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotal {
    /// First day of the month.
    pub month: NaiveDate,
    pub total: f64,
}

/// Summed revenue for one product line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLineTotal {
    pub product_line: String,
    pub total: f64,
}

/// Mean rating for one city; `None` when the city has no valid ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRating {
    pub city: String,
    pub rating: Option<f64>,
}

/// Number of transactions paid with one method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentCount {
    pub payment: String,
    pub count: u64,
}

/// Every derived view the dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Views {
    pub monthly_revenue: ViewOutcome<Vec<MonthTotal>>,
    pub product_line_revenue: ViewOutcome<Vec<ProductLineTotal>>,
    pub city_rating: ViewOutcome<Vec<CityRating>>,
    pub payment_distribution: ViewOutcome<Vec<PaymentCount>>,
    pub kpis: Kpis,
}

/// Compute all views from a normalized table.
///
/// Pure and infallible: the same table always yields the same views.
#[must_use]
pub fn compute_views(table: &TransactionTable) -> Views {
    let views = Views {
        monthly_revenue: monthly_revenue(table),
        product_line_revenue: product_line_revenue(table),
        city_rating: city_rating(table),
        payment_distribution: payment_distribution(table),
        kpis: compute_kpis(table),
    };
    tracing::debug!(rows = table.len(), "computed dashboard views");
    views
}

/// Revenue per calendar month, chronological. Rows without a date are
/// skipped.
#[must_use]
pub fn monthly_revenue(table: &TransactionTable) -> ViewOutcome<Vec<MonthTotal>> {
    let [date, total] = match require(table, [DATE, TOTAL]) {
        Ok(indices) => indices,
        Err(reason) => return ViewOutcome::Unavailable(reason),
    };

    let pairs = table.records().iter().map(|r| {
        let month = r.get(date).as_timestamp().map(month_start);
        (month, r.get(total).as_number())
    });

    ViewOutcome::Ready(
        sum_by(pairs)
            .into_iter()
            .map(|(month, total)| MonthTotal { month, total })
            .collect(),
    )
}

/// Revenue per product line, ordered by product line name.
#[must_use]
pub fn product_line_revenue(table: &TransactionTable) -> ViewOutcome<Vec<ProductLineTotal>> {
    let [line, total] = match require(table, [PRODUCT_LINE, TOTAL]) {
        Ok(indices) => indices,
        Err(reason) => return ViewOutcome::Unavailable(reason),
    };

    let pairs = table
        .records()
        .iter()
        .map(|r| (r.get(line).as_text(), r.get(total).as_number()));

    ViewOutcome::Ready(
        sum_by(pairs)
            .into_iter()
            .map(|(product_line, total)| ProductLineTotal {
                product_line: product_line.to_string(),
                total,
            })
            .collect(),
    )
}

/// Mean rating per city, ordered by city name.
#[must_use]
pub fn city_rating(table: &TransactionTable) -> ViewOutcome<Vec<CityRating>> {
    let [city, rating] = match require(table, [CITY, RATING]) {
        Ok(indices) => indices,
        Err(reason) => return ViewOutcome::Unavailable(reason),
    };

    let pairs = table
        .records()
        .iter()
        .map(|r| (r.get(city).as_text(), r.get(rating).as_number()));

    ViewOutcome::Ready(
        mean_by(pairs)
            .into_iter()
            .map(|(city, rating)| CityRating {
                city: city.to_string(),
                rating,
            })
            .collect(),
    )
}

/// Transaction count per payment method, ordered by method name.
#[must_use]
pub fn payment_distribution(table: &TransactionTable) -> ViewOutcome<Vec<PaymentCount>> {
    let [payment] = match require(table, [PAYMENT]) {
        Ok(indices) => indices,
        Err(reason) => return ViewOutcome::Unavailable(reason),
    };

    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for key in table.records().iter().filter_map(|r| r.get(payment).as_text()) {
        *counts.entry(key).or_insert(0) += 1;
    }

    ViewOutcome::Ready(
        counts
            .into_iter()
            .map(|(payment, count)| PaymentCount {
                payment: payment.to_string(),
                count,
            })
            .collect(),
    )
}

/// Resolve column indices, or describe which columns are missing.
pub(crate) fn require<const N: usize>(
    table: &TransactionTable,
    names: [&str; N],
) -> Result<[usize; N], String> {
    let mut indices = [0usize; N];
    let mut missing = Vec::new();

    for (slot, name) in indices.iter_mut().zip(names) {
        match table.column_index(name) {
            Some(idx) => *slot = idx,
            None => missing.push(format!("'{name}'")),
        }
    }

    match missing.len() {
        0 => Ok(indices),
        1 => Err(format!("missing column {}", missing[0])),
        _ => Err(format!("missing columns {}", missing.join(", "))),
    }
}

/// Group-and-sum. Rows with no key are dropped; a keyed row with no value
/// still opens its group.
fn sum_by<K: Ord>(pairs: impl Iterator<Item = (Option<K>, Option<f64>)>) -> BTreeMap<K, f64> {
    let mut groups = BTreeMap::new();
    for (key, value) in pairs {
        let Some(key) = key else { continue };
        let total = groups.entry(key).or_insert(0.0);
        if let Some(value) = value {
            *total += value;
        }
    }
    groups
}

/// Group-and-mean over non-missing values; groups with none map to `None`.
fn mean_by<K: Ord>(
    pairs: impl Iterator<Item = (Option<K>, Option<f64>)>,
) -> BTreeMap<K, Option<f64>> {
    let mut groups: BTreeMap<K, (f64, u64)> = BTreeMap::new();
    for (key, value) in pairs {
        let Some(key) = key else { continue };
        let (sum, count) = groups.entry(key).or_insert((0.0, 0));
        if let Some(value) = value {
            *sum += value;
            *count += 1;
        }
    }
    groups
        .into_iter()
        .map(|(key, (sum, count))| (key, (count > 0).then(|| sum / count as f64)))
        .collect()
}
