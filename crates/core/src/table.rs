//! The normalized Transaction Table.

use crate::coerce::{month_start, parse_date, parse_label, parse_number};
use crate::schema::{self, ColumnKind};
use chrono::{NaiveDateTime, Timelike};
use indexmap::IndexMap;
use salesboard_sheet::{CellValue, Sheet};
use serde::Serialize;
use std::fmt;

static MISSING: Field = Field::Missing;
static NULL_CELL: CellValue = CellValue::Null;

/// One normalized cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field {
    Missing,
    Timestamp(NaiveDateTime),
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Field {
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Field::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Field::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Field::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Carry a cell through untouched apart from dropping `NaN`.
    fn pass_through(cell: &CellValue) -> Self {
        match cell {
            CellValue::Null => Field::Missing,
            CellValue::Bool(b) => Field::Bool(*b),
            CellValue::Int(i) => Field::Number(*i as f64),
            CellValue::Float(f) if f.is_nan() => Field::Missing,
            CellValue::Float(f) => Field::Number(*f),
            CellValue::String(s) => Field::Text(s.clone()),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Missing => Ok(()),
            Field::Timestamp(ts) if ts.num_seconds_from_midnight() == 0 && ts.nanosecond() == 0 => {
                write!(f, "{}", ts.format("%Y-%m-%d"))
            }
            Field::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
            Field::Number(n) => write!(f, "{n}"),
            Field::Text(s) => write!(f, "{s}"),
            Field::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// One transaction, aligned to [`TransactionTable::columns`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(Vec<Field>);

impl Record {
    /// Field at a column index; out-of-range reads are missing.
    #[must_use]
    pub fn get(&self, index: usize) -> &Field {
        self.0.get(index).unwrap_or(&MISSING)
    }
}

/// Coercion outcome for one expected column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnReport {
    pub column: String,
    pub kind: ColumnKind,
    /// False when the header row does not name this column.
    pub present: bool,
    /// Non-blank cells that could not be coerced and became missing.
    pub failures: usize,
}

/// Per-column coercion summary for a normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoercionReport {
    pub columns: Vec<ColumnReport>,
}

impl CoercionReport {
    /// Expected columns absent from the input.
    pub fn missing_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| !c.present)
            .map(|c| c.column.as_str())
    }

    /// Coercion failures recorded for a column (0 when unknown).
    #[must_use]
    pub fn failures(&self, column: &str) -> usize {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map_or(0, |c| c.failures)
    }
}

/// Row-oriented table of normalized transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionTable {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl TransactionTable {
    /// Normalize a sheet whose columns are named by its header row.
    ///
    /// `Date` becomes a timestamp, the numeric columns become numbers and the
    /// category columns become labels; anything else passes through. A value
    /// that fails coercion is missing, never an error. A sheet without named
    /// columns yields an empty table.
    #[must_use]
    pub fn from_sheet(sheet: &Sheet) -> (Self, CoercionReport) {
        let Some(names) = sheet.column_names() else {
            tracing::warn!(sheet = sheet.name(), "sheet has no header row");
            return (Self::default(), report_for(&[], &[]));
        };

        let kinds: Vec<ColumnKind> = names.iter().map(|n| ColumnKind::of(n)).collect();
        let mut failures = vec![0usize; names.len()];

        let records = sheet
            .records()
            .map(|row| {
                let fields = kinds
                    .iter()
                    .enumerate()
                    .map(|(i, kind)| {
                        let cell = row.get(i).unwrap_or(&NULL_CELL);
                        let field = coerce(cell, *kind);
                        if field.is_missing() && !cell.is_blank() {
                            failures[i] += 1;
                        }
                        field
                    })
                    .collect();
                Record(fields)
            })
            .collect::<Vec<_>>();

        let report = report_for(names, &failures);
        for column in &report.columns {
            if !column.present {
                tracing::warn!(column = %column.column, "expected column is missing");
            } else if column.failures > 0 {
                tracing::debug!(
                    column = %column.column,
                    failures = column.failures,
                    "values could not be coerced and were set to missing"
                );
            }
        }

        tracing::info!(
            rows = records.len(),
            columns = names.len(),
            "normalized transaction table"
        );

        let table = Self {
            columns: names.to_vec(),
            records,
        };
        (table, report)
    }

    /// Build a table from already-normalized parts.
    ///
    /// Short records are padded with missing fields.
    #[must_use]
    pub fn from_parts(columns: Vec<String>, records: Vec<Vec<Field>>) -> Self {
        let width = columns.len();
        let records = records
            .into_iter()
            .map(|mut fields| {
                fields.resize(width, Field::Missing);
                Record(fields)
            })
            .collect();
        Self { columns, records }
    }

    /// Append the derived `Month` column (first day of each row's `Date`).
    ///
    /// An existing `Month` column is overwritten. Without a `Date` column the
    /// table is left unchanged.
    pub fn add_month_column(&mut self) {
        let Some(date_idx) = self.column_index(schema::DATE) else {
            return;
        };

        let month_idx = match self.column_index(schema::MONTH) {
            Some(idx) => idx,
            None => {
                self.columns.push(schema::MONTH.to_string());
                self.columns.len() - 1
            }
        };

        for record in &mut self.records {
            let month = record
                .get(date_idx)
                .as_timestamp()
                .map(month_start)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map_or(Field::Missing, Field::Timestamp);
            if month_idx < record.0.len() {
                record.0[month_idx] = month;
            } else {
                record.0.push(month);
            }
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Fields of one column, or `None` when the column is absent.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Field> + '_> {
        let idx = self.column_index(name)?;
        Some(self.records.iter().map(move |r| r.get(idx)))
    }

    /// Numeric view of a column; non-numeric fields read as missing.
    pub fn numbers(&self, name: &str) -> Option<impl Iterator<Item = Option<f64>> + '_> {
        Some(self.column(name)?.map(Field::as_number))
    }

    /// Records keyed by column name, in column order.
    #[must_use]
    pub fn to_records(&self, limit: Option<usize>) -> Vec<IndexMap<String, Field>> {
        let take = limit.unwrap_or(self.records.len());
        self.records
            .iter()
            .take(take)
            .map(|record| {
                self.columns
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (name.clone(), record.get(i).clone()))
                    .collect()
            })
            .collect()
    }
}

fn coerce(cell: &CellValue, kind: ColumnKind) -> Field {
    match kind {
        ColumnKind::Date => parse_date(cell).map_or(Field::Missing, Field::Timestamp),
        ColumnKind::Numeric => parse_number(cell).map_or(Field::Missing, Field::Number),
        ColumnKind::Category => parse_label(cell).map_or(Field::Missing, Field::Text),
        ColumnKind::PassThrough => Field::pass_through(cell),
    }
}

fn report_for(names: &[String], failures: &[usize]) -> CoercionReport {
    let columns = schema::EXPECTED_COLUMNS
        .iter()
        .map(|expected| {
            let position = names.iter().position(|n| n == expected);
            ColumnReport {
                column: (*expected).to_string(),
                kind: ColumnKind::of(expected),
                present: position.is_some(),
                failures: position.and_then(|i| failures.get(i).copied()).unwrap_or(0),
            }
        })
        .collect();
    CoercionReport { columns }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: Vec<Vec<CellValue>>) -> Sheet {
        let mut sheet = Sheet::from_data(rows);
        sheet.name_columns_by_row(0).unwrap();
        sheet
    }

    fn s(v: &str) -> CellValue {
        CellValue::from(v)
    }

    #[test]
    fn test_coerces_known_columns() {
        let sheet = sheet(vec![
            vec![s("Date"), s("Total"), s("City"), s("Invoice ID")],
            vec![s("2024-01-05"), s("100.5"), s("Yangon"), s("750-67-8428")],
        ]);
        let (table, report) = TransactionTable::from_sheet(&sheet);

        let record = &table.records()[0];
        assert_eq!(
            record.get(0).as_timestamp().unwrap().to_string(),
            "2024-01-05 00:00:00"
        );
        assert_eq!(record.get(1), &Field::Number(100.5));
        assert_eq!(record.get(2), &Field::Text("Yangon".into()));
        assert_eq!(record.get(3), &Field::Text("750-67-8428".into()));
        assert_eq!(report.failures("Total"), 0);
    }

    #[test]
    fn test_bad_cells_do_not_touch_siblings() {
        let sheet = sheet(vec![
            vec![s("Date"), s("Total"), s("Rating")],
            vec![s("yesterday"), s("12.5"), s("9.1")],
            vec![s("2024-01-05"), s("oops"), s("7")],
        ]);
        let (table, report) = TransactionTable::from_sheet(&sheet);

        assert_eq!(table.len(), 2);
        assert!(table.records()[0].get(0).is_missing());
        assert_eq!(table.records()[0].get(1), &Field::Number(12.5));
        assert!(table.records()[1].get(1).is_missing());
        assert_eq!(table.records()[1].get(2), &Field::Number(7.0));
        assert_eq!(report.failures("Date"), 1);
        assert_eq!(report.failures("Total"), 1);
    }

    #[test]
    fn test_blank_cells_are_not_failures() {
        let sheet = sheet(vec![
            vec![s("Total"), s("Payment")],
            vec![CellValue::Null, s("  ")],
        ]);
        let (table, report) = TransactionTable::from_sheet(&sheet);

        assert!(table.records()[0].get(0).is_missing());
        assert!(table.records()[0].get(1).is_missing());
        assert_eq!(report.failures("Total"), 0);
    }

    #[test]
    fn test_missing_columns_are_reported() {
        let sheet = sheet(vec![vec![s("Total")], vec![s("1")]]);
        let (_, report) = TransactionTable::from_sheet(&sheet);

        let missing: Vec<_> = report.missing_columns().collect();
        assert!(missing.contains(&"Rating"));
        assert!(missing.contains(&"Date"));
        assert!(!missing.contains(&"Total"));
    }

    #[test]
    fn test_unnamed_sheet_is_empty_table() {
        let sheet = Sheet::new();
        let (table, report) = TransactionTable::from_sheet(&sheet);
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
        assert_eq!(report.missing_columns().count(), 8);
    }

    #[test]
    fn test_month_column() {
        let sheet = sheet(vec![
            vec![s("Date"), s("Total")],
            vec![s("2024-01-20 15:00:00"), s("1")],
            vec![s("garbage"), s("2")],
        ]);
        let (mut table, _) = TransactionTable::from_sheet(&sheet);
        table.add_month_column();

        assert_eq!(table.columns(), ["Date", "Total", "Month"]);
        assert_eq!(table.records()[0].get(2).to_string(), "2024-01-01");
        assert!(table.records()[1].get(2).is_missing());

        // Idempotent: no second Month column
        table.add_month_column();
        assert_eq!(table.columns().len(), 3);
    }

    #[test]
    fn test_month_column_needs_date() {
        let mut table =
            TransactionTable::from_parts(vec!["Total".into()], vec![vec![Field::Number(1.0)]]);
        table.add_month_column();
        assert_eq!(table.columns(), ["Total"]);
    }

    #[test]
    fn test_to_records_limit() {
        let table = TransactionTable::from_parts(
            vec!["City".into(), "Total".into()],
            vec![
                vec![Field::Text("A".into()), Field::Number(1.0)],
                vec![Field::Text("B".into())],
            ],
        );
        let records = table.to_records(Some(1));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["City"], Field::Text("A".into()));

        let all = table.to_records(None);
        assert!(all[1]["Total"].is_missing());
    }
}
