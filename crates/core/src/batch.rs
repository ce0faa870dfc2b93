//! Arrow record batches for tabular previews.

use crate::error::DashResult;
use crate::table::{Field, TransactionTable};
use crate::views::{CityRating, MonthTotal, PaymentCount, ProductLineTotal};
use arrow::array::{ArrayRef, BooleanArray, Date32Array, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Date32Type, Field as ArrowField, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;

/// Arrow type a table column is exported as.
fn column_type<'a>(fields: impl Iterator<Item = &'a Field>) -> DataType {
    let mut kind = None;
    for field in fields {
        let this = match field {
            Field::Missing => continue,
            Field::Number(_) => DataType::Float64,
            Field::Bool(_) => DataType::Boolean,
            Field::Timestamp(_) | Field::Text(_) => DataType::Utf8,
        };
        match &kind {
            None => kind = Some(this),
            Some(seen) if *seen == this => {}
            Some(_) => return DataType::Utf8,
        }
    }
    kind.unwrap_or(DataType::Utf8)
}

/// Convert the Transaction Table (or its first `limit` rows) to a batch.
///
/// All-number columns become `Float64`, all-bool columns `Boolean`, and
/// everything else `Utf8` using each field's display text. Missing fields
/// are nulls.
pub fn table_to_batch(table: &TransactionTable, limit: Option<usize>) -> DashResult<RecordBatch> {
    let records = &table.records()[..limit.map_or(table.len(), |l| l.min(table.len()))];

    let mut schema_fields = Vec::with_capacity(table.columns().len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.columns().len());

    for (idx, name) in table.columns().iter().enumerate() {
        let column = records.iter().map(|r| r.get(idx));
        let data_type = column_type(column.clone());

        let array: ArrayRef = match data_type {
            DataType::Float64 => Arc::new(column.map(Field::as_number).collect::<Float64Array>()),
            DataType::Boolean => Arc::new(
                column
                    .map(|f| match f {
                        Field::Bool(b) => Some(*b),
                        _ => None,
                    })
                    .collect::<BooleanArray>(),
            ),
            _ => Arc::new(
                column
                    .map(|f| (!f.is_missing()).then(|| f.to_string()))
                    .collect::<StringArray>(),
            ),
        };

        schema_fields.push(ArrowField::new(name, data_type, true));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(schema_fields));
    let options = RecordBatchOptions::new().with_row_count(Some(records.len()));
    Ok(RecordBatch::try_new_with_options(schema, arrays, &options)?)
}

fn batch(columns: Vec<(&str, DataType, ArrayRef)>) -> DashResult<RecordBatch> {
    let (fields, arrays): (Vec<_>, Vec<_>) = columns
        .into_iter()
        .map(|(name, data_type, array)| {
            (ArrowField::new(name, data_type, true), array)
        })
        .unzip();
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

/// `Month` (`Date32`) and `Total` columns.
pub fn monthly_batch(rows: &[MonthTotal]) -> DashResult<RecordBatch> {
    let months: Date32Array = rows
        .iter()
        .map(|r| Some(Date32Type::from_naive_date(r.month)))
        .collect();
    let totals: Float64Array = rows.iter().map(|r| Some(r.total)).collect();
    batch(vec![
        ("Month", DataType::Date32, Arc::new(months) as ArrayRef),
        ("Total", DataType::Float64, Arc::new(totals) as ArrayRef),
    ])
}

/// `Product line` and `Total` columns.
pub fn product_line_batch(rows: &[ProductLineTotal]) -> DashResult<RecordBatch> {
    let lines: StringArray = rows.iter().map(|r| Some(r.product_line.as_str())).collect();
    let totals: Float64Array = rows.iter().map(|r| Some(r.total)).collect();
    batch(vec![
        ("Product line", DataType::Utf8, Arc::new(lines) as ArrayRef),
        ("Total", DataType::Float64, Arc::new(totals) as ArrayRef),
    ])
}

/// `City` and `Rating` columns; cities without ratings are null.
pub fn city_rating_batch(rows: &[CityRating]) -> DashResult<RecordBatch> {
    let cities: StringArray = rows.iter().map(|r| Some(r.city.as_str())).collect();
    let ratings: Float64Array = rows.iter().map(|r| r.rating).collect();
    batch(vec![
        ("City", DataType::Utf8, Arc::new(cities) as ArrayRef),
        ("Rating", DataType::Float64, Arc::new(ratings) as ArrayRef),
    ])
}

/// `Payment` and `Count` columns.
pub fn payment_batch(rows: &[PaymentCount]) -> DashResult<RecordBatch> {
    let methods: StringArray = rows.iter().map(|r| Some(r.payment.as_str())).collect();
    let counts: UInt64Array = rows.iter().map(|r| Some(r.count)).collect();
    batch(vec![
        ("Payment", DataType::Utf8, Arc::new(methods) as ArrayRef),
        ("Count", DataType::UInt64, Arc::new(counts) as ArrayRef),
    ])
}
