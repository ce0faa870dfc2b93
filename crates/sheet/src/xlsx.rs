use crate::cell::CellValue;
use crate::datetime::datetime_to_excel_serial;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{Data, ExcelDateTime, Range, Reader, Xlsx};
use std::io::{Cursor, Read, Seek};

/// Options for reading Excel files
#[derive(Debug, Clone, Default)]
pub struct XlsxReadOptions {
    /// Whether the first row contains headers
    pub has_headers: bool,
    /// Worksheet to read; the first worksheet when unset
    pub sheet: Option<String>,
}

impl XlsxReadOptions {
    /// Set whether the first row contains headers
    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Read the named worksheet instead of the first one
    #[must_use]
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }
}

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => CellValue::Float(datetime_serial(dt)),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(_) => CellValue::Null,
    }
}

/// Serial in the 1900 date system, whichever system the workbook uses.
fn datetime_serial(dt: &ExcelDateTime) -> f64 {
    if dt.is_datetime() {
        if let Some(serial) = dt.as_datetime().and_then(datetime_to_excel_serial) {
            return serial;
        }
    }
    dt.as_f64()
}

fn range_to_sheet(name: &str, range: &Range<Data>, options: &XlsxReadOptions) -> Result<Sheet> {
    let data: Vec<Vec<CellValue>> = range
        .rows()
        .map(|row| row.iter().map(data_to_cell_value).collect())
        .collect();

    let mut sheet = Sheet::with_name(name);
    *sheet.data_mut() = data;

    if options.has_headers && sheet.row_count() > 0 {
        sheet.name_columns_by_row(0)?;
    }

    tracing::debug!(
        sheet = name,
        rows = sheet.row_count(),
        cols = sheet.col_count(),
        "loaded worksheet"
    );

    Ok(sheet)
}

fn read_workbook<RS: Read + Seek>(
    workbook: &mut Xlsx<RS>,
    options: &XlsxReadOptions,
) -> Result<Sheet> {
    let sheet_names = workbook.sheet_names().to_vec();

    let name = match &options.sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|n| *n == wanted)
            .cloned()
            .ok_or_else(|| SheetError::SheetNotFound {
                name: wanted.clone(),
            })?,
        None => sheet_names.first().cloned().ok_or(SheetError::NoWorksheets)?,
    };

    let range = workbook.worksheet_range(&name)?;
    range_to_sheet(&name, &range, options)
}

impl Sheet {
    /// Load a sheet from in-memory `.xlsx` bytes
    ///
    /// # Errors
    ///
    /// Returns error if the bytes are not a valid workbook or the requested
    /// sheet does not exist.
    pub fn from_xlsx_bytes(bytes: &[u8], options: &XlsxReadOptions) -> Result<Self> {
        let mut workbook = Xlsx::new(Cursor::new(bytes))?;
        read_workbook(&mut workbook, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::ExcelDateTimeType;
    use rust_xlsxwriter::Workbook;

    fn workbook_bytes() -> Vec<u8> {
        let mut workbook = Workbook::new();

        let first = workbook.add_worksheet();
        first.set_name("Sales").unwrap();
        first.write_string(0, 0, "Invoice ID").unwrap();
        first.write_string(0, 1, "Total").unwrap();
        first.write_string(1, 0, "750-67-8428").unwrap();
        first.write_number(1, 1, 548.9715).unwrap();
        first.write_boolean(2, 0, true).unwrap();

        let second = workbook.add_worksheet();
        second.set_name("Notes").unwrap();
        second.write_string(0, 0, "Note").unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_reads_first_sheet_by_default() {
        let bytes = workbook_bytes();
        let sheet = Sheet::from_xlsx_bytes(&bytes, &XlsxReadOptions::default()).unwrap();

        assert_eq!(sheet.name(), "Sales");
        assert_eq!(sheet.row_count(), 3);
        assert!(sheet.column_names().is_none());
        assert!(
            matches!(sheet.get(1, 1).unwrap(), CellValue::Float(f) if (*f - 548.9715).abs() < 1e-9)
        );
        assert!(matches!(sheet.get(2, 0).unwrap(), CellValue::Bool(true)));
        assert!(sheet.get(2, 1).unwrap().is_null());
    }

    #[test]
    fn test_named_sheet_with_headers() {
        let bytes = workbook_bytes();
        let options = XlsxReadOptions::default()
            .with_headers(true)
            .with_sheet("Notes");
        let sheet = Sheet::from_xlsx_bytes(&bytes, &options).unwrap();

        assert_eq!(sheet.name(), "Notes");
        assert_eq!(sheet.column_names().unwrap(), ["Note"]);
        assert_eq!(sheet.record_count(), 0);
    }

    #[test]
    fn test_missing_sheet() {
        let bytes = workbook_bytes();
        let options = XlsxReadOptions::default().with_sheet("Missing");
        let err = Sheet::from_xlsx_bytes(&bytes, &options).unwrap_err();
        assert!(matches!(err, SheetError::SheetNotFound { name } if name == "Missing"));
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let err = Sheet::from_xlsx_bytes(b"Date,Total\n2024-01-01,3", &XlsxReadOptions::default())
            .unwrap_err();
        assert!(matches!(err, SheetError::Workbook(_) | SheetError::Io(_)));
    }

    #[test]
    fn test_date_cells_use_1900_serials() {
        let date = Data::DateTime(ExcelDateTime::new(
            43466.5,
            ExcelDateTimeType::DateTime,
            false,
        ));
        assert_eq!(data_to_cell_value(&date), CellValue::Float(43466.5));
    }

    #[test]
    fn test_1904_date_cells_are_shifted() {
        // 43466 days after 1904-01-01 is 2023-01-02, serial 44928 in the 1900 system
        let date = Data::DateTime(ExcelDateTime::new(
            43466.0,
            ExcelDateTimeType::DateTime,
            true,
        ));
        assert_eq!(data_to_cell_value(&date), CellValue::Float(44928.0));
    }

    #[test]
    fn test_durations_keep_raw_value() {
        let duration = Data::DateTime(ExcelDateTime::new(
            1.25,
            ExcelDateTimeType::TimeDelta,
            true,
        ));
        assert_eq!(data_to_cell_value(&duration), CellValue::Float(1.25));
    }
}
