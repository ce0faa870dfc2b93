use thiserror::Error;

/// Errors that can occur while reading a spreadsheet
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Row index out of bounds: {index} (sheet has {count} rows)")]
    RowIndexOutOfBounds { index: usize, count: usize },

    #[error("Column index out of bounds: {index} (sheet has {count} columns)")]
    ColumnIndexOutOfBounds { index: usize, count: usize },

    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    #[error("Columns not named. Call name_columns_by_row() first")]
    ColumnsNotNamed,

    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("Workbook contains no worksheets")]
    NoWorksheets,

    #[error("Invalid workbook: {0}")]
    Workbook(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<calamine::XlsxError> for SheetError {
    fn from(err: calamine::XlsxError) -> Self {
        match err {
            calamine::XlsxError::Io(io) => SheetError::Io(io),
            other => SheetError::Workbook(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
