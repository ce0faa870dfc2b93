//! Error types for salesboard.

use salesboard_sheet::SheetError;
use thiserror::Error;

/// Result type for salesboard operations.
pub type DashResult<T> = Result<T, DashError>;

/// Errors that abort a dashboard run.
///
/// Cell-level coercion failures and missing columns are not errors; they
/// surface as missing values and [`crate::ViewOutcome::Unavailable`].
#[derive(Debug, Error)]
pub enum DashError {
    /// The uploaded bytes could not be read as a spreadsheet.
    #[error("Could not read spreadsheet: {0}")]
    Parse(String),

    /// Sheet access error after the workbook was opened.
    #[error("Sheet error: {0}")]
    Sheet(SheetError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow conversion error.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl DashError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<SheetError> for DashError {
    fn from(err: SheetError) -> Self {
        match err {
            SheetError::Workbook(_)
            | SheetError::NoWorksheets
            | SheetError::SheetNotFound { .. } => Self::Parse(err.to_string()),
            SheetError::Io(io) => Self::Io(io),
            other => Self::Sheet(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workbook_errors_are_file_level() {
        let err: DashError = SheetError::Workbook("invalid zip header".into()).into();
        assert!(matches!(err, DashError::Parse(msg) if msg.contains("invalid zip header")));

        let err: DashError = SheetError::NoWorksheets.into();
        assert!(matches!(err, DashError::Parse(_)));
    }

    #[test]
    fn test_other_sheet_errors_pass_through() {
        let err: DashError = SheetError::ColumnsNotNamed.into();
        assert!(matches!(err, DashError::Sheet(SheetError::ColumnsNotNamed)));
    }
}
