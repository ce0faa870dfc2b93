//! One upload in, one dashboard out.

use crate::config::LoadOptions;
use crate::error::DashResult;
use crate::table::{CoercionReport, TransactionTable};
use crate::views::{compute_views, Views};
use salesboard_sheet::Sheet;
use serde::Serialize;
use std::path::Path;

/// Everything the rendering surface needs for one input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Normalized transactions, including the derived `Month` column.
    pub table: TransactionTable,
    pub report: CoercionReport,
    pub views: Views,
}

impl Dashboard {
    /// Normalize a header-named sheet and compute its views.
    #[must_use]
    pub fn from_sheet(sheet: &Sheet) -> Self {
        let (mut table, report) = TransactionTable::from_sheet(sheet);
        table.add_month_column();
        let views = compute_views(&table);
        Self {
            table,
            report,
            views,
        }
    }
}

/// Parse `.xlsx` bytes into a header-named sheet.
///
/// Reads the first worksheet unless `options` names another.
pub fn load_workbook(bytes: &[u8], options: &LoadOptions) -> DashResult<Sheet> {
    let sheet = Sheet::from_xlsx_bytes(bytes, &options.xlsx_options())?;
    tracing::info!(
        sheet = sheet.name(),
        records = sheet.record_count(),
        "loaded workbook"
    );
    Ok(sheet)
}

/// Synchronous load → normalize → aggregate pipeline.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: LoadOptions,
}

impl Pipeline {
    #[must_use]
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Run the pipeline over `.xlsx` bytes.
    ///
    /// Only a file-level failure (not a workbook, sheet missing) is an error;
    /// bad cells and missing columns degrade individual views instead. The
    /// bytes are only borrowed for parsing.
    pub fn run(&self, bytes: &[u8]) -> DashResult<Dashboard> {
        let sheet = load_workbook(bytes, &self.options)?;
        Ok(Dashboard::from_sheet(&sheet))
    }

    /// Read a workbook from disk and run the pipeline over it.
    pub fn run_path<P: AsRef<Path>>(&self, path: P) -> DashResult<Dashboard> {
        let bytes = std::fs::read(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), bytes = bytes.len(), "read workbook");
        self.run(&bytes)
    }
}
