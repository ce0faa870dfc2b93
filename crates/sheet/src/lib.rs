//! Spreadsheet ingestion for salesboard
//!
//! Reads `.xlsx` workbooks into a [`Sheet`]: a row-major grid of raw
//! [`CellValue`]s with optional header naming. No type coercion happens here;
//! cells keep whatever type the workbook stored.
//!
//! # Examples
//!
//! ## Named column access
//!
//! ```
//! use salesboard_sheet::{CellValue, Sheet};
//!
//! let mut sheet = Sheet::from_data(vec![
//!     vec!["City", "Rating"],
//!     vec!["Yangon", "9.1"],
//! ]);
//!
//! sheet.name_columns_by_row(0).unwrap();
//! let cities = sheet.column_by_name("City").unwrap();
//! assert_eq!(cities, vec![CellValue::from("Yangon")]);
//! ```
//!
//! ## Loading from bytes
//!
//! ```no_run
//! use salesboard_sheet::{Sheet, XlsxReadOptions};
//!
//! let bytes = std::fs::read("supermarket_sales.xlsx").unwrap();
//! let options = XlsxReadOptions::default().with_headers(true);
//! let sheet = Sheet::from_xlsx_bytes(&bytes, &options).unwrap();
//! ```

mod cell;
pub mod datetime;
mod error;
mod sheet;
mod xlsx;

/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export sheet type.
pub use sheet::Sheet;
/// Re-export XLSX read options.
pub use xlsx::XlsxReadOptions;
