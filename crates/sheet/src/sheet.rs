use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use std::collections::HashMap;

/// A sheet representing a 2D grid of cells (row-major storage)
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    data: Vec<Vec<CellValue>>,
    header_row: Option<usize>,
    column_names: Option<Vec<String>>,
    column_index: Option<HashMap<String, usize>>,
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            data: Vec::new(),
            header_row: None,
            column_names: None,
            column_index: None,
        }
    }

    /// Create a sheet from a 2D vector of values
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let converted: Vec<Vec<CellValue>> = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();

        let mut sheet = Sheet::new();
        sheet.data = converted;
        sheet
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of rows, header included
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Get the number of columns (width of the widest row)
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.data.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the sheet has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a cell by row and column index
    pub fn get(&self, row: usize, col: usize) -> Result<&CellValue> {
        let row_data = self.row(row)?;
        row_data
            .get(col)
            .ok_or(SheetError::ColumnIndexOutOfBounds {
                index: col,
                count: row_data.len(),
            })
    }

    /// Get a row by index
    pub fn row(&self, index: usize) -> Result<&Vec<CellValue>> {
        self.data.get(index).ok_or(SheetError::RowIndexOutOfBounds {
            index,
            count: self.data.len(),
        })
    }

    /// Get the data rows (everything below the header row, or all rows when
    /// columns are not named)
    pub fn records(&self) -> impl Iterator<Item = &[CellValue]> {
        let skip = self.header_row.map_or(0, |h| h + 1);
        self.data.iter().skip(skip).map(Vec::as_slice)
    }

    /// Number of data rows below the header
    #[must_use]
    pub fn record_count(&self) -> usize {
        let skip = self.header_row.map_or(0, |h| h + 1);
        self.data.len().saturating_sub(skip)
    }

    /// Get a column of data rows by index. Short rows yield `Null`.
    pub fn column(&self, index: usize) -> Result<Vec<CellValue>> {
        let count = self.col_count();
        if index >= count {
            return Err(SheetError::ColumnIndexOutOfBounds { index, count });
        }
        Ok(self
            .records()
            .map(|row| row.get(index).cloned().unwrap_or_default())
            .collect())
    }

    /// Get a column of data rows by header name
    pub fn column_by_name(&self, name: &str) -> Result<Vec<CellValue>> {
        let index = self.column_position(name)?;
        self.column(index)
    }

    // ===== Named Access =====

    /// Use the specified row as column headers.
    ///
    /// Header text is trimmed. Blank headers become `Unnamed: {index}` and
    /// repeated names get a numeric suffix (`Total`, `Total.1`, ...), so a
    /// header row never fails to name its columns.
    pub fn name_columns_by_row(&mut self, row_index: usize) -> Result<()> {
        let width = self.col_count();
        let header_row = self.row(row_index)?;

        let mut names = Vec::with_capacity(width);
        let mut index_map = HashMap::with_capacity(width);
        let mut seen: HashMap<String, usize> = HashMap::new();

        for i in 0..width {
            let raw = header_row
                .get(i)
                .map(|c| c.text().trim().to_string())
                .unwrap_or_default();
            let base = if raw.is_empty() {
                format!("Unnamed: {i}")
            } else {
                raw
            };

            let mut name = base.clone();
            while index_map.contains_key(&name) {
                let n = seen.entry(base.clone()).or_insert(0);
                *n += 1;
                name = format!("{base}.{n}");
            }

            index_map.insert(name.clone(), i);
            names.push(name);
        }

        self.header_row = Some(row_index);
        self.column_names = Some(names);
        self.column_index = Some(index_map);
        Ok(())
    }

    /// Get column names (if set)
    #[must_use]
    pub fn column_names(&self) -> Option<&[String]> {
        self.column_names.as_deref()
    }

    /// Get the column index for a header name
    pub fn column_position(&self, name: &str) -> Result<usize> {
        self.column_index
            .as_ref()
            .ok_or(SheetError::ColumnsNotNamed)?
            .get(name)
            .copied()
            .ok_or_else(|| SheetError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Get mutable internal data reference.
    ///
    /// Replacing the data drops any column naming.
    pub fn data_mut(&mut self) -> &mut Vec<Vec<CellValue>> {
        self.header_row = None;
        self.column_names = None;
        self.column_index = None;
        &mut self.data
    }
}
