use std::collections::BTreeMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde::Serialize;

use super::ImportError;

/// Columns every import sheet must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = ["nome", "documento", "empresa"];

/// One data row of the first worksheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetRow {
    /// 1-based row number as shown by spreadsheet software.
    #[serde(skip)]
    pub line: usize,
    /// Cell text keyed by normalized header. Empty cells are omitted.
    #[serde(flatten)]
    pub cells: BTreeMap<String, String>,
}

impl SheetRow {
    /// Trimmed cell value, `None` when absent or blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    /// Normalized header names, in column order. Blank headers are skipped.
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

impl Sheet {
    /// Required columns missing from the header row.
    pub fn missing_columns(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .filter(|c| !self.headers.iter().any(|h| h.as_str() == **c))
            .map(|c| c.to_string())
            .collect()
    }

    /// Fail unless the sheet has data rows and every required column.
    pub fn ensure_importable(&self) -> Result<(), ImportError> {
        if self.rows.is_empty() {
            return Err(ImportError::EmptySheet);
        }
        let missing = self.missing_columns();
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns {
                missing,
                found: self.headers.clone(),
            });
        }
        Ok(())
    }
}

/// Read the first worksheet of an `.xlsx` or `.xls` workbook.
///
/// The first row holds headers; they are trimmed and lowercased. Rows with
/// no text in any headed column are skipped.
pub fn read_sheet(bytes: &[u8]) -> Result<Sheet, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(Sheet::default()),
    };
    let first_row = range.start().map_or(0, |(row, _)| row as usize);

    let mut rows_iter = range.rows();
    let Some(header_cells) = rows_iter.next() else {
        return Ok(Sheet::default());
    };
    let columns: Vec<Option<String>> = header_cells
        .iter()
        .map(|cell| {
            let name = cell_text(cell).trim().to_lowercase();
            (!name.is_empty()).then_some(name)
        })
        .collect();
    let headers = columns.iter().flatten().cloned().collect();

    let mut rows = Vec::new();
    for (offset, cells) in rows_iter.enumerate() {
        let mut values = BTreeMap::new();
        for (column, cell) in columns.iter().zip(cells) {
            let Some(column) = column else { continue };
            let text = cell_text(cell);
            if !text.trim().is_empty() {
                values.insert(column.clone(), text);
            }
        }
        if values.is_empty() {
            continue;
        }
        rows.push(SheetRow {
            // header sits on `first_row`, data starts one below; both 0-based
            line: first_row + offset + 2,
            cells: values,
        });
    }

    Ok(Sheet { headers, rows })
}

/// Render a cell as text. Whole floats lose their fraction so numeric
/// document columns read back as typed.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}
