use std::io::Cursor;

use bytes::Bytes;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to open workbook: {0}")]
    WorkbookOpen(String),

    #[error("workbook contains no sheets")]
    NoSheets,

    #[error("failed to read sheet {name}: {msg}")]
    SheetRead { name: String, msg: String },
}

/// Only `.xls`/`.xlsx` uploads are measurement reports; anything else is
/// skipped by the batch, not rejected.
pub fn is_spreadsheet_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".xls") || lower.ends_with(".xlsx")
}

/// Read the first worksheet of an in-memory workbook into a row grid.
pub fn load_rows(data: &Bytes) -> Result<Vec<Vec<Data>>, SheetError> {
    let cursor = Cursor::new(data.clone());

    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| SheetError::WorkbookOpen(e.to_string()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let sheet_name = sheet_names.first().ok_or(SheetError::NoSheets)?;

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| SheetError::SheetRead {
            name: sheet_name.clone(),
            msg: e.to_string(),
        })?;

    Ok(range.rows().map(|row| row.to_vec()).collect())
}
