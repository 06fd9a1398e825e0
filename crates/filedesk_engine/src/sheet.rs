use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use filedesk_logging::desk_debug;

use crate::WorkflowError;

/// Text of column A on the first worksheet, one entry per non-empty cell.
///
/// Numbers and dates come back in their display form.
pub fn first_column_rows(path: &Path) -> Result<Vec<String>, WorkflowError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|err| WorkflowError::Spreadsheet(err.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| WorkflowError::Spreadsheet("workbook has no worksheet".to_string()))?
        .map_err(|err| WorkflowError::Spreadsheet(err.to_string()))?;

    if range.start().is_some_and(|(_, col)| col > 0) {
        return Ok(Vec::new());
    }
    let rows: Vec<String> = range
        .rows()
        .filter_map(|row| match row.first() {
            None | Some(Data::Empty) => None,
            Some(Data::String(text)) => Some(text.trim().to_string()),
            Some(cell) => Some(cell.to_string()),
        })
        .filter(|text| !text.is_empty())
        .collect();
    desk_debug!("Read {} rows from {:?}", rows.len(), path);
    Ok(rows)
}
