// src/export/excel.rs

use rust_xlsxwriter::{Format, Workbook};

use super::ExportError;
use crate::report::{NonVoter, NON_VOTER_COLUMNS};

pub const SHEET_NAME: &str = "Users";

/// Single-sheet workbook: a bold header row, then one row per non-voter.
pub fn encode(rows: &[NonVoter]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    sheet.set_right_to_left(true);

    for (col, name) in NON_VOTER_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, value) in row.cells().iter().enumerate() {
            sheet.write_string(r, col as u16, *value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}
