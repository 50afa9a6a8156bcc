use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

use crate::domain::catalog::{ResultSet, Value};
use crate::errors::{PipelineError, PipelineResult};

/// Writes the result table to an `.xlsx` workbook with a bold header row.
pub fn export_result_xlsx(result: &ResultSet, path: &Path) -> PipelineResult<()> {
    let buffer = result_workbook_bytes(result)?;
    std::fs::write(path, buffer)?;
    Ok(())
}

pub fn result_workbook_bytes(result: &ResultSet) -> PipelineResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    // Headers
    for (col, header) in result.columns.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, &bold)
            .map_err(|e| {
                PipelineError::Xlsx(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    // Rows
    for (i, row) in result.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            let col = col as u16;
            match value {
                Value::Number(n) => {
                    worksheet.write_number(r, col, *n).map_err(|e| {
                        PipelineError::Xlsx(format!("Failed to write row {r}: {e}"))
                    })?;
                }
                Value::Text(s) => {
                    worksheet.write_string(r, col, s).map_err(|e| {
                        PipelineError::Xlsx(format!("Failed to write row {r}: {e}"))
                    })?;
                }
                Value::Missing => {}
            }
        }
    }

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| PipelineError::Xlsx(format!("Failed to save workbook: {}", e)))?;
    Ok(buffer)
}
