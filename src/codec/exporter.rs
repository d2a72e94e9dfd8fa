//! Workbook exporter - Workbook → downloadable xlsx or csv bytes

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Workbook as XlsxWorkbook, Worksheet};
use tracing::debug;

use crate::codec::format::{FileFormat, CSV_SHEET_NAME};
use crate::error::{EditorError, EditorResult};
use crate::types::{CellValue, Table, Workbook};

/// A serialized workbook ready to be sent to the browser
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub file_name: &'static str,
    pub label: &'static str,
}

/// Serialize a workbook in the container format it was loaded from
pub fn export_workbook(workbook: &Workbook, format: FileFormat) -> EditorResult<Download> {
    let exporter = WorkbookExporter::new(workbook);
    let bytes = if format.is_excel() {
        exporter.to_xlsx()?
    } else {
        exporter.to_csv(CSV_SHEET_NAME)?
    };

    let spec = format.download_spec();
    debug!(
        format = %format,
        bytes = bytes.len(),
        file_name = spec.file_name,
        "exported workbook"
    );
    Ok(Download {
        bytes,
        mime: spec.mime,
        file_name: spec.file_name,
        label: spec.label,
    })
}

/// Exporter over a borrowed workbook
pub struct WorkbookExporter<'a> {
    workbook: &'a Workbook,
}

impl<'a> WorkbookExporter<'a> {
    pub fn new(workbook: &'a Workbook) -> Self {
        Self { workbook }
    }

    /// Write every sheet, in order, into one xlsx container
    pub fn to_xlsx(&self) -> EditorResult<Vec<u8>> {
        let mut xlsx = XlsxWorkbook::new();

        // A fixed creation time keeps repeated exports byte-identical
        let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
        let properties = DocProperties::new().set_creation_datetime(&created);
        xlsx.set_properties(&properties);

        for (sheet_name, table) in self.workbook.iter() {
            let worksheet = xlsx.add_worksheet();
            worksheet.set_name(sheet_name).map_err(|e| {
                EditorError::Export(format!("Invalid sheet name '{}': {}", sheet_name, e))
            })?;
            Self::write_table(worksheet, table)?;
        }

        xlsx.save_to_buffer()
            .map_err(|e| EditorError::Export(format!("Failed to save Excel file: {}", e)))
    }

    /// Header row at row 0, data from row 1. No index column.
    fn write_table(worksheet: &mut Worksheet, table: &Table) -> EditorResult<()> {
        for (col_idx, name) in table.columns().iter().enumerate() {
            worksheet.write_string(0, Self::excel_col(col_idx)?, name)?;
        }

        for (row_idx, row) in table.rows().iter().enumerate() {
            let excel_row = u32::try_from(row_idx + 1)
                .map_err(|_| EditorError::Export("too many rows for Excel".to_string()))?;
            for (col_idx, value) in row.iter().enumerate() {
                let col = Self::excel_col(col_idx)?;
                match value {
                    CellValue::Empty => {}
                    CellValue::Bool(b) => {
                        worksheet.write_boolean(excel_row, col, *b)?;
                    }
                    CellValue::Number(n) => {
                        worksheet.write_number(excel_row, col, *n)?;
                    }
                    CellValue::Text(s) => {
                        worksheet.write_string(excel_row, col, s)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn excel_col(idx: usize) -> EditorResult<u16> {
        u16::try_from(idx).map_err(|_| EditorError::Export("too many columns for Excel".to_string()))
    }

    /// Write one sheet as CSV with a header row and `\n` terminators
    pub fn to_csv(&self, sheet_name: &str) -> EditorResult<Vec<u8>> {
        let table = self
            .workbook
            .get(sheet_name)
            .ok_or_else(|| EditorError::Export(format!("Sheet '{}' not found", sheet_name)))?;

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer
            .write_record(table.columns())
            .map_err(|e| EditorError::Export(format!("Failed to write CSV header: {}", e)))?;
        for row in table.rows() {
            writer
                .write_record(row.iter().map(|value| value.to_string()))
                .map_err(|e| EditorError::Export(format!("Failed to write CSV row: {}", e)))?;
        }

        writer
            .into_inner()
            .map_err(|e| EditorError::Export(format!("Failed to flush CSV: {}", e)))
    }
}
