//! Workbook importer - uploaded bytes (xlsx, xls, csv) → Workbook

use std::collections::HashSet;
use std::io::Cursor;

use calamine::{Data, Range, Reader, Sheets, Xls, Xlsx};
use chrono::{NaiveDateTime, Timelike};
use tracing::debug;

use crate::codec::format::{FileFormat, CSV_SHEET_NAME};
use crate::error::{EditorError, EditorResult};
use crate::types::{CellValue, Table, Workbook};

/// Parse an uploaded byte stream into a Workbook
pub fn ingest(bytes: &[u8], format: FileFormat) -> EditorResult<Workbook> {
    WorkbookImporter::new(format).import(bytes)
}

/// Parse an uploaded byte stream, resolving the format from its file name
pub fn ingest_file_name(bytes: &[u8], file_name: &str) -> EditorResult<Workbook> {
    WorkbookImporter::from_file_name(file_name)?.import(bytes)
}

/// Importer for one upload format
pub struct WorkbookImporter {
    format: FileFormat,
}

impl WorkbookImporter {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    pub fn from_file_name(file_name: &str) -> EditorResult<Self> {
        Ok(Self::new(FileFormat::from_file_name(file_name)?))
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Import the whole upload. Nothing is returned unless every sheet decodes.
    pub fn import(&self, bytes: &[u8]) -> EditorResult<Workbook> {
        let workbook = match self.format {
            FileFormat::Xlsx | FileFormat::Xls => self.import_excel(bytes)?,
            FileFormat::Csv => self.import_csv(bytes)?,
        };
        debug!(
            format = %self.format,
            sheets = workbook.len(),
            "imported workbook"
        );
        Ok(workbook)
    }

    fn import_excel(&self, bytes: &[u8]) -> EditorResult<Workbook> {
        let cursor = Cursor::new(bytes.to_vec());
        let mut sheets: Sheets<Cursor<Vec<u8>>> = match self.format {
            FileFormat::Xls => Sheets::Xls(Xls::new(cursor).map_err(|e| {
                EditorError::Ingestion(format!("Failed to open Excel file: {}", e))
            })?),
            _ => Sheets::Xlsx(Xlsx::new(cursor).map_err(|e| {
                EditorError::Ingestion(format!("Failed to open Excel file: {}", e))
            })?),
        };

        let sheet_names = sheets.sheet_names();
        if sheet_names.is_empty() {
            return Err(EditorError::Ingestion(
                "workbook contains no sheets".to_string(),
            ));
        }

        let mut workbook = Workbook::new();
        for sheet_name in sheet_names {
            let range = sheets.worksheet_range(&sheet_name).map_err(|e| {
                EditorError::Ingestion(format!("Failed to read sheet '{}': {}", sheet_name, e))
            })?;
            let table = decode_sheet(&range)?;
            workbook.add_sheet(sheet_name, table)?;
        }
        Ok(workbook)
    }

    fn import_csv(&self, bytes: &[u8]) -> EditorResult<Workbook> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(EditorError::Ingestion(
                "No columns to parse from file".to_string(),
            ));
        }

        let mut table = Table::new(normalize_headers(headers));
        for record in reader.records() {
            let record = record?;
            table.push_row(record.iter().map(parse_csv_field).collect())?;
        }

        let mut workbook = Workbook::new();
        workbook.add_sheet(CSV_SHEET_NAME, table)?;
        Ok(workbook)
    }
}

/// Decode one worksheet range, first used row as headers.
///
/// The range begins at the first used cell; leading empty columns are put
/// back so column positions (and `Unnamed: {idx}` names) count from column A.
fn decode_sheet(range: &Range<Data>) -> EditorResult<Table> {
    if range.is_empty() {
        return Ok(Table::default());
    }

    let lead = range.start().map_or(0, |(_, col)| col as usize);
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::default());
    };
    let columns = normalize_headers(
        std::iter::repeat(String::new())
            .take(lead)
            .chain(header.iter().map(|cell| excel_cell_value(cell).to_string()))
            .collect(),
    );
    let width = columns.len();

    let mut table = Table::new(columns);
    for row in rows {
        let mut values = vec![CellValue::Empty; lead];
        values.extend(row.iter().map(excel_cell_value));
        values.resize(width, CellValue::Empty);
        table.push_row(values)?;
    }
    Ok(table)
}

/// Fill blank header names and make repeated names unique (`x`, `x.1`, `x.2`)
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut columns = Vec::with_capacity(raw.len());

    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            name
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(candidate.clone());
        columns.push(candidate);
    }

    columns
}

fn excel_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => CellValue::Text(format_datetime(&datetime)),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

fn format_datetime(datetime: &NaiveDateTime) -> String {
    if datetime.time().num_seconds_from_midnight() == 0 {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Infer a CSV field's type: empty, boolean, finite number, else text
fn parse_csv_field(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Empty;
    }
    if field.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if field.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }
    match field.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(field.to_string()),
    }
}
