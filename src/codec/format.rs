//! File formats accepted on upload and the matching download metadata

use std::fmt;
use std::path::Path;

use crate::error::{EditorError, EditorResult};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV_MIME: &str = "text/csv";

/// Name given to the single table of a CSV-origin workbook
pub const CSV_SHEET_NAME: &str = "Sheet1";

/// Container format of an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Xlsx,
    Xls,
    Csv,
}

/// How a download is presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSpec {
    pub label: &'static str,
    pub file_name: &'static str,
    pub mime: &'static str,
}

impl FileFormat {
    /// Parse a bare extension (case-insensitive, leading dot allowed)
    pub fn from_extension(ext: &str) -> EditorResult<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "xlsx" => Ok(FileFormat::Xlsx),
            "xls" => Ok(FileFormat::Xls),
            "csv" => Ok(FileFormat::Csv),
            other => Err(EditorError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Resolve the format from the extension of a file name
    pub fn from_file_name(name: &str) -> EditorResult<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| EditorError::UnsupportedFormat(format!("'{}' has no extension", name)))?;
        Self::from_extension(ext)
    }

    pub fn is_excel(&self) -> bool {
        matches!(self, FileFormat::Xlsx | FileFormat::Xls)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
            FileFormat::Csv => "csv",
        }
    }

    /// Download metadata. Excel sources are always written back as xlsx.
    pub fn download_spec(&self) -> DownloadSpec {
        if self.is_excel() {
            DownloadSpec {
                label: "Download Workbook",
                file_name: "updated_workbook.xlsx",
                mime: XLSX_MIME,
            }
        } else {
            DownloadSpec {
                label: "Download Updated CSV",
                file_name: "updated_data.csv",
                mime: CSV_MIME,
            }
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
