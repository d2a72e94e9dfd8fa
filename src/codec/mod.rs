//! Upload ingestion and download export
//!
//! - Import: xlsx / xls / csv bytes → Workbook
//! - Export: Workbook → xlsx or csv bytes with download metadata

mod exporter;
mod format;
mod importer;

pub use exporter::{export_workbook, Download, WorkbookExporter};
pub use format::{DownloadSpec, FileFormat, CSV_MIME, CSV_SHEET_NAME, XLSX_MIME};
pub use importer::{ingest, ingest_file_name, WorkbookImporter};
