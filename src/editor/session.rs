//! Per-session workbook state

use crate::codec::{export_workbook, Download, FileFormat};
use crate::error::{EditorError, EditorResult};
use crate::types::{Table, Workbook};

/// The workbook loaded in one user session and the format it came from.
///
/// Sheet names are derived from the workbook itself, so they always match
/// its keys in order.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    workbook: Workbook,
    source: Option<FileFormat>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything at once (used by a successful load)
    pub fn replace(&mut self, workbook: Workbook, source: FileFormat) {
        self.workbook = workbook;
        self.source = Some(source);
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    pub fn source(&self) -> Option<FileFormat> {
        self.source
    }

    pub fn is_loaded(&self) -> bool {
        !self.workbook.is_empty()
    }

    pub fn table(&self, sheet: &str) -> EditorResult<&Table> {
        self.workbook.get(sheet).ok_or_else(|| unknown_sheet(sheet))
    }

    /// Write back one table. Other sheets are untouched.
    pub fn put_table(&mut self, sheet: &str, table: Table) -> EditorResult<()> {
        let slot = self
            .workbook
            .get_mut(sheet)
            .ok_or_else(|| unknown_sheet(sheet))?;
        *slot = table;
        Ok(())
    }

    /// Serialize the current workbook in its source format
    pub fn export(&self) -> EditorResult<Download> {
        match self.source {
            Some(format) if self.is_loaded() => export_workbook(&self.workbook, format),
            _ => Err(EditorError::Session("no workbook loaded".to_string())),
        }
    }
}

fn unknown_sheet(sheet: &str) -> EditorError {
    EditorError::Session(format!("sheet '{}' not found", sheet))
}
