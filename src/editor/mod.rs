//! Editor session: explicit event dispatch over one SessionState
//!
//! Every UI action is an [`EditorEvent`] handled to completion by
//! [`Editor::handle`] before the next one starts.

pub mod grid;
pub mod session;
mod store;

pub use grid::{apply_edit, select_sheet, GridEdit, GridView};
pub use session::SessionState;
pub use store::{SessionStore, DEFAULT_IDLE_TIMEOUT};

use tracing::{info, warn};

use crate::codec::{ingest, Download, FileFormat};
use crate::error::{EditorError, EditorResult};

/// A file received from the browser but not yet loaded
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// One user action
#[derive(Debug, Clone)]
pub enum EditorEvent {
    /// Stage a file. Session state is not touched.
    Upload { file_name: String, bytes: Vec<u8> },
    /// "Load Workbook": ingest the staged file and replace session state
    Load,
    /// Show a sheet (or the default one)
    View { sheet: Option<String> },
    /// Apply an edit to a sheet and write it back
    Edit {
        sheet: Option<String>,
        edit: GridEdit,
    },
    /// Serialize the session for download
    Download,
}

/// Result of handling one event
#[derive(Debug, Clone)]
pub enum EditorOutcome {
    Uploaded { file_name: String, size: usize },
    Loaded { format: FileFormat, sheet_names: Vec<String> },
    Grid(GridView),
    Download(Download),
}

/// One user's editing session
#[derive(Debug, Default)]
pub struct Editor {
    state: SessionState,
    pending: Option<PendingUpload>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PendingUpload> {
        self.pending.as_ref()
    }

    pub fn handle(&mut self, event: EditorEvent) -> EditorResult<EditorOutcome> {
        let result = match event {
            EditorEvent::Upload { file_name, bytes } => Ok(self.upload(file_name, bytes)),
            EditorEvent::Load => self.load(),
            EditorEvent::View { sheet } => self.view(sheet.as_deref()).map(EditorOutcome::Grid),
            EditorEvent::Edit { sheet, edit } => {
                self.edit(sheet.as_deref(), &edit).map(EditorOutcome::Grid)
            }
            EditorEvent::Download => self.state.export().map(EditorOutcome::Download),
        };
        if let Err(e) = &result {
            warn!("{}", e);
        }
        result
    }

    fn upload(&mut self, file_name: String, bytes: Vec<u8>) -> EditorOutcome {
        let size = bytes.len();
        info!(file_name = %file_name, size, "file staged");
        self.pending = Some(PendingUpload {
            file_name: file_name.clone(),
            bytes,
        });
        EditorOutcome::Uploaded { file_name, size }
    }

    /// Ingest the staged upload. State changes only if ingestion succeeds.
    fn load(&mut self) -> EditorResult<EditorOutcome> {
        let pending = self
            .pending
            .as_ref()
            .ok_or_else(|| EditorError::Session("no file uploaded".to_string()))?;

        let format = FileFormat::from_file_name(&pending.file_name)?;
        let workbook = ingest(&pending.bytes, format)?;
        let sheet_names = workbook.sheet_names();

        info!(
            file_name = %pending.file_name,
            sheets = sheet_names.len(),
            "Workbook loaded successfully"
        );
        self.state.replace(workbook, format);
        Ok(EditorOutcome::Loaded {
            format,
            sheet_names,
        })
    }

    fn view(&self, requested: Option<&str>) -> EditorResult<GridView> {
        let sheet = select_sheet(&self.state, requested)?;
        GridView::render(&self.state, &sheet)
    }

    fn edit(&mut self, requested: Option<&str>, edit: &GridEdit) -> EditorResult<GridView> {
        let sheet = select_sheet(&self.state, requested)?;
        let updated = apply_edit(self.state.table(&sheet)?, edit)?;
        self.state.put_table(&sheet, updated)?;
        GridView::render(&self.state, &sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn upload(editor: &mut Editor, name: &str, bytes: &[u8]) {
        editor
            .handle(EditorEvent::Upload {
                file_name: name.to_string(),
                bytes: bytes.to_vec(),
            })
            .unwrap();
    }

    #[test]
    fn test_upload_alone_does_not_load() {
        let mut editor = Editor::new();
        upload(&mut editor, "a.csv", b"x,y\n1,2\n");
        assert!(editor.pending().is_some());
        assert!(!editor.state().is_loaded());
    }

    #[test]
    fn test_load_without_upload() {
        let mut editor = Editor::new();
        let result = editor.handle(EditorEvent::Load);
        assert!(matches!(result, Err(EditorError::Session(_))));
    }

    #[test]
    fn test_load_then_edit_then_download() {
        let mut editor = Editor::new();
        upload(&mut editor, "a.csv", b"x,y\n1,2\n3,4\n");
        editor.handle(EditorEvent::Load).unwrap();

        let outcome = editor
            .handle(EditorEvent::Edit {
                sheet: None,
                edit: GridEdit::SetCell {
                    row: 0,
                    column: "x".to_string(),
                    value: CellValue::Number(9.0),
                },
            })
            .unwrap();
        match outcome {
            EditorOutcome::Grid(view) => assert_eq!(view.rows[0][0], CellValue::Number(9.0)),
            other => panic!("expected grid, got {:?}", other),
        }

        match editor.handle(EditorEvent::Download).unwrap() {
            EditorOutcome::Download(download) => {
                assert_eq!(download.bytes, b"x,y\n9,2\n3,4\n".to_vec());
                assert_eq!(download.file_name, "updated_data.csv");
            }
            other => panic!("expected download, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_load_keeps_previous_workbook() {
        let mut editor = Editor::new();
        upload(&mut editor, "a.csv", b"x,y\n1,2\n");
        editor.handle(EditorEvent::Load).unwrap();

        upload(&mut editor, "bad.csv", b"x,y\n1,2\n3\n");
        assert!(editor.handle(EditorEvent::Load).is_err());

        let table = editor.state().table("Sheet1").unwrap();
        assert_eq!(table.cell(0, "x"), Some(&CellValue::Number(1.0)));
        assert_eq!(editor.state().source(), Some(FileFormat::Csv));
    }
}
