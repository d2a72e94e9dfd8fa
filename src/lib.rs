//! Workbook Editor - edit Excel and CSV workbooks in the browser
//!
//! A user uploads a spreadsheet, edits its sheets in a grid and downloads
//! the result in the format it came in.
//!
//! # Features
//!
//! - Ingestion of `.xlsx`, `.xls` and `.csv` uploads into named tables
//! - Per-session workbook state with atomic replace on load
//! - Cell edits, row insertion and row deletion on one sheet at a time
//! - Export back to `.xlsx` (all sheets) or `.csv` (`Sheet1`)
//!
//! # Example
//!
//! ```
//! use workbook_editor::editor::{Editor, EditorEvent, EditorOutcome, GridEdit};
//! use workbook_editor::types::CellValue;
//!
//! let mut editor = Editor::new();
//! editor.handle(EditorEvent::Upload {
//!     file_name: "a.csv".to_string(),
//!     bytes: b"x,y\n1,2\n3,4\n".to_vec(),
//! })?;
//! editor.handle(EditorEvent::Load)?;
//! editor.handle(EditorEvent::Edit {
//!     sheet: None,
//!     edit: GridEdit::SetCell { row: 0, column: "x".to_string(), value: CellValue::Number(9.0) },
//! })?;
//!
//! if let EditorOutcome::Download(download) = editor.handle(EditorEvent::Download)? {
//!     assert_eq!(download.bytes, b"x,y\n9,2\n3,4\n");
//! }
//! # Ok::<(), workbook_editor::error::EditorError>(())
//! ```

pub mod api;
pub mod cli;
pub mod codec;
pub mod editor;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{EditorError, EditorResult};
pub use types::{CellValue, Table, Workbook};
