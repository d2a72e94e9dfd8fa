//! Editable grid view: sheet selection, rendering and edit application

use serde::{Deserialize, Serialize};

use crate::editor::session::SessionState;
use crate::error::{EditorError, EditorResult};
use crate::types::{CellValue, Table};

/// One user edit against the selected sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GridEdit {
    SetCell {
        row: usize,
        column: String,
        value: CellValue,
    },
    AddRow,
    DeleteRow {
        row: usize,
    },
}

/// What the browser needs to draw the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridView {
    pub sheet: String,
    pub sheet_names: Vec<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    pub download_label: Option<&'static str>,
}

impl GridView {
    pub fn render(state: &SessionState, sheet: &str) -> EditorResult<Self> {
        let table = state.table(sheet)?;
        Ok(Self {
            sheet: sheet.to_string(),
            sheet_names: state.sheet_names(),
            columns: table.columns().to_vec(),
            rows: table.rows().to_vec(),
            download_label: state.source().map(|f| f.download_spec().label),
        })
    }
}

/// Pick the sheet to show.
///
/// A single sheet is selected automatically. With several sheets the
/// requested one is used, falling back to the first.
pub fn select_sheet(state: &SessionState, requested: Option<&str>) -> EditorResult<String> {
    let names = state.sheet_names();
    match (names.as_slice(), requested) {
        ([], _) => Err(EditorError::Session("no workbook loaded".to_string())),
        ([only], _) => Ok(only.clone()),
        (_, Some(name)) if names.iter().any(|n| n == name) => Ok(name.to_string()),
        (_, Some(name)) => Err(EditorError::Session(format!("sheet '{}' not found", name))),
        ([first, ..], None) => Ok(first.clone()),
    }
}

/// Produce the table that results from applying one edit
pub fn apply_edit(table: &Table, edit: &GridEdit) -> EditorResult<Table> {
    let mut updated = table.clone();
    match edit {
        GridEdit::SetCell { row, column, value } => {
            updated.set_cell(*row, column, value.clone())?;
        }
        GridEdit::AddRow => updated.push_blank_row(),
        GridEdit::DeleteRow { row } => {
            updated.remove_row(*row)?;
        }
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FileFormat;
    use crate::types::Workbook;
    use pretty_assertions::assert_eq;

    fn state_with(names: &[&str]) -> SessionState {
        let mut workbook = Workbook::new();
        for name in names {
            let mut table = Table::new(vec!["c".to_string()]);
            table.push_row(vec![CellValue::Number(1.0)]).unwrap();
            workbook.add_sheet(*name, table).unwrap();
        }
        let mut state = SessionState::new();
        state.replace(workbook, FileFormat::Xlsx);
        state
    }

    #[test]
    fn test_single_sheet_selected_automatically() {
        let state = state_with(&["Only"]);
        assert_eq!(select_sheet(&state, None).unwrap(), "Only");
        assert_eq!(select_sheet(&state, Some("whatever")).unwrap(), "Only");
    }

    #[test]
    fn test_multi_sheet_selection() {
        let state = state_with(&["S1", "S2"]);
        assert_eq!(select_sheet(&state, None).unwrap(), "S1");
        assert_eq!(select_sheet(&state, Some("S2")).unwrap(), "S2");
        assert!(select_sheet(&state, Some("S3")).is_err());
    }

    #[test]
    fn test_select_on_empty_state() {
        let state = SessionState::new();
        assert!(matches!(
            select_sheet(&state, None),
            Err(EditorError::Session(_))
        ));
    }

    #[test]
    fn test_render_includes_download_label() {
        let state = state_with(&["S1", "S2"]);
        let view = GridView::render(&state, "S2").unwrap();
        assert_eq!(view.sheet, "S2");
        assert_eq!(view.sheet_names, vec!["S1", "S2"]);
        assert_eq!(view.columns, vec!["c"]);
        assert_eq!(view.download_label, Some("Download Workbook"));
    }

    #[test]
    fn test_apply_edit_does_not_touch_input() {
        let state = state_with(&["S1"]);
        let table = state.table("S1").unwrap();
        let edit = GridEdit::SetCell {
            row: 0,
            column: "c".to_string(),
            value: CellValue::Text("new".into()),
        };
        let updated = apply_edit(table, &edit).unwrap();
        assert_eq!(updated.cell(0, "c"), Some(&CellValue::Text("new".into())));
        assert_eq!(table.cell(0, "c"), Some(&CellValue::Number(1.0)));
    }

    #[test]
    fn test_add_and_delete_rows() {
        let state = state_with(&["S1"]);
        let table = state.table("S1").unwrap();

        let grown = apply_edit(table, &GridEdit::AddRow).unwrap();
        assert_eq!(grown.row_count(), 2);

        let shrunk = apply_edit(&grown, &GridEdit::DeleteRow { row: 0 }).unwrap();
        assert_eq!(shrunk.row_count(), 1);
        assert_eq!(shrunk.rows()[0], vec![CellValue::Empty]);

        assert!(apply_edit(&shrunk, &GridEdit::DeleteRow { row: 3 }).is_err());
    }

    #[test]
    fn test_grid_edit_json_shape() {
        let edit: GridEdit =
            serde_json::from_str(r#"{"op":"set_cell","row":0,"column":"x","value":9}"#).unwrap();
        assert_eq!(
            edit,
            GridEdit::SetCell {
                row: 0,
                column: "x".to_string(),
                value: CellValue::Number(9.0)
            }
        );
        let add: GridEdit = serde_json::from_str(r#"{"op":"add_row"}"#).unwrap();
        assert_eq!(add, GridEdit::AddRow);
    }
}
