use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{EditorError, EditorResult};

//==============================================================================
// Cell values
//==============================================================================

/// A single scalar cell value
///
/// Serialized untagged so the browser grid sees plain JSON scalars
/// (`null`, `true`, `1.5`, `"text"`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "Empty",
            CellValue::Bool(_) => "Boolean",
            CellValue::Number(_) => "Number",
            CellValue::Text(_) => "Text",
        }
    }
}

/// Text form used for CSV fields and header names.
///
/// Numbers use the shortest representation that round-trips (`9`, `2.5`),
/// booleans are capitalized the way spreadsheet tools write them.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(true) => f.write_str("True"),
            CellValue::Bool(false) => f.write_str("False"),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

//==============================================================================
// Tables
//==============================================================================

/// A rectangular table: named columns and rows of equal width
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Append a row; its width must match the column count
    pub fn push_row(&mut self, row: Vec<CellValue>) -> EditorResult<()> {
        if row.len() != self.columns.len() {
            return Err(EditorError::Edit(format!(
                "row has {} values but the table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// Replace one cell value
    pub fn set_cell(&mut self, row: usize, column: &str, value: CellValue) -> EditorResult<()> {
        let col = self
            .column_index(column)
            .ok_or_else(|| EditorError::Edit(format!("unknown column '{}'", column)))?;
        let row_count = self.rows.len();
        let target = self.rows.get_mut(row).ok_or_else(|| {
            EditorError::Edit(format!("row {} out of range ({} rows)", row, row_count))
        })?;
        target[col] = value;
        Ok(())
    }

    /// Append a row of empty cells
    pub fn push_blank_row(&mut self) {
        self.rows.push(vec![CellValue::Empty; self.columns.len()]);
    }

    pub fn remove_row(&mut self, row: usize) -> EditorResult<Vec<CellValue>> {
        if row >= self.rows.len() {
            return Err(EditorError::Edit(format!(
                "row {} out of range ({} rows)",
                row,
                self.rows.len()
            )));
        }
        Ok(self.rows.remove(row))
    }

    /// View one row as a mapping from column name to value
    pub fn row_map(&self, row: usize) -> Option<HashMap<&str, &CellValue>> {
        let values = self.rows.get(row)?;
        Some(
            self.columns
                .iter()
                .map(String::as_str)
                .zip(values.iter())
                .collect(),
        )
    }
}

//==============================================================================
// Workbooks
//==============================================================================

/// Ordered set of named tables. Sheet order is display and export order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    sheets: Vec<(String, Table)>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet at the end. Duplicate names are rejected.
    pub fn add_sheet(&mut self, name: impl Into<String>, table: Table) -> EditorResult<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(EditorError::Ingestion(format!(
                "duplicate sheet name '{}'",
                name
            )));
        }
        self.sheets.push((name, table));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sheets.iter().any(|(n, _)| n == name)
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.sheets.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.sheets
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.sheets.iter().map(|(n, t)| (n.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_table() -> Table {
        let mut table = Table::new(vec!["x".to_string(), "y".to_string()]);
        table
            .push_row(vec![CellValue::Number(1.0), CellValue::Number(2.0)])
            .unwrap();
        table
            .push_row(vec![CellValue::Number(3.0), CellValue::Number(4.0)])
            .unwrap();
        table
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Number(9.0).to_string(), "9");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Bool(true).to_string(), "True");
        assert_eq!(CellValue::Text("abc".into()).to_string(), "abc");
    }

    #[test]
    fn test_cell_value_json_is_untagged() {
        let values = vec![
            CellValue::Empty,
            CellValue::Bool(false),
            CellValue::Number(1.5),
            CellValue::Text("hi".into()),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,false,1.5,"hi"]"#);

        let back: Vec<CellValue> = serde_json::from_str(r#"[null,true,9,"x"]"#).unwrap();
        assert_eq!(
            back,
            vec![
                CellValue::Empty,
                CellValue::Bool(true),
                CellValue::Number(9.0),
                CellValue::Text("x".into())
            ]
        );
    }

    #[test]
    fn test_push_row_rejects_wrong_width() {
        let mut table = Table::new(vec!["a".to_string()]);
        let result = table.push_row(vec![CellValue::Empty, CellValue::Empty]);
        assert!(matches!(result, Err(EditorError::Edit(_))));
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_set_cell_and_row_map() {
        let mut table = sample_table();
        table.set_cell(0, "x", CellValue::Number(9.0)).unwrap();

        let row0 = table.row_map(0).unwrap();
        assert_eq!(row0["x"], &CellValue::Number(9.0));
        assert_eq!(row0["y"], &CellValue::Number(2.0));
        assert_eq!(table.cell(1, "x"), Some(&CellValue::Number(3.0)));
    }

    #[test]
    fn test_set_cell_errors() {
        let mut table = sample_table();
        assert!(table.set_cell(5, "x", CellValue::Empty).is_err());
        assert!(table.set_cell(0, "missing", CellValue::Empty).is_err());
    }

    #[test]
    fn test_blank_row_and_remove() {
        let mut table = sample_table();
        table.push_blank_row();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows()[2], vec![CellValue::Empty, CellValue::Empty]);

        let removed = table.remove_row(0).unwrap();
        assert_eq!(removed, vec![CellValue::Number(1.0), CellValue::Number(2.0)]);
        assert_eq!(table.row_count(), 2);
        assert!(table.remove_row(10).is_err());
    }

    #[test]
    fn test_workbook_preserves_order_and_rejects_duplicates() {
        let mut workbook = Workbook::new();
        workbook.add_sheet("S2", Table::default()).unwrap();
        workbook.add_sheet("S1", Table::default()).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["S2", "S1"]);

        let result = workbook.add_sheet("S1", Table::default());
        assert!(matches!(result, Err(EditorError::Ingestion(_))));
        assert_eq!(workbook.len(), 2);
    }
}
