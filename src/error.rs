use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Unsupported file format: {0} (expected xlsx, xls or csv)")]
    UnsupportedFormat(String),

    #[error("Failed to read workbook: {0}")]
    Ingestion(String),

    #[error("Failed to export workbook: {0}")]
    Export(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Invalid edit: {0}")]
    Edit(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for EditorError {
    fn from(err: csv::Error) -> Self {
        EditorError::Ingestion(format!("CSV parse error: {}", err))
    }
}

impl From<rust_xlsxwriter::XlsxError> for EditorError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        EditorError::Export(err.to_string())
    }
}
