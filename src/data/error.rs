use thiserror::Error;

/// Structural problems when assembling a [`super::model::Table`].
#[derive(Debug, Error)]
pub enum TableError {
    #[error("column '{name}' has {found} values, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
}

/// Failure to turn an uploaded file into a table. No partial table is kept.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("no columns to parse from file")]
    NoColumns,
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected JSON layout: {0}")]
    JsonShape(String),
    #[error("invalid parquet file: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("invalid arrow data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure to encode a table for download.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("spreadsheet encoding failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
