use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open trade export {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Trade export is missing the '{0}' column")]
    MissingColumn(String),

    #[error("Row {row}: cannot parse {column} value '{value}': {reason}")]
    Parse {
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },
}
