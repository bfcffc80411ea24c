use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("bad timestamp {value:?} in record {record}")]
    Timestamp { value: String, record: usize },

    #[error("bad coordinate on line {line} of {path}")]
    Boundary { path: PathBuf, line: usize },
}
