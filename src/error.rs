use std::path::PathBuf;

use thiserror::Error;

use crate::data::model::City;

/// Errors raised while loading a city's trip log.
#[derive(Error, Debug)]
pub enum LoadError {
    /// None of the supported source files exist for the city.
    #[error("no trip data for {city} in {}", dir.display())]
    DataUnavailable { city: City, dir: PathBuf },

    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A column every trip log must carry is absent.
    #[error("source is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: unparseable timestamp '{value}'")]
    InvalidTimestamp { row: usize, value: String },
}

/// Errors raised by the interactive prompts.
#[derive(Error, Debug)]
pub enum PromptError {
    /// Standard input reached end-of-file while an answer was pending.
    #[error("input closed while waiting for an answer")]
    InputClosed,

    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}
