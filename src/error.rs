//! Crate-wide error type. Infeasible loadouts are not errors: they come back as a
//! [crate::optimizer::SearchResult] with no output.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutfitterError {
    #[error("unable to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown ship '{0}'")]
    UnknownShip(String),

    #[error("unknown outfit '{0}'")]
    UnknownItem(String),

    #[error("input file '{0}' does not name a ship")]
    EmptyInput(PathBuf),

    #[error("heat step must be a positive finite number, got {0}")]
    InvalidHeatStep(f64),

    #[error("memo cache was built for {expected}, search uses {actual}")]
    MemoMismatch { expected: String, actual: String },

    #[error("expansion item '{0}' is not in the catalog")]
    MissingExpansion(String),

    #[error("expansion item '{name}' must consume cargo space (cargo space delta {cargo_space})")]
    InvalidExpansion { name: String, cargo_space: i32 },
}

pub type Result<T> = std::result::Result<T, OutfitterError>;
