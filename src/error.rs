use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisitError {
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Data directory already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Please fill in the required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Store file {path} is missing column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("Invalid date '{0}'. Use YYYY-MM-DD or DD/MM/YYYY")]
    InvalidDate(String),

    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VisitError>;
