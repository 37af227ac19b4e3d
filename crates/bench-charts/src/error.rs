//! Errors produced while loading logs and writing charts.

use std::path::PathBuf;

use thiserror::Error;

/// Error type of the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A required input directory or file does not exist.
    #[error("input not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// The input file could not be read as CSV.
    #[error("failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The YAML config file is malformed.
    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A column needed for grouping is absent from the table.
    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    /// The drawing backend failed.
    #[error("failed to render {}: {message}", path.display())]
    Render { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
