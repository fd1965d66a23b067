use crate::types::database::Database;
use polars::error::PolarsError;
use polars::prelude::DataType;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Unknown database '{0}'")]
    UnknownDatabase(String),

    #[error("Year must be a positive integer, got {0}")]
    InvalidYear(u32),

    #[error("Database '{database}' requires disambiguator '{key}'")]
    MissingDisambiguator { database: Database, key: String },

    #[error("Database '{database}' does not use disambiguator '{key}'")]
    UnexpectedDisambiguator { database: Database, key: String },

    #[error("Unrecognized cache file extension in '{0}'")]
    UnknownExtension(String),

    // Cache miss, the caller is expected to fetch and save.
    #[error("No cached file '{file_name}' in '{directory}'")]
    NotFound {
        file_name: String,
        directory: PathBuf,
    },

    #[error("'{file_name}' matched multiple files: {matches:?}")]
    Conflict {
        file_name: String,
        matches: Vec<PathBuf>,
    },

    #[error("Column '{column}' of type {dtype} cannot be written as csv")]
    UnsupportedCsvColumn { column: String, dtype: DataType },

    #[error("Failed to resolve cache directory '{0}'")]
    DirResolution(PathBuf, #[source] std::io::Error),

    #[error("Failed to create cache directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to search cache directory")]
    Glob(#[from] glob::GlobError),

    #[error("I/O error writing cache file '{0}'")]
    WriteIo(PathBuf, #[source] std::io::Error),
    #[error("Encoding error writing cache file '{0}'")]
    WritePolars(PathBuf, #[source] PolarsError),

    #[error("I/O error reading cache file '{0}'")]
    ReadIo(PathBuf, #[source] std::io::Error),
    #[error("Decoding error reading cache file '{0}'")]
    ReadPolars(PathBuf, #[source] PolarsError),
}

impl CacheError {
    /// True when the error only signals that nothing is cached under the
    /// requested name yet.
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, CacheError::NotFound { .. })
    }
}
