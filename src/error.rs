use crate::cache::error::CacheError;
use crate::remote::error::FetchError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NrelError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error("At least one year must be requested")]
    NoYearsRequested,

    #[error("Failed to read user profile '{0}'")]
    ProfileRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to (de)serialize user profile '{0}'")]
    ProfileParse(PathBuf, #[source] serde_json::Error),

    #[error("Failed to write user profile '{0}'")]
    ProfileWrite(PathBuf, #[source] std::io::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Polars error: {0}")]
    PolarsError(#[from] polars::prelude::PolarsError),
}
