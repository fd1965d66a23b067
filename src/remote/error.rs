use crate::remote::resource::ResourceKind;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Data download failed")]
    DownloadIo(#[from] std::io::Error),

    #[error("Parsing error processing CSV data from {url}")]
    CsvRead {
        url: String,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to open workbook downloaded from {url}")]
    Workbook {
        url: String,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("Sheet '{sheet}' from {url} has no header row")]
    EmptySheet { url: String, sheet: String },

    #[error("Missing required column '{column}' in data from {url}")]
    MissingColumn { url: String, column: String },

    #[error("Invalid {kind} time stamp in data from {url}: {message}")]
    InvalidTimestamp {
        kind: ResourceKind,
        url: String,
        message: String,
    },

    #[error("Interval of {interval} minutes is not available for {kind} data (expected one of {allowed:?})")]
    InvalidInterval {
        kind: ResourceKind,
        interval: u32,
        allowed: &'static [u32],
    },

    #[error("Could not build request URL from '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Attribute '{attribute}' is not available for {kind} data")]
    UnknownAttribute {
        kind: ResourceKind,
        attribute: String,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
