//! State-level renewable energy technical potential.

use crate::remote::downloader::Downloader;
use crate::remote::error::FetchError;
use crate::remote::parse::{label_column_first, xlsx_to_dataframe};
use polars::prelude::*;
use tokio::task;

pub const DEFAULT_RE_POTENTIAL_URL: &str =
    "https://www.nrel.gov/gis/assets/docs/us-re-technical-potential.xlsx";

const SHEET: &str = "Data";
const LABEL_COLUMN: &str = "State";

/// Downloads the technical potential workbook, keyed by state.
pub async fn fetch_re_potential(downloader: &Downloader, url: &str) -> Result<DataFrame, FetchError> {
    let bytes = downloader.get_bytes(url).await?;
    let url = url.to_string();
    task::spawn_blocking(move || {
        let frame = xlsx_to_dataframe(bytes, &url, SHEET, 1)?;
        label_column_first(frame, LABEL_COLUMN, &url)
    })
    .await?
}
