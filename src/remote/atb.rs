//! Annual Technology Baseline (ATB) tables.

use crate::remote::downloader::Downloader;
use crate::remote::error::FetchError;
use crate::remote::parse::{csv_to_dataframe, drop_index_artifacts, xlsx_to_dataframe};
use polars::prelude::*;
use tokio::task;

const TRANSPORTATION_SHEET: &str = "Joined Data for Levelized Calc";

pub fn electricity_url(year: u32) -> String {
    format!("https://oedi-data-lake.s3.amazonaws.com/ATB/electricity/csv/{year}/ATBe.csv")
}

pub fn transportation_url(year: u32) -> String {
    format!(
        "https://atb-archive.nrel.gov/transportation/{year}/files/{year}_ATB_Data_VehFuels_Download.xlsx"
    )
}

/// Downloads the ATB electricity table for `year`.
pub async fn fetch_electricity(downloader: &Downloader, year: u32) -> Result<DataFrame, FetchError> {
    let url = electricity_url(year);
    let bytes = downloader.get_bytes(&url).await?;
    task::spawn_blocking(move || parse_electricity(bytes, &url)).await?
}

/// Downloads the ATB transportation table for `year`.
pub async fn fetch_transportation(
    downloader: &Downloader,
    year: u32,
) -> Result<DataFrame, FetchError> {
    let url = transportation_url(year);
    let bytes = downloader.get_bytes(&url).await?;
    task::spawn_blocking(move || xlsx_to_dataframe(bytes, &url, TRANSPORTATION_SHEET, 0)).await?
}

fn parse_electricity(bytes: Vec<u8>, url: &str) -> Result<DataFrame, FetchError> {
    let frame = csv_to_dataframe(bytes, url, 0)?;
    drop_index_artifacts(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        assert_eq!(
            electricity_url(2023),
            "https://oedi-data-lake.s3.amazonaws.com/ATB/electricity/csv/2023/ATBe.csv"
        );
        assert_eq!(
            transportation_url(2020),
            "https://atb-archive.nrel.gov/transportation/2020/files/2020_ATB_Data_VehFuels_Download.xlsx"
        );
    }

    #[test]
    fn test_parse_electricity_drops_exported_index() -> Result<(), FetchError> {
        let bytes = b",atb_year,core_metric_parameter,technology,value\n\
            0,2023,CAPEX,LandbasedWind,1500.5\n\
            1,2023,OCC,UtilityPV,1100.0\n"
            .to_vec();
        let frame = parse_electricity(bytes, "test://atbe")?;
        assert_eq!(
            frame.get_column_names(),
            ["atb_year", "core_metric_parameter", "technology", "value"]
        );
        assert_eq!(frame.height(), 2);
        Ok(())
    }
}
