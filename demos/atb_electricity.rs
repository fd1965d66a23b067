use nrel::{Nrel, NrelError, NrelFrameFilterExt};
use std::env;

#[tokio::main]
async fn main() -> Result<(), NrelError> {
    configure_polars_display();
    let client = Nrel::new()?;

    // Downloads on the first run, read from the cache afterwards.
    let capex = client
        .electricity()
        .year(2023)
        .call()
        .await?
        .filter_technology(&["LandbasedWind", "UtilityPV"])
        .filter_core_metric_parameter(&["CAPEX"])
        .filter_scenario(&["Moderate"])
        .filter_core_metric_variable(2025, 2030)
        .collect()?;

    println!("{:#?}", capex);
    println!("Cache folder: {:?}", client.cache_folder());

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 20 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
