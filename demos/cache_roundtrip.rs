use nrel::{dataset_file_name, CacheError, LocalStore};
use polars::prelude::*;
use std::env;

fn main() -> Result<(), CacheError> {
    let directory = env::temp_dir().join("nrel_cache_roundtrip");
    let store = LocalStore::new(&directory)?;

    let technologies = df!(
        "tech" => ["nuclear", "solar", "wind", "naturalgas"],
        "variable_cost" => [20i64, 0, 0, 180],
        "capacity_factor" => [0.93f64, 0.24, 0.38, 0.57],
    )
    .map_err(|e| CacheError::WritePolars(directory.clone(), e))?;

    for pickled in [true, false] {
        let file = dataset_file_name("electricity", Some(2023), None, pickled)?;
        match store.load(&file) {
            Ok(frame) => println!("Cache hit for {}:\n{}", file, frame),
            Err(e) if e.is_cache_miss() => {
                let path = store.save(&technologies, &file)?;
                println!("Cache miss for {}, saved to {:?}", file, path);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
