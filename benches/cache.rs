use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nrel::{dataset_file_name, CacheFile, Database, DatasetId, Disambiguators, LocalStore};
use nrel::SerializationFormat;
use polars::prelude::*;
use tempfile::TempDir;

fn atb_frame(rows: usize) -> DataFrame {
    let technology: Vec<&str> = (0..rows)
        .map(|i| if i % 2 == 0 { "LandbasedWind" } else { "UtilityPV" })
        .collect();
    let year: Vec<i64> = (0..rows).map(|i| 2022 + (i % 29) as i64).collect();
    let value: Vec<f64> = (0..rows).map(|i| i as f64 * 1.5).collect();
    df!(
        "technology" => technology,
        "core_metric_variable" => year,
        "value" => value,
    )
    .expect("Failed to build frame")
}

fn bench_file_names(c: &mut Criterion) {
    let id = DatasetId::new(Database::Wind).with_year(2012).with_extra_keys(
        Disambiguators::new()
            .with("lon", -88.2434)
            .with("lat", 40.1164)
            .with("interval", 60.0)
            .with("utc", 0.0)
            .with("leap_day", 1.0)
            .with("attributes", 4095.0),
    );
    c.bench_function("derive_file_name", |b| {
        b.iter(|| CacheFile::derive(black_box(&id), SerializationFormat::Pickled))
    });
}

fn bench_store(c: &mut Criterion) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = LocalStore::new(dir.path()).expect("Failed to create store");
    let frame = atb_frame(50_000);

    for pickled in [true, false] {
        let file = dataset_file_name("electricity", Some(2023), None, pickled)
            .expect("Failed to derive name");
        let label = file.format().to_string();
        c.bench_function(&format!("save_{label}"), |b| {
            b.iter(|| store.save(black_box(&frame), &file).expect("Failed to save"))
        });
        c.bench_function(&format!("load_{label}"), |b| {
            b.iter(|| store.load(black_box(&file)).expect("Failed to load"))
        });
    }
}

criterion_group!(benches, bench_file_names, bench_store);
criterion_main!(benches);
