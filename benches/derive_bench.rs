//! Derivation and export throughput over the sample catalog.
//!
//! Run with: `cargo bench`

use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mountforge::data::load_catalog;
use mountforge::export::{export_document, CharacterSheet};
use mountforge::loadout::{derive, LoadoutConfiguration, MountSelection};

fn wyvern_config() -> LoadoutConfiguration {
    let mut config = LoadoutConfiguration::for_base("white_wyvern");
    config.saddle_id = Some("wyvern_howdah".to_string());
    config
        .mount_selections
        .insert("turret".to_string(), MountSelection::weapon("harpoon_launcher", 4));
    config
        .mount_selections
        .insert("tail".to_string(), MountSelection::weapon("scythe_blades", 1));
    config.mod_ids = vec!["reinforced_plating".to_string(), "wind_vanes".to_string()];
    config
}

fn bench_derive(c: &mut Criterion) {
    let Ok(catalog) = load_catalog(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")) else {
        eprintln!("sample catalog unavailable; skipping derive benchmarks");
        return;
    };
    let config = wyvern_config();

    let mut group = c.benchmark_group("loadout");
    group.throughput(Throughput::Elements(1));

    group.bench_function("derive", |b| {
        b.iter(|| black_box(derive(&catalog, black_box(&config))))
    });

    let Ok(derivation) = derive(&catalog, &config) else {
        return;
    };
    group.bench_function("export_document", |b| {
        b.iter(|| black_box(export_document(black_box(&derivation), &catalog)))
    });

    let document = export_document(&derivation, &catalog);
    group.bench_function("character_sheet", |b| {
        b.iter(|| black_box(CharacterSheet::from_document(black_box(&document))))
    });

    group.finish();
}

criterion_group!(benches, bench_derive);
criterion_main!(benches);
