//! Benchmarks de lecture des catalogues de pylônes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use coverage_map::dataset::parse_towers;

/// Catalogue GeoJSON synthétique (3 cellules par pylône)
fn synthetic_catalog(count: usize) -> String {
    let features: Vec<String> = (0..count)
        .map(|i| {
            let x = 525000.0 + (i % 100) as f64 * 500.0;
            let y = 3940000.0 + (i / 100) as f64 * 500.0;
            format!(
                r#"{{"type":"Feature","geometry":{{"type":"Point","coordinates":[{},{}]}},"properties":{{"tower_id":"T{}","cells":[{{"azimuth":0,"coverage_angle":65,"coverage_length":1500,"network_type":"4G"}},{{"azimuth":120,"coverage_angle":65,"coverage_length":"1500","network_type":"3G"}},{{"azimuth":240,"coverage_angle":65,"coverage_length":900,"network_type":"2G"}}]}}}}"#,
                x, y, i
            )
        })
        .collect();

    format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    )
}

fn bench_parse_towers(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_towers");

    for count in [100, 1000] {
        let catalog = synthetic_catalog(count);
        group.throughput(Throughput::Bytes(catalog.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &catalog, |b, catalog| {
            b.iter(|| parse_towers(black_box(catalog)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_towers);
criterion_main!(benches);
