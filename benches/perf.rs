use std::path::PathBuf;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use wc22_dashboard::bindings::Dashboard;
use wc22_dashboard::chart::Theme;
use wc22_dashboard::dataset::{Dataset, load_dataset};
use wc22_dashboard::derive::{Quirks, derive_possession_chart};

fn fixture() -> Dataset {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("matches.csv");
    load_dataset(&path).expect("fixture should load")
}

fn bench_dataset_load(c: &mut Criterion) {
    let raw = std::fs::read_to_string(
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/matches.csv"),
    )
    .expect("fixture should be readable");
    c.bench_function("dataset_from_reader", |b| {
        b.iter(|| {
            let data = Dataset::from_reader(black_box(raw.as_bytes())).unwrap();
            black_box(data.len());
        })
    });
}

fn bench_possession_deriver(c: &mut Criterion) {
    let data = fixture();
    let theme = Theme::default();
    c.bench_function("derive_possession_chart", |b| {
        b.iter(|| {
            let spec = derive_possession_chart(&data, black_box(0), &theme).unwrap();
            black_box(spec.total());
        })
    });
}

fn bench_selection_cycle(c: &mut Criterion) {
    let data = Arc::new(fixture());
    let rows = data.len() as i64;
    let mut dash = Dashboard::with_defaults(data, Quirks::default()).unwrap();
    let mut next = 0i64;
    c.bench_function("dashboard_select_cycle", |b| {
        b.iter(|| {
            next = (next + 1) % rows;
            let snap = dash.select(black_box(next)).unwrap();
            black_box(snap.generation);
        })
    });
}

criterion_group!(
    benches,
    bench_dataset_load,
    bench_possession_deriver,
    bench_selection_cycle
);
criterion_main!(benches);
