//! Benchmarks for pagepulse.
//!
//! Run with: cargo bench

use std::collections::VecDeque;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Map};

use pagepulse::exception::monitor::classify;
use pagepulse::exception::shape::{ErrorDetails, FaultShape};
use pagepulse::fps::low_run_mean;
use pagepulse::perf::summarize_resources;
use pagepulse::{InitiatorType, ResourceEntry};

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");

    let error = FaultShape::Error(ErrorDetails {
        name: "TypeError".to_string(),
        message: "x is not a function".to_string(),
        stack: "TypeError: x is not a function\n    at https://app.test/main.js:42:7"
            .to_string(),
        line: Some(42),
        column: Some(7),
        filename: "https://app.test/main.js".to_string(),
    });
    group.bench_function("generic_error", |b| {
        b.iter(|| black_box(classify(black_box(&error))))
    });

    let mut payload = Map::new();
    for key in ["status", "endpoint", "detail", "request_id"] {
        payload.insert(key.to_string(), json!("value"));
    }
    let plain = FaultShape::Plain(payload);
    group.bench_function("plain_payload", |b| {
        b.iter(|| black_box(classify(black_box(&plain))))
    });

    group.finish();
}

fn bench_stutter_scan(c: &mut Criterion) {
    let low: VecDeque<u32> = [10, 15, 18].into_iter().collect();
    let healthy: VecDeque<u32> = [61, 59, 60].into_iter().collect();

    let mut group = c.benchmark_group("stutter_scan");
    group.bench_function("low_window", |b| {
        b.iter(|| black_box(low_run_mean(black_box(&low), 20.0, 3)))
    });
    group.bench_function("healthy_window", |b| {
        b.iter(|| black_box(low_run_mean(black_box(&healthy), 20.0, 3)))
    });
    group.finish();
}

fn bench_resource_summary(c: &mut Criterion) {
    let entries: Vec<ResourceEntry> = (0..200)
        .map(|i| ResourceEntry {
            name: format!("https://cdn.test/asset-{i}.js"),
            initiator: match i % 3 {
                0 => InitiatorType::Script,
                1 => InitiatorType::Link,
                _ => InitiatorType::Img,
            },
            duration: if i % 17 == 0 { 6_000.0 } else { 35.0 },
            transfer_size: if i % 23 == 0 { 2_500_000 } else { 48_000 },
        })
        .collect();

    c.bench_function("summarize_200_resources", |b| {
        b.iter(|| black_box(summarize_resources(black_box(&entries))))
    });
}

criterion_group!(
    benches,
    bench_classification,
    bench_stutter_scan,
    bench_resource_summary
);
criterion_main!(benches);
