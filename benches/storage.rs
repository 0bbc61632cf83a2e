// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Benchmarks for store operations.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use strontium_kv::storage::{KeyValue, KeyValueReader, StorageError, Store};
use tempfile::TempDir;

fn create_test_store() -> (Store, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = Store::open_default(dir.path()).unwrap();
    (store, dir)
}

fn populate(store: &mut Store, n: usize) {
    let mut batch = store.begin_write_batch();
    for i in 0..n {
        batch
            .set(format!("key{:05}", i).as_bytes(), &[0u8; 100])
            .unwrap();
    }
    batch.commit().unwrap();
}

fn bench_point_read(c: &mut Criterion) {
    let (mut store, _dir) = create_test_store();
    populate(&mut store, 10000);

    let mut group = c.benchmark_group("storage");
    group.throughput(Throughput::Elements(1));

    group.bench_function("point_read", |b| {
        b.iter_batched(
            || {
                let i = rand::random::<u32>() % 10000;
                format!("key{:05}", i)
            },
            |key| store.get(key.as_bytes()).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("point_read_snapshot", |b| {
        let reader = store.snapshot();
        b.iter_batched(
            || {
                let i = rand::random::<u32>() % 10000;
                format!("key{:05}", i)
            },
            |key| reader.get(key.as_bytes()).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_point_write(c: &mut Criterion) {
    let (mut store, _dir) = create_test_store();

    let mut group = c.benchmark_group("storage");
    group.throughput(Throughput::Elements(1));

    let mut counter = 0u64;

    group.bench_function("point_write", |b| {
        b.iter(|| {
            counter += 1;
            store
                .set(format!("key{}", counter).as_bytes(), &[0u8; 100])
                .unwrap()
        })
    });

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let (mut store, _dir) = create_test_store();
    populate(&mut store, 10000);

    let mut group = c.benchmark_group("storage");

    group.bench_function("count_prefix_100", |b| {
        b.iter(|| store.count(b"key001").unwrap())
    });

    group.bench_function("range_1000", |b| {
        b.iter(|| {
            let mut visited = 0usize;
            store
                .for_each_in_range(b"key01000", b"key02000", |_, _| {
                    visited += 1;
                    Ok::<_, StorageError>(())
                })
                .unwrap();
            visited
        })
    });

    group.finish();
}

fn bench_batch_write(c: &mut Criterion) {
    let (mut store, _dir) = create_test_store();

    let mut group = c.benchmark_group("storage");
    group.throughput(Throughput::Elements(100));

    let mut counter = 0u64;

    group.bench_function("batch_write_100", |b| {
        b.iter(|| {
            let base = counter;
            counter += 100;

            let mut batch = store.begin_write_batch();
            for i in 0..100 {
                batch
                    .set(format!("key{}", base + i).as_bytes(), &[0u8; 100])
                    .unwrap();
            }
            batch.commit().unwrap()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_point_read,
    bench_point_write,
    bench_scan,
    bench_batch_write,
);
criterion_main!(benches);
