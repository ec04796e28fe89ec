//! Cache benchmarks
//!
//! Covers exact-key hits and misses, key derivation, similarity scans and
//! batch eviction under sustained overflow.
//!
//! Run with: `cargo bench --bench cache_bench -p predcache-common --features
//! runtime`

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use predcache_common::cache::{exact_key, CacheConfig, CacheStore, EvictionPolicy, FeatureVector};
use serde_json::json;

type JsonCache = CacheStore<Arc<serde_json::Value>>;

fn feature_vector(seed: u64, dims: usize) -> FeatureVector {
    let values = (0..dims).map(|d| ((seed * 31 + d as u64 * 17) % 1000) as f64 / 1000.0).collect();
    FeatureVector::clamped(values).expect("bench vectors are finite and non-empty")
}

// ============================================================================
// Exact-key Benchmarks
// ============================================================================

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_get_hit");

    for size in [100, 1000, 10_000] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("exact", size), &size, |b, &size| {
            let cache: CacheStore<u64> =
                CacheStore::new(CacheConfig::bounded(Duration::from_secs(3600), size)).unwrap();
            for i in 0..size as u64 {
                cache.set(format!("k{}", i), i);
            }
            let mut counter = 0u64;
            b.iter(|| {
                let key = format!("k{}", counter % size as u64);
                let _ = black_box(cache.get(black_box(&key)));
                counter = counter.wrapping_add(1);
            });
        });
    }

    group.finish();
}

fn bench_get_miss(c: &mut Criterion) {
    let cache: CacheStore<u64> =
        CacheStore::new(CacheConfig::ttl(Duration::from_secs(3600))).unwrap();
    for i in 0..1000u64 {
        cache.set(format!("k{}", i), i);
    }

    c.bench_function("cache_get_miss", |b| {
        let mut counter = 0u64;
        b.iter(|| {
            let key = format!("absent{}", counter);
            let _ = black_box(cache.get(black_box(&key)));
            counter = counter.wrapping_add(1);
        });
    });
}

fn bench_exact_key(c: &mut Criterion) {
    let request = json!({
        "method": "GET",
        "path": "/api/matches",
        "query": {"league": "EPL", "season": 2024, "round": 12},
    });

    c.bench_function("exact_key_derivation", |b| {
        b.iter(|| black_box(exact_key("response", black_box(&request)).unwrap()));
    });
}

fn bench_response_cache_roundtrip(c: &mut Criterion) {
    let cache: JsonCache = CacheStore::new(CacheConfig::ttl(Duration::from_secs(300))).unwrap();

    c.bench_function("response_cache_get_or_insert", |b| {
        let mut counter = 0u64;
        b.iter(|| {
            let key = exact_key("response", &json!({"path": "/odds", "id": counter % 64})).unwrap();
            let value = cache.get_or_insert_with(&key, || Arc::new(json!({"odds": [1.5, 3.2, 4.0]})));
            black_box(value);
            counter = counter.wrapping_add(1);
        });
    });
}

// ============================================================================
// Similarity Benchmarks
// ============================================================================

fn bench_similarity_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity_scan");

    for size in [100, 500, 1000] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("dims_7", size), &size, |b, &size| {
            let cache: CacheStore<u64> = CacheStore::new(CacheConfig::similarity(
                Duration::from_secs(3600),
                size,
                0.95,
            ))
            .unwrap();
            for i in 0..size as u64 {
                cache.insert_similar(feature_vector(i, 7), i);
            }
            let mut counter = 0u64;
            b.iter(|| {
                let query = feature_vector(counter % size as u64, 7);
                let _ = black_box(cache.get_similar(black_box(&query)));
                counter = counter.wrapping_add(1);
            });
        });
    }

    group.finish();
}

// ============================================================================
// Eviction Benchmarks
// ============================================================================

fn bench_overflow_eviction(c: &mut Criterion) {
    let mut group = c.benchmark_group("overflow_eviction");

    for policy in [EvictionPolicy::LeastHitCount, EvictionPolicy::Fifo] {
        group.bench_function(format!("{:?}", policy), |b| {
            let config = CacheConfig::builder()
                .ttl(Duration::from_secs(3600))
                .max_entries(1000)
                .eviction_policy(policy)
                .build();
            let cache: CacheStore<u64> = CacheStore::new(config).unwrap();
            let mut counter = 0u64;
            b.iter(|| {
                cache.set(format!("k{}", counter), black_box(counter));
                counter = counter.wrapping_add(1);
            });
        });
    }

    group.finish();
}

fn bench_evict_expired(c: &mut Criterion) {
    c.bench_function("evict_expired_nothing_stale", |b| {
        let cache: CacheStore<u64> =
            CacheStore::new(CacheConfig::ttl(Duration::from_secs(3600))).unwrap();
        for i in 0..1000u64 {
            cache.set(format!("k{}", i), i);
        }
        b.iter(|| black_box(cache.evict_expired()));
    });
}

criterion_group!(
    benches,
    bench_get_hit,
    bench_get_miss,
    bench_exact_key,
    bench_response_cache_roundtrip,
    bench_similarity_scan,
    bench_overflow_eviction,
    bench_evict_expired
);
criterion_main!(benches);
