//! Performance benchmarks for cart-sync-engine

use cart_sync_engine::{
    plan, CartCall, ChangeDetector, LineItem, LocalCart, RemoteCart, RemoteCartEnvelope,
    Watermark,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

fn items(n: u64) -> Vec<LineItem> {
    (0..n)
        .map(|i| LineItem::new(i, 1).with_property("note", format!("line {i}")))
        .collect()
}

fn bench_detector(c: &mut Criterion) {
    let mut group = c.benchmark_group("detector");
    let detector = ChangeDetector::for_storefront("https://shop.example.com");

    let calls = [
        ("relative_add", CartCall::post("/cart/add.js")),
        ("locale_change", CartCall::post("/fr-ca/cart/change.js?line=1")),
        ("remote_sync", CartCall::post("https://sync.example.net/api/cart")),
        ("cart_read", CartCall::new("GET", "/cart.js")),
    ];

    for (name, call) in &calls {
        group.bench_function(*name, |b| {
            b.iter(|| detector.is_cart_mutation(black_box(call)))
        });
    }

    group.finish();
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");

    for size in [1u64, 10, 100, 1000] {
        let local = LocalCart::new(items(size));
        let remote = RemoteCart::new(items(size), "2024-01-02");
        let applied = Watermark::from("2024-01-01");

        group.bench_with_input(BenchmarkId::new("replace", size), &size, |b, _| {
            b.iter(|| plan(black_box(&local), black_box(Some(&remote)), Some(&applied)))
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for size in [10u64, 100, 1000] {
        let body = json!({"cart": {"lineItems": items(size), "addedDate": "T"}}).to_string();
        group.bench_with_input(BenchmarkId::new("remote_cart", size), &body, |b, body| {
            b.iter(|| RemoteCartEnvelope::decode(black_box(body.as_bytes())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detector, bench_plan, bench_decode);
criterion_main!(benches);
