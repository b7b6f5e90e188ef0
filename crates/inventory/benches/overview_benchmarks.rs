use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::Utc;
use rust_decimal::Decimal;
use stockroom_inventory::{compute_overview, CategoryId, Product, ProductId};

fn snapshot(size: usize) -> Vec<Product> {
    let now = Utc::now();
    (0..size)
        .map(|i| Product {
            id: ProductId::new(i as i64 + 1),
            name: format!("product-{i}"),
            quantity: (i % 17) as i64,
            price: Decimal::new((i as i64 * 37) % 100_000, 2),
            category_id: CategoryId::new((i % 8) as i64 + 1),
            created_at: now,
        })
        .collect()
}

fn bench_compute_overview(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_overview");

    for size in [10usize, 1_000, 100_000] {
        let products = snapshot(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &products, |b, products| {
            b.iter(|| compute_overview(black_box(products)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_overview);
criterion_main!(benches);
