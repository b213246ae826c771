//! Benchmarks for the info/files join on large trash directories.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use xdg_trash::domain::entities::trash_entry::{ContentEntry, MetadataRecord};
use xdg_trash::domain::services::correlation_service::correlate;

/// Every fifth record is missing (orphaned content) and every third content
/// is missing (dangling record).
fn listing(items: usize) -> (Vec<MetadataRecord>, Vec<ContentEntry>) {
    let mut records = Vec::with_capacity(items);
    let mut contents = Vec::with_capacity(items);
    for i in 0..items {
        let id = format!("item-{:06}", i);
        if i % 5 != 0 {
            records.push(MetadataRecord {
                id: id.clone().into(),
                path: format!("/trash/info/{}.trashinfo", id).into(),
            });
        }
        if i % 3 != 0 {
            contents.push(ContentEntry::new(id.clone(), format!("/trash/files/{}", id)));
        }
    }
    (records, contents)
}

fn bench_correlate(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlate");

    for items in [100usize, 10_000, 100_000] {
        let (records, contents) = listing(items);
        group.throughput(Throughput::Elements(items as u64));
        group.bench_with_input(BenchmarkId::from_parameter(items), &items, |b, _| {
            b.iter_batched(
                || (records.clone(), contents.clone()),
                |(records, contents)| black_box(correlate(records, contents)),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_correlate);
criterion_main!(benches);
