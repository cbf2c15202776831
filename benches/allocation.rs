//! Benchmarks for allocation and display sorting.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use smartpark::{allocate, sorted_slots, MemoryCache, ParkingStore, Slot, StoreConfig};

/// A lot of `size` slots mixing numeric and lettered numbers, mostly occupied.
fn lot(size: usize) -> Vec<Slot> {
    (0..size)
        .rev()
        .map(|i| {
            let no = if i % 3 == 0 {
                format!("{i}")
            } else {
                format!("R{i}")
            };
            Slot::new(i.to_string(), no, i % 2 == 0, i % 5 == 0).occupied(i % 7 != 0)
        })
        .collect()
}

fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate");

    for size in [10, 50, 500] {
        let slots = lot(size);
        group.bench_with_input(BenchmarkId::new("ev_and_cover", size), &slots, |b, slots| {
            b.iter(|| allocate(black_box(slots), true, true));
        });
    }

    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");

    for size in [10, 50, 500] {
        let slots = lot(size);
        group.bench_with_input(BenchmarkId::new("slot_numbers", size), &slots, |b, slots| {
            b.iter(|| sorted_slots(black_box(slots)));
        });
    }

    group.finish();
}

fn bench_park_cycle(c: &mut Criterion) {
    c.bench_function("park_then_free", |b| {
        let mut store = ParkingStore::open(
            MemoryCache::new(),
            StoreConfig {
                seed: lot(50),
                ..Default::default()
            },
        );
        b.iter(|| {
            if let Some(slot) = store.park_vehicle(false, false).slot {
                store.remove_vehicle(&slot.id);
            }
        });
    });
}

criterion_group!(benches, bench_allocate, bench_sort, bench_park_cycle);
criterion_main!(benches);
