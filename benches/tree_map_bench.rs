use assoc_containers::{TreeMap, TreeSet};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn bench_insert_random_100k(c: &mut Criterion) {
    c.bench_function("tree::insert_random_100k", |b| {
        b.iter_batched(
            TreeMap::<u64, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    let _ = m.put(x, i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_sequential_100k(c: &mut Criterion) {
    c.bench_function("tree::insert_sequential_100k", |b| {
        b.iter_batched(
            TreeSet::<u64>::new,
            |mut s| {
                for x in 0..100_000u64 {
                    let _ = s.add(x);
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_remove_random_10k(c: &mut Criterion) {
    c.bench_function("tree::remove_random_10k_of_110k", |b| {
        b.iter_batched(
            || {
                let keys: Vec<u64> = lcg(5).take(110_000).collect();
                let m: TreeMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
                let n = keys.len();
                let mut s = 0x9e3779b97f4a7c15u64;
                let to_remove: Vec<u64> = (0..10_000)
                    .map(|_| {
                        s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                        keys[(s as usize) % n]
                    })
                    .collect();
                (m, to_remove)
            },
            |(mut m, to_remove)| {
                for k in &to_remove {
                    let _ = m.remove(k);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find_and_nearest_10k(c: &mut Criterion) {
    let keys: Vec<u64> = lcg(7).take(100_000).collect();
    let m: TreeMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
    let queries: Vec<u64> = lcg(0xdead_beef).take(10_000).collect();

    c.bench_function("tree::get_hit_10k_on_100k", |b| {
        b.iter(|| {
            for k in keys.iter().step_by(10) {
                black_box(m.get(k));
            }
        })
    });

    c.bench_function("tree::floor_ceiling_10k_on_100k", |b| {
        b.iter(|| {
            for k in &queries {
                black_box(m.floor(k).ok());
                black_box(m.ceiling(k).ok());
            }
        })
    });
}

fn bench_iter_and_snapshot(c: &mut Criterion) {
    let m: TreeMap<u64, u64> = lcg(999).take(100_000).map(|x| (x, x)).collect();

    c.bench_function("tree::iter_all_100k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for (_, v) in m.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });

    c.bench_function("tree::snapshot_100k", |b| b.iter(|| black_box(m.snapshot())));
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_random_100k, bench_insert_sequential_100k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_remove_random_10k,
              bench_find_and_nearest_10k,
              bench_iter_and_snapshot
}
criterion_main!(benches_insert, benches_ops);
