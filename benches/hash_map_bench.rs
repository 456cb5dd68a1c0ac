use assoc_containers::{HashMap, HashSet, Locked, TableConfig};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_insert_growing_100k(c: &mut Criterion) {
    c.bench_function("hash::insert_growing_100k", |b| {
        b.iter_batched(
            || HashMap::<String, u64>::with_config(TableConfig::default().capacity(16)),
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    let _ = m.put(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_presized_100k(c: &mut Criterion) {
    c.bench_function("hash::insert_presized_100k", |b| {
        b.iter_batched(
            || HashMap::<String, u64>::with_config(TableConfig::default().capacity(1 << 17)),
            |mut m| {
                for (i, x) in lcg(3).take(100_000).enumerate() {
                    let _ = m.put(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_remove_random_10k(c: &mut Criterion) {
    c.bench_function("hash::remove_random_10k_of_110k", |b| {
        b.iter_batched(
            || {
                let keys: Vec<String> = lcg(5).take(110_000).map(key).collect();
                let mut m = HashMap::new();
                for (i, k) in keys.iter().enumerate() {
                    let _ = m.put(k.clone(), i as u64);
                }
                let n = keys.len();
                let mut s = 0x9e3779b97f4a7c15u64;
                let to_remove: Vec<String> = (0..10_000)
                    .map(|_| {
                        s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                        keys[(s as usize) % n].clone()
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

fn bench_find_hit_and_miss_10k(c: &mut Criterion) {
    let keys: Vec<String> = lcg(7).take(100_000).map(key).collect();
    let mut m = HashMap::new();
    for (i, k) in keys.iter().enumerate() {
        let _ = m.put(k.clone(), i as u64);
    }
    let n = keys.len();
    let mut s = 0x9e3779b97f4a7c15u64;
    let hits: Vec<String> = (0..10_000)
        .map(|_| {
            s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
            keys[(s as usize) % n].clone()
        })
        .collect();
    let misses: Vec<String> = lcg(0xdead_beef).take(10_000).map(key).collect();

    c.bench_function("hash::get_hit_10k_on_100k", |b| {
        b.iter(|| {
            for k in &hits {
                black_box(m.get(k));
            }
        })
    });

    c.bench_function("hash::get_miss_10k_on_100k", |b| {
        b.iter(|| {
            for k in &misses {
                black_box(m.get(k));
            }
        })
    });
}

fn bench_set_and_locked(c: &mut Criterion) {
    c.bench_function("hash::set_add_dup_heavy_100k", |b| {
        b.iter_batched(
            HashSet::<u64>::new,
            |mut s| {
                for x in lcg(11).take(100_000) {
                    let _ = s.add(x % 20_000);
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("hash::locked_put_get_10k", |b| {
        b.iter_batched(
            Locked::<HashMap<u64, u64>>::default,
            |m| {
                for x in lcg(13).take(10_000) {
                    let _ = m.put(x, x);
                    black_box(m.get(&x));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
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
    targets = bench_insert_growing_100k, bench_insert_presized_100k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_remove_random_10k,
              bench_find_hit_and_miss_10k,
              bench_set_and_locked
}
criterion_main!(benches_insert, benches_ops);
