use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::num::NonZeroUsize;
use striped_chain_map::chain_table::{bucket_index, ChainTable};

const BUCKETS: usize = 1024;

fn lcg(mut s: u64) -> impl Iterator<Item = i32> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some((s >> 32) as i32)
    })
}

fn cap() -> NonZeroUsize {
    NonZeroUsize::new(BUCKETS).unwrap()
}

fn filled(seed: u64, n: usize) -> (ChainTable, Vec<i32>) {
    let mut t = ChainTable::new(BUCKETS);
    let keys: Vec<i32> = lcg(seed).take(n).collect();
    for (i, &k) in keys.iter().enumerate() {
        t.put(bucket_index(k, cap()), k, i as i32);
    }
    (t, keys)
}

fn bench_put_fresh_10k(c: &mut Criterion) {
    c.bench_function("chain::put_fresh_10k", |b| {
        b.iter_batched(
            || ChainTable::new(BUCKETS),
            |mut t| {
                for (i, k) in lcg(1).take(10_000).enumerate() {
                    t.put(bucket_index(k, cap()), k, i as i32);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit_10k(c: &mut Criterion) {
    c.bench_function("chain::get_hit_10k_on_10k", |b| {
        let (t, keys) = filled(7, 10_000);
        b.iter(|| {
            for &k in &keys {
                black_box(t.get(bucket_index(k, cap()), k));
            }
        })
    });
}

fn bench_get_miss_10k(c: &mut Criterion) {
    c.bench_function("chain::get_miss_10k_on_10k", |b| {
        let (t, _) = filled(11, 10_000);
        let misses: Vec<i32> = lcg(0xdead_beef).take(10_000).collect();
        b.iter(|| {
            for &k in &misses {
                black_box(t.get(bucket_index(k, cap()), k));
            }
        })
    });
}

fn bench_remove_all_10k(c: &mut Criterion) {
    c.bench_function("chain::remove_all_10k", |b| {
        b.iter_batched(
            || filled(5, 10_000),
            |(mut t, keys)| {
                for k in keys {
                    let _ = t.remove(bucket_index(k, cap()), k);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_put_fresh_10k,
    bench_get_hit_10k,
    bench_get_miss_10k,
    bench_remove_all_10k
);
criterion_main!(benches);
