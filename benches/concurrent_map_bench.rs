use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use std::thread;
use striped_chain_map::{ConcurrentChainedMap, LockGranularity, MapConfig};

const CAPACITY: usize = 1024;
const THREADS: usize = 4;
const OPS_PER_THREAD: usize = 10_000;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s >> 17)
    })
}

fn make(granularity: LockGranularity) -> ConcurrentChainedMap {
    let config = MapConfig::builder()
        .capacity(CAPACITY)
        .granularity(granularity)
        .build()
        .unwrap();
    ConcurrentChainedMap::with_config(config)
}

fn bench_single_thread_mixed(c: &mut Criterion) {
    c.bench_function("map::single_thread_mixed_10k", |b| {
        let m = make(LockGranularity::Global);
        let ops: Vec<u64> = lcg(3).take(OPS_PER_THREAD).collect();
        b.iter(|| {
            for &r in &ops {
                let key = (r % 4096) as i32;
                match r % 4 {
                    0 => black_box(m.put(key, r as i32)),
                    1 => black_box(m.delete(key)),
                    _ => black_box(m.get(key)),
                };
            }
        })
    });
}

// Threads are spawned inside the measured closure, so the figures include
// spawn and join cost; compare granularities against each other only.
fn run_contended(m: &Arc<ConcurrentChainedMap>) {
    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let m = Arc::clone(m);
            thread::spawn(move || {
                for r in lcg(t as u64 + 1).take(OPS_PER_THREAD) {
                    let key = (r % 4096) as i32;
                    match r % 4 {
                        0 => black_box(m.put(key, r as i32)),
                        1 => black_box(m.delete(key)),
                        _ => black_box(m.get(key)),
                    };
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("map::contended_4x10k");
    for (name, granularity) in [
        ("global", LockGranularity::Global),
        ("striped_16", LockGranularity::Striped(16)),
        ("striped_256", LockGranularity::Striped(256)),
    ] {
        let m = Arc::new(make(granularity));
        group.bench_function(name, |b| b.iter(|| run_contended(&m)));
    }
    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    c.bench_function("map::snapshot_4k_entries", |b| {
        let m = make(LockGranularity::Striped(16));
        for k in 0..4096 {
            m.put(k, k);
        }
        b.iter(|| black_box(m.snapshot()))
    });
}

criterion_group!(
    benches,
    bench_single_thread_mixed,
    bench_contended,
    bench_snapshot
);
criterion_main!(benches);
