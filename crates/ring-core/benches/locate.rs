use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ring_core::{build, Peer, Ring, RingKind};

fn ring(kind: RingKind, n: usize) -> Ring {
    let peers = (0..n)
        .map(|i| Peer::new(format!("peer-{i}"), format!("10.0.0.{i}:40000")))
        .collect();
    Ring::new(build(kind, peers, 3, 1).expect("valid ring"))
}

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate");
    for n in [8usize, 64, 256] {
        for kind in [RingKind::Mod, RingKind::Ketama] {
            let ring = ring(kind, n);
            group.bench_with_input(BenchmarkId::new(kind.name(), n), &ring, |b, ring| {
                let mut i = 0u64;
                b.iter(|| {
                    i = i.wrapping_add(1);
                    black_box(ring.locate(i.to_le_bytes()).len())
                })
            });
        }
    }
    group.finish();
}

fn bench_build_ketama(c: &mut Criterion) {
    c.bench_function("build_ketama_256", |b| {
        b.iter(|| black_box(ring(RingKind::Ketama, 256).point_count()))
    });
}

criterion_group!(benches, bench_locate, bench_build_ketama);
criterion_main!(benches);
