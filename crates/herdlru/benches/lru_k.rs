use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use herdlru::LruKCache;

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_1kb_hit", |b| {
        let mut cache = LruKCache::new(2, 0, 1024);
        let data = vec![b'x'; 1024];
        let keys: Vec<String> = (0..100).map(|i| format!("key{}", i)).collect();

        // Two visits each to promote
        for key in &keys {
            cache.add(key, data.clone());
            cache.add(key, data.clone());
        }

        let mut counter = 0;
        b.iter(|| {
            black_box(cache.get(&keys[counter % 100]));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_scan_pollution(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    for k in [1usize, 2] {
        group.bench_function(format!("scan_k{}", k), |b| {
            let mut cache = LruKCache::new(k, 64 * 1024, 1024);
            let data = vec![b'x'; 1024];

            let mut counter = 0u64;
            b.iter(|| {
                let key = format!("scan{}", counter);
                cache.add(&key, data.clone());
                counter += 1;
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_get_hit, bench_scan_pollution);
criterion_main!(benches);
