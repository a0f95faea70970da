use criterion::{black_box, criterion_group, criterion_main, Criterion};
use frag_pack::{Codec, Compress, Format};

fn sample_text() -> String {
    let paragraph = "The container format is a length-prefixed metadata record \
        followed by a compressed payload, base64-encoded for transport. ";
    paragraph.repeat(160) // ~20 kB
}

fn bench_encode(c: &mut Criterion) {
    let text = sample_text();
    let mut group = c.benchmark_group("encode");
    group.bench_function("stored", |b| {
        let codec = Codec::stored();
        b.iter(|| codec.encode(black_box(&text), Format::Text).unwrap())
    });
    group.bench_function("gzip", |b| {
        let codec = Codec::new(Compress::new_gzip(6));
        b.iter(|| codec.encode(black_box(&text), Format::Text).unwrap())
    });
    group.bench_function("deflate", |b| {
        let codec = Codec::new(Compress::new_deflate(6));
        b.iter(|| codec.encode(black_box(&text), Format::Text).unwrap())
    });
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let text = sample_text();
    let mut group = c.benchmark_group("decode");
    for (name, codec) in [
        ("stored", Codec::stored()),
        ("gzip", Codec::new(Compress::new_gzip(6))),
        ("deflate", Codec::new(Compress::new_deflate(6))),
    ] {
        let transport = codec.encode(&text, Format::Text).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| codec.decode(black_box(&transport)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
