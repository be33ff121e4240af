use archivist::{
    decode_bytes, encode_bytes, load_object, save_object, transcode, DateTime, Json, Timestamp,
    UtfType,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::collections::BTreeMap;

pub fn utf16_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("utf16");
    for size in [4, 8, 16, 32, 64, 128, 256, 512].iter() {
        let mut ascii = Vec::with_capacity(*size);
        let mut wide = Vec::with_capacity(*size);
        encode_bytes(&"a".repeat(*size / 2), UtfType::Utf16Le, &mut ascii);
        encode_bytes(&"😀".repeat(*size / 4), UtfType::Utf16Le, &mut wide);

        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::new("ascii-to-utf8", size), size, |b, &_size| {
            b.iter(|| decode_bytes(black_box(&ascii), UtfType::Utf16Le, '?'))
        });
        group.bench_with_input(
            BenchmarkId::new("surrogates-to-utf8", size),
            size,
            |b, &_size| b.iter(|| decode_bytes(black_box(&wide), UtfType::Utf16Le, '?')),
        );
    }
    group.finish();
}

pub fn transcode_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("transcode");
    let text = "Grüße, 世界! 😀 ".repeat(64);
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("utf8-to-utf32be", |b| {
        b.iter(|| transcode(black_box(text.as_bytes()), UtfType::Utf8, UtfType::Utf32Be, '?'))
    });
    group.bench_function("utf8-to-utf16le", |b| {
        b.iter(|| transcode(black_box(text.as_bytes()), UtfType::Utf8, UtfType::Utf16Le, '?'))
    });
    group.finish();
}

pub fn datetime_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("datetime");
    group.bench_function("parse", |b| {
        b.iter(|| DateTime::parse(black_box("2023-07-14T22:44:51.925Z")))
    });
    group.bench_function("format", |b| {
        let ts = Timestamp::new(1_689_374_691, 925).unwrap();
        b.iter(|| black_box(ts).to_string())
    });
    group.bench_function("civil", |b| {
        b.iter(|| Timestamp::from_seconds(black_box(-3_092_583_868)).to_datetime())
    });
    group.finish();
}

pub fn json_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("json");
    let mut data: BTreeMap<String, Vec<i64>> = (0..64)
        .map(|i| (format!("series{}", i), (0..32).map(|x| x * i).collect()))
        .collect();
    let text = save_object::<Json, _>(&mut data).unwrap();
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("save", |b| {
        b.iter(|| save_object::<Json, _>(black_box(&mut data)).unwrap())
    });
    group.bench_function("load", |b| {
        b.iter(|| {
            let mut out: BTreeMap<String, Vec<i64>> = BTreeMap::new();
            load_object::<Json, _>(&mut out, black_box(&text)).unwrap();
            out
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    utf16_benchmark,
    transcode_benchmark,
    datetime_benchmark,
    json_benchmark
);
criterion_main!(benches);
