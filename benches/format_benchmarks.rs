use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use snowdrift::{base62, GeneratorOptions, IdFormatter, SnowflakeEngine};
use std::hint::black_box;

// Common test values used across benchmarks
const TEST_VALUES: [u64; 4] = [
    1,                       // Small number
    1_000_000,               // Large number
    548_411_253_766_213_632, // Typical drift id
    i64::MAX as u64,         // Largest id
];

pub fn string_generation_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("String Generation Comparison");

    for id_length in [0u8, 12] {
        let options = GeneratorOptions::builder()
            .id_length(id_length)
            .unwrap()
            .id_prefix("ord_")
            .build()
            .unwrap();
        let generator = SnowflakeEngine::new(options).unwrap();

        group.bench_function(format!("id_length_{}", id_length), |b| {
            b.iter(|| black_box(generator.next_id_string().unwrap()));
        });
    }

    group.finish();
}

pub fn base62_padding(c: &mut Criterion) {
    let mut group = c.benchmark_group("Base62 Padded Encoding");

    for &value in &TEST_VALUES {
        group.bench_with_input(BenchmarkId::new("encode_padded", value), &value, |b, &value| {
            b.iter(|| black_box(base62::encode_padded(value, 20)));
        });
    }

    group.finish();
}

pub fn parse_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("Parse");
    let formatter = IdFormatter::new(16, "inv_");

    for &value in &TEST_VALUES {
        let encoded = formatter.format(value as i64).unwrap();
        group.bench_with_input(BenchmarkId::new("parse", value), &encoded, |b, encoded| {
            b.iter(|| black_box(formatter.parse(encoded).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    string_generation_comparison,
    base62_padding,
    parse_round_trip
);
criterion_main!(benches);
