//! Benchmarks for TLE parsing and orbit derivation
//!
//!   cargo bench --bench parse_bench
//!   cargo bench parse_bench -- parse_file/1000

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tle_ingest::fingerprint::fingerprint;
use tle_ingest::models::FieldPolicy;
use tle_ingest::orbit::CentralBody;
use tle_ingest::tle::{ParseOptions, TleParser};
use tle_ingest::validation::InputValidator;

/// Deterministic file of `count` Starlink-like records with valid checksums
fn make_file(count: u32) -> String {
    let mut content = String::new();
    for i in 0..count {
        let catalog_number = 44_000 + i;
        let inclination = 53.0 + f64::from(i % 100) / 1000.0;
        let mean_motion = 15.06 + f64::from(i % 50) / 10_000.0;
        let body1 = format!("1 {catalog_number:05}U 19074A   23053.20743056  .00024213  00000+0  16238-2 0  999");
        let body2 = format!(
            "2 {catalog_number:05} {inclination:8.4} 136.2602 0001443  97.6224 213.8633 {mean_motion:11.8}    1"
        );
        content.push_str(&format!(
            "STARLINK-{i}\n{body1}{}\n{body2}{}\n",
            InputValidator::tle_checksum(&body1),
            InputValidator::tle_checksum(&body2)
        ));
    }
    content
}

fn bench_parse_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_file");
    for count in [100u32, 1000, 6000] {
        let content = make_file(count);
        for (label, options) in [
            ("zero_fill", ParseOptions { policy: FieldPolicy::ZeroFill, verify_checksum: false }),
            ("strict_checksum", ParseOptions { policy: FieldPolicy::Strict, verify_checksum: true }),
        ] {
            let Ok(parser) = TleParser::new(options) else { return };
            group.throughput(Throughput::Bytes(content.len() as u64));
            group.bench_with_input(BenchmarkId::new(label, count), &content, |b, content| {
                b.iter(|| parser.parse_file(black_box(content)));
            });
        }
    }
    group.finish();
}

fn bench_derive(c: &mut Criterion) {
    c.bench_function("derive_orbit", |b| {
        b.iter(|| CentralBody::EARTH.derive(black_box(15.721_253_91)));
    });
}

fn bench_fingerprint(c: &mut Criterion) {
    let content = make_file(6000);
    let mut group = c.benchmark_group("fingerprint");
    group.throughput(Throughput::Bytes(content.len() as u64));
    group.bench_function("6000_records", |b| b.iter(|| fingerprint(black_box(content.as_bytes()))));
    group.finish();
}

criterion_group!(benches, bench_parse_file, bench_derive, bench_fingerprint);
criterion_main!(benches);
