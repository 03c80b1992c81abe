//! Parser benchmarks.
//!
//! Run with: `cargo bench --package textkv-par`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use textkv_lex::LexConfig;
use textkv_par::{Kv0Parser, Kv1Mode, Kv1Parser, Kv3Parser};
use textkv_util::Config;

fn kv0_document(entries: usize) -> Vec<u8> {
    let mut doc = b"\"root\"\t{ ".to_vec();
    for i in 0..entries {
        doc.extend_from_slice(format!("\"key{}\"\t\"value{}\" ", i, i).as_bytes());
    }
    doc.extend_from_slice(b"}");
    doc
}

fn kv1_document(entries: usize) -> Vec<u8> {
    let mut doc = Vec::new();
    for i in 0..entries {
        doc.extend_from_slice(
            format!("entry{}={{\nname=\"n{}\"\ncount={}\nitems=[ \"a\", \"b\", ]\n}}\n", i, i, i)
                .as_bytes(),
        );
    }
    doc
}

fn kv3_document(entries: usize) -> Vec<u8> {
    let mut doc = Vec::new();
    for i in 0..entries {
        doc.extend_from_slice(
            format!("pos{} \"vector3\" [ {}, {}, {} ]\n", i, i, i + 1, i + 2).as_bytes(),
        );
    }
    doc
}

fn bench_kv0(c: &mut Criterion) {
    let lex = LexConfig::kv0();
    let cfg = Config::default();
    let doc = kv0_document(100);

    let mut group = c.benchmark_group("parser_kv0");
    group.throughput(Throughput::Bytes(doc.len() as u64));
    group.bench_function("object_100", |b| {
        b.iter(|| Kv0Parser::new(black_box(&doc), &lex, &cfg).parse().unwrap())
    });
    group.finish();
}

fn bench_kv1(c: &mut Criterion) {
    let lex = LexConfig::kv1();
    let cfg = Config::default();
    let doc = kv1_document(50);

    let mut group = c.benchmark_group("parser_kv1");
    group.throughput(Throughput::Bytes(doc.len() as u64));
    group.bench_function("map_mode_50", |b| {
        b.iter(|| {
            Kv1Parser::new(black_box(&doc), &lex, &cfg, Kv1Mode::Map)
                .parse()
                .unwrap()
        })
    });
    group.finish();
}

fn bench_kv3(c: &mut Criterion) {
    let lex = LexConfig::kv3();
    let cfg = Config::default();
    let doc = kv3_document(100);

    let mut group = c.benchmark_group("parser_kv3");
    group.throughput(Throughput::Bytes(doc.len() as u64));
    group.bench_function("typed_entries_100", |b| {
        b.iter(|| Kv3Parser::new(black_box(&doc), &lex, &cfg).parse().unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_kv0, bench_kv1, bench_kv3);
criterion_main!(benches);
