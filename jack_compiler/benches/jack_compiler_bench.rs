//! Jack Compiler Benchmarks
//!
//! Measures the cost of the hot paths: tokenizing a source file, symbol
//! table lookups, and compiling whole classes end to end.
//!
//! Run with:
//! ```bash
//! cargo bench --bench jack_compiler_bench
//! ```

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use jack_compiler::compile_class;
use jack_compiler::symbol_table::{Kind, SymbolTable};
use jack_compiler::tokenizer::Tokenizer;

fn bench_tokenizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenizer");

    let source: String = (0..200)
        .map(|i| format!("let x{i} = {i} + {i};\n"))
        .collect();
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("scan_assignment_chain", |b| {
        b.iter(|| {
            let mut t = Tokenizer::new(black_box(&source)).unwrap();
            while t.has_more_tokens() {
                t.advance().unwrap();
            }
        });
    });

    group.finish();
}

fn bench_symbol_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("symbol_table");

    group.bench_function("define_and_lookup_100_locals", |b| {
        b.iter(|| {
            let mut st = SymbolTable::new();
            for i in 0..100 {
                st.define(&format!("v{i}"), "int", Kind::Local);
            }
            for i in 0..100 {
                black_box(st.kind_of(&format!("v{i}")));
            }
        });
    });

    group.finish();
}

fn bench_compile_class(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_class");

    let mut body = String::from("class Bench { field int total; method void run(int n) { var int i; ");
    for _ in 0..50 {
        body.push_str("let total = total + n; ");
    }
    body.push_str("return; } }");
    group.throughput(Throughput::Bytes(body.len() as u64));
    group.bench_function("method_with_50_statements", |b| {
        b.iter(|| {
            black_box(compile_class(black_box(&body)).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_tokenizer, bench_symbol_table, bench_compile_class);
criterion_main!(benches);
