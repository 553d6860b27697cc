//! VM Translator Benchmarks
//!
//! Measures the cost of the hot paths in code generation: push/pop across
//! segments, arithmetic (including the label-allocating comparisons), and the
//! call/return protocol.
//!
//! Run with:
//! ```bash
//! cargo bench --bench vm_translator_bench
//! ```

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use vm_translator::translate_program;

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_pop");

    let local_heavy: Vec<String> = (0..50)
        .flat_map(|i| {
            vec![
                format!("push local {i}"),
                format!("pop argument {i}"),
            ]
        })
        .collect();
    group.throughput(Throughput::Elements(local_heavy.len() as u64));
    group.bench_function("local_argument_round_trip", |b| {
        b.iter(|| {
            black_box(
                translate_program(&[("Bench".to_string(), local_heavy.clone())], false).unwrap(),
            );
        });
    });

    let static_heavy: Vec<String> = (0..50)
        .flat_map(|i| vec![format!("push constant {i}"), format!("pop static {i}")])
        .collect();
    group.throughput(Throughput::Elements(static_heavy.len() as u64));
    group.bench_function("static_segment", |b| {
        b.iter(|| {
            black_box(
                translate_program(&[("Bench".to_string(), static_heavy.clone())], false).unwrap(),
            );
        });
    });

    group.finish();
}

fn bench_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic");

    let comparisons: Vec<String> = (0..100)
        .flat_map(|_| {
            vec![
                "push constant 1".to_string(),
                "push constant 2".to_string(),
                "eq".to_string(),
            ]
        })
        .collect();
    group.throughput(Throughput::Elements(comparisons.len() as u64));
    group.bench_function("comparisons_unique_labels", |b| {
        b.iter(|| {
            black_box(
                translate_program(&[("Bench".to_string(), comparisons.clone())], false).unwrap(),
            );
        });
    });

    group.finish();
}

fn bench_call_return(c: &mut Criterion) {
    let mut group = c.benchmark_group("call_return");

    let mut unit = vec!["function Main.main 0".to_string()];
    for _ in 0..50 {
        unit.push("call Helper.identity 1".to_string());
    }
    unit.push("return".to_string());
    unit.push("function Helper.identity 0".to_string());
    unit.push("push argument 0".to_string());
    unit.push("return".to_string());

    group.throughput(Throughput::Elements(unit.len() as u64));
    group.bench_function("repeated_call_sites", |b| {
        b.iter(|| {
            black_box(translate_program(&[("Main".to_string(), unit.clone())], true).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_push_pop, bench_arithmetic, bench_call_return);
criterion_main!(benches);
