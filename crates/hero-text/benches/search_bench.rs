//! Benchmarks for message matching and highlighting.
//!
//! Run with: `cargo bench --package hero-text --bench search_bench`
//!
//! Each keystroke (after debounce) re-runs `is_match` over every message in
//! the conversation and `highlight` over the rows currently in the window, so
//! the matching pass is the one to watch as conversations grow.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hero_text::{Highlighter, LiteralPattern, contains_case_insensitive, find_case_insensitive};
use std::hint::black_box;

const MESSAGE: &str = "Hi! Following up on the IEP meeting: the speech therapy minutes \
    were reduced and I'd like to request a review before the annual goals are finalized. ";

const UNICODE_MESSAGE: &str = "Réunion à l'école demain, café après? 你好 こんにちは 🚀 ";

fn conversation(base: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{i}: {base}")).collect()
}

fn bench_match_conversation(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_conversation");

    for count in [100, 1_000, 10_000] {
        let messages = conversation(MESSAGE, count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("common", count), &messages, |b, msgs| {
            let pattern = LiteralPattern::new("iep").expect("non-blank");
            b.iter(|| msgs.iter().filter(|m| pattern.is_match(black_box(m))).count());
        });

        group.bench_with_input(BenchmarkId::new("no_match", count), &messages, |b, msgs| {
            let pattern = LiteralPattern::new("xyzzy").expect("non-blank");
            b.iter(|| msgs.iter().filter(|m| pattern.is_match(black_box(m))).count());
        });

        group.bench_with_input(BenchmarkId::new("uncompiled", count), &messages, |b, msgs| {
            b.iter(|| {
                msgs.iter()
                    .filter(|m| contains_case_insensitive(black_box(m), black_box("IEP")))
                    .count()
            });
        });
    }

    group.finish();
}

fn bench_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_case_insensitive");

    let ascii = MESSAGE.repeat(50);
    group.throughput(Throughput::Bytes(ascii.len() as u64));
    group.bench_function("ascii", |b| {
        b.iter(|| find_case_insensitive(black_box(&ascii), black_box("the")));
    });

    let unicode = UNICODE_MESSAGE.repeat(50);
    group.throughput(Throughput::Bytes(unicode.len() as u64));
    group.bench_function("unicode", |b| {
        b.iter(|| find_case_insensitive(black_box(&unicode), black_box("CAFÉ")));
    });

    group.finish();
}

fn bench_highlight_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("highlight_window");

    // A 400px viewport of 80px rows plus overscan renders about 15 rows.
    let rows = conversation(MESSAGE, 15);
    let highlighter = Highlighter::new("the");
    group.throughput(Throughput::Elements(rows.len() as u64));
    group.bench_function("15_rows", |b| {
        b.iter(|| {
            rows.iter()
                .enumerate()
                .map(|(i, row)| highlighter.highlight(black_box(row), i == 3).len())
                .sum::<usize>()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_match_conversation,
    bench_find,
    bench_highlight_window,
);

criterion_main!(benches);
