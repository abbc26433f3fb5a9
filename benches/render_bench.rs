//! Benchmarks for the render pipeline.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use snatch_view::render::{LineIndex, SearchHighlighter, SyntaxTokenizer};
use snatch_view::theme::Theme;
use snatch_view::{Document, Renderer};

/// Synthetic source-like log text.
fn generate_log(lines: usize) -> String {
    let mut text = String::with_capacity(lines * 48);
    for i in 0..lines {
        match i % 4 {
            0 => text.push_str(&format!("let value_{i} = 0x{i:x}; // step {i}\n")),
            1 => text.push_str(&format!("if ready {{ return \"item {i}\"; }}\n")),
            2 => text.push_str(&format!("# note {i}: error count {}\n", i % 7)),
            _ => text.push_str(&format!("plain line {i} with 3.14 inside\n")),
        }
    }
    text
}

/// Synthetic unified diff with hunks of ten lines.
fn generate_diff(lines: usize) -> String {
    let mut text = String::from("diff --git a/f.rs b/f.rs\n--- a/f.rs\n+++ b/f.rs\n");
    for i in 0..lines {
        if i % 10 == 0 {
            text.push_str(&format!("@@ -{} +{} @@\n", i + 1, i + 1));
        }
        match i % 3 {
            0 => text.push_str(&format!(" context {i}\n")),
            1 => text.push_str(&format!("-removed {i}\n")),
            _ => text.push_str(&format!("+added {i}\n")),
        }
    }
    text
}

fn bench_line_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_index");

    for size in [1_000, 10_000, 100_000] {
        let data = generate_log(size);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("build", size), &data, |b, data| {
            b.iter(|| LineIndex::build(black_box(data)));
        });
    }

    group.finish();
}

fn bench_tokenizers(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    let theme = Theme::dark();
    let syntax = SyntaxTokenizer::new();
    let search = SearchHighlighter::new();

    for size in [1_000, 10_000] {
        let data = generate_log(size);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("syntax", size), &data, |b, data| {
            b.iter(|| syntax.tokenize(black_box(data), &theme));
        });
        group.bench_with_input(BenchmarkId::new("search", size), &data, |b, data| {
            b.iter(|| search.matches(black_box(data), "ERROR"));
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let renderer = Renderer::default();

    for size in [1_000, 10_000] {
        let plain = Document::new(generate_log(size)).with_search("value");
        group.bench_with_input(BenchmarkId::new("plain", size), &plain, |b, doc| {
            b.iter(|| renderer.render(black_box(doc)));
        });

        let diff = Document::new(generate_diff(size)).with_diff_mode(true);
        group.bench_with_input(BenchmarkId::new("diff", size), &diff, |b, doc| {
            b.iter(|| renderer.render(black_box(doc)));
        });
    }

    group.finish();
}

fn bench_rehighlight(c: &mut Criterion) {
    let renderer = Renderer::default();
    let doc = Document::new(generate_log(10_000));
    let result = renderer.render(&doc);

    c.bench_function("rehighlight_10000", |b| {
        b.iter(|| {
            let mut result = result.clone();
            renderer.rehighlight(&mut result, &doc.text, black_box("line"));
            result
        });
    });
}

criterion_group!(
    benches,
    bench_line_index,
    bench_tokenizers,
    bench_render,
    bench_rehighlight
);
criterion_main!(benches);
