//! Benchmarks for markdown formatting throughput.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mdfmt_renderer::{NodeRenderFns, RenderOptions, format_markdown, parse_markdown, render};

/// Generate markdown content with specified structure.
fn generate_markdown(sections: usize, items_per_section: usize) -> String {
    let mut md = String::with_capacity(sections * (100 + items_per_section * 60));
    md.push_str("---\ntitle: Benchmark\n---\n\n# Document Title\n\n");

    for i in 0..sections {
        md.push_str(&format!("## Section {i}\n\n"));
        md.push_str(&format!(
            "Paragraph in section {i} with **bold**, *italic* and `code`.\n\n"
        ));
        for j in 0..items_per_section {
            md.push_str(&format!("* item {j}\n  * nested {j}\n"));
        }
        md.push_str("\n> quoted line\n> continues\n\n```rust\nfn main() {}\n```\n\n");
    }
    md
}

fn bench_format_simple(c: &mut Criterion) {
    let markdown = "# Hello\n\nSimple content.\n";

    c.bench_function("format_simple_markdown", |b| {
        b.iter(|| format_markdown(markdown, RenderOptions::default()));
    });
}

fn bench_render_parsed(c: &mut Criterion) {
    let markdown = generate_markdown(10, 5);
    let doc = parse_markdown(&markdown).unwrap();
    let overrides = NodeRenderFns::new();

    c.bench_function("render_parsed_10_sections", |b| {
        b.iter(|| {
            render(
                doc.metadata.as_ref(),
                markdown.as_bytes(),
                &doc.tree,
                &overrides,
                RenderOptions::default(),
            )
        });
    });
}

fn bench_format_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_by_size");

    for (sections, items) in [(5, 2), (20, 5), (50, 10)] {
        let markdown = generate_markdown(sections, items);
        let size = markdown.len();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::new("markdown", format!("{sections}s_{items}i")),
            &markdown,
            |b, md| b.iter(|| format_markdown(md, RenderOptions::default())),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_format_simple,
    bench_render_parsed,
    bench_format_varying_sizes
);
criterion_main!(benches);
