use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use linetree::{Document, LineIndex, LineIndexConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        out.push_str(&format!(
            "{i:06} the quick brown fox jumps over the lazy dog (linetree benchmark line)\n"
        ));
    }
    out.pop();
    out
}

fn bench_rebuild(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("rebuild/50k_lines", |b| {
        b.iter(|| {
            let source = black_box(text.as_str());
            let index = LineIndex::from_source(source, LineIndexConfig::default());
            black_box(index.line_count());
        })
    });
}

fn bench_typing_in_middle(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("typing_middle/100_inserts", |b| {
        b.iter_batched(
            || Document::new(&text),
            |mut doc| {
                let mut offset = doc.char_count() / 2;
                for _ in 0..100 {
                    doc.insert_text("x", offset).unwrap();
                    offset += 1;
                }
                black_box(doc.line_count());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_newlines_in_middle(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("newlines_middle/100_splits", |b| {
        b.iter_batched(
            || Document::new(&text),
            |mut doc| {
                let offset = doc.char_count() / 2;
                for _ in 0..100 {
                    doc.insert_text("\n", offset).unwrap();
                }
                black_box(doc.line_count());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_position_queries(c: &mut Criterion) {
    let text = large_text(50_000);
    let index = LineIndex::from_source(text.as_str(), LineIndexConfig::default());
    let mut rng = StdRng::seed_from_u64(7);
    let offsets: Vec<usize> = (0..1_000)
        .map(|_| rng.gen_range(0..=index.char_count()))
        .collect();
    c.bench_function("line_position/1k_random", |b| {
        b.iter(|| {
            for &offset in &offsets {
                black_box(index.line_position(offset));
            }
        })
    });
    c.bench_function("line_containing_byte_at/1k_random", |b| {
        b.iter(|| {
            for &offset in &offsets {
                black_box(index.line_containing_byte_at(offset));
            }
        })
    });
}

fn bench_viewport_lines(c: &mut Criterion) {
    let text = large_text(50_000);
    let index = LineIndex::from_source(text.as_str(), LineIndexConfig::default());
    c.bench_function("lines_in_y_range/viewport", |b| {
        b.iter(|| black_box(index.lines_in_y_range(black_box(400_000.0..401_200.0)).len()))
    });
}

criterion_group!(
    benches,
    bench_rebuild,
    bench_typing_in_middle,
    bench_newlines_in_middle,
    bench_position_queries,
    bench_viewport_lines
);
criterion_main!(benches);
