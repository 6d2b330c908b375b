//! Benchmarks for the storybook codec.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use storybook::{Page, Story};

const CAVE_BYTES: &[u8] = include_bytes!("../tests/fixtures/cave.storybook");

/// A story with `pages` pages of prose and an image on every tenth page.
fn sample_story(pages: usize) -> Story {
    let mut story = Story::new("Benchmark", "Criterion");
    let prose = "The corridor forks. A cold draft comes from the left; ".repeat(20);
    for i in 0..pages {
        let next = ((i + 1) % pages + 1) as u16;
        let mut page = Page::new(format!("{i}: {prose}")).with_choices(next, 1);
        if i % 10 == 0 {
            page.set_image((0..4096u32).map(|b| (b * 31 % 251) as u8).collect());
        }
        story.add_page(page);
    }
    story
}

// ============================================================================
// Codec Benchmarks
// ============================================================================

fn bench_decode_fixture(c: &mut Criterion) {
    c.bench_function("decode_fixture", |b| {
        b.iter(|| Story::from_bytes(CAVE_BYTES).unwrap());
    });
}

fn bench_encode_500(c: &mut Criterion) {
    let story = sample_story(500);

    c.bench_function("encode_500_pages", |b| {
        b.iter(|| story.to_bytes().unwrap());
    });
}

fn bench_decode_500(c: &mut Criterion) {
    let bytes = sample_story(500).to_bytes().unwrap();

    c.bench_function("decode_500_pages", |b| {
        b.iter(|| Story::from_bytes(&bytes).unwrap());
    });
}

// ============================================================================
// Navigation Benchmarks
// ============================================================================

fn bench_dangling_scan(c: &mut Criterion) {
    let story = sample_story(5000);

    c.bench_function("dangling_choices_5000", |b| {
        b.iter(|| story.dangling_choices());
    });
}

criterion_group!(
    benches,
    bench_decode_fixture,
    bench_encode_500,
    bench_decode_500,
    bench_dangling_scan
);
criterion_main!(benches);
