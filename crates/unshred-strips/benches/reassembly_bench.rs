// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the unshred-strips crate. Covers edge
// fingerprinting of one strip, greedy assembly of a shuffled page, and the
// full photograph-to-page pipeline on a small synthetic photo.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgb, RgbImage, imageops};

use unshred_core::ReassemblyConfig;
use unshred_strips::{EdgeFingerprint, Reconstructor, assemble};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A 240x320 page with a colour drift across its width and dark text lines.
fn page() -> RgbImage {
    RgbImage::from_fn(240, 320, |x, y| {
        if y % 16 < 3 && y > 4 && y < 316 {
            return Rgb([40, 40, 45]);
        }
        let t = x as f32 / 240.0;
        Rgb([(235.0 - 120.0 * t) as u8, 180, (90.0 + 140.0 * t) as u8])
    })
}

/// Six 40px strips in a shuffled order.
fn shuffled_strips() -> Vec<RgbImage> {
    let page = page();
    [3usize, 0, 5, 1, 4, 2]
        .iter()
        .map(|&i| imageops::crop_imm(&page, i as u32 * 40, 0, 40, 320).to_image())
        .collect()
}

/// The shuffled strips laid out on a dark surface with 40px gaps.
fn photograph() -> RgbImage {
    let strips = shuffled_strips();
    let mut photo = RgbImage::from_pixel(6 * 80 + 40, 400, Rgb([25, 25, 30]));
    for (i, strip) in strips.iter().enumerate() {
        imageops::replace(&mut photo, strip, 40 + i as i64 * 80, 40);
    }
    photo
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_fingerprint(c: &mut Criterion) {
    let strip = shuffled_strips().remove(0);
    c.bench_function("edge_fingerprint (40x320, side 20)", |b| {
        b.iter(|| EdgeFingerprint::of(black_box(&strip), 20).unwrap());
    });
}

fn bench_assemble(c: &mut Criterion) {
    let strips = shuffled_strips();
    c.bench_function("assemble (6 strips)", |b| {
        b.iter(|| assemble(black_box(strips.clone()), 20).unwrap());
    });
}

fn bench_reconstruct(c: &mut Criterion) {
    let photo = photograph();
    let reconstructor = Reconstructor::new(ReassemblyConfig {
        resize_width: None,
        ..ReassemblyConfig::default()
    });
    c.bench_function("reconstruct (520x400 photo)", |b| {
        b.iter(|| reconstructor.reconstruct(black_box(&photo)).unwrap());
    });
}

criterion_group!(benches, bench_fingerprint, bench_assemble, bench_reconstruct);
criterion_main!(benches);
