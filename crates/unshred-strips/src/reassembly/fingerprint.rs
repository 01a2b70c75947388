// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge fingerprints: hue/saturation histograms of a strip's outermost
// columns, and the four-way comparison used to pick neighbours.

use image::{Rgb, RgbImage};
use tracing::instrument;
use unshred_core::error::{Result, UnshredError};
use unshred_core::{Pairing, Side};

/// Hue bins over the 8-bit hue range [0, 180).
pub const HUE_BINS: usize = 50;
/// Saturation bins over [0, 256).
pub const SATURATION_BINS: usize = 60;

const HUE_RANGE: f32 = 180.0;
const SATURATION_RANGE: f32 = 256.0;

/// Joint hue × saturation histogram, min-max normalised into [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Row-major, `HUE_BINS` rows of `SATURATION_BINS` columns.
    bins: Vec<f32>,
}

impl Histogram {
    fn from_pixels(pixels: impl Iterator<Item = Rgb<u8>>) -> Self {
        let mut bins = vec![0f32; HUE_BINS * SATURATION_BINS];
        for pixel in pixels {
            let (hue, saturation) = hue_saturation(&pixel);
            let h = ((hue as f32 * HUE_BINS as f32 / HUE_RANGE) as usize).min(HUE_BINS - 1);
            let s = ((saturation as f32 * SATURATION_BINS as f32 / SATURATION_RANGE) as usize)
                .min(SATURATION_BINS - 1);
            bins[h * SATURATION_BINS + s] += 1.0;
        }
        normalize_min_max(&mut bins);
        Self { bins }
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    pub fn get(&self, hue_bin: usize, saturation_bin: usize) -> f32 {
        self.bins[hue_bin * SATURATION_BINS + saturation_bin]
    }

    /// Pearson correlation of the bin values, in [-1, 1]; higher is more
    /// similar. A flat histogram correlates with nothing (0.0).
    pub fn correlation(&self, other: &Histogram) -> f64 {
        let n = self.bins.len() as f64;
        let mean_a = self.bins.iter().map(|&v| v as f64).sum::<f64>() / n;
        let mean_b = other.bins.iter().map(|&v| v as f64).sum::<f64>() / n;

        let (mut cov, mut var_a, mut var_b) = (0f64, 0f64, 0f64);
        for (&a, &b) in self.bins.iter().zip(&other.bins) {
            let da = a as f64 - mean_a;
            let db = b as f64 - mean_b;
            cov += da * db;
            var_a += da * da;
            var_b += db * db;
        }

        let denom = (var_a * var_b).sqrt();
        if denom > f64::EPSILON { cov / denom } else { 0.0 }
    }
}

/// Rescale so the smallest bin is 0 and the largest 1. A flat histogram
/// becomes all zeros.
fn normalize_min_max(bins: &mut [f32]) {
    let min = bins.iter().copied().fold(f32::INFINITY, f32::min);
    let max = bins.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = max - min;
    if range <= f32::EPSILON {
        bins.iter_mut().for_each(|v| *v = 0.0);
        return;
    }
    bins.iter_mut().for_each(|v| *v = (*v - min) / range);
}

/// 8-bit HSV hue (degrees halved, 0..180) and saturation (0..=255).
fn hue_saturation(pixel: &Rgb<u8>) -> (u8, u8) {
    let [r, g, b] = pixel.0.map(|c| c as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let saturation = if max > 0.0 { 255.0 * delta / max } else { 0.0 };
    let hue_degrees = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    let hue_degrees = if hue_degrees < 0.0 { hue_degrees + 360.0 } else { hue_degrees };

    let hue = ((hue_degrees / 2.0).round() as u32 % 180) as u8;
    (hue, saturation.round().min(255.0) as u8)
}

/// Histogram of the `side_width` outermost columns on `side` of `image`.
///
/// `side_width` must satisfy `0 < side_width < image.width()`, otherwise
/// `OutOfRange`.
pub fn side_histogram(image: &RgbImage, side_width: u32, side: Side) -> Result<Histogram> {
    if side_width == 0 || side_width >= image.width() {
        return Err(UnshredError::OutOfRange {
            requested: side_width,
            limit: image.width(),
        });
    }

    let x = match side {
        Side::Left => 0,
        Side::Right => image.width() - side_width,
    };
    let pixels = (0..image.height())
        .flat_map(|y| (x..x + side_width).map(move |px| *image.get_pixel(px, y)));
    Ok(Histogram::from_pixels(pixels))
}

/// Left and right edge histograms of one strip (or composite).
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeFingerprint {
    pub left: Histogram,
    pub right: Histogram,
}

impl EdgeFingerprint {
    #[instrument(skip(image), fields(width = image.width(), height = image.height()))]
    pub fn of(image: &RgbImage, side_width: u32) -> Result<Self> {
        Ok(Self {
            left: side_histogram(image, side_width, Side::Left)?,
            right: side_histogram(image, side_width, Side::Right)?,
        })
    }

    pub fn side(&self, side: Side) -> &Histogram {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

/// Score every edge pairing between `anchor` and `candidate` and return the
/// best one.
///
/// Only a strictly positive correlation counts as a match; when none is
/// found the result is `(0.0, Pairing::Direct)`. Ties go to the pairing
/// listed first in `Pairing::ALL`.
pub fn compare_fingerprints(anchor: &EdgeFingerprint, candidate: &EdgeFingerprint) -> (f64, Pairing) {
    let mut best = (0.0, Pairing::Direct);
    for pairing in Pairing::ALL {
        let (anchor_side, candidate_side) = pairing.sides();
        let score = anchor
            .side(anchor_side)
            .correlation(candidate.side(candidate_side));
        if score > best.0 {
            best = (score, pairing);
        }
    }
    best
}
