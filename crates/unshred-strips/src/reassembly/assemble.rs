// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Greedy assembly: repeatedly append the best-matching strip to the last
// one until a single page remains.

use image::RgbImage;
use tracing::{debug, info, instrument, warn};
use unshred_core::Pairing;
use unshred_core::error::{Result, UnshredError};

use super::fingerprint::{EdgeFingerprint, compare_fingerprints};
use crate::raster::processor::{ImageProcessor, concat_horizontal};

/// One decision taken by the assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeRecord {
    /// Zero-based iteration number.
    pub step: usize,
    /// Width of the anchor (the fragment popped from the end).
    pub anchor_width: u32,
    /// Position of the chosen candidate among the remaining fragments.
    pub candidate_index: usize,
    pub candidate_width: u32,
    /// Correlation of the winning edge pair; 0.0 when nothing matched.
    pub score: f64,
    pub pairing: Pairing,
}

/// The assembled page plus the merge decisions that produced it.
#[derive(Debug, Clone)]
pub struct Reassembly {
    pub image: RgbImage,
    pub merges: Vec<MergeRecord>,
}

/// A strip or composite together with its current edge fingerprint.
struct Fragment {
    image: RgbImage,
    fingerprint: EdgeFingerprint,
}

impl Fragment {
    fn new(image: RgbImage, side_width: u32) -> Result<Self> {
        let fingerprint = EdgeFingerprint::of(&image, side_width)?;
        Ok(Self { image, fingerprint })
    }
}

/// Stitch `strips` into one image.
///
/// All strips are first scaled to the tallest strip's height. Then, while
/// more than one fragment remains, the last fragment (the anchor) is
/// scored against every other one; the best candidate is removed, either
/// piece is turned 180° as its `Pairing` demands, and anchor + candidate are
/// pushed back as one composite. `n` strips take exactly `n - 1` merges.
///
/// Deterministic: the same strips in the same order always produce the
/// same page.
#[instrument(skip(strips), fields(strips = strips.len(), side_width))]
pub fn assemble(strips: Vec<RgbImage>, side_width: u32) -> Result<Reassembly> {
    if strips.is_empty() {
        return Err(UnshredError::EmptyInput("no strips to assemble".into()));
    }

    let mut working = normalize_heights(strips)
        .into_iter()
        .map(|image| Fragment::new(image, side_width))
        .collect::<Result<Vec<_>>>()?;
    let mut merges = Vec::with_capacity(working.len() - 1);

    while working.len() > 1 {
        let Some(anchor) = working.pop() else {
            break;
        };
        let (candidate_index, score, pairing) = best_candidate(&anchor, &working);
        let candidate = working.remove(candidate_index);

        let record = MergeRecord {
            step: merges.len(),
            anchor_width: anchor.image.width(),
            candidate_index,
            candidate_width: candidate.image.width(),
            score,
            pairing,
        };
        debug!(?record, remaining = working.len(), "Merging fragments");
        merges.push(record);

        let composite = merge(anchor.image, candidate.image, pairing);
        working.push(Fragment::new(composite, side_width)?);
    }

    let image = working
        .pop()
        .map(|fragment| fragment.image)
        .ok_or_else(|| UnshredError::EmptyInput("assembly produced no image".into()))?;
    info!(
        width = image.width(),
        height = image.height(),
        merges = merges.len(),
        "Strips assembled"
    );
    Ok(Reassembly { image, merges })
}

/// Scale every strip to the tallest height, keeping aspect ratios.
fn normalize_heights(strips: Vec<RgbImage>) -> Vec<RgbImage> {
    let max_height = strips.iter().map(RgbImage::height).max().unwrap_or(0);
    strips
        .into_iter()
        .map(|strip| {
            ImageProcessor::from_rgb(strip)
                .resize_to_height(max_height)
                .into_rgb()
        })
        .collect()
}

/// Pick the remaining fragment that best continues `anchor`.
///
/// Only a strictly higher score replaces the current best, so the lowest
/// index wins ties. If nothing scores above zero the first fragment is taken
/// as-is.
fn best_candidate(anchor: &Fragment, remaining: &[Fragment]) -> (usize, f64, Pairing) {
    let mut best = (0, 0.0, Pairing::Direct);
    for (index, fragment) in remaining.iter().enumerate() {
        let (score, pairing) = compare_fingerprints(&anchor.fingerprint, &fragment.fingerprint);
        if score > best.1 {
            best = (index, score, pairing);
        }
    }
    if best.1 <= 0.0 {
        warn!(
            remaining = remaining.len(),
            "No positively correlated edge; attaching the first remaining strip unflipped"
        );
    }
    best
}

fn merge(anchor: RgbImage, candidate: RgbImage, pairing: Pairing) -> RgbImage {
    let anchor = if pairing.flips_anchor() {
        ImageProcessor::from_rgb(anchor).rotate180().into_rgb()
    } else {
        anchor
    };
    let candidate = if pairing.flips_candidate() {
        ImageProcessor::from_rgb(candidate).rotate180().into_rgb()
    } else {
        candidate
    };
    concat_horizontal(&anchor, &candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{cut_into_strips, printed_page, two_tone};
    use image::Rgb;

    const RED: Rgb<u8> = Rgb([220, 30, 30]);
    const GREEN: Rgb<u8> = Rgb([40, 200, 60]);
    const BLUE: Rgb<u8> = Rgb([30, 60, 210]);
    const YELLOW: Rgb<u8> = Rgb([230, 210, 40]);

    #[test]
    fn matching_right_to_left_concatenates_without_flips() {
        let candidate = two_tone(20, 40, GREEN, BLUE);
        let anchor = two_tone(30, 40, RED, GREEN);

        let out = assemble(vec![candidate, anchor.clone()], 5).unwrap();
        assert_eq!(out.image.dimensions(), (50, 40));
        assert_eq!(out.merges.len(), 1);
        assert_eq!(out.merges[0].pairing, Pairing::Direct);
        assert_eq!(*out.image.get_pixel(0, 0), RED);
        assert_eq!(*out.image.get_pixel(29, 39), GREEN);
        assert_eq!(*out.image.get_pixel(30, 0), GREEN);
        assert_eq!(*out.image.get_pixel(49, 0), BLUE);
    }

    #[test]
    fn matching_right_edges_flips_the_candidate() {
        let candidate = RgbImage::from_fn(20, 40, |x, y| {
            if x >= 10 {
                GREEN
            } else if y < 20 {
                BLUE
            } else {
                YELLOW
            }
        });
        let anchor = two_tone(20, 40, RED, GREEN);

        let out = assemble(vec![candidate.clone(), anchor], 5).unwrap();
        assert_eq!(out.merges[0].pairing, Pairing::FlipCandidate);
        assert_eq!(out.image.dimensions(), (40, 40));
        // Anchor untouched on the left.
        assert_eq!(*out.image.get_pixel(0, 0), RED);
        // Candidate turned upside down: its former bottom-left is now top-right.
        assert_eq!(*out.image.get_pixel(20, 0), GREEN);
        assert_eq!(*out.image.get_pixel(39, 0), YELLOW);
        assert_eq!(*out.image.get_pixel(39, 39), BLUE);
    }

    #[test]
    fn matching_left_edges_flips_the_anchor() {
        let candidate = two_tone(20, 40, RED, BLUE);
        let anchor = RgbImage::from_fn(20, 40, |x, y| if x < 10 { RED } else if y < 20 { GREEN } else { YELLOW });

        let out = assemble(vec![candidate, anchor], 5).unwrap();
        assert_eq!(out.merges[0].pairing, Pairing::FlipAnchor);
        // The anchor's left (red) edge now faces the candidate's left edge.
        assert_eq!(*out.image.get_pixel(19, 0), RED);
        assert_eq!(*out.image.get_pixel(20, 0), RED);
        assert_eq!(*out.image.get_pixel(0, 0), YELLOW);
    }

    #[test]
    fn n_strips_take_n_minus_one_merges() {
        let page = printed_page(160, 120);
        let strips = cut_into_strips(&page, 40);
        assert_eq!(strips.len(), 4);

        let out = assemble(strips, 8).unwrap();
        assert_eq!(out.merges.len(), 3);
        assert_eq!(out.image.dimensions(), (160, 120));
        for (step, record) in out.merges.iter().enumerate() {
            assert_eq!(record.step, step);
            // Remaining set shrinks by one per step: 3, 2, 1 candidates.
            assert!(record.candidate_index < 3 - step);
        }
    }

    #[test]
    fn assembly_is_deterministic() {
        let page = printed_page(150, 90);
        let mut strips = cut_into_strips(&page, 30);
        strips.swap(0, 3);
        strips.swap(1, 4);

        let first = assemble(strips.clone(), 6).unwrap();
        let second = assemble(strips, 6).unwrap();
        assert_eq!(first.image, second.image);
        assert_eq!(first.merges, second.merges);
    }

    #[test]
    fn heights_are_normalised_to_tallest() {
        let short = two_tone(20, 30, GREEN, BLUE);
        let tall = two_tone(20, 60, RED, GREEN);

        let out = assemble(vec![short, tall], 4).unwrap();
        assert_eq!(out.image.height(), 60);
        // The 20x30 strip doubles to 40x60.
        assert_eq!(out.image.width(), 60);
    }

    #[test]
    fn single_strip_is_returned_unchanged() {
        let strip = two_tone(20, 40, RED, BLUE);
        let out = assemble(vec![strip.clone()], 5).unwrap();
        assert_eq!(out.image, strip);
        assert!(out.merges.is_empty());
    }

    #[test]
    fn unmatched_strips_are_still_joined() {
        let candidate = two_tone(20, 40, BLUE, YELLOW);
        let anchor = two_tone(20, 40, RED, GREEN);

        let out = assemble(vec![candidate, anchor], 5).unwrap();
        assert_eq!(out.merges[0].score, 0.0);
        assert_eq!(out.merges[0].pairing, Pairing::Direct);
        assert_eq!(*out.image.get_pixel(0, 0), RED);
        assert_eq!(*out.image.get_pixel(39, 0), YELLOW);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            assemble(Vec::new(), 5),
            Err(UnshredError::EmptyInput(_))
        ));
    }

    #[test]
    fn side_width_wider_than_a_strip_is_out_of_range() {
        let strips = vec![two_tone(10, 40, RED, BLUE), two_tone(30, 40, GREEN, BLUE)];
        assert!(matches!(
            assemble(strips, 10),
            Err(UnshredError::OutOfRange { requested: 10, limit: 10 })
        ));
    }
}
