// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// unshred-strips: Reassemble a page cut into vertical strips.
//
// Provides rectangle detection on a photograph of the strips, extraction of
// each strip as an upright crop, left/right edge colour fingerprints, and a
// greedy assembler that stitches the strips back into one page.

pub mod pipeline;
pub mod raster;
pub mod reassembly;
pub mod scan;

#[cfg(test)]
mod testing;

// Re-export the primary entry points so callers can use `unshred_strips::Reconstructor` etc.
pub use pipeline::{Reconstruction, Reconstructor};
pub use raster::processor::ImageProcessor;
pub use reassembly::{EdgeFingerprint, Histogram, MergeRecord, Reassembly, assemble};
pub use scan::{detect_rectangles, extract_strips};
