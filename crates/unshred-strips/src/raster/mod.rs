// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster module: resize, rotation without cropping, crops, and concatenation.

pub mod processor;

pub use processor::{ImageProcessor, concat_horizontal};
