// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning stage: locate strip outlines in the photograph and cut each strip
// out as an upright, tightly cropped image.

pub mod detect;
pub mod extract;

pub use detect::{detect_rectangles, draw_rectangles, filter_by_area};
pub use extract::{extract_strip, extract_strips};
