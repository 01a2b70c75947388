// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reassembly stage: edge colour fingerprints and greedy strip matching.

pub mod assemble;
pub mod fingerprint;

pub use assemble::{MergeRecord, Reassembly, assemble};
pub use fingerprint::{EdgeFingerprint, Histogram, compare_fingerprints, side_histogram};
