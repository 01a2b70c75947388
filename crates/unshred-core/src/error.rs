// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Unshred.

use thiserror::Error;

/// Top-level error type for all Unshred operations.
///
/// Every reconstruction failure is deterministic: the same photograph and
/// configuration always fail the same way, so none of these are retried.
#[derive(Debug, Error)]
pub enum UnshredError {
    // -- Reconstruction errors --
    #[error("nothing to reconstruct: {0}")]
    EmptyInput(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("side width {requested} out of range (must be between 1 and {limit} exclusive)")]
    OutOfRange { requested: u32, limit: u32 },

    #[error("strip {strip} collapsed to an empty region")]
    EmptyRegion { strip: usize },

    // -- File boundary --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, UnshredError>;
