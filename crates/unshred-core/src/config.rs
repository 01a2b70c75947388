// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reconstruction configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, UnshredError};

/// Tunables for the whole reconstruction pipeline.
///
/// The detection constants were tuned for one photo setup (lighting, scale,
/// strip thickness); expect to recalibrate them for other photographs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReassemblyConfig {
    /// Resize the photograph to this width before detection (`None` keeps it).
    pub resize_width: Option<u32>,
    /// Number of edge-based tightening passes applied to each cropped strip.
    pub approx_iterations: u32,
    /// Number of edge columns feeding each side histogram. Must be smaller
    /// than the narrowest strip.
    pub side_width: u32,
    /// Rectangle detector settings.
    pub detection: DetectionConfig,
    /// Strip crop refinement settings.
    pub refine: RefineConfig,
}

impl Default for ReassemblyConfig {
    fn default() -> Self {
        Self {
            resize_width: Some(800),
            approx_iterations: 2,
            side_width: 20,
            detection: DetectionConfig::default(),
            refine: RefineConfig::default(),
        }
    }
}

/// Settings for locating strip outlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Gaussian blur sigma applied before edge detection.
    pub blur_sigma: f32,
    /// Canny hysteresis thresholds.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Side of the square closing kernel, in pixels.
    pub close_kernel: u32,
    /// How many dilate (then erode) rounds the closing performs.
    pub close_iterations: u32,
    /// Rectangles smaller than this fraction of the largest are discarded.
    pub min_area_ratio: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.0,
            canny_low: 50.0,
            canny_high: 150.0,
            close_kernel: 10,
            close_iterations: 2,
            min_area_ratio: 0.5,
        }
    }
}

impl DetectionConfig {
    /// Chebyshev radius equivalent to `close_iterations` passes of a square
    /// `close_kernel` structuring element, saturated to what a `u8` holds.
    pub fn close_radius(&self) -> u8 {
        let radius = (self.close_kernel * self.close_iterations) / 2;
        radius.min(u8::MAX as u32) as u8
    }
}

/// Settings for the edge-based crop tightening of each strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    pub blur_sigma: f32,
    pub canny_low: f32,
    pub canny_high: f32,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.0,
            canny_low: 50.0,
            canny_high: 150.0,
        }
    }
}

impl ReassemblyConfig {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.side_width == 0 {
            return Err(UnshredError::InvalidArgument(
                "side_width must be positive".into(),
            ));
        }
        if self.resize_width == Some(0) {
            return Err(UnshredError::InvalidArgument(
                "resize_width must be positive when set".into(),
            ));
        }

        let det = &self.detection;
        if det.close_kernel == 0 {
            return Err(UnshredError::InvalidArgument(
                "detection.close_kernel must be positive".into(),
            ));
        }
        if !(det.min_area_ratio > 0.0 && det.min_area_ratio <= 1.0) {
            return Err(UnshredError::InvalidArgument(format!(
                "detection.min_area_ratio must be in (0, 1], got {}",
                det.min_area_ratio
            )));
        }
        if det.blur_sigma <= 0.0 || self.refine.blur_sigma <= 0.0 {
            return Err(UnshredError::InvalidArgument(
                "blur sigma must be positive".into(),
            ));
        }
        if det.canny_low > det.canny_high || self.refine.canny_low > self.refine.canny_high {
            return Err(UnshredError::InvalidArgument(
                "canny_low must not exceed canny_high".into(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
