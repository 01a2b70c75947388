// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end reconstruction: photograph in, reassembled page out.

use image::RgbImage;
use tracing::{info, instrument};
use unshred_core::error::Result;
use unshred_core::{OrientedRect, ReassemblyConfig};

use crate::raster::processor::ImageProcessor;
use crate::reassembly::assemble::{MergeRecord, assemble};
use crate::scan::detect::detect_rectangles;
use crate::scan::extract::extract_strips;

/// Everything one reconstruction run produced.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    /// The reassembled page.
    pub image: RgbImage,
    /// The (possibly resized) photograph the strips were detected in.
    pub detection_image: RgbImage,
    /// Strip outlines, in `detection_image` coordinates.
    pub rectangles: Vec<OrientedRect>,
    pub strip_count: usize,
    pub merges: Vec<MergeRecord>,
}

/// Runs resize → detect → extract → assemble with one configuration.
///
/// Every stage is fail-fast: the first error aborts the run and no partial
/// page is returned.
pub struct Reconstructor {
    config: ReassemblyConfig,
}

impl Reconstructor {
    pub fn new(config: ReassemblyConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ReassemblyConfig::default())
    }

    pub fn config(&self) -> &ReassemblyConfig {
        &self.config
    }

    /// Load a photograph from disk and reconstruct it.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn reconstruct_path(&self, path: impl AsRef<std::path::Path>) -> Result<Reconstruction> {
        let photo = ImageProcessor::open(path)?.into_rgb();
        self.reconstruct(&photo)
    }

    /// Reconstruct the page from a photograph of its strips.
    #[instrument(skip_all, fields(width = photo.width(), height = photo.height()))]
    pub fn reconstruct(&self, photo: &RgbImage) -> Result<Reconstruction> {
        self.config.validate()?;

        let detection_image = self.prepare(photo);
        let rectangles = detect_rectangles(&detection_image, &self.config.detection)?;
        let strips = extract_strips(
            &detection_image,
            &rectangles,
            self.config.approx_iterations,
            &self.config.refine,
        )?;
        let strip_count = strips.len();
        let reassembly = assemble(strips, self.config.side_width)?;

        info!(
            strips = strip_count,
            width = reassembly.image.width(),
            height = reassembly.image.height(),
            "Page reconstructed"
        );
        Ok(Reconstruction {
            image: reassembly.image,
            detection_image,
            rectangles,
            strip_count,
            merges: reassembly.merges,
        })
    }

    /// Apply the pre-detection resize, if configured.
    pub fn prepare(&self, photo: &RgbImage) -> RgbImage {
        match self.config.resize_width {
            Some(width) => ImageProcessor::from_rgb(photo.clone())
                .resize_to_width(width)
                .into_rgb(),
            None => photo.clone(),
        }
    }
}
