// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Strip extraction: cut each detected rectangle out of the photograph as an
// upright, tightly cropped image.

use image::{GrayImage, Luma, Rgb, RgbImage, imageops};
use imageproc::drawing::draw_polygon_mut;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::point::Point;
use tracing::{debug, info, instrument};
use unshred_core::error::{Result, UnshredError};
use unshred_core::{OrientedRect, RefineConfig};

use crate::raster::processor::ImageProcessor;

/// Extract one strip image per rectangle, in the same order.
///
/// Fails on the first strip that collapses to nothing; no partial result is
/// returned.
#[instrument(skip_all, fields(rectangles = rectangles.len(), approx_iterations = approx_iterations))]
pub fn extract_strips(
    image: &RgbImage,
    rectangles: &[OrientedRect],
    approx_iterations: u32,
    refine: &RefineConfig,
) -> Result<Vec<RgbImage>> {
    let strips = rectangles
        .iter()
        .enumerate()
        .map(|(index, rect)| extract_strip(image, rect, index, approx_iterations, refine))
        .collect::<Result<Vec<_>>>()?;
    info!(strips = strips.len(), "Strips extracted");
    Ok(strips)
}

/// Cut out the strip outlined by `rect`.
///
/// 1. Mask everything outside the rectangle and crop to its bounding box
/// 2. Undo the rectangle's rotation on a canvas large enough to keep every corner
/// 3. Turn a quarter if the result is wider than tall
/// 4. Centre-crop to the rectangle's own size, removing the rotation padding
/// 5. `approx_iterations` times, crop to the bounding box of Canny edges
///
/// `index` only labels the `EmptyRegion` error.
pub fn extract_strip(
    image: &RgbImage,
    rect: &OrientedRect,
    index: usize,
    approx_iterations: u32,
    refine: &RefineConfig,
) -> Result<RgbImage> {
    let isolated = isolate(image, rect).ok_or(UnshredError::EmptyRegion { strip: index })?;

    let mut strip = ImageProcessor::from_rgb(isolated).rotate_without_cropping(-rect.angle);
    if strip.width() > strip.height() {
        strip = strip.rotate90();
    }

    let target_w = (rect.short_side().round() as u32).max(1);
    let target_h = (rect.long_side().round() as u32).max(1);
    strip = strip.crop_center(target_w, target_h);

    for pass in 0..approx_iterations {
        strip = tighten_to_edges(strip, refine).ok_or(UnshredError::EmptyRegion { strip: index })?;
        debug!(
            strip = index,
            pass,
            width = strip.width(),
            height = strip.height(),
            "Crop tightened"
        );
    }

    // Tightening can trim a short strip into a wide one.
    if strip.width() > strip.height() {
        strip = strip.rotate90();
    }

    debug!(
        strip = index,
        width = strip.width(),
        height = strip.height(),
        "Strip extracted"
    );
    Ok(strip.into_rgb())
}

/// Copy the pixels inside `rect` onto a black canvas the size of its
/// bounding box (clamped to the image). `None` if nothing is left.
fn isolate(image: &RgbImage, rect: &OrientedRect) -> Option<RgbImage> {
    if rect.short_side() < 1.0 || image.width() == 0 || image.height() == 0 {
        return None;
    }

    let (min_x, min_y, max_x, max_y) = rect.bounding_box();
    let x0 = min_x.floor().max(0.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let x1 = (max_x.ceil() as i64).min(image.width() as i64 - 1);
    let y1 = (max_y.ceil() as i64).min(image.height() as i64 - 1);
    if x1 < x0 as i64 || y1 < y0 as i64 {
        return None;
    }
    let width = (x1 - x0 as i64 + 1) as u32;
    let height = (y1 - y0 as i64 + 1) as u32;

    let mut polygon: Vec<Point<i32>> = Vec::with_capacity(4);
    for (x, y) in rect.corners() {
        let point = Point::new(
            (x - x0 as f32).round() as i32,
            (y - y0 as f32).round() as i32,
        );
        if polygon.last() != Some(&point) {
            polygon.push(point);
        }
    }
    // The polygon must not be explicitly closed.
    if polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
    }
    if polygon.len() < 3 {
        return None;
    }

    let mut mask = GrayImage::new(width, height);
    draw_polygon_mut(&mut mask, &polygon, Luma([255u8]));

    Some(RgbImage::from_fn(width, height, |x, y| {
        if mask.get_pixel(x, y).0[0] > 0 {
            *image.get_pixel(x0 + x, y0 + y)
        } else {
            Rgb([0, 0, 0])
        }
    }))
}

/// Crop to the bounding box of the strip's Canny edges.
fn tighten_to_edges(strip: ImageProcessor, refine: &RefineConfig) -> Option<ImageProcessor> {
    let gray = imageops::grayscale(strip.as_rgb());
    let blurred = gaussian_blur_f32(&gray, refine.blur_sigma);
    let edges = canny(&blurred, refine.canny_low, refine.canny_high);
    let (x0, y0, x1, y1) = nonzero_bounds(&edges)?;
    Some(strip.crop(x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}

/// Inclusive bounds `(min_x, min_y, max_x, max_y)` of the nonzero pixels.
fn nonzero_bounds(mask: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    mask.enumerate_pixels()
        .filter(|(_, _, pixel)| pixel.0[0] > 0)
        .fold(None, |bounds, (x, y, _)| match bounds {
            None => Some((x, y, x, y)),
            Some((min_x, min_y, max_x, max_y)) => {
                Some((min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)))
            }
        })
}
