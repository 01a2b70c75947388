// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rectangle detection: finds the outline of every paper strip lying on a
// contrasting background.

use image::{GrayImage, Rgb, RgbImage, imageops};
use imageproc::contours::{BorderType, find_contours};
use imageproc::distance_transform::Norm;
use imageproc::drawing::draw_line_segment_mut;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometry::min_area_rect;
use imageproc::morphology::{dilate, erode};
use imageproc::point::Point;
use tracing::{debug, info, instrument};
use unshred_core::error::{Result, UnshredError};
use unshred_core::{DetectionConfig, OrientedRect};

/// Locate candidate strip outlines in `image`.
///
/// ## Pipeline
///
/// 1. Convert to grayscale and apply a Gaussian blur
/// 2. Canny edge detection
/// 3. Morphological closing (dilate, then erode) so the broken edge fragments
///    of one strip merge into a single outline
/// 4. Extract top-level outer contours only; holes and nested contours are
///    ignored because strips are solid regions
/// 5. Fit a minimum-area rotated rectangle to each contour
/// 6. Drop every rectangle smaller than `min_area_ratio` of the largest
///
/// The surviving rectangles are returned in no particular order.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn detect_rectangles(image: &RgbImage, config: &DetectionConfig) -> Result<Vec<OrientedRect>> {
    let gray = imageops::grayscale(image);
    let blurred = gaussian_blur_f32(&gray, config.blur_sigma);
    let edges = canny(&blurred, config.canny_low, config.canny_high);
    let closed = close_gaps(&edges, config.close_radius());

    let rectangles: Vec<OrientedRect> = find_contours::<i32>(&closed)
        .iter()
        .filter(|contour| contour.parent.is_none() && matches!(contour.border_type, BorderType::Outer))
        .map(|contour| fit_rectangle(&contour.points))
        .collect();
    debug!(candidates = rectangles.len(), "Outer contours fitted");

    let survivors = filter_by_area(rectangles, config.min_area_ratio)?;
    info!(rectangles = survivors.len(), "Strip outlines detected");
    Ok(survivors)
}

/// Keep the rectangles whose area is at least `min_ratio` times the largest.
///
/// Fails with `EmptyInput` when there is nothing to compare against: no
/// rectangles at all, or only degenerate ones.
pub fn filter_by_area(rectangles: Vec<OrientedRect>, min_ratio: f32) -> Result<Vec<OrientedRect>> {
    let max_area = rectangles
        .iter()
        .map(OrientedRect::area)
        .fold(None, |best: Option<f32>, area| Some(best.map_or(area, |b| b.max(area))))
        .ok_or_else(|| UnshredError::EmptyInput("no contours found in the photograph".into()))?;

    if max_area <= 0.0 {
        return Err(UnshredError::EmptyInput(
            "every detected outline has zero area".into(),
        ));
    }

    let threshold = max_area * min_ratio;
    let (kept, dropped): (Vec<_>, Vec<_>) = rectangles
        .into_iter()
        .partition(|rect| rect.area() >= threshold);
    debug!(
        max_area,
        threshold,
        kept = kept.len(),
        dropped = dropped.len(),
        "Area filter applied"
    );
    Ok(kept)
}

/// Draw each rectangle's outline on a copy of `image` (debug overlay).
pub fn draw_rectangles(image: &RgbImage, rectangles: &[OrientedRect]) -> RgbImage {
    let mut canvas = image.clone();
    for rect in rectangles {
        let corners = rect.corners();
        for i in 0..4 {
            draw_line_segment_mut(&mut canvas, corners[i], corners[(i + 1) % 4], Rgb([0, 255, 0]));
        }
    }
    canvas
}

/// Dilate then erode with a square structuring element of the given radius.
fn close_gaps(edges: &GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return edges.clone();
    }
    let dilated = dilate(edges, Norm::LInf, radius);
    erode(&dilated, Norm::LInf, radius)
}

fn fit_rectangle(points: &[Point<i32>]) -> OrientedRect {
    let box_points = min_area_rect(points);
    let corners = box_points.map(|p| (p.x as f32, p.y as f32));
    OrientedRect::from_corners(&corners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BACKGROUND, fill_rect, paint_oriented};

    #[test]
    fn one_strip_survives_among_small_fragments() {
        let mut img = RgbImage::from_pixel(400, 400, BACKGROUND);
        fill_rect(&mut img, 150, 40, 60, 320, Rgb([220, 210, 190]));
        fill_rect(&mut img, 20, 20, 12, 12, Rgb([200, 200, 200]));
        fill_rect(&mut img, 20, 350, 14, 10, Rgb([200, 200, 200]));
        fill_rect(&mut img, 350, 30, 10, 16, Rgb([200, 200, 200]));

        let rects = detect_rectangles(&img, &DetectionConfig::default()).unwrap();
        assert_eq!(rects.len(), 1);
        let rect = rects[0];
        assert!((rect.long_side() - 320.0).abs() < 6.0, "long side {}", rect.long_side());
        assert!((rect.short_side() - 60.0).abs() < 6.0, "short side {}", rect.short_side());
    }

    #[test]
    fn separated_strips_are_found_individually() {
        let mut img = RgbImage::from_pixel(400, 400, BACKGROUND);
        for x in [40, 150, 260] {
            fill_rect(&mut img, x, 40, 50, 320, Rgb([230, 225, 200]));
        }

        let rects = detect_rectangles(&img, &DetectionConfig::default()).unwrap();
        assert_eq!(rects.len(), 3);
        for rect in rects {
            assert!((rect.short_side() - 50.0).abs() < 6.0);
        }
    }

    #[test]
    fn rotated_strip_recovers_long_axis() {
        let mut img = RgbImage::from_pixel(400, 400, BACKGROUND);
        let strip = OrientedRect::new((200.0, 200.0), 50.0, 300.0, 20.0);
        paint_oriented(&mut img, &strip, |_, _| Rgb([230, 220, 200]));

        let rects = detect_rectangles(&img, &DetectionConfig::default()).unwrap();
        assert_eq!(rects.len(), 1);
        let rect = rects[0];
        // Direction of the long side, folded into (-90, 90].
        let long_axis = if rect.height >= rect.width {
            OrientedRect::new(rect.center, 1.0, 1.0, rect.angle + 90.0).angle
        } else {
            rect.angle
        };
        assert!((long_axis + 70.0).abs() < 3.0, "long axis at {long_axis}");
    }

    #[test]
    fn blank_photo_is_empty_input() {
        let img = RgbImage::from_pixel(120, 120, BACKGROUND);
        let result = detect_rectangles(&img, &DetectionConfig::default());
        assert!(matches!(result, Err(UnshredError::EmptyInput(_))));
    }

    #[test]
    fn area_filter_keeps_at_least_half_of_max() {
        let rects = vec![
            OrientedRect::new((0.0, 0.0), 10.0, 100.0, 0.0),
            OrientedRect::new((0.0, 0.0), 10.0, 50.0, 0.0),
            OrientedRect::new((0.0, 0.0), 10.0, 49.0, 0.0),
            OrientedRect::new((0.0, 0.0), 3.0, 3.0, 0.0),
            OrientedRect::new((0.0, 0.0), 9.0, 80.0, 30.0),
        ];
        let kept = filter_by_area(rects.clone(), 0.5).unwrap();
        assert_eq!(kept.len(), 3);
        assert!(kept.iter().all(|r| r.area() >= 500.0));

        let dropped: Vec<_> = rects.iter().filter(|r| !kept.contains(r)).collect();
        assert_eq!(dropped.len(), 2);
        assert!(dropped.iter().all(|r| r.area() < 500.0));
    }

    #[test]
    fn area_filter_on_nothing_is_empty_input() {
        assert!(matches!(
            filter_by_area(Vec::new(), 0.5),
            Err(UnshredError::EmptyInput(_))
        ));
        let flat = vec![OrientedRect::new((1.0, 1.0), 0.0, 5.0, 0.0)];
        assert!(matches!(
            filter_by_area(flat, 0.5),
            Err(UnshredError::EmptyInput(_))
        ));
    }

    #[test]
    fn overlay_keeps_dimensions() {
        let img = RgbImage::from_pixel(50, 50, BACKGROUND);
        let rect = OrientedRect::new((25.0, 25.0), 10.0, 30.0, 15.0);
        let overlay = draw_rectangles(&img, &[rect]);
        assert_eq!(overlay.dimensions(), img.dimensions());
        assert!(overlay.pixels().any(|p| *p == Rgb([0, 255, 0])));
    }
}
