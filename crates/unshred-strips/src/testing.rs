// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic photographs and strips shared by the unit tests.

use image::{Rgb, RgbImage};
use unshred_core::OrientedRect;

/// Dark table surface the strips lie on.
pub const BACKGROUND: Rgb<u8> = Rgb([25, 25, 30]);

pub fn fill_rect(img: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    for py in y..(y + height).min(img.height()) {
        for px in x..(x + width).min(img.width()) {
            img.put_pixel(px, py, color);
        }
    }
}

/// Paint every pixel inside `rect`. `shade` receives the pixel position in
/// the rectangle's own frame, measured from its top-left corner along the
/// width and height edges.
pub fn paint_oriented(img: &mut RgbImage, rect: &OrientedRect, shade: impl Fn(f32, f32) -> Rgb<u8>) {
    let (sin, cos) = rect.angle.to_radians().sin_cos();
    let (cx, cy) = rect.center;
    for y in 0..img.height() {
        for x in 0..img.width() {
            let (dx, dy) = (x as f32 - cx, y as f32 - cy);
            let along_width = dx * cos - dy * sin;
            let along_height = dx * sin + dy * cos;
            if along_width.abs() <= rect.width / 2.0 && along_height.abs() <= rect.height / 2.0 {
                let color = shade(along_width + rect.width / 2.0, along_height + rect.height / 2.0);
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// A page whose colour drifts from warm to cool across its width, with dark
/// "text" lines every 16 rows so every region has edges to find.
pub fn printed_page(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        if y % 16 < 3 && y > 4 && y + 4 < height {
            return Rgb([40, 40, 45]);
        }
        let t = x as f32 / width.max(1) as f32;
        let r = (235.0 - 120.0 * t) as u8;
        let g = (150.0 + 60.0 * (1.0 - (2.0 * t - 1.0).abs())) as u8;
        let b = (90.0 + 140.0 * t) as u8;
        Rgb([r, g, b])
    })
}

/// Cut `page` into vertical strips of `strip_width` columns.
pub fn cut_into_strips(page: &RgbImage, strip_width: u32) -> Vec<RgbImage> {
    (0..page.width() / strip_width)
        .map(|i| {
            image::imageops::crop_imm(page, i * strip_width, 0, strip_width, page.height()).to_image()
        })
        .collect()
}

/// Lay `strips` out left to right on the background with `gap` pixels around
/// each one.
pub fn photograph(strips: &[RgbImage], gap: u32) -> RgbImage {
    let width = strips.iter().map(|s| s.width() + gap).sum::<u32>() + gap;
    let height = strips.iter().map(|s| s.height()).max().unwrap_or(0) + 2 * gap;
    let mut photo = RgbImage::from_pixel(width, height, BACKGROUND);
    let mut x = gap;
    for strip in strips {
        image::imageops::replace(&mut photo, strip, x as i64, gap as i64);
        x += strip.width() + gap;
    }
    photo
}

/// A strip with solid colours on its left and right halves.
pub fn two_tone(width: u32, height: u32, left: Rgb<u8>, right: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| if x < width / 2 { left } else { right })
}
