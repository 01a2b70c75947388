// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: aspect-preserving resize, rotation without cropping,
// quarter/half turns, crops, and horizontal concatenation. Operates on
// in-memory RGB rasters using the `image` and `imageproc` crates.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, info, instrument};
use unshred_core::error::{Result, UnshredError};

/// Fill colour for pixels uncovered by a transform. Matches the background
/// left behind by strip masking.
const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Image processing pipeline operating on a single in-memory RGB image.
///
/// Every transformation consumes `self` and returns a new `ImageProcessor`,
/// enabling method chaining.
///
/// ```ignore
/// let strip = ImageProcessor::from_rgb(cropped)
///     .rotate_without_cropping(-12.5)
///     .rotate90()
///     .crop_center(40, 300)
///     .into_rgb();
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: RgbImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            UnshredError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self::from_dynamic(img))
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data).map_err(|err| {
            UnshredError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self::from_dynamic(img))
    }

    /// Wrap an already-decoded `DynamicImage`, dropping any alpha channel.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            image: image.to_rgb8(),
        }
    }

    pub fn from_rgb(image: RgbImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_rgb(self) -> RgbImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Scale to `width` pixels wide, keeping the aspect ratio.
    #[instrument(skip(self), fields(width))]
    pub fn resize_to_width(self, width: u32) -> Self {
        if width == 0 || width == self.image.width() {
            return self;
        }
        let ratio = width as f64 / self.image.width() as f64;
        let height = ((self.image.height() as f64 * ratio) as u32).max(1);
        self.resize_exact(width, height)
    }

    /// Scale to `height` pixels tall, keeping the aspect ratio.
    #[instrument(skip(self), fields(height))]
    pub fn resize_to_height(self, height: u32) -> Self {
        if height == 0 || height == self.image.height() {
            return self;
        }
        let ratio = height as f64 / self.image.height() as f64;
        let width = ((self.image.width() as f64 * ratio) as u32).max(1);
        self.resize_exact(width, height)
    }

    fn resize_exact(self, width: u32, height: u32) -> Self {
        debug!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            to_w = width,
            to_h = height,
            "Resizing image"
        );
        Self {
            image: imageops::resize(&self.image, width, height, FilterType::Triangle),
        }
    }

    /// Rotate by `degrees` counter-clockwise, growing the canvas so no corner
    /// is clipped. Uncovered pixels are black.
    ///
    /// For a `w` x `h` input the output is `h·|sin| + w·|cos|` wide and
    /// `h·|cos| + w·|sin|` tall. Multiples of 90 degrees are lossless.
    #[instrument(skip(self), fields(degrees))]
    pub fn rotate_without_cropping(self, degrees: f32) -> Self {
        let normalised = degrees.rem_euclid(360.0);
        if normalised < 0.01 || (normalised - 360.0).abs() < 0.01 {
            return self;
        }
        if (normalised - 90.0).abs() < 0.01 {
            return Self {
                image: imageops::rotate270(&self.image),
            };
        }
        if (normalised - 180.0).abs() < 0.01 {
            return self.rotate180();
        }
        if (normalised - 270.0).abs() < 0.01 {
            return self.rotate90();
        }

        let (w, h) = (self.image.width() as f32, self.image.height() as f32);
        let radians = degrees.to_radians();
        let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
        let out_w = ((h * sin + w * cos).round() as u32).max(1);
        let out_h = ((h * cos + w * sin).round() as u32).max(1);

        // `Projection::rotate` turns clockwise on screen, hence the negation.
        let projection = Projection::translate(out_w as f32 / 2.0, out_h as f32 / 2.0)
            * Projection::rotate(-radians)
            * Projection::translate(-w / 2.0, -h / 2.0);

        let mut output = RgbImage::new(out_w, out_h);
        warp_into(
            &self.image,
            &projection,
            Interpolation::Bilinear,
            BACKGROUND,
            &mut output,
        );

        debug!(out_w, out_h, "Rotation without cropping applied");
        Self { image: output }
    }

    /// Quarter turn clockwise.
    pub fn rotate90(self) -> Self {
        Self {
            image: imageops::rotate90(&self.image),
        }
    }

    /// Half turn.
    pub fn rotate180(self) -> Self {
        Self {
            image: imageops::rotate180(&self.image),
        }
    }

    /// Crop a rectangular region from the image.
    ///
    /// `x` and `y` are the top-left corner; `width` and `height` define the
    /// size of the crop rectangle. Values are clamped to image bounds.
    pub fn crop(self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let img_w = self.image.width();
        let img_h = self.image.height();

        let safe_x = x.min(img_w.saturating_sub(1));
        let safe_y = y.min(img_h.saturating_sub(1));
        let safe_w = width.min(img_w - safe_x);
        let safe_h = height.min(img_h - safe_y);

        let cropped = imageops::crop_imm(&self.image, safe_x, safe_y, safe_w, safe_h).to_image();
        Self { image: cropped }
    }

    /// Keep the central `width` x `height` window (clamped to the image).
    pub fn crop_center(self, width: u32, height: u32) -> Self {
        let width = width.min(self.image.width());
        let height = height.min(self.image.height());
        let x = (self.image.width() - width) / 2;
        let y = (self.image.height() - height) / 2;
        self.crop(x, y, width, height)
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| UnshredError::ImageError(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Write the image to a file. The format is inferred from the file extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.image.save(path.as_ref()).map_err(|err| {
            UnshredError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

/// Place `right` immediately after `left`. The canvas is as tall as the
/// taller input; any shortfall stays black.
pub fn concat_horizontal(left: &RgbImage, right: &RgbImage) -> RgbImage {
    let height = left.height().max(right.height());
    let mut output = RgbImage::from_pixel(left.width() + right.width(), height, BACKGROUND);
    imageops::replace(&mut output, left, 0, 0);
    imageops::replace(&mut output, right, left.width() as i64, 0);
    output
}
