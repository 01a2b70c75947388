// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for strip reassembly.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::UnshredError;

/// A detected strip outline: a rotated rectangle in image coordinates.
///
/// `angle` is the rotation of the `width` edge from horizontal, in degrees,
/// positive counter-clockwise as seen on screen (image y grows downwards).
/// It is kept in the half-open range (-90, 90].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedRect {
    pub center: (f32, f32),
    pub width: f32,
    pub height: f32,
    pub angle: f32,
}

impl OrientedRect {
    pub fn new(center: (f32, f32), width: f32, height: f32, angle: f32) -> Self {
        Self {
            center,
            width,
            height,
            angle: normalize_angle(angle),
        }
    }

    /// Build a rectangle from four consecutive corners.
    ///
    /// The edge `corners[0] -> corners[1]` becomes the width edge and
    /// `corners[1] -> corners[2]` the height edge.
    pub fn from_corners(corners: &[(f32, f32); 4]) -> Self {
        let [a, b, c, _] = *corners;
        let cx = corners.iter().map(|p| p.0).sum::<f32>() / 4.0;
        let cy = corners.iter().map(|p| p.1).sum::<f32>() / 4.0;

        let width = distance(a, b);
        let height = distance(b, c);
        // Negate dy: a positive on-screen (counter-clockwise) angle points up.
        let angle = (-(b.1 - a.1)).atan2(b.0 - a.0).to_degrees();

        Self::new((cx, cy), width, height, angle)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// The longer of the two sides; strips are stored vertically so this is
    /// the strip height once extracted.
    pub fn long_side(&self) -> f32 {
        self.width.max(self.height)
    }

    pub fn short_side(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Corners in drawing order (each consecutive pair shares an edge).
    pub fn corners(&self) -> [(f32, f32); 4] {
        let radians = self.angle.to_radians();
        let (sin, cos) = radians.sin_cos();
        // Unit vectors along the width and height edges in image coordinates.
        let u = (cos, -sin);
        let v = (sin, cos);
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        let (cx, cy) = self.center;

        [
            (cx - u.0 * hw - v.0 * hh, cy - u.1 * hw - v.1 * hh),
            (cx + u.0 * hw - v.0 * hh, cy + u.1 * hw - v.1 * hh),
            (cx + u.0 * hw + v.0 * hh, cy + u.1 * hw + v.1 * hh),
            (cx - u.0 * hw + v.0 * hh, cy - u.1 * hw + v.1 * hh),
        ]
    }

    /// Axis-aligned bounds as `(min_x, min_y, max_x, max_y)`.
    pub fn bounding_box(&self) -> (f32, f32, f32, f32) {
        self.corners().iter().fold(
            (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
            |(min_x, min_y, max_x, max_y), &(x, y)| {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            },
        )
    }
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}

/// Fold an angle into (-90, 90]. A rectangle is unchanged by a half turn.
fn normalize_angle(degrees: f32) -> f32 {
    let mut angle = degrees % 180.0;
    if angle > 90.0 {
        angle -= 180.0;
    } else if angle <= -90.0 {
        angle += 180.0;
    }
    angle
}

/// Which vertical edge of a strip a fingerprint describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Single-letter label (`l` / `r`).
    pub fn label(&self) -> char {
        match self {
            Self::Left => 'l',
            Self::Right => 'r',
        }
    }
}

impl TryFrom<char> for Side {
    type Error = UnshredError;

    fn try_from(label: char) -> Result<Self, Self::Error> {
        match label.to_ascii_lowercase() {
            'l' => Ok(Self::Left),
            'r' => Ok(Self::Right),
            other => Err(UnshredError::InvalidArgument(format!(
                "unknown side label '{other}' (expected 'l' or 'r')"
            ))),
        }
    }
}

impl FromStr for Side {
    type Err = UnshredError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l" | "left" => Ok(Self::Left),
            "r" | "right" => Ok(Self::Right),
            _ => Err(UnshredError::InvalidArgument(format!(
                "unknown side label '{s}' (expected 'left' or 'right')"
            ))),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Which pair of edges produced the best match between an anchor and a
/// candidate, and therefore which of them must be turned upside down before
/// the candidate is appended to the anchor's right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pairing {
    /// Anchor right edge meets candidate left edge.
    Direct,
    /// Anchor right edge meets candidate right edge.
    FlipCandidate,
    /// Anchor left edge meets candidate left edge.
    FlipAnchor,
    /// Anchor left edge meets candidate right edge.
    FlipBoth,
}

impl Pairing {
    /// All pairings in scoring order. Earlier entries win ties.
    pub const ALL: [Pairing; 4] = [
        Pairing::Direct,
        Pairing::FlipCandidate,
        Pairing::FlipAnchor,
        Pairing::FlipBoth,
    ];

    /// The anchor and candidate edges compared by this pairing.
    pub fn sides(&self) -> (Side, Side) {
        match self {
            Self::Direct => (Side::Right, Side::Left),
            Self::FlipCandidate => (Side::Right, Side::Right),
            Self::FlipAnchor => (Side::Left, Side::Left),
            Self::FlipBoth => (Side::Left, Side::Right),
        }
    }

    /// The anchor matched on its left edge, so it is rotated 180°.
    pub fn flips_anchor(&self) -> bool {
        self.sides().0 == Side::Left
    }

    /// The candidate matched on its right edge, so it is rotated 180°.
    pub fn flips_candidate(&self) -> bool {
        self.sides().1 == Side::Right
    }
}
