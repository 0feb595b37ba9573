//! Conversion of TrueType contours into explicit quadratic segments.
//!
//! TrueType leaves two kinds of points implicit: the on-curve point halfway
//! between two consecutive off-curve points, and the (degenerate) control
//! point of a straight edge between two on-curve points. Normalizing makes
//! both explicit so every contour is a strict anchor/control alternation.

use crate::outline::{Point, QuadraticContour, QuadraticSegment};

/// A contour point with its on-curve flag.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContourPoint {
    pub point: Point,
    pub on_curve: bool,
}

impl ContourPoint {
    pub const fn anchor(point: Point) -> Self {
        Self {
            point,
            on_curve: true,
        }
    }

    pub const fn control(point: Point) -> Self {
        Self {
            point,
            on_curve: false,
        }
    }
}

/// Insert the implied points of a closed contour.
///
/// Every adjacency of the input (including last to first) is classified once
/// using the original flags. The result starts with an anchor, has even
/// length and alternates anchor/control when walked cyclically.
pub fn normalize_points(points: &[ContourPoint]) -> Vec<ContourPoint> {
    let mut normalized: Vec<ContourPoint> = Vec::with_capacity(points.len() * 2);
    for (i, current) in points.iter().enumerate() {
        let next = &points[(i + 1) % points.len()];
        normalized.push(*current);
        match (current.on_curve, next.on_curve) {
            (false, false) => {
                normalized.push(ContourPoint::anchor(current.point.midpoint(next.point)))
            }
            // Control on top of its anchor: the quadratic degenerates to a line
            (true, true) => normalized.push(ContourPoint::control(current.point)),
            _ => {}
        }
    }

    if let Some(first_anchor) = normalized.iter().position(|p| p.on_curve) {
        normalized.rotate_left(first_anchor);
    }
    debug_assert!(normalized.len() % 2 == 0);
    normalized
}

/// Normalize a contour and group it into (anchor, control) segments.
pub fn normalize_contour(points: &[ContourPoint]) -> QuadraticContour {
    let normalized = normalize_points(points);
    QuadraticContour {
        segments: normalized
            .chunks_exact(2)
            .map(|pair| QuadraticSegment {
                anchor: pair[0].point,
                control: pair[1].point,
            })
            .collect(),
    }
}
