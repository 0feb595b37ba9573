//! Decoded glyph data, in coordinates normalized to the em square.

use std::ops::{Add, Mul};

/// A point in normalized design space (font units divided by `unitsPerEm`).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, scale: f32) -> Point {
        Point::new(self.x * scale, self.y * scale)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

/// One quadratic Bézier piece: an on-curve anchor followed by its control point.
///
/// The curve runs from `anchor` through `control` to the anchor of the next
/// segment in the contour. A control equal to its anchor is a straight edge.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadraticSegment {
    pub anchor: Point,
    pub control: Point,
}

impl QuadraticSegment {
    pub fn is_line(&self) -> bool {
        self.anchor == self.control
    }
}

/// A closed contour made of quadratic segments; the last segment's control
/// point leads back to the first segment's anchor.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadraticContour {
    pub segments: Vec<QuadraticSegment>,
}

impl QuadraticContour {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The alternating anchor/control point sequence.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.segments
            .iter()
            .flat_map(|segment| [segment.anchor, segment.control])
    }

    fn transformed(&self, transform: &CompositeReference) -> QuadraticContour {
        QuadraticContour {
            segments: self
                .segments
                .iter()
                .map(|segment| QuadraticSegment {
                    anchor: transform.apply(segment.anchor),
                    control: transform.apply(segment.control),
                })
                .collect(),
        }
    }
}

/// A component of a composite glyph.
///
/// A point `p` of the referenced glyph lands at
/// `x_axis * p.x + y_axis * p.y + offset`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositeReference {
    pub glyph_ref: u32,
    pub x_axis: Point,
    pub y_axis: Point,
    /// Translation, normalized to the em square.
    pub offset: Point,
}

impl CompositeReference {
    pub fn identity(glyph_ref: u32) -> Self {
        Self {
            glyph_ref,
            x_axis: Point::new(1.0, 0.0),
            y_axis: Point::new(0.0, 1.0),
            offset: Point::ZERO,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        self.x_axis * p.x + self.y_axis * p.y + self.offset
    }

    /// Place a component's contours in the composite's coordinate space.
    pub fn transform_contours(&self, contours: &[QuadraticContour]) -> Vec<QuadraticContour> {
        contours
            .iter()
            .map(|contour| contour.transformed(self))
            .collect()
    }
}

/// A decoded glyph record, one per glyph index.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Glyph {
    Simple {
        contours: Vec<QuadraticContour>,
        bounding_box: BoundingBox,
    },
    Composite {
        references: Vec<CompositeReference>,
        /// Bounding box from the glyph header
        bounding_box: BoundingBox,
    },
}

impl Glyph {
    /// A glyph with no outline (an empty `loca` range, or a glyph that failed
    /// to decode).
    pub fn blank() -> Self {
        Glyph::Simple {
            contours: Vec::new(),
            bounding_box: BoundingBox::default(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Glyph::Composite { .. })
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Self::blank()
    }
}

/// The renderable contours of a glyph after composite references have been
/// expanded.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outline {
    pub contours: Vec<QuadraticContour>,
    pub bounding_box: BoundingBox,
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        self.contours.iter().all(QuadraticContour::is_empty)
    }

    pub fn point_count(&self) -> usize {
        self.contours.iter().map(|contour| contour.len() * 2).sum()
    }
}
