//! `glyf` table decoding
//!
//! <https://learn.microsoft.com/en-us/typography/opentype/spec/glyf>

pub mod composite;
pub mod contour;

use arrayvec::ArrayVec;
use bytes::Buf;
use font_types::F2Dot14;

use crate::buffer::FontCursor;
use crate::error::{FontError, Result, bail_if, bail_with_msg_if};
use crate::outline::{BoundingBox, CompositeReference, Glyph, Point};
use crate::tables::{FontHeader, LocaTable};
use crate::types::TableEntry;

pub use composite::resolve_outlines;
pub use contour::{ContourPoint, normalize_contour, normalize_points};

// simple glyph flags
const GLYF_ON_CURVE: u8 = 1 << 0;
const GLYF_X_SHORT: u8 = 1 << 1;
const GLYF_Y_SHORT: u8 = 1 << 2;
const GLYF_REPEAT: u8 = 1 << 3;
const GLYF_THIS_X_IS_SAME: u8 = 1 << 4;
const GLYF_THIS_Y_IS_SAME: u8 = 1 << 5;

// composite glyph flags
const FLAG_ARG_1_AND_2_ARE_WORDS: u16 = 1 << 0;
const FLAG_ARGS_ARE_XY_VALUES: u16 = 1 << 1;
const FLAG_WE_HAVE_A_SCALE: u16 = 1 << 3;
const FLAG_MORE_COMPONENTS: u16 = 1 << 5;
const FLAG_WE_HAVE_AN_X_AND_Y_SCALE: u16 = 1 << 6;
const FLAG_WE_HAVE_A_TWO_BY_TWO: u16 = 1 << 7;
const FLAG_SCALED_COMPONENT_OFFSET: u16 = 1 << 11;
const FLAG_UNSCALED_COMPONENT_OFFSET: u16 = 1 << 12;

/// The raw `glyf` table together with the metadata needed to decode it.
pub struct GlyfTable<'a> {
    data: &'a [u8],
    scale: f32,
}

impl<'a> GlyfTable<'a> {
    pub fn read(font: &FontCursor<'a>, entry: &TableEntry, header: &FontHeader) -> Result<Self> {
        Ok(Self {
            data: entry.data_as_slice(font.buffer())?,
            scale: header.scale(),
        })
    }

    /// Decode glyph `glyph` located by `loca`.
    ///
    /// An empty `loca` range is a blank glyph, not an error.
    pub fn glyph(&self, loca: &LocaTable, glyph: u32) -> Result<Glyph> {
        let range = loca
            .glyph_range(glyph as usize)
            .ok_or_else(|| FontError::corrupt(format!("glyph {glyph} is not in loca")))?;
        if range.is_empty() {
            return Ok(Glyph::blank());
        }
        let data = self
            .data
            .get(range.clone())
            .ok_or(FontError::UnexpectedEndOfData {
                requested: range.end,
                available: self.data.len(),
            })?;
        decode_glyph(data, glyph, self.scale)
    }
}

/// Decode one glyph record. `scale` converts font units to em units.
///
/// Composite references are recorded, not expanded; see [`resolve_outlines`].
pub fn decode_glyph(data: &[u8], glyph: u32, scale: f32) -> Result<Glyph> {
    let mut input = FontCursor::new(data);
    let num_contours = input.try_get_i16()?;
    let bounding_box = read_bounding_box(&mut input, scale)?;

    if num_contours >= 0 {
        let contours = read_simple_contours(&mut input, num_contours as usize, scale)?;
        Ok(Glyph::Simple {
            contours: contours
                .iter()
                .map(|points| normalize_contour(points))
                .collect(),
            bounding_box,
        })
    } else {
        Ok(Glyph::Composite {
            references: read_components(&mut input, glyph, scale)?,
            bounding_box,
        })
    }
}

fn read_bounding_box(input: &mut impl Buf, scale: f32) -> Result<BoundingBox> {
    let x_min = input.try_get_i16()?;
    let y_min = input.try_get_i16()?;
    let x_max = input.try_get_i16()?;
    let y_max = input.try_get_i16()?;
    Ok(BoundingBox {
        min: Point::new(x_min as f32 * scale, y_min as f32 * scale),
        max: Point::new(x_max as f32 * scale, y_max as f32 * scale),
    })
}

/// Read the points of a simple glyph, split into contours.
fn read_simple_contours(
    input: &mut FontCursor<'_>,
    num_contours: usize,
    scale: f32,
) -> Result<Vec<Vec<ContourPoint>>> {
    if num_contours == 0 {
        return Ok(Vec::new());
    }

    let end_points = input.read_u16_array(num_contours)?;
    bail_with_msg_if!(
        end_points.windows(2).any(|pair| pair[1] <= pair[0]),
        FontError::corrupt("contour end points are not increasing"),
        "endPtsOfContours: {:?}",
        end_points
    );
    let num_points = end_points[num_contours - 1] as usize + 1;

    let instruction_length = input.try_get_u16()? as usize;
    input.skip(instruction_length)?;

    let flags = read_flags(input, num_points)?;
    let xs = read_coordinates(input, &flags, GLYF_X_SHORT, GLYF_THIS_X_IS_SAME)?;
    let ys = read_coordinates(input, &flags, GLYF_Y_SHORT, GLYF_THIS_Y_IS_SAME)?;

    let mut contours = Vec::with_capacity(num_contours);
    let mut start = 0usize;
    for &end in &end_points {
        let end = end as usize + 1;
        contours.push(
            (start..end)
                .map(|i| ContourPoint {
                    point: Point::new(xs[i] as f32 * scale, ys[i] as f32 * scale),
                    on_curve: flags[i] & GLYF_ON_CURVE != 0,
                })
                .collect(),
        );
        start = end;
    }
    Ok(contours)
}

/// Expand the run-length encoded flag array to one flag per point.
fn read_flags(input: &mut impl Buf, num_points: usize) -> Result<Vec<u8>> {
    let mut flags: Vec<u8> = Vec::with_capacity(num_points);
    while flags.len() < num_points {
        let flag = input.try_get_u8()?;
        flags.push(flag);
        if flag & GLYF_REPEAT != 0 {
            let repeat_count = input.try_get_u8()? as usize;
            bail_if!(
                flags.len() + repeat_count > num_points,
                FontError::corrupt("flag repeat runs past the last point")
            );
            flags.extend(std::iter::repeat_n(flag, repeat_count));
        }
    }
    Ok(flags)
}

/// Decode one delta-encoded coordinate array into absolute values.
///
/// With the short bit set a coordinate is a u8 whose sign comes from the
/// same-or-positive bit. Without it, the same-or-positive bit means "repeat
/// the previous value" and otherwise an i16 delta follows.
fn read_coordinates(
    input: &mut impl Buf,
    flags: &[u8],
    short_bit: u8,
    same_or_positive_bit: u8,
) -> Result<Vec<i32>> {
    let mut value: i32 = 0;
    let mut coordinates = Vec::with_capacity(flags.len());
    for &flag in flags {
        let delta: i32 = if flag & short_bit != 0 {
            let magnitude = input.try_get_u8()? as i32;
            if flag & same_or_positive_bit != 0 { magnitude } else { -magnitude }
        } else if flag & same_or_positive_bit != 0 {
            0
        } else {
            input.try_get_i16()? as i32
        };
        value += delta;
        coordinates.push(value);
    }
    Ok(coordinates)
}

/// Read the component records of a composite glyph.
fn read_components(
    input: &mut impl Buf,
    glyph: u32,
    scale: f32,
) -> Result<Vec<CompositeReference>> {
    let mut references = Vec::new();
    let mut flags: u16 = FLAG_MORE_COMPONENTS;
    while flags & FLAG_MORE_COMPONENTS != 0 {
        flags = input.try_get_u16()?;
        let glyph_ref = input.try_get_u16()? as u32;

        let (arg1, arg2) = if flags & FLAG_ARG_1_AND_2_ARE_WORDS != 0 {
            (input.try_get_i16()? as i32, input.try_get_i16()? as i32)
        } else {
            (input.try_get_i8()? as i32, input.try_get_i8()? as i32)
        };
        // Without ARGS_ARE_XY_VALUES the arguments are point numbers to match
        bail_if!(
            flags & FLAG_ARGS_ARE_XY_VALUES == 0,
            FontError::UnsupportedCompositeAnchoring { glyph }
        );

        let num_components = if flags & FLAG_WE_HAVE_A_SCALE != 0 {
            1
        } else if flags & FLAG_WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            2
        } else if flags & FLAG_WE_HAVE_A_TWO_BY_TWO != 0 {
            4
        } else {
            0
        };
        let mut components: ArrayVec<f32, 4> = ArrayVec::new();
        for _ in 0..num_components {
            components.push(F2Dot14::from_bits(input.try_get_i16()?).to_f32());
        }

        let mut reference = CompositeReference::identity(glyph_ref);
        match components.as_slice() {
            &[uniform] => {
                reference.x_axis = Point::new(uniform, 0.0);
                reference.y_axis = Point::new(0.0, uniform);
            }
            &[x_scale, y_scale] => {
                reference.x_axis = Point::new(x_scale, 0.0);
                reference.y_axis = Point::new(0.0, y_scale);
            }
            &[xx, xy, yx, yy] => {
                reference.x_axis = Point::new(xx, xy);
                reference.y_axis = Point::new(yx, yy);
            }
            _ => {}
        }

        let offset = Point::new(arg1 as f32 * scale, arg2 as f32 * scale);
        reference.offset = if flags & FLAG_SCALED_COMPONENT_OFFSET != 0
            && flags & FLAG_UNSCALED_COMPONENT_OFFSET == 0
        {
            reference.x_axis * offset.x + reference.y_axis * offset.y
        } else {
            offset
        };

        references.push(reference);
    }
    Ok(references)
}
