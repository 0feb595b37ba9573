//! Synthetic sfnt fonts for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use bytes::BufMut;
use font_types::Tag;
use sfnt_glyphs::checksum::compute_checksum;

// simple glyph flags
const GLYF_ON_CURVE: u8 = 1 << 0;
const GLYF_X_SHORT: u8 = 1 << 1;
const GLYF_Y_SHORT: u8 = 1 << 2;
const GLYF_REPEAT: u8 = 1 << 3;
const GLYF_THIS_X_IS_SAME: u8 = 1 << 4;
const GLYF_THIS_Y_IS_SAME: u8 = 1 << 5;

pub const FLAG_ARG_1_AND_2_ARE_WORDS: u16 = 1 << 0;
pub const FLAG_ARGS_ARE_XY_VALUES: u16 = 1 << 1;
pub const FLAG_MORE_COMPONENTS: u16 = 1 << 5;

/// Round a value up to the nearest multiple of 4.
fn round4(value: usize) -> usize {
    (value + 3) & !3
}

#[derive(Copy, Clone)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    pub on_curve: bool,
}

pub fn on(x: i32, y: i32) -> Point {
    Point {
        x,
        y,
        on_curve: true,
    }
}

pub fn off(x: i32, y: i32) -> Point {
    Point {
        x,
        y,
        on_curve: false,
    }
}

/// Encode a simple glyph record.
pub fn simple_glyph(contours: &[&[Point]]) -> Vec<u8> {
    let points: Vec<Point> = contours.iter().flat_map(|c| c.iter().copied()).collect();
    let mut out = Vec::new();
    out.put_i16(contours.len() as i16);
    write_bbox(&points, &mut out);

    let mut end_point: i32 = -1;
    for contour in contours {
        end_point += contour.len() as i32;
        out.put_u16(end_point as u16);
    }
    out.put_u16(0); // instructionLength
    write_glyph_points(&points, &mut out);
    out
}

/// Encode a composite glyph whose components are placed at literal offsets
/// with no scale.
pub fn composite_glyph(components: &[(u16, i16, i16)]) -> Vec<u8> {
    let mut out = Vec::new();
    out.put_i16(-1);
    out.put_bytes(0, 8);
    for (i, &(glyph, dx, dy)) in components.iter().enumerate() {
        let mut flags = FLAG_ARGS_ARE_XY_VALUES | FLAG_ARG_1_AND_2_ARE_WORDS;
        if i + 1 < components.len() {
            flags |= FLAG_MORE_COMPONENTS;
        }
        out.put_u16(flags);
        out.put_u16(glyph);
        out.put_i16(dx);
        out.put_i16(dy);
    }
    out
}

fn write_bbox(points: &[Point], dst: &mut impl BufMut) {
    let x_min = points.iter().map(|p| p.x).min().unwrap_or(0);
    let y_min = points.iter().map(|p| p.y).min().unwrap_or(0);
    let x_max = points.iter().map(|p| p.x).max().unwrap_or(0);
    let y_max = points.iter().map(|p| p.y).max().unwrap_or(0);
    dst.put_i16(x_min as i16);
    dst.put_i16(y_min as i16);
    dst.put_i16(x_max as i16);
    dst.put_i16(y_max as i16);
}

// Flags are run-length encoded; coordinates use the short form when they fit.
fn write_glyph_points(points: &[Point], dst: &mut impl BufMut) {
    let mut flags = Vec::with_capacity(points.len());
    let mut last_x: i32 = 0;
    let mut last_y: i32 = 0;
    for point in points {
        let mut flag: u8 = 0;
        if point.on_curve {
            flag |= GLYF_ON_CURVE;
        }
        let dx: i32 = point.x - last_x;
        if dx == 0 {
            flag |= GLYF_THIS_X_IS_SAME;
        } else if dx > -256 && dx < 256 {
            flag |= GLYF_X_SHORT | (if dx > 0 { GLYF_THIS_X_IS_SAME } else { 0 });
        }
        let dy: i32 = point.y - last_y;
        if dy == 0 {
            flag |= GLYF_THIS_Y_IS_SAME;
        } else if dy > -256 && dy < 256 {
            flag |= GLYF_Y_SHORT | (if dy > 0 { GLYF_THIS_Y_IS_SAME } else { 0 });
        }
        flags.push(flag);
        last_x = point.x;
        last_y = point.y;
    }

    let mut i = 0;
    while i < flags.len() {
        let flag = flags[i];
        let run = flags[i + 1..]
            .iter()
            .take(255)
            .take_while(|&&f| f == flag)
            .count();
        if run > 0 {
            dst.put_u8(flag | GLYF_REPEAT);
            dst.put_u8(run as u8);
        } else {
            dst.put_u8(flag);
        }
        i += run + 1;
    }

    last_x = 0;
    for point in points {
        let dx: i32 = point.x - last_x;
        if dx == 0 {
            // do nothing
        } else if dx > -256 && dx < 256 {
            dst.put_u8(dx.unsigned_abs() as u8);
        } else {
            dst.put_i16(dx as i16)
        }
        last_x += dx;
    }

    last_y = 0;
    for point in points {
        let dy: i32 = point.y - last_y;
        if dy == 0 {
            // do nothing
        } else if dy > -256 && dy < 256 {
            dst.put_u8(dy.unsigned_abs() as u8);
        } else {
            dst.put_i16(dy as i16)
        }
        last_y += dy;
    }
}

/// cmap with a single format 12 subtable: each code in a group maps to the
/// next glyph.
pub fn cmap_format12(platform_id: u16, encoding_id: u16, groups: &[(u32, u32, u32)]) -> Vec<u8> {
    segmented_cmap(12, platform_id, encoding_id, groups)
}

/// cmap with a single format 13 subtable: every code in a group maps to the
/// same glyph.
pub fn cmap_format13(platform_id: u16, encoding_id: u16, groups: &[(u32, u32, u32)]) -> Vec<u8> {
    segmented_cmap(13, platform_id, encoding_id, groups)
}

fn segmented_cmap(
    format: u16,
    platform_id: u16,
    encoding_id: u16,
    groups: &[(u32, u32, u32)],
) -> Vec<u8> {
    let mut out = Vec::new();
    out.put_u16(0);
    out.put_u16(1);
    out.put_u16(platform_id);
    out.put_u16(encoding_id);
    out.put_u32(12);
    out.put_u16(format);
    out.put_u16(0);
    out.put_u32(16 + 12 * groups.len() as u32);
    out.put_u32(0);
    out.put_u32(groups.len() as u32);
    for &(start, end, glyph) in groups {
        out.put_u32(start);
        out.put_u32(end);
        out.put_u32(glyph);
    }
    out
}

pub struct FontBuilder {
    version: u32,
    units_per_em: u16,
    long_loca: bool,
    glyphs: Vec<Vec<u8>>,
    loca_override: Option<Vec<u32>>,
    cmap: Vec<u8>,
    tables: BTreeMap<Tag, Vec<u8>>,
    omitted: Vec<Tag>,
}

impl FontBuilder {
    pub fn new(units_per_em: u16) -> Self {
        Self {
            version: 0x00010000,
            units_per_em,
            long_loca: true,
            glyphs: Vec::new(),
            loca_override: None,
            cmap: cmap_format12(3, 10, &[]),
            tables: BTreeMap::new(),
            omitted: Vec::new(),
        }
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn short_loca(mut self) -> Self {
        self.long_loca = false;
        self
    }

    pub fn glyph(mut self, data: Vec<u8>) -> Self {
        self.glyphs.push(data);
        self
    }

    pub fn blank_glyph(self) -> Self {
        self.glyph(Vec::new())
    }

    pub fn cmap(mut self, cmap: Vec<u8>) -> Self {
        self.cmap = cmap;
        self
    }

    pub fn loca_offsets(mut self, offsets: Vec<u32>) -> Self {
        self.loca_override = Some(offsets);
        self
    }

    pub fn table(mut self, tag: &[u8; 4], data: Vec<u8>) -> Self {
        self.tables.insert(Tag::new(tag), data);
        self
    }

    pub fn without(mut self, tag: &[u8; 4]) -> Self {
        self.omitted.push(Tag::new(tag));
        self
    }

    fn head(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.put_u32(0x00010000);
        out.put_u32(0);
        out.put_u32(0); // checksumAdjustment
        out.put_u32(0x5F0F3CF5);
        out.put_u16(0);
        out.put_u16(self.units_per_em);
        out.put_bytes(0, 16);
        out.put_bytes(0, 8);
        out.put_bytes(0, 6);
        out.put_i16(if self.long_loca { 1 } else { 0 });
        out.put_i16(0);
        out
    }

    fn maxp(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.put_u32(0x00005000);
        out.put_u16(self.glyphs.len() as u16);
        out
    }

    fn glyf_and_loca(&self) -> (Vec<u8>, Vec<u8>) {
        let mut glyf = Vec::new();
        let mut offsets = Vec::with_capacity(self.glyphs.len() + 1);
        for glyph in &self.glyphs {
            offsets.push(glyf.len() as u32);
            glyf.extend_from_slice(glyph);
            glyf.resize(round4(glyf.len()), 0);
        }
        offsets.push(glyf.len() as u32);
        let offsets = self.loca_override.clone().unwrap_or(offsets);

        let mut loca = Vec::new();
        for offset in offsets {
            if self.long_loca {
                loca.put_u32(offset);
            } else {
                loca.put_u16((offset >> 1) as u16);
            }
        }
        (glyf, loca)
    }

    pub fn build(self) -> Vec<u8> {
        let (glyf, loca) = self.glyf_and_loca();
        let mut tables = self.tables.clone();
        tables.insert(Tag::new(b"head"), self.head());
        tables.insert(Tag::new(b"maxp"), self.maxp());
        tables.insert(Tag::new(b"loca"), loca);
        tables.insert(Tag::new(b"glyf"), glyf);
        tables.insert(Tag::new(b"cmap"), self.cmap.clone());
        for tag in &self.omitted {
            tables.remove(tag);
        }

        let mut out = Vec::new();
        out.put_u32(self.version);
        out.put_u16(tables.len() as u16);
        out.put_bytes(0, 6);

        let mut offset = 12 + 16 * tables.len();
        for (tag, data) in &tables {
            out.put_slice(&tag.to_be_bytes());
            out.put_u32(compute_checksum(data));
            out.put_u32(offset as u32);
            out.put_u32(data.len() as u32);
            offset += round4(data.len());
        }
        for data in tables.values() {
            out.extend_from_slice(data);
            out.resize(round4(out.len()), 0);
        }
        out
    }
}
