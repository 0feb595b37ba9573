use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use bytes::Buf;

use crate::buffer::{FontCursor, SeekFrom};
use crate::error::{FontError, Result, bail_if};
use crate::types::TableEntry;

const PLATFORM_UNICODE: u16 = 0;
const PLATFORM_WINDOWS: u16 = 3;
const WINDOWS_UNICODE_BMP: u16 = 1;
const WINDOWS_UNICODE_FULL: u16 = 10;

/// Which encoding subtable of `cmap` to decode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CmapSelection {
    /// The first subtable in directory order.
    #[default]
    First,
    /// A Unicode subtable, preferring full-repertoire encodings. Falls back to
    /// the first subtable when the font has no Unicode encoding.
    PreferUnicode,
    /// The subtable with exactly this platform and encoding.
    Exact { platform_id: u16, encoding_id: u16 },
}

/// An entry of the `cmap` encoding record list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CmapSubtableRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    /// Offset of the subtable from the start of `cmap`
    pub offset: u32,
}

impl CmapSubtableRecord {
    fn parse(input: &mut impl Buf) -> Result<Self> {
        Ok(Self {
            platform_id: input.try_get_u16()?,
            encoding_id: input.try_get_u16()?,
            offset: input.try_get_u32()?,
        })
    }

    /// Rank for [`CmapSelection::PreferUnicode`]; higher is better.
    fn unicode_rank(&self) -> Option<u8> {
        match (self.platform_id, self.encoding_id) {
            (PLATFORM_WINDOWS, WINDOWS_UNICODE_FULL) => Some(4),
            (PLATFORM_UNICODE, 4 | 6) => Some(4),
            (PLATFORM_UNICODE, 3) => Some(3),
            (PLATFORM_WINDOWS, WINDOWS_UNICODE_BMP) => Some(2),
            (PLATFORM_UNICODE, _) => Some(1),
            _ => None,
        }
    }
}

/// Character code to glyph index mapping decoded from one `cmap` subtable.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterMap {
    pub platform_id: u16,
    pub encoding_id: u16,
    /// Format of the decoded subtable
    pub format: u16,
    /// Glyph returned for codes the subtable does not map.
    pub default_glyph: u32,
    entries: BTreeMap<u32, u32>,
}

impl CharacterMap {
    /// Decode the `cmap` subtable chosen by `selection`.
    pub fn read(
        font: &FontCursor<'_>,
        entry: &TableEntry,
        selection: CmapSelection,
        num_glyphs: u16,
    ) -> Result<Self> {
        let mut input = font.table(entry)?;
        let _version = input.try_get_u16()?;
        let num_subtables = input.try_get_u16()?;

        let mut records = Vec::with_capacity(num_subtables as usize);
        for _ in 0..num_subtables {
            records.push(CmapSubtableRecord::parse(&mut input)?);
        }
        bail_if!(
            records.is_empty(),
            FontError::corrupt("cmap has no encoding subtables")
        );

        let record = select_subtable(&records, selection)?;
        input.seek(SeekFrom::Start(record.offset as usize))?;
        let format = input.try_get_u16()?;
        log::debug!(
            "cmap: using subtable platform {} encoding {} format {format}",
            record.platform_id,
            record.encoding_id
        );

        let mut mappings = Mappings::new(num_glyphs);
        match format {
            0 => read_format0(&mut input, &mut mappings)?,
            4 => read_format4(&mut input, &mut mappings)?,
            6 => read_format6(&mut input, &mut mappings)?,
            12 | 13 => read_segmented_coverage(&mut input, format, &mut mappings)?,
            other => return Err(FontError::UnsupportedCmapFormat(other)),
        }
        if mappings.dropped > 0 {
            log::warn!(
                "cmap: dropped {} mappings to glyphs beyond numGlyphs ({num_glyphs})",
                mappings.dropped
            );
        }
        if mappings.overlapping > 0 {
            log::warn!(
                "cmap: ignored {} codes covered by an earlier segment",
                mappings.overlapping
            );
        }

        Ok(Self {
            platform_id: record.platform_id,
            encoding_id: record.encoding_id,
            format,
            default_glyph: 0,
            entries: mappings.entries,
        })
    }

    pub fn with_default_glyph(mut self, glyph: u32) -> Self {
        self.default_glyph = glyph;
        self
    }

    /// Glyph for `code`, or the default glyph if the code is not mapped.
    pub fn glyph_for(&self, code: u32) -> u32 {
        self.entries
            .get(&code)
            .copied()
            .unwrap_or(self.default_glyph)
    }

    pub fn get(&self, code: u32) -> Option<u32> {
        self.entries.get(&code).copied()
    }

    /// Mapped codes in ascending order with their glyphs.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.entries.iter().map(|(&code, &glyph)| (code, glyph))
    }

    /// Codes that map to `glyph`.
    pub fn codes_for_glyph(&self, glyph: u32) -> Vec<u32> {
        self.iter()
            .filter(|&(_, g)| g == glyph)
            .map(|(code, _)| code)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn select_subtable(
    records: &[CmapSubtableRecord],
    selection: CmapSelection,
) -> Result<CmapSubtableRecord> {
    match selection {
        CmapSelection::First => Ok(records[0]),
        CmapSelection::PreferUnicode => {
            // max_by_key keeps the last maximum, so walk in reverse to keep the first
            let best = records
                .iter()
                .rev()
                .filter_map(|record| record.unicode_rank().map(|rank| (rank, record)))
                .max_by_key(|(rank, _)| *rank)
                .map(|(_, record)| *record);
            Ok(best.unwrap_or(records[0]))
        }
        CmapSelection::Exact {
            platform_id,
            encoding_id,
        } => records
            .iter()
            .find(|r| r.platform_id == platform_id && r.encoding_id == encoding_id)
            .copied()
            .ok_or(FontError::NoMatchingCmapSubtable),
    }
}

/// Mappings collected from one subtable.
///
/// Glyphs at or past `num_glyphs` are counted and dropped. Segments are
/// listed in increasing code order, so each range is clamped to start after
/// everything covered before it and no code is visited twice.
struct Mappings {
    entries: BTreeMap<u32, u32>,
    num_glyphs: u32,
    /// First code not yet covered by a segment
    next_code: u32,
    dropped: usize,
    overlapping: u64,
}

impl Mappings {
    fn new(num_glyphs: u16) -> Self {
        Self {
            entries: BTreeMap::new(),
            num_glyphs: num_glyphs as u32,
            next_code: 0,
            dropped: 0,
            overlapping: 0,
        }
    }

    fn insert(&mut self, code: u32, glyph: u32) {
        if glyph < self.num_glyphs {
            self.entries.insert(code, glyph);
        } else {
            self.dropped += 1;
        }
    }

    /// Clamp `start..=end` to the codes no earlier segment covered, or `None`
    /// if nothing is left.
    fn claim(&mut self, start: u32, end: u32) -> Option<RangeInclusive<u32>> {
        let first = start.max(self.next_code);
        let skipped = (first.min(end.saturating_add(1)) - start) as u64;
        self.overlapping += skipped;
        if first > end {
            return None;
        }
        self.next_code = end.saturating_add(1);
        Some(first..=end)
    }
}

/// Byte encoding table
fn read_format0(input: &mut FontCursor<'_>, out: &mut Mappings) -> Result<()> {
    let _length = input.try_get_u16()?;
    let _language = input.try_get_u16()?;
    let glyphs = input.read_bytes(256)?;
    for (code, &glyph) in glyphs.iter().enumerate() {
        out.insert(code as u32, glyph as u32);
    }
    Ok(())
}

/// Segment mapping to delta values
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values>
fn read_format4(input: &mut FontCursor<'_>, out: &mut Mappings) -> Result<()> {
    let _length = input.try_get_u16()?;
    let _language = input.try_get_u16()?;
    let seg_count_x2 = input.try_get_u16()? as usize;
    bail_if!(
        seg_count_x2 % 2 != 0,
        FontError::corrupt("cmap format 4 segCountX2 is odd")
    );
    let seg_count = seg_count_x2 / 2;
    input.skip(6)?; // searchRange, entrySelector, rangeShift

    let end_codes = input.read_u16_array(seg_count)?;
    let _reserved_pad = input.try_get_u16()?;
    let start_codes = input.read_u16_array(seg_count)?;
    let id_deltas = input.read_u16_array(seg_count)?;
    // idRangeOffset values are relative to their own position in the table
    let id_range_offsets_start = input.offset();
    let id_range_offsets = input.read_u16_array(seg_count)?;

    for seg in 0..seg_count {
        let (start, end) = (start_codes[seg], end_codes[seg]);
        if start == 0xFFFF && end == 0xFFFF {
            continue;
        }
        bail_if!(
            start > end,
            FontError::corrupt(format!("cmap format 4 segment {seg} has start > end"))
        );
        let Some(codes) = out.claim(start as u32, end as u32) else {
            continue;
        };
        let delta = id_deltas[seg];
        let range_offset = id_range_offsets[seg] as usize;

        for code in codes {
            let code = code as u16;
            let glyph = if range_offset == 0 {
                code.wrapping_add(delta)
            } else {
                let glyph_index_pos = id_range_offsets_start
                    + seg * 2
                    + range_offset
                    + 2 * (code - start) as usize;
                input.seek(SeekFrom::Start(glyph_index_pos))?;
                match input.try_get_u16()? {
                    0 => 0,
                    glyph => glyph.wrapping_add(delta),
                }
            };
            out.insert(code as u32, glyph as u32);
        }
    }
    Ok(())
}

/// Trimmed table mapping
fn read_format6(input: &mut FontCursor<'_>, out: &mut Mappings) -> Result<()> {
    let _length = input.try_get_u16()?;
    let _language = input.try_get_u16()?;
    let first_code = input.try_get_u16()? as u32;
    let entry_count = input.try_get_u16()? as usize;
    let glyphs = input.read_u16_array(entry_count)?;
    for (i, glyph) in glyphs.into_iter().enumerate() {
        out.insert(first_code + i as u32, glyph as u32);
    }
    Ok(())
}

/// Segmented coverage (format 12) and many-to-one range mappings (format 13)
fn read_segmented_coverage(
    input: &mut FontCursor<'_>,
    format: u16,
    out: &mut Mappings,
) -> Result<()> {
    let _reserved = input.try_get_u16()?;
    let _length = input.try_get_u32()?;
    let _language = input.try_get_u32()?;
    let num_groups = input.try_get_u32()?;

    for _ in 0..num_groups {
        let start = input.try_get_u32()?;
        let end = input.try_get_u32()?;
        let glyph = input.try_get_u32()?;
        bail_if!(
            start > end || end > char::MAX as u32,
            FontError::corrupt(format!("cmap format {format} group {start:#x}..{end:#x} is invalid"))
        );
        let Some(codes) = out.claim(start, end) else {
            continue;
        };
        for code in codes {
            let glyph = if format == 12 {
                glyph.wrapping_add(code - start)
            } else {
                glyph
            };
            out.insert(code, glyph);
        }
    }
    Ok(())
}
