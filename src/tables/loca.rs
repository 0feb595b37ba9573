use std::ops::Range;

use bytes::Buf;

use crate::buffer::FontCursor;
use crate::error::{FontError, Result, bail_with_msg_if};
use crate::tables::head::LocaFormat;
use crate::types::TableEntry;

/// Glyph offsets into `glyf`, `num_glyphs + 1` entries long.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/loca>
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaTable {
    offsets: Vec<u32>,
}

impl LocaTable {
    pub fn read(
        font: &FontCursor<'_>,
        entry: &TableEntry,
        format: LocaFormat,
        num_glyphs: u16,
    ) -> Result<Self> {
        let mut input = font.table(entry)?;
        let count = num_glyphs as usize + 1;

        let mut offsets: Vec<u32> = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = match format {
                // loca short version. The actual local offset divided by 2 is stored.
                LocaFormat::Short => (input.try_get_u16()? as u32) << 1,
                LocaFormat::Long => input.try_get_u32()?,
            };
            offsets.push(offset);
        }

        Self::from_offsets(offsets)
    }

    /// Build a table from already decoded offsets, validating their order.
    pub fn from_offsets(offsets: Vec<u32>) -> Result<Self> {
        bail_with_msg_if!(
            offsets.is_empty(),
            FontError::corrupt("loca has no entries"),
            "loca must hold at least one offset"
        );
        if let Some(i) = offsets.windows(2).position(|pair| pair[1] < pair[0]) {
            return Err(FontError::corrupt(format!(
                "loca offsets decrease at glyph {i} ({} > {})",
                offsets[i],
                offsets[i + 1]
            )));
        }
        Ok(Self { offsets })
    }

    pub fn num_glyphs(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Byte range of a glyph relative to the start of `glyf`, or `None` if the
    /// glyph index is out of range. An empty range is a blank glyph.
    pub fn glyph_range(&self, glyph: usize) -> Option<Range<usize>> {
        let start = *self.offsets.get(glyph)? as usize;
        let end = *self.offsets.get(glyph + 1)? as usize;
        Some(start..end)
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }
}
