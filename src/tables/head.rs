use bytes::Buf;

use crate::buffer::{FontCursor, SeekFrom};
use crate::error::{FontError, Result, bail_if};
use crate::types::TableEntry;

const HEAD_MAGIC_NUMBER: u32 = 0x5F0F3CF5;
const MAGIC_NUMBER_OFFSET: usize = 12;
const UNITS_PER_EM_OFFSET: usize = 18;
const INDEX_TO_LOC_FORMAT_OFFSET: usize = 50;

/// Width of the entries of the `loca` table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LocaFormat {
    /// u16 entries holding the offset divided by two
    Short,
    /// u32 entries holding the actual offset
    Long,
}

impl LocaFormat {
    pub fn from_index_to_loc_format(value: i16) -> Self {
        if value == 0 { Self::Short } else { Self::Long }
    }

    /// Bytes per `loca` entry.
    pub fn offset_byte_width(self) -> usize {
        match self {
            Self::Short => 2,
            Self::Long => 4,
        }
    }
}

/// The fields of `head` needed to decode outlines.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/head>
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FontHeader {
    /// Design units per em. Never zero.
    pub units_per_em: u16,
    pub index_to_loc_format: i16,
    pub loca_format: LocaFormat,
}

impl FontHeader {
    pub fn read(font: &FontCursor<'_>, entry: &TableEntry) -> Result<Self> {
        let mut input = font.table(entry)?;

        input.seek(SeekFrom::Start(MAGIC_NUMBER_OFFSET))?;
        let magic = input.try_get_u32()?;
        if magic != HEAD_MAGIC_NUMBER {
            log::warn!("head magic number is {magic:#010x}, expected {HEAD_MAGIC_NUMBER:#010x}");
        }

        input.seek(SeekFrom::Start(UNITS_PER_EM_OFFSET))?;
        let units_per_em = input.try_get_u16()?;
        bail_if!(
            units_per_em == 0,
            FontError::corrupt("head.unitsPerEm is zero")
        );

        input.seek(SeekFrom::Start(INDEX_TO_LOC_FORMAT_OFFSET))?;
        let index_to_loc_format = input.try_get_i16()?;

        Ok(Self {
            units_per_em,
            index_to_loc_format,
            loca_format: LocaFormat::from_index_to_loc_format(index_to_loc_format),
        })
    }

    /// Multiply font units by this to get em-normalized coordinates.
    pub fn scale(&self) -> f32 {
        1.0 / self.units_per_em as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BufMut;
    use font_types::Tag;

    fn head_table(units_per_em: u16, index_to_loc_format: i16) -> Vec<u8> {
        let mut out = Vec::new();
        out.put_u32(0x00010000); // version
        out.put_u32(0); // fontRevision
        out.put_u32(0); // checksumAdjustment
        out.put_u32(HEAD_MAGIC_NUMBER);
        out.put_u16(0); // flags
        out.put_u16(units_per_em);
        out.put_bytes(0, 16); // created, modified
        out.put_bytes(0, 8); // bbox
        out.put_bytes(0, 6); // macStyle, lowestRecPPEM, fontDirectionHint
        out.put_i16(index_to_loc_format);
        out.put_i16(0); // glyphDataFormat
        out
    }

    fn entry(len: usize) -> TableEntry {
        TableEntry {
            tag: Tag::new(b"head"),
            checksum: 0,
            offset: 0,
            length: len as u32,
        }
    }

    #[test]
    fn reads_units_and_loca_format() {
        let data = head_table(2048, 1);
        let header = FontHeader::read(&FontCursor::new(&data), &entry(data.len())).unwrap();
        assert_eq!(header.units_per_em, 2048);
        assert_eq!(header.loca_format, LocaFormat::Long);
        assert_eq!(header.loca_format.offset_byte_width(), 4);

        let data = head_table(1000, 0);
        let header = FontHeader::read(&FontCursor::new(&data), &entry(data.len())).unwrap();
        assert_eq!(header.loca_format.offset_byte_width(), 2);
        assert_eq!(header.scale(), 0.001);
    }

    #[test]
    fn zero_units_per_em_is_corrupt() {
        let data = head_table(0, 0);
        assert!(matches!(
            FontHeader::read(&FontCursor::new(&data), &entry(data.len())),
            Err(FontError::CorruptTableData(_))
        ));
    }

    #[test]
    fn truncated_head() {
        let data = head_table(1000, 0);
        assert!(matches!(
            FontHeader::read(&FontCursor::new(&data), &entry(40)),
            Err(FontError::UnexpectedEndOfData { .. })
        ));
    }
}
