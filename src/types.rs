use std::collections::HashMap;
use std::ops::Deref;

use bytes::Buf;
use font_types::Tag;

use crate::buffer::FontCursor;
use crate::checksum::compute_checksum;
use crate::error::{FontError, Result, bail, bail_if, usize_will_overflow};
use crate::table_tags::{
    CFF, CFF2, GLYF, HEAD, OPENTYPE_CFF_VERSION, REQUIRED_TABLE_TAGS, TRUETYPE_VERSION,
};

pub const SFNT_HEADER_SIZE: usize = 12;
pub const SFNT_ENTRY_SIZE: usize = 16;

/// Which flavour of sfnt the version tag announced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontFormat {
    /// Version tag `0x00010000`
    TrueType,
    /// Version tag `OTTO`
    OpenType,
}

impl FontFormat {
    pub fn from_version(version: u32) -> Result<Self> {
        match version {
            TRUETYPE_VERSION => Ok(Self::TrueType),
            OPENTYPE_CFF_VERSION => Ok(Self::OpenType),
            other => Err(FontError::UnsupportedFontFormat(Tag::from_u32(other))),
        }
    }
}

/// sfnt header
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory>
pub struct SfntHeader {
    pub format: FontFormat,
    /// Number of tables in the directory.
    pub num_tables: u16,
}

impl SfntHeader {
    pub fn parse(input: &mut impl Buf) -> Result<Self> {
        let format = FontFormat::from_version(input.try_get_u32()?)?;
        let num_tables = input.try_get_u16()?;

        // searchRange, entrySelector, rangeShift
        bail_if!(
            input.remaining() < 6,
            FontError::UnexpectedEndOfData {
                requested: 6,
                available: input.remaining(),
            }
        );
        input.advance(6);

        Ok(Self { format, num_tables })
    }
}

/// One record of the table directory.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TableEntry {
    pub tag: Tag,
    pub checksum: u32,
    /// Offset of the table from the start of the file
    pub offset: u32,
    pub length: u32,
}

impl TableEntry {
    pub fn parse(input: &mut impl Buf) -> Result<Self> {
        Ok(Self {
            tag: Tag::from_u32(input.try_get_u32()?),
            checksum: input.try_get_u32()?,
            offset: input.try_get_u32()?,
            length: input.try_get_u32()?,
        })
    }

    pub fn data_as_slice<'a>(&self, data: &'a [u8]) -> Result<&'a [u8]> {
        let start = self.offset as usize;
        let length = self.length as usize;
        bail_if!(
            usize_will_overflow(start, length),
            FontError::corrupt(format!("table '{}' extends past the address space", self.tag))
        );
        data.get(start..start + length)
            .ok_or(FontError::UnexpectedEndOfData {
                requested: start + length,
                available: data.len(),
            })
    }

    /// Checksum of the table bytes as stored in the file.
    ///
    /// For `head` the `checksumAdjustment` field (bytes 8..12) is treated as zero.
    pub fn compute_checksum(&self, data: &[u8]) -> Result<u32> {
        let table = self.data_as_slice(data)?;
        let mut checksum = compute_checksum(table);
        if self.tag == HEAD && table.len() >= 12 {
            let adjustment = u32::from_be_bytes([table[8], table[9], table[10], table[11]]);
            checksum = checksum.wrapping_sub(adjustment);
        }
        Ok(checksum)
    }
}

/// The sfnt table directory, keyed by tag.
///
/// Returned by [`TableDirectory::parse`] and passed explicitly to every table
/// reader.
pub struct TableDirectory {
    pub format: FontFormat,
    pub tables: HashMap<Tag, TableEntry>,
}

impl Deref for TableDirectory {
    type Target = HashMap<Tag, TableEntry>;
    fn deref(&self) -> &Self::Target {
        &self.tables
    }
}

impl TableDirectory {
    /// Parse the sfnt header and directory from the start of `input`.
    ///
    /// When a tag appears more than once the last record wins.
    pub fn parse(input: &mut FontCursor<'_>) -> Result<Self> {
        let header = SfntHeader::parse(input)?;
        let directory_end = SFNT_HEADER_SIZE + header.num_tables as usize * SFNT_ENTRY_SIZE;
        bail_if!(
            input.len() < directory_end,
            FontError::UnexpectedEndOfData {
                requested: directory_end,
                available: input.len(),
            }
        );

        let mut tables = HashMap::with_capacity(header.num_tables as usize);
        for _ in 0..header.num_tables {
            let entry = TableEntry::parse(input)?;
            log::debug!(
                "table '{}': offset {} length {}",
                entry.tag,
                entry.offset,
                entry.length
            );
            tables.insert(entry.tag, entry);
        }

        Ok(Self {
            format: header.format,
            tables,
        })
    }

    /// Look up a table that the import cannot proceed without.
    pub fn required(&self, tag: Tag) -> Result<&TableEntry> {
        self.tables
            .get(&tag)
            .ok_or(FontError::MissingRequiredTable(tag))
    }

    /// Reject fonts whose outlines live in CFF rather than glyf.
    pub fn check_outline_format(&self) -> Result<()> {
        let has_cff = self.tables.contains_key(&CFF) || self.tables.contains_key(&CFF2);
        if !self.tables.contains_key(&GLYF) {
            bail_if!(
                has_cff || self.format == FontFormat::OpenType,
                FontError::UnsupportedGlyphFormat
            );
            return Err(FontError::MissingRequiredTable(GLYF));
        }
        Ok(())
    }

    /// Fail with the first table of [`REQUIRED_TABLE_TAGS`] that is absent.
    pub fn check_required_tables(&self) -> Result<()> {
        if let Some(&tag) = REQUIRED_TABLE_TAGS
            .iter()
            .find(|tag| !self.tables.contains_key(*tag))
        {
            bail!(FontError::MissingRequiredTable(tag));
        }
        Ok(())
    }

    /// Compare each directory checksum with the checksum of the table data,
    /// returning the tags that do not match.
    pub fn mismatched_checksums(&self, data: &[u8]) -> Vec<Tag> {
        let mut mismatched: Vec<Tag> = self
            .tables
            .values()
            .filter(|entry| {
                entry
                    .compute_checksum(data)
                    .map_or(true, |checksum| checksum != entry.checksum)
            })
            .map(|entry| entry.tag)
            .collect();
        mismatched.sort();
        mismatched
    }
}
