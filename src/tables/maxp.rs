use bytes::Buf;

use crate::buffer::FontCursor;
use crate::error::Result;
use crate::types::TableEntry;

/// Read `maxp.numGlyphs`.
///
/// Both the version 0.5 (CFF) and 1.0 (TrueType) layouts start with the same
/// two fields, so only those are read.
pub fn read_num_glyphs(font: &FontCursor<'_>, entry: &TableEntry) -> Result<u16> {
    let mut input = font.table(entry)?;
    let _version = input.try_get_u32()?;
    Ok(input.try_get_u16()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_types::Tag;

    #[test]
    fn reads_glyph_count() {
        let data = [0x00, 0x01, 0x00, 0x00, 0x01, 0x02];
        let entry = TableEntry {
            tag: Tag::new(b"maxp"),
            checksum: 0,
            offset: 0,
            length: 6,
        };
        assert_eq!(read_num_glyphs(&FontCursor::new(&data), &entry).unwrap(), 258);

        let short = TableEntry { length: 5, ..entry };
        assert!(read_num_glyphs(&FontCursor::new(&data), &short).is_err());
    }
}
