/* Copyright 2013 Google Inc. All Rights Reserved.

   Distributed under MIT license.
   See file LICENSE for detail or copy at https://opensource.org/licenses/MIT
*/

use bytes::Buf;

use crate::error::{FontError, Result, bail_if};
use crate::types::TableEntry;

/// Where a [`FontCursor::seek`] is measured from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SeekFrom {
    /// Absolute offset from the start of the cursor's data.
    Start(usize),
    /// Signed offset from the current position.
    Current(isize),
}

// -----------------------------------------------------------------------------
// Font cursor
//
// A seekable big-endian reader over a byte slice. Typed reads come from the
// `bytes::Buf` impl (`try_get_u16`, `try_get_i16`, ...), which fail with
// `UnexpectedEndOfData` through the `From<TryGetError>` conversion instead of
// panicking. Seeking beyond the end of the data is also an error; seeking to
// exactly the end is allowed.
// -----------------------------------------------------------------------------
#[derive(Clone)]
pub struct FontCursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl Buf for FontCursor<'_> {
    fn remaining(&self) -> usize {
        self.buffer.len() - self.offset
    }

    fn chunk(&self) -> &[u8] {
        self.remaining_as_slice()
    }

    fn advance(&mut self, cnt: usize) {
        if self.skip(cnt).is_err() {
            panic!("Tried to advance past the end of the buffer");
        }
    }
}

impl<'a> FontCursor<'a> {
    pub fn new(data: &'a [u8]) -> FontCursor<'a> {
        FontCursor {
            buffer: data,
            offset: 0,
        }
    }

    /// A cursor restricted to the bytes of one table, positioned at its start.
    pub fn table(&self, entry: &TableEntry) -> Result<FontCursor<'a>> {
        Ok(FontCursor::new(entry.data_as_slice(self.buffer)?))
    }

    pub fn seek(&mut self, pos: SeekFrom) -> Result<()> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::Current(delta) => self.offset.checked_add_signed(delta),
        };
        match target {
            Some(target) if target <= self.buffer.len() => {
                self.offset = target;
                Ok(())
            }
            Some(target) => Err(self.end_of_data(target)),
            None => Err(FontError::corrupt("seek before start of data")),
        }
    }

    pub fn skip(&mut self, n_bytes: usize) -> Result<()> {
        bail_if!(
            n_bytes > self.remaining(),
            FontError::UnexpectedEndOfData {
                requested: n_bytes,
                available: self.remaining(),
            }
        );
        self.offset += n_bytes;
        Ok(())
    }

    /// Borrow the next `n_bytes` and advance past them.
    pub fn read_bytes(&mut self, n_bytes: usize) -> Result<&'a [u8]> {
        bail_if!(
            n_bytes > self.remaining(),
            FontError::UnexpectedEndOfData {
                requested: n_bytes,
                available: self.remaining(),
            }
        );
        let bytes = &self.buffer[self.offset..self.offset + n_bytes];
        self.offset += n_bytes;
        Ok(bytes)
    }

    /// Read `count` big-endian u16 values.
    pub fn read_u16_array(&mut self, count: usize) -> Result<Vec<u16>> {
        let bytes = self.read_bytes(count.saturating_mul(2))?;
        Ok(bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect())
    }

    pub fn remaining_as_slice(&self) -> &'a [u8] {
        &self.buffer[self.offset..]
    }

    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    fn end_of_data(&self, wanted_end: usize) -> FontError {
        FontError::UnexpectedEndOfData {
            requested: wanted_end.saturating_sub(self.offset),
            available: self.remaining(),
        }
    }
}
