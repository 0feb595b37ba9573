/* Copyright 2014 Google Inc. All Rights Reserved.

   Distributed under MIT license.
   See file LICENSE for detail or copy at https://opensource.org/licenses/MIT
*/

//! sfnt table checksums

/// Sum of the table read as big-endian u32 words, wrapping on overflow.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/otff#calculating-checksums>
pub fn compute_checksum(buf: &[u8]) -> u32 {
    let mut checksum: u32 = 0;
    let mut iter = buf.chunks_exact(4);
    for chunk in &mut iter {
        checksum = checksum.wrapping_add(u32::from_be_bytes([
            chunk[0], chunk[1], chunk[2], chunk[3],
        ]));
    }

    // Treat size not aligned on 4 as if it were padded to 4 with 0's.
    let remainder = iter.remainder();
    let tail = match *remainder {
        [a, b, c] => ((a as u32) << 24) | ((b as u32) << 16) | ((c as u32) << 8),
        [a, b] => ((a as u32) << 24) | ((b as u32) << 16),
        [a] => (a as u32) << 24,
        [] => 0,
        _ => unreachable!("chunk size was 4 so remainder will be a slice of length 3 or smaller"),
    };

    checksum.wrapping_add(tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_words() {
        assert_eq!(compute_checksum(&[0, 0, 0, 1, 0, 0, 0, 2]), 3);
    }

    #[test]
    fn pads_trailing_bytes() {
        assert_eq!(compute_checksum(&[0, 0, 0, 1, 0x80]), 0x8000_0001);
    }

    #[test]
    fn wraps_on_overflow() {
        assert_eq!(compute_checksum(&[0xff, 0xff, 0xff, 0xff, 0, 0, 0, 2]), 1);
    }
}
