/* Copyright 2014 Google Inc. All Rights Reserved.

   Distributed under MIT license.
   See file LICENSE for detail or copy at https://opensource.org/licenses/MIT
*/

//! Font table tags

use font_types::Tag;

// sfnt version tags
pub const TRUETYPE_VERSION: u32 = 0x00010000;
pub const OPENTYPE_CFF_VERSION: u32 = 0x4F54544F; // "OTTO"

// Tables this crate reads
pub const HEAD: Tag = Tag::new(b"head");
pub const MAXP: Tag = Tag::new(b"maxp");
pub const LOCA: Tag = Tag::new(b"loca");
pub const GLYF: Tag = Tag::new(b"glyf");
pub const CMAP: Tag = Tag::new(b"cmap");

// PostScript outline tables. Their presence without "glyf" means the font
// cannot be decoded by this crate.
pub const CFF: Tag = Tag::new(b"CFF ");
pub const CFF2: Tag = Tag::new(b"CFF2");

/// The tables every import needs, in the order they are read.
pub static REQUIRED_TABLE_TAGS: [Tag; 5] = [
    HEAD, // 0
    MAXP, // 1
    LOCA, // 2
    GLYF, // 3
    CMAP, // 4
];
