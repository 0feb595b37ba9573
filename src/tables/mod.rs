//! Readers for the metadata and mapping tables.
//!
//! Each reader is a pure function of the font cursor and the directory entry
//! for its table.

pub mod cmap;
pub mod head;
pub mod loca;
pub mod maxp;

pub use cmap::{CharacterMap, CmapSelection, CmapSubtableRecord};
pub use head::{FontHeader, LocaFormat};
pub use loca::LocaTable;
pub use maxp::read_num_glyphs;
