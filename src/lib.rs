//! Pure Rust decoder for TrueType glyph outlines
//!
//! Reads the sfnt table directory and the `head`, `maxp`, `loca`, `glyf` and
//! `cmap` tables, and turns every glyph into closed contours of explicit
//! quadratic segments (anchor, control) in em-normalized coordinates, ready
//! for a triangulation engine.
//!
//! ```no_run
//! use sfnt_glyphs::{ImportOptions, import_font_file};
//!
//! let font = import_font_file("Roboto-Regular.ttf", &ImportOptions::default())?;
//! let outline = font.outline_for_code('A' as u32);
//! # Ok::<(), sfnt_glyphs::FontError>(())
//! ```

pub mod buffer;
pub mod checksum;
pub mod error;
pub mod glyf;
pub mod outline;
pub mod pipeline;
pub mod table_tags;
pub mod tables;
pub mod triangulate;
pub mod types;

pub use error::{FontError, Result};
pub use outline::{
    BoundingBox, CompositeReference, Glyph, Outline, Point, QuadraticContour, QuadraticSegment,
};
pub use pipeline::{
    FailureStage, FontImport, GlyphFailure, ImportOptions, import_font, import_font_file,
};
pub use tables::{CharacterMap, CmapSelection};
pub use triangulate::{Triangulation, TriangulationInput, TriangulationReport, Triangulator};
pub use types::FontFormat;
