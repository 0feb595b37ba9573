use std::fmt;
use std::path::Path;

use crate::buffer::FontCursor;
use crate::error::{FontError, Result};
use crate::glyf::{GlyfTable, resolve_outlines};
use crate::outline::{Glyph, Outline};
use crate::table_tags::{CMAP, GLYF, HEAD, LOCA, MAXP};
use crate::tables::{CharacterMap, CmapSelection, FontHeader, LocaTable, read_num_glyphs};
use crate::triangulate::{TriangulationReport, Triangulator, triangulate_glyphs};
use crate::types::{FontFormat, TableDirectory};

/// Knobs for [`import_font`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Which `cmap` subtable to decode.
    pub cmap_selection: CmapSelection,
    /// Glyph that unmapped character codes resolve to.
    pub default_glyph: u32,
    /// Warn about tables whose directory checksum does not match their data.
    pub verify_checksums: bool,
}

impl ImportOptions {
    pub fn with_cmap_selection(mut self, selection: CmapSelection) -> Self {
        self.cmap_selection = selection;
        self
    }

    pub fn with_default_glyph(mut self, glyph: u32) -> Self {
        self.default_glyph = glyph;
        self
    }

    pub fn with_checksum_verification(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }
}

/// The step at which a glyph failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FailureStage {
    /// Reading the glyph record from `glyf`
    Decode,
    /// Expanding composite references
    Resolve,
    /// The external triangulation engine
    Triangulate,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Decode => "decode",
            Self::Resolve => "composite resolution",
            Self::Triangulate => "triangulation",
        })
    }
}

/// A glyph that could not be processed. The rest of the font is unaffected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("glyph {glyph} (codes {codes:x?}) failed during {stage}: {reason}")]
pub struct GlyphFailure {
    pub glyph: u32,
    /// Character codes mapped to the glyph
    pub codes: Vec<u32>,
    pub stage: FailureStage,
    pub reason: String,
}

/// Everything decoded from one font file.
#[derive(Clone, Debug)]
pub struct FontImport {
    pub font_name: String,
    pub format: FontFormat,
    pub units_per_em: u16,
    /// Glyph records by glyph index; composites keep their references.
    pub glyphs: Vec<Glyph>,
    /// Renderable contours by glyph index, with composites expanded.
    pub outlines: Vec<Outline>,
    pub character_map: CharacterMap,
    /// Glyphs that failed to decode or resolve. Their entry in `outlines` is
    /// blank. A glyph that failed to decode is also blank in `glyphs`; a
    /// composite that failed to resolve keeps its record there.
    pub failures: Vec<GlyphFailure>,
}

impl FontImport {
    pub fn num_glyphs(&self) -> usize {
        self.glyphs.len()
    }

    /// Outline for a character code, following the character map.
    pub fn outline_for_code(&self, code: u32) -> Option<&Outline> {
        self.outlines
            .get(self.character_map.glyph_for(code) as usize)
    }

    pub fn triangulate<T: Triangulator>(&self, triangulator: &T) -> TriangulationReport {
        triangulate_glyphs(self, triangulator)
    }
}

/// Read a font file and import it, naming the font after the file stem.
pub fn import_font_file(path: impl AsRef<Path>, options: &ImportOptions) -> Result<FontImport> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let font_name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("font"));
    import_font(font_name, &data, options)
}

/// Decode the outlines and character map of an sfnt font held in memory.
///
/// Problems with the directory, `head`, `maxp`, `loca` or `cmap` abort the
/// import. A glyph that fails to decode is left blank and reported in
/// [`FontImport::failures`].
pub fn import_font(
    font_name: impl Into<String>,
    data: &[u8],
    options: &ImportOptions,
) -> Result<FontImport> {
    let font_name = font_name.into();
    let font = FontCursor::new(data);

    let directory = TableDirectory::parse(&mut font.clone())?;
    directory.check_outline_format()?;
    directory.check_required_tables()?;
    if options.verify_checksums {
        for tag in directory.mismatched_checksums(data) {
            log::warn!("{font_name}: checksum mismatch in table '{tag}'");
        }
    }

    let header = FontHeader::read(&font, directory.required(HEAD)?)?;
    let num_glyphs = read_num_glyphs(&font, directory.required(MAXP)?)?;
    let loca = LocaTable::read(
        &font,
        directory.required(LOCA)?,
        header.loca_format,
        num_glyphs,
    )?;
    let glyf = GlyfTable::read(&font, directory.required(GLYF)?, &header)?;
    let character_map = CharacterMap::read(
        &font,
        directory.required(CMAP)?,
        options.cmap_selection,
        num_glyphs,
    )?
    .with_default_glyph(options.default_glyph);

    let mut failures = Vec::new();
    let mut record_failure = |glyph: u32, stage: FailureStage, err: FontError| {
        failures.push(GlyphFailure {
            glyph,
            codes: character_map.codes_for_glyph(glyph),
            stage,
            reason: err.to_string(),
        });
    };

    // Pass 1: every glyph record, composites unresolved
    let glyphs: Vec<Glyph> = (0..num_glyphs as u32)
        .map(|glyph| {
            glyf.glyph(&loca, glyph).unwrap_or_else(|err| {
                record_failure(glyph, FailureStage::Decode, err);
                Glyph::blank()
            })
        })
        .collect();

    // Pass 2: expand composites against the complete glyph array
    let outlines: Vec<Outline> = resolve_outlines(&glyphs)
        .into_iter()
        .enumerate()
        .map(|(glyph, outline)| {
            outline.unwrap_or_else(|err| {
                record_failure(glyph as u32, FailureStage::Resolve, err);
                Outline::default()
            })
        })
        .collect();

    for failure in &failures {
        log::warn!("{font_name}: {failure}");
    }
    log::info!(
        "{font_name}: {} glyphs, {} mapped codes, {} failures",
        glyphs.len(),
        character_map.len(),
        failures.len()
    );

    Ok(FontImport {
        font_name,
        format: directory.format,
        units_per_em: header.units_per_em,
        glyphs,
        outlines,
        character_map,
        failures,
    })
}
