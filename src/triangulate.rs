//! Hand-off of normalized outlines to an external triangulation engine.
//!
//! The engine itself lives outside this crate behind [`Triangulator`]. This
//! module builds its per-glyph input and fans the work out, one unit per
//! distinct glyph referenced by the character map.

use std::collections::BTreeSet;
use std::fmt::Display;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::outline::{BoundingBox, Outline, Point};
use crate::pipeline::{FailureStage, FontImport, GlyphFailure};

/// Flattened outline in the layout the triangulation engine expects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangulationInput {
    /// Anchor, control, anchor, control, ... for every contour in turn.
    pub points: Vec<Point>,
    /// Contour id of each point.
    pub contour_ids: Vec<u32>,
    /// Index of the next point in the same contour; the last point of a
    /// contour links back to its first.
    pub next_in_contour: Vec<u32>,
    pub bounding_box: BoundingBox,
}

impl TriangulationInput {
    pub fn from_outline(outline: &Outline) -> Self {
        let capacity = outline.point_count();
        let mut input = Self {
            points: Vec::with_capacity(capacity),
            contour_ids: Vec::with_capacity(capacity),
            next_in_contour: Vec::with_capacity(capacity),
            bounding_box: outline.bounding_box,
        };

        for (contour_id, contour) in outline
            .contours
            .iter()
            .filter(|contour| !contour.is_empty())
            .enumerate()
        {
            let first = input.points.len() as u32;
            input.points.extend(contour.points());
            let end = input.points.len() as u32;
            for index in first..end {
                input.contour_ids.push(contour_id as u32);
                input
                    .next_in_contour
                    .push(if index + 1 == end { first } else { index + 1 });
            }
        }
        input
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Triangle mesh returned by the engine.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangulation {
    /// Three indices into `points` per triangle.
    pub indices: Vec<u32>,
    /// The engine's point buffer, which may be reordered or deduplicated
    /// relative to the input.
    pub points: Vec<Point>,
}

/// A constrained triangulation engine.
pub trait Triangulator: Sync {
    type Error: Display;

    fn triangulate(
        &self,
        glyph: u32,
        input: &TriangulationInput,
    ) -> Result<Triangulation, Self::Error>;
}

/// Meshes for every glyph referenced by the character map.
#[derive(Clone, Debug, Default)]
pub struct TriangulationReport {
    /// Dense by glyph index; `Some` for each glyph that was triangulated.
    pub meshes: Vec<Option<Triangulation>>,
    pub failures: Vec<GlyphFailure>,
}

impl TriangulationReport {
    pub fn mesh(&self, glyph: u32) -> Option<&Triangulation> {
        self.meshes.get(glyph as usize)?.as_ref()
    }
}

/// Triangulate each distinct glyph referenced by the character map once.
///
/// Glyphs are processed independently (in parallel with the `parallel`
/// feature) and all units finish before the report is assembled. A failing
/// glyph is recorded in the report and does not affect the others. Blank
/// outlines are not sent to the engine and get an empty mesh.
pub fn triangulate_glyphs<T: Triangulator>(
    import: &FontImport,
    triangulator: &T,
) -> TriangulationReport {
    let referenced: Vec<u32> = import
        .character_map
        .iter()
        .map(|(_, glyph)| glyph)
        .collect::<BTreeSet<u32>>()
        .into_iter()
        .filter(|&glyph| (glyph as usize) < import.outlines.len())
        .collect();

    let unit = |glyph: u32| -> (u32, Result<Triangulation, String>) {
        let outline = &import.outlines[glyph as usize];
        if outline.is_empty() {
            return (glyph, Ok(Triangulation::default()));
        }
        let input = TriangulationInput::from_outline(outline);
        let result = triangulator
            .triangulate(glyph, &input)
            .map_err(|err| err.to_string());
        (glyph, result)
    };

    #[cfg(feature = "parallel")]
    let results: Vec<(u32, Result<Triangulation, String>)> =
        referenced.par_iter().map(|&glyph| unit(glyph)).collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<(u32, Result<Triangulation, String>)> =
        referenced.iter().map(|&glyph| unit(glyph)).collect();

    let mut report = TriangulationReport {
        meshes: vec![None; import.outlines.len()],
        failures: Vec::new(),
    };
    for (glyph, result) in results {
        match result {
            Ok(mesh) => report.meshes[glyph as usize] = Some(mesh),
            Err(reason) => {
                let failure = GlyphFailure {
                    glyph,
                    codes: import.character_map.codes_for_glyph(glyph),
                    stage: FailureStage::Triangulate,
                    reason,
                };
                log::warn!("{failure}");
                report.failures.push(failure);
            }
        }
    }
    log::debug!(
        "triangulated {} glyphs, {} failed",
        referenced.len() - report.failures.len(),
        report.failures.len()
    );
    report
}
