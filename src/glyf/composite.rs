//! Expansion of composite glyphs into renderable contours.
//!
//! Glyph records are decoded first, then composites are resolved against the
//! complete glyph array so references to later glyph indices work.

use crate::error::{FontError, Result};
use crate::outline::{Glyph, Outline};

/// Composite chains deeper than this are treated as corrupt.
const MAX_COMPOSITE_DEPTH: usize = 64;

enum State {
    Pending,
    InProgress,
    /// The outline and the number of composite levels beneath the glyph.
    Resolved(Outline, usize),
    Failed(String),
}

enum ResolveError {
    /// The glyph is broken no matter how it is reached.
    Corrupt(String),
    /// The chain got too deep from the current starting glyph. A glyph further
    /// down the chain may still resolve on its own.
    TooDeep(String),
}

impl ResolveError {
    fn into_message(self) -> String {
        match self {
            Self::Corrupt(msg) | Self::TooDeep(msg) => msg,
        }
    }
}

struct Resolver<'a> {
    glyphs: &'a [Glyph],
    states: Vec<State>,
}

/// Resolve the outline of every glyph, one result per glyph index.
///
/// Simple glyphs resolve to their own contours. A composite resolves to the
/// transformed contours of its components, in component order. Reference
/// cycles, references past the end of the glyph array and more than
/// `MAX_COMPOSITE_DEPTH` levels of nesting beneath a glyph fail the affected
/// glyphs with `CorruptTableData`. Whether a glyph fails does not depend on
/// the order glyphs are resolved in.
pub fn resolve_outlines(glyphs: &[Glyph]) -> Vec<Result<Outline>> {
    let mut resolver = Resolver {
        glyphs,
        states: glyphs.iter().map(|_| State::Pending).collect(),
    };
    (0..glyphs.len())
        .map(|index| {
            resolver
                .resolve(index, 0)
                .map(|(outline, _)| outline)
                .map_err(|err| FontError::CorruptTableData(err.into_message()))
        })
        .collect()
}

impl Resolver<'_> {
    /// Resolve `index` reached `depth` levels below the starting glyph,
    /// returning its outline and height.
    fn resolve(
        &mut self,
        index: usize,
        depth: usize,
    ) -> std::result::Result<(Outline, usize), ResolveError> {
        match &self.states[index] {
            State::Resolved(outline, height) => {
                if depth + height > MAX_COMPOSITE_DEPTH {
                    return Err(too_deep(index));
                }
                return Ok((outline.clone(), *height));
            }
            State::Failed(msg) => return Err(ResolveError::Corrupt(msg.clone())),
            State::InProgress => {
                return Err(ResolveError::Corrupt(format!(
                    "composite glyph reference cycle through glyph {index}"
                )));
            }
            State::Pending => {}
        }
        if depth > MAX_COMPOSITE_DEPTH {
            return Err(too_deep(index));
        }

        self.states[index] = State::InProgress;
        let glyphs = self.glyphs;
        let result = match &glyphs[index] {
            Glyph::Simple {
                contours,
                bounding_box,
            } => Ok((
                Outline {
                    contours: contours.clone(),
                    bounding_box: *bounding_box,
                },
                0,
            )),
            Glyph::Composite {
                references,
                bounding_box,
            } => {
                let mut contours = Vec::new();
                let mut height = 0;
                let mut failure = None;
                for reference in references {
                    let component = reference.glyph_ref as usize;
                    if component >= glyphs.len() {
                        failure = Some(ResolveError::Corrupt(format!(
                            "glyph {index} references glyph {component} but the font has {} glyphs",
                            glyphs.len()
                        )));
                        break;
                    }
                    match self.resolve(component, depth + 1) {
                        Ok((outline, component_height)) => {
                            height = height.max(component_height + 1);
                            contours.extend(reference.transform_contours(&outline.contours))
                        }
                        Err(err) => {
                            failure = Some(err);
                            break;
                        }
                    }
                }
                match failure {
                    Some(err) => Err(err),
                    None => Ok((
                        Outline {
                            contours,
                            bounding_box: *bounding_box,
                        },
                        height,
                    )),
                }
            }
        };

        // Depth failures are relative to the starting glyph, so they are not
        // remembered.
        self.states[index] = match &result {
            Ok((outline, height)) => State::Resolved(outline.clone(), *height),
            Err(ResolveError::Corrupt(msg)) => State::Failed(msg.clone()),
            Err(ResolveError::TooDeep(_)) => State::Pending,
        };
        result
    }
}

fn too_deep(index: usize) -> ResolveError {
    ResolveError::TooDeep(format!(
        "composite nesting deeper than {MAX_COMPOSITE_DEPTH} levels below glyph {index}"
    ))
}
