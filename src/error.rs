use font_types::Tag;

/// Errors produced while decoding a font.
///
/// Directory, metadata and `loca` errors abort the import. Errors raised while
/// decoding a single glyph are caught by the pipeline and reported per glyph.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("unsupported sfnt version tag {0}")]
    UnsupportedFontFormat(Tag),

    #[error("unsupported glyph outline format: only glyf outlines are supported (found CFF)")]
    UnsupportedGlyphFormat,

    #[error("required table '{0}' is missing")]
    MissingRequiredTable(Tag),

    #[error("unexpected end of data: needed {requested} bytes but only {available} remain")]
    UnexpectedEndOfData { requested: usize, available: usize },

    #[error("composite glyph {glyph} uses point-matched anchoring, which is not supported")]
    UnsupportedCompositeAnchoring { glyph: u32 },

    #[error("corrupt table data: {0}")]
    CorruptTableData(String),

    #[error("unsupported cmap subtable format {0}")]
    UnsupportedCmapFormat(u16),

    #[error("no cmap subtable matches the requested platform/encoding")]
    NoMatchingCmapSubtable,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FontError>;

impl From<bytes::TryGetError> for FontError {
    fn from(value: bytes::TryGetError) -> Self {
        Self::UnexpectedEndOfData {
            requested: value.requested,
            available: value.available,
        }
    }
}

impl FontError {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptTableData(msg.into())
    }
}

pub(crate) fn usize_will_overflow(a: usize, b: usize) -> bool {
    a.checked_add(b).is_none()
}

#[cfg(not(feature = "debug"))]
mod regular {
    macro_rules! bail {
        ($err: expr) => {
            return Err($err)
        };
    }
    pub(crate) use bail;

    macro_rules! bail_if {
        ($cond: expr, $err: expr) => {
            if $cond {
                return Err($err);
            }
        };
    }
    pub(crate) use bail_if;

    macro_rules! bail_with_msg_if {
        ($cond: expr, $err: expr, $($msg:tt),*) => {
            if $cond {
                log::debug!($($msg),*);
                return Err($err);
            }
        };
    }
    pub(crate) use bail_with_msg_if;
}
#[cfg(not(feature = "debug"))]
pub(crate) use regular::*;

#[cfg(feature = "debug")]
mod debug {
    macro_rules! bail {
        ($err: expr) => {
            panic!("{}", $err)
        };
    }
    pub(crate) use bail;

    macro_rules! bail_if {
        ($cond: expr, $err: expr) => {
            if $cond {
                panic!("{}: {}", stringify!($cond), $err)
            }
        };
    }
    pub(crate) use bail_if;

    macro_rules! bail_with_msg_if {
        ($cond: expr, $err: expr, $($msg:tt),*) => {
            if $cond {
                panic!($($msg),*);
            }
        };
    }
    pub(crate) use bail_with_msg_if;
}
#[cfg(feature = "debug")]
pub(crate) use debug::*;
