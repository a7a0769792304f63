//! Traits and errors for interpreting font data

use sfnt_types::{GlyphId, Tag};

use crate::font_data::FontData;

/// A type that can be read from raw table data.
///
/// Tables implement this to validate their fixed-size header and decode the
/// fields they expose.
pub trait FontRead<'a>: Sized {
    /// Read an instance of `Self` from the provided data, performing validation.
    fn read(data: FontData<'a>) -> Result<Self, ReadError>;
}

/// An error that occurs when reading font data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    OutOfBounds,
    /// The data is not a recognized font or container, or a container is
    /// truncated or inconsistent.
    InvalidFontData,
    InvalidMagic(u32),
    InvalidVersion(u32),
    // i64 is flexible enough to store any value we might encounter
    InvalidFormat(i64),
    InvalidSfnt(u32),
    TableIsMissing(Tag),
    MalformedData(&'static str),
    /// A table did not decompress to its declared length.
    LengthMismatch {
        tag: Tag,
        expected: u32,
        actual: u32,
    },
    Decompression(&'static str),
    /// A declared size exceeds the decoding limit.
    TooLarge(u64),
    /// The input is well formed but uses a feature this crate does not
    /// implement.
    Unsupported(&'static str),
    GlyphOutOfRange(GlyphId),
    CompositeTooDeep(GlyphId),
    /// Resolving the glyph expands to more components or points than allowed.
    CompositeTooLarge(GlyphId),
}

/// Broad classification of a [`ReadError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input is damaged or is not a font. Nothing can be recovered.
    InvalidFontData,
    /// The input may be valid but needs a feature that is not implemented.
    Unsupported,
    /// A single glyph could not be resolved; the rest of the font is usable.
    Glyph,
}

impl ReadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReadError::Unsupported(_) => ErrorKind::Unsupported,
            ReadError::GlyphOutOfRange(_)
            | ReadError::CompositeTooDeep(_)
            | ReadError::CompositeTooLarge(_) => ErrorKind::Glyph,
            _ => ErrorKind::InvalidFontData,
        }
    }

    /// Map bare bounds errors to [`ReadError::InvalidFontData`].
    ///
    /// Container parsers use this at their boundary: a read past the end of a
    /// wrapper means the file is truncated.
    pub(crate) fn truncated(self) -> ReadError {
        match self {
            ReadError::OutOfBounds => ReadError::InvalidFontData,
            other => other,
        }
    }
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "An offset was out of bounds"),
            ReadError::InvalidFontData => write!(f, "invalid font data"),
            ReadError::InvalidMagic(magic) => write!(f, "Invalid magic number 0x{magic:X}"),
            ReadError::InvalidVersion(ver) => write!(f, "Unknown version 0x{ver:08X}"),
            ReadError::InvalidFormat(x) => write!(f, "Invalid format '{x}'"),
            ReadError::InvalidSfnt(ver) => write!(f, "Invalid sfnt version 0x{ver:08X}"),
            ReadError::TableIsMissing(tag) => write!(f, "the {tag} table is missing"),
            ReadError::MalformedData(msg) => write!(f, "Malformed data: '{msg}'"),
            ReadError::LengthMismatch {
                tag,
                expected,
                actual,
            } => write!(
                f,
                "the {tag} table decoded to {actual} bytes, expected {expected}"
            ),
            ReadError::Decompression(msg) => write!(f, "decompression failed: {msg}"),
            ReadError::TooLarge(size) => write!(f, "declared size {size} exceeds limit"),
            ReadError::Unsupported(what) => write!(f, "{what} is not supported"),
            ReadError::GlyphOutOfRange(gid) => write!(f, "glyph {gid} is out of range"),
            ReadError::CompositeTooDeep(gid) => {
                write!(f, "composite glyph {gid} is nested too deeply")
            }
            ReadError::CompositeTooLarge(gid) => {
                write!(f, "composite glyph {gid} expands to too many points")
            }
        }
    }
}

impl std::error::Error for ReadError {}
