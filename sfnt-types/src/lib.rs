//! Common scalar data types used in SFNT font files.
//!
//! Almost everything in an SFNT is big-endian; the Embedded OpenType wrapper
//! is the exception, which is why every [`Scalar`] can be decoded in either
//! byte order.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod bbox;
mod fixed;
mod glyph_id;
mod raw;
mod tag;

pub use bbox::BoundingBox;
pub use fixed::{F2Dot14, Fixed};
pub use glyph_id::GlyphId;
pub use raw::Scalar;
pub use tag::{InvalidTag, Tag};

/// The version tag used by TrueType flavored fonts (`0x00010000`).
pub const TT_SFNT_VERSION: u32 = 0x00010000;

/// The version tag used by CFF flavored fonts (`OTTO`).
pub const CFF_SFNT_VERSION: u32 = u32::from_be_bytes(*b"OTTO");

/// The legacy Apple TrueType version tag (`true`).
pub const TRUE_SFNT_VERSION: u32 = u32::from_be_bytes(*b"true");

/// Returns `true` if `version` is one of the recognized sfnt versions.
pub const fn is_sfnt_version(version: u32) -> bool {
    matches!(
        version,
        TT_SFNT_VERSION | CFF_SFNT_VERSION | TRUE_SFNT_VERSION
    )
}
