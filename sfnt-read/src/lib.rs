//! Reading TrueType and OpenType fonts
//!
//! This crate decodes a font file, whatever its container, into an owned
//! [`Sfnt`]: the table directory plus the handful of tables needed to lay
//! out and draw text (`head`, `hhea`, `maxp`, `OS/2`, `cmap`, `hmtx`,
//! `loca`/`glyf`, `name`).
//!
//! Supported containers are raw SFNT (TrueType and CFF flavored OpenType),
//! [WOFF], [WOFF2] (null transforms only) and [Embedded OpenType][EOT]
//! (uncompressed or XOR obfuscated).
//!
//! The [`tables`] module exposes the individual table parsers, which borrow
//! from a [`FontData`] and can be used without building an [`Sfnt`].
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let font = sfnt_read::parse_font(&font_bytes).expect("failed to read font");
//! let gid = font.glyph_index('A');
//! let outline = font.outline(gid).expect("failed to load glyph");
//! println!("{} units per em, 'A' has {} contours", font.units_per_em(), outline.contours().count());
//! ```
//!
//! [WOFF]: https://www.w3.org/TR/WOFF/
//! [WOFF2]: https://www.w3.org/TR/WOFF2/
//! [EOT]: https://www.w3.org/Submission/EOT/

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod container;
mod font_data;
mod outline;
mod read;
mod sfnt;
pub mod tables;

pub use container::FontFormat;
pub use font_data::{Cursor, FontData};
pub use outline::{
    GlyphOutline, OutlinePen, OutlinePoint, MAX_COMPONENTS, MAX_COMPOSITE_DEPTH, MAX_OUTLINE_POINTS,
};
pub use read::{ErrorKind, FontRead, ReadError};
pub use sfnt::Sfnt;

/// Public re-export of the sfnt-types crate.
pub extern crate sfnt_types as types;

/// Decode a font in any supported container.
///
/// This is a shorthand for [`Sfnt::from_container`].
pub fn parse_font(bytes: &[u8]) -> Result<Sfnt, ReadError> {
    Sfnt::from_container(bytes)
}
