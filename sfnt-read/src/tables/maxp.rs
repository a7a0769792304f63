//! The [maxp](https://learn.microsoft.com/en-us/typography/opentype/spec/maxp) table

use sfnt_types::Tag;

use crate::{font_data::FontData, read::FontRead, read::ReadError};

pub const TAG: Tag = Tag::new(b"maxp");

/// Byte offset of `numGlyphs`.
pub const NUM_GLYPHS_OFFSET: usize = 4;

/// Maximum profile. Only the glyph count is decoded; the TrueType limits
/// in version 1.0 are hints for hinting interpreters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maxp {
    pub version: u32,
    pub num_glyphs: u16,
}

impl<'a> FontRead<'a> for Maxp {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version: u32 = data.read_at(0)?;
        if version != 0x00005000 && version != 0x00010000 {
            return Err(ReadError::InvalidVersion(version));
        }
        Ok(Maxp {
            version,
            num_glyphs: data.read_at(NUM_GLYPHS_OFFSET)?,
        })
    }
}
