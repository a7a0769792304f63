//! The [loca](https://learn.microsoft.com/en-us/typography/opentype/spec/loca) table

use std::ops::Range;

use sfnt_types::{GlyphId, Tag};

use crate::{font_data::FontData, read::ReadError};

pub const TAG: Tag = Tag::new(b"loca");

/// Glyph offsets into `glyf`.
///
/// Short offsets are stored divided by two.
#[derive(Clone, Copy, Debug)]
pub enum Loca<'a> {
    Short(FontData<'a>),
    Long(FontData<'a>),
}

impl<'a> Loca<'a> {
    /// Interpret `data` according to `head.indexToLocFormat`.
    pub fn read(data: FontData<'a>, index_to_loc_format: i16) -> Result<Self, ReadError> {
        match index_to_loc_format {
            0 => Ok(Loca::Short(data)),
            1 => Ok(Loca::Long(data)),
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }

    /// The number of glyphs addressed by this table.
    pub fn len(&self) -> usize {
        match self {
            Loca::Short(data) => (data.len() / 2).saturating_sub(1),
            Loca::Long(data) => (data.len() / 4).saturating_sub(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_long(&self) -> bool {
        matches!(self, Loca::Long(_))
    }

    /// The offset stored at `idx`, in bytes.
    pub fn get_raw(&self, idx: usize) -> Result<u32, ReadError> {
        match self {
            Loca::Short(data) => data.read_at::<u16>(idx * 2).map(|off| off as u32 * 2),
            Loca::Long(data) => data.read_at(idx * 4),
        }
    }

    /// The byte range of `gid` in `glyf`. Empty glyphs have an empty range.
    pub fn glyph_range(&self, gid: GlyphId) -> Result<Range<usize>, ReadError> {
        let idx = gid.to_u16() as usize;
        if idx >= self.len() {
            return Err(ReadError::GlyphOutOfRange(gid));
        }
        let start = self.get_raw(idx)? as usize;
        let end = self.get_raw(idx + 1)? as usize;
        if end < start {
            return Err(ReadError::MalformedData("loca offsets decrease"));
        }
        Ok(start..end)
    }
}
