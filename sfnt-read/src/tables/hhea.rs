//! The [hhea](https://learn.microsoft.com/en-us/typography/opentype/spec/hhea) table

use sfnt_types::Tag;

use crate::{font_data::FontData, read::FontRead, read::ReadError};

pub const TAG: Tag = Tag::new(b"hhea");

/// Byte offset of `numberOfHMetrics`.
pub const NUMBER_OF_H_METRICS_OFFSET: usize = 34;

/// Horizontal header.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hhea {
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub advance_width_max: u16,
    pub number_of_h_metrics: u16,
}

impl<'a> FontRead<'a> for Hhea {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Hhea {
            ascender: data.read_at(4)?,
            descender: data.read_at(6)?,
            line_gap: data.read_at(8)?,
            advance_width_max: data.read_at(10)?,
            number_of_h_metrics: data.read_at(NUMBER_OF_H_METRICS_OFFSET)?,
        })
    }
}
