//! The [OS/2](https://learn.microsoft.com/en-us/typography/opentype/spec/os2) table

use sfnt_types::Tag;

use crate::{font_data::FontData, read::FontRead, read::ReadError};

pub const TAG: Tag = Tag::new(b"OS/2");

/// OS/2 and Windows metrics.
///
/// `x_height` and `cap_height` only exist from version 2 onwards.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Os2 {
    pub version: u16,
    pub x_avg_char_width: i16,
    pub weight_class: u16,
    pub width_class: u16,
    pub fs_type: u16,
    pub fs_selection: u16,
    pub typo_ascender: i16,
    pub typo_descender: i16,
    pub typo_line_gap: i16,
    pub win_ascent: u16,
    pub win_descent: u16,
    pub x_height: Option<i16>,
    pub cap_height: Option<i16>,
}

impl<'a> FontRead<'a> for Os2 {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version: u16 = data.read_at(0)?;
        let (x_height, cap_height) = if version >= 2 {
            (Some(data.read_at(86)?), Some(data.read_at(88)?))
        } else {
            (None, None)
        };
        Ok(Os2 {
            version,
            x_avg_char_width: data.read_at(2)?,
            weight_class: data.read_at(4)?,
            width_class: data.read_at(6)?,
            fs_type: data.read_at(8)?,
            fs_selection: data.read_at(62)?,
            typo_ascender: data.read_at(68)?,
            typo_descender: data.read_at(70)?,
            typo_line_gap: data.read_at(72)?,
            win_ascent: data.read_at(74)?,
            win_descent: data.read_at(76)?,
            x_height,
            cap_height,
        })
    }
}
