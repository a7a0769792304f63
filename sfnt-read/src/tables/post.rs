//! The [post](https://learn.microsoft.com/en-us/typography/opentype/spec/post) table

use sfnt_types::Tag;

use crate::{font_data::FontData, read::FontRead, read::ReadError};

pub const TAG: Tag = Tag::new(b"post");

/// Size of the version 3.0 table, which carries no glyph names.
pub const VERSION_3_LEN: usize = 32;

/// PostScript information; glyph names are not decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    pub version: u32,
    pub italic_angle: sfnt_types::Fixed,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: u32,
}

impl<'a> FontRead<'a> for Post {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        Ok(Post {
            version: cursor.read()?,
            italic_angle: cursor.read()?,
            underline_position: cursor.read()?,
            underline_thickness: cursor.read()?,
            is_fixed_pitch: cursor.read()?,
        })
    }
}
