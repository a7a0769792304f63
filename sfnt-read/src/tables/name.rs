//! The [name](https://learn.microsoft.com/en-us/typography/opentype/spec/name) table

use sfnt_types::Tag;

use crate::{font_data::FontData, read::FontRead, read::ReadError};

pub const TAG: Tag = Tag::new(b"name");

pub const FAMILY_NAME: u16 = 1;
pub const SUBFAMILY_NAME: u16 = 2;
pub const FULL_NAME: u16 = 4;
pub const VERSION_STRING: u16 = 5;

const WINDOWS_ENGLISH_US: u16 = 0x0409;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    length: u16,
    offset: u16,
}

/// The naming table.
#[derive(Clone, Debug)]
pub struct Name<'a> {
    records: Vec<NameRecord>,
    storage: FontData<'a>,
}

impl<'a> FontRead<'a> for Name<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let count: u16 = cursor.read()?;
        let storage_offset: u16 = cursor.read()?;
        let records = (0..count)
            .map(|_| {
                Ok(NameRecord {
                    platform_id: cursor.read()?,
                    encoding_id: cursor.read()?,
                    language_id: cursor.read()?,
                    name_id: cursor.read()?,
                    length: cursor.read()?,
                    offset: cursor.read()?,
                })
            })
            .collect::<Result<Vec<_>, ReadError>>()?;
        let storage = data
            .split_off(storage_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Name { records, storage })
    }
}

impl Name<'_> {
    pub fn records(&self) -> &[NameRecord] {
        &self.records
    }

    /// Decode the best available string for `name_id`.
    ///
    /// Windows US English is preferred, then any Unicode encoded record,
    /// then Macintosh Roman.
    pub fn string(&self, name_id: u16) -> Option<String> {
        let candidates = self.records.iter().filter(|rec| rec.name_id == name_id);
        let best = candidates.min_by_key(|rec| match (rec.platform_id, rec.language_id) {
            (3, WINDOWS_ENGLISH_US) => 0,
            (3, _) | (0, _) => 1,
            (1, _) if rec.encoding_id == 0 => 2,
            _ => 3,
        })?;
        let start = best.offset as usize;
        let bytes = self
            .storage
            .read_bytes(start..start + best.length as usize)
            .ok()?;
        match best.platform_id {
            0 | 3 => {
                let units = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
                Some(
                    char::decode_utf16(units)
                        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                        .collect(),
                )
            }
            // the ASCII half of Mac Roman; the upper half is rare in names
            1 => Some(
                bytes
                    .iter()
                    .map(|&b| if b.is_ascii() { b as char } else { '?' })
                    .collect(),
            ),
            _ => None,
        }
    }
}
