//! The SFNT table directory

use std::ops::Range;

use sfnt_types::{is_sfnt_version, Tag};

use crate::{font_data::FontData, read::FontRead, read::ReadError};

/// Size of the fixed table directory header.
pub const HEADER_LEN: usize = 12;
/// Size of one table record.
pub const RECORD_LEN: usize = 16;

/// The location of one table within the font data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableRecord {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

impl TableRecord {
    pub fn range(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start.saturating_add(self.length as usize)
    }
}

/// The table directory at the start of an SFNT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableDirectory {
    pub sfnt_version: u32,
    records: Vec<TableRecord>,
    sorted: bool,
}

impl TableDirectory {
    pub fn records(&self) -> &[TableRecord] {
        &self.records
    }

    pub fn find(&self, tag: Tag) -> Option<&TableRecord> {
        if self.sorted {
            self.records
                .binary_search_by(|rec| rec.tag.cmp(&tag))
                .ok()
                .map(|idx| &self.records[idx])
        } else {
            self.records.iter().find(|rec| rec.tag == tag)
        }
    }
}

impl<'a> FontRead<'a> for TableDirectory {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let sfnt_version: u32 = cursor.read()?;
        if !is_sfnt_version(sfnt_version) {
            return Err(ReadError::InvalidSfnt(sfnt_version));
        }
        let num_tables: u16 = cursor.read()?;
        // searchRange, entrySelector, rangeShift are derived values
        cursor.advance_by(6);
        let records = (0..num_tables)
            .map(|_| {
                Ok(TableRecord {
                    tag: cursor.read()?,
                    checksum: cursor.read()?,
                    offset: cursor.read()?,
                    length: cursor.read()?,
                })
            })
            .collect::<Result<Vec<_>, ReadError>>()?;
        for record in &records {
            if data.slice(record.range()).is_none() {
                log::warn!(
                    "table {} at {}+{} exceeds font length {}",
                    record.tag,
                    record.offset,
                    record.length,
                    data.len()
                );
                return Err(ReadError::OutOfBounds);
            }
        }
        let sorted = records.windows(2).all(|pair| pair[0].tag < pair[1].tag);
        if !sorted {
            log::warn!("table directory is not sorted by tag");
        }
        Ok(TableDirectory {
            sfnt_version,
            records,
            sorted,
        })
    }
}

/// Binary search helper fields stored in table directories and some cmap
/// subtables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchParams {
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
}

impl SearchParams {
    /// Compute the fields for `num_items` entries of `item_size` bytes.
    pub fn new(num_items: u16, item_size: u16) -> Self {
        let entry_selector = if num_items == 0 {
            0
        } else {
            (u16::BITS - 1 - num_items.leading_zeros()) as u16
        };
        let search_range = (1u16 << entry_selector).wrapping_mul(item_size);
        let range_shift = num_items.wrapping_mul(item_size).wrapping_sub(search_range);
        SearchParams {
            search_range,
            entry_selector,
            range_shift,
        }
    }
}

/// The SFNT checksum of `data`: the wrapping sum of its big-endian `u32`
/// words, with the final partial word zero padded.
pub fn checksum(data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(4);
    let mut sum = chunks
        .by_ref()
        .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .fold(0u32, u32::wrapping_add);
    let rem = chunks.remainder();
    if !rem.is_empty() {
        let mut last = [0u8; 4];
        last[..rem.len()].copy_from_slice(rem);
        sum = sum.wrapping_add(u32::from_be_bytes(last));
    }
    sum
}

/// Round up to the next multiple of four.
pub fn round4(len: usize) -> usize {
    (len + 3) & !3
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::bebuffer::BeBuffer;

    #[test]
    fn search_params() {
        assert_eq!(
            SearchParams::new(9, 16),
            SearchParams {
                search_range: 128,
                entry_selector: 3,
                range_shift: 16
            }
        );
        assert_eq!(SearchParams::new(1, 16).entry_selector, 0);
        assert_eq!(SearchParams::new(0, 16).search_range, 16);
    }

    #[test]
    fn checksum_pads_last_word() {
        assert_eq!(checksum(&[0, 0, 0, 1, 0, 0, 0, 2]), 3);
        assert_eq!(checksum(&[1]), 0x01000000);
        assert_eq!(checksum(&[0xff, 0xff, 0xff, 0xff, 0, 0, 0, 2]), 1);
    }

    #[test]
    fn read_directory() {
        let buf = BeBuffer::new()
            .push(0x00010000u32)
            .push(2u16)
            .extend([32u16, 1, 0])
            .push(Tag::new(b"cmap"))
            .extend([0u32, 44, 4])
            .push(Tag::new(b"head"))
            .extend([0u32, 48, 4])
            .extend([0u32, 0]);
        let dir = TableDirectory::read(FontData::new(&buf)).unwrap();
        assert_eq!(dir.records().len(), 2);
        assert_eq!(dir.find(Tag::new(b"head")).map(|r| r.offset), Some(48));
        assert!(dir.find(Tag::new(b"glyf")).is_none());
    }

    #[test]
    fn record_past_end() {
        let buf = BeBuffer::new()
            .push(0x00010000u32)
            .push(1u16)
            .extend([16u16, 0, 0])
            .push(Tag::new(b"head"))
            .extend([0u32, 28, 54]);
        assert_eq!(
            TableDirectory::read(FontData::new(&buf)),
            Err(ReadError::OutOfBounds)
        );
    }

    #[test]
    fn bad_version() {
        let buf = BeBuffer::new().push(0xdeadbeefu32).push(0u16);
        assert_eq!(
            TableDirectory::read(FontData::new(&buf)),
            Err(ReadError::InvalidSfnt(0xdeadbeef))
        );
    }
}
