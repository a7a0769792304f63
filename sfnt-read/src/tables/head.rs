//! The [head](https://learn.microsoft.com/en-us/typography/opentype/spec/head) table

use sfnt_types::{BoundingBox, Tag};

use crate::{font_data::FontData, read::FontRead, read::ReadError};

pub const TAG: Tag = Tag::new(b"head");

/// `magicNumber` must hold this value.
pub const MAGIC: u32 = 0x5F0F3CF5;

/// Byte offset of `checkSumAdjustment`.
pub const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;
/// Byte offset of `indexToLocFormat`.
pub const INDEX_TO_LOC_FORMAT_OFFSET: usize = 50;

/// Font header.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Head {
    pub checksum_adjustment: u32,
    pub flags: u16,
    pub units_per_em: u16,
    pub bounding_box: BoundingBox<i16>,
    pub mac_style: u16,
    pub lowest_rec_ppem: u16,
    /// 0 for 16-bit `loca` offsets, 1 for 32-bit.
    pub index_to_loc_format: i16,
}

impl<'a> FontRead<'a> for Head {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let magic: u32 = data.read_at(12)?;
        if magic != MAGIC {
            log::warn!("head magic number is 0x{magic:08X}");
        }
        let units_per_em: u16 = data.read_at(18)?;
        if units_per_em == 0 {
            return Err(ReadError::MalformedData("unitsPerEm is zero"));
        }
        Ok(Head {
            checksum_adjustment: data.read_at(CHECKSUM_ADJUSTMENT_OFFSET)?,
            flags: data.read_at(16)?,
            units_per_em,
            bounding_box: BoundingBox {
                x_min: data.read_at(36)?,
                y_min: data.read_at(38)?,
                x_max: data.read_at(40)?,
                y_max: data.read_at(42)?,
            },
            mac_style: data.read_at(44)?,
            lowest_rec_ppem: data.read_at(46)?,
            index_to_loc_format: data.read_at(INDEX_TO_LOC_FORMAT_OFFSET)?,
        })
    }
}
