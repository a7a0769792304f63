//! Assembling table data into an SFNT.

use sfnt_types::{Scalar, Tag};

use crate::{checksum, search_params};

const HEAD: Tag = Tag::new(b"head");
const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;

/// Lay out `tables` as a font: sorted directory, four byte aligned tables,
/// table checksums and, when there is a `head` table, a correct
/// `checkSumAdjustment`.
///
/// The `checkSumAdjustment` field of the provided `head` must be zero.
pub fn assemble(sfnt_version: u32, mut tables: Vec<(Tag, Vec<u8>)>) -> Vec<u8> {
    tables.sort_by_key(|(tag, _)| *tag);
    let num_tables = tables.len() as u16;
    let (search_range, entry_selector, range_shift) = search_params(num_tables, 16);
    let mut out = Vec::new();
    sfnt_version.write_be(&mut out);
    num_tables.write_be(&mut out);
    search_range.write_be(&mut out);
    entry_selector.write_be(&mut out);
    range_shift.write_be(&mut out);

    let mut offset = 12 + 16 * tables.len();
    let mut head_offset = None;
    for (tag, data) in &tables {
        if *tag == HEAD {
            head_offset = Some(offset);
        }
        tag.write_be(&mut out);
        checksum(data).write_be(&mut out);
        (offset as u32).write_be(&mut out);
        (data.len() as u32).write_be(&mut out);
        offset += data.len().div_ceil(4) * 4;
    }
    for (_, data) in &tables {
        out.extend_from_slice(data);
        out.resize(out.len().div_ceil(4) * 4, 0);
    }
    if let Some(head_offset) = head_offset {
        let adjustment = 0xB1B0AFBAu32.wrapping_sub(checksum(&out));
        let at = head_offset + CHECKSUM_ADJUSTMENT_OFFSET;
        out[at..at + 4].copy_from_slice(&adjustment.to_be_bytes());
    }
    out
}

/// Find the data of `tag` in an assembled font.
pub fn table_data(font: &[u8], tag: Tag) -> Option<&[u8]> {
    let num_tables = u16::read_be(font.get(4..6)?)? as usize;
    (0..num_tables).find_map(|i| {
        let record = font.get(12 + i * 16..28 + i * 16)?;
        if Tag::read_be(&record[..4])? != tag {
            return None;
        }
        let offset = u32::read_be(&record[8..12])? as usize;
        let len = u32::read_be(&record[12..16])? as usize;
        font.get(offset..offset + len)
    })
}

/// The `checkSumAdjustment` stored in `head`.
pub fn checksum_adjustment(font: &[u8]) -> Option<u32> {
    let head = table_data(font, HEAD)?;
    u32::read_be(head.get(CHECKSUM_ADJUSTMENT_OFFSET..CHECKSUM_ADJUSTMENT_OFFSET + 4)?)
}
