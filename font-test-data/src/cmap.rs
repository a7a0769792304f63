//! cmap tables built from codepoint ranges
//!
//! Each range is `(first, last, first_glyph)`: `first..=last` map to
//! consecutive glyphs starting at `first_glyph`.

use crate::{be_buffer, bebuffer::BeBuffer, search_params};

pub type CharRange = (char, char, u16);

fn is_bmp(c: char) -> bool {
    (c as u32) <= 0xFFFF
}

/// A format 4 subtable covering the BMP part of `ranges`.
pub fn format4_subtable(ranges: &[CharRange]) -> BeBuffer {
    let mut segments: Vec<(u16, u16, u16)> = ranges
        .iter()
        .filter(|(first, last, _)| is_bmp(*first) && is_bmp(*last))
        .map(|(first, last, gid)| (*first as u16, *last as u16, *gid))
        .collect();
    segments.sort_unstable();
    // the mandatory final segment maps 0xFFFF to glyph 0
    segments.push((0xFFFF, 0xFFFF, 0));
    let seg_count = segments.len() as u16;
    let (search_range, entry_selector, range_shift) = search_params(seg_count, 2);

    let length = 16 + 8 * seg_count;
    let mut buf = be_buffer! {
        4u16,           // format
        length,         // length
        0u16,           // language
        seg_count * 2,  // segCountX2
        search_range,
        entry_selector,
        range_shift
    };
    buf = buf.extend(segments.iter().map(|(_, last, _)| *last));
    // reservedPad
    buf = buf.push(0u16);
    buf = buf.extend(segments.iter().map(|(first, _, _)| *first));
    buf = buf.extend(segments.iter().map(|(first, _, gid)| gid.wrapping_sub(*first)));
    buf.extend(segments.iter().map(|_| 0u16))
}

/// A format 12 subtable covering all of `ranges`.
pub fn format12_subtable(ranges: &[CharRange]) -> BeBuffer {
    let mut groups = ranges.to_vec();
    groups.sort_unstable();
    let length = 16 + 12 * groups.len() as u32;
    let buf = be_buffer! {
        12u16,  // format
        0u16,   // reserved
        length,
        0u32,   // language
        groups.len() as u32
    };
    groups.iter().fold(buf, |buf, (first, last, gid)| {
        buf.push(*first as u32).push(*last as u32).push(*gid as u32)
    })
}

/// A complete cmap table: a Windows BMP format 4 subtable, plus a Windows
/// full repertoire format 12 subtable if any range lies beyond the BMP.
pub fn cmap_table(ranges: &[CharRange]) -> BeBuffer {
    let format4 = format4_subtable(ranges);
    let needs_full = ranges.iter().any(|(_, last, _)| !is_bmp(*last));
    let num_tables = 1 + needs_full as u16;
    let header_len = 4 + 8 * num_tables as u32;
    let mut buf = be_buffer! {
        0u16,       // version
        num_tables,
        3u16, 1u16, header_len
    };
    if needs_full {
        buf = buf.extend([3u16, 10]).push(header_len + format4.len() as u32);
    }
    buf = buf.extend_bytes(&format4);
    if needs_full {
        buf = buf.extend_bytes(&format12_subtable(ranges));
    }
    buf
}

/// A cmap table whose only subtable is a Macintosh Roman format 0 one,
/// mapping each `(byte, glyph)` pair of `codes`.
pub fn mac_roman_cmap_table(codes: &[(u8, u8)]) -> BeBuffer {
    let mut glyph_ids = [0u8; 256];
    for &(code, gid) in codes {
        glyph_ids[code as usize] = gid;
    }
    be_buffer! {
        0u16,           // version
        1u16,           // numTables
        1u16, 0u16,     // Macintosh, Roman
        12u32,          // subtableOffset
        0u16,           // format
        262u16,         // length
        0u16            // language
    }
    .extend(glyph_ids)
}
