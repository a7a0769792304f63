//! the [cmap] table
//!
//! [cmap]: https://docs.microsoft.com/en-us/typography/opentype/spec/cmap

use std::collections::BTreeMap;

use sfnt_read::tables::{cmap::PLATFORM_WINDOWS, directory::SearchParams};
use sfnt_types::GlyphId;

use crate::table_writer::{FontWrite, TableWriter};

// https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#windows-platform-platform-id--3
const WINDOWS_BMP_ENCODING: u16 = 1;
const WINDOWS_FULL_REPERTOIRE_ENCODING: u16 = 10;

/// The [cmap] table, with one subtable per encoding record.
///
/// [cmap]: https://docs.microsoft.com/en-us/typography/opentype/spec/cmap
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cmap {
    encodings: Vec<(u16, u16, CmapSubtable)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CmapSubtable {
    Format4(Cmap4),
    Format12(Cmap12),
}

/// Segment mapping to delta values; every segment uses `idDelta`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cmap4 {
    end_code: Vec<u16>,
    start_code: Vec<u16>,
    id_delta: Vec<i16>,
}

/// Segmented coverage: `(startCharCode, endCharCode, startGlyphID)` groups.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cmap12 {
    groups: Vec<(u32, u32, u32)>,
}

/// A conflicting Cmap definition, one char is mapped to multiple distinct GlyphIds.
///
/// If there are multiple conflicting mappings, one is chosen arbitrarily.
/// gid1 is less than gid2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmapConflict {
    ch: char,
    gid1: GlyphId,
    gid2: GlyphId,
}

impl std::fmt::Display for CmapConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ch32 = self.ch as u32;
        write!(
            f,
            "Cannot map {:?} (U+{ch32:04X}) to two different glyph ids: {} and {}",
            self.ch, self.gid1, self.gid2
        )
    }
}

impl std::error::Error for CmapConflict {}

impl Cmap4 {
    /// Build from `(char, GlyphId)` pairs sorted by char.
    ///
    /// Characters beyond the BMP are ignored. If all characters are beyond
    /// the BMP then `None` is returned.
    fn new(mappings: &[(char, GlyphId)]) -> Option<Self> {
        let mut table = Cmap4::default();
        let mut prev: Option<(u16, u16)> = None;
        for (cp, gid) in mappings {
            let Ok(cp) = u16::try_from(*cp as u32) else {
                // mappings is sorted, so the rest will be beyond the BMP too.
                break;
            };
            let gid = gid.to_u16();
            // 0xFFFF is reserved for the final segment
            if cp == 0xFFFF {
                break;
            }
            let continues_run = prev.is_some_and(|(prev_cp, prev_gid)| {
                cp == prev_cp + 1 && gid == prev_gid.wrapping_add(1)
            });
            match table.end_code.last_mut() {
                Some(end) if continues_run => *end = cp,
                _ => {
                    table.start_code.push(cp);
                    table.end_code.push(cp);
                    // deltas are applied modulo 65536
                    table.id_delta.push(gid.wrapping_sub(cp) as i16);
                }
            }
            prev = Some((cp, gid));
        }
        if table.start_code.is_empty() {
            return None;
        }
        // close out
        table.start_code.push(0xFFFF);
        table.end_code.push(0xFFFF);
        table.id_delta.push(1);
        Some(table)
    }

    fn seg_count(&self) -> u16 {
        self.start_code.len() as u16
    }
}

impl Cmap12 {
    /// Build from `(char, GlyphId)` pairs sorted by char.
    fn new(mappings: &[(char, GlyphId)]) -> Self {
        let mut groups: Vec<(u32, u32, u32)> = Vec::new();
        for (cp, gid) in mappings {
            let (cp, gid) = (*cp as u32, gid.to_u32());
            match groups.last_mut() {
                Some((start, end, start_gid))
                    if cp == *end + 1 && gid == *start_gid + (cp - *start) =>
                {
                    *end = cp
                }
                _ => groups.push((cp, cp, gid)),
            }
        }
        Cmap12 { groups }
    }
}

impl Cmap {
    /// Generates a [cmap](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap) that is expected to work in most modern environments.
    ///
    /// This emits [format 4](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values)
    /// and, when there are characters beyond the BMP,
    /// [format 12](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-12-segmented-coverage)
    /// subtables. Mappings to `.notdef` are skipped.
    pub fn from_mappings(
        mappings: impl IntoIterator<Item = (char, GlyphId)>,
    ) -> Result<Cmap, CmapConflict> {
        let mut sorted = BTreeMap::new();
        for (ch, gid) in mappings {
            if gid == GlyphId::NOTDEF {
                continue;
            }
            if let Some(prev) = sorted.insert(ch, gid) {
                if prev != gid {
                    return Err(CmapConflict {
                        ch,
                        gid1: prev.min(gid),
                        gid2: prev.max(gid),
                    });
                }
            }
        }
        let mappings: Vec<_> = sorted.into_iter().collect();
        let mut encodings = Vec::new();
        if let Some(format4) = Cmap4::new(&mappings) {
            encodings.push((
                PLATFORM_WINDOWS,
                WINDOWS_BMP_ENCODING,
                CmapSubtable::Format4(format4),
            ));
        }
        if mappings.last().is_some_and(|(ch, _)| *ch > '\u{FFFF}') {
            encodings.push((
                PLATFORM_WINDOWS,
                WINDOWS_FULL_REPERTOIRE_ENCODING,
                CmapSubtable::Format12(Cmap12::new(&mappings)),
            ));
        }
        Ok(Cmap { encodings })
    }
}

impl FontWrite for Cmap4 {
    fn write_into(&self, writer: &mut TableWriter) {
        let seg_count = self.seg_count();
        let params = SearchParams::new(seg_count, 2);
        // 8 uint16's plus 4 parallel arrays, no glyphIdArray
        let length = 8 * 2 + 2 * seg_count * 4;
        writer.write(&4u16);
        writer.write(&length);
        // 'lang' set to zero for all 'cmap' subtables whose platform IDs are other than Macintosh
        writer.write(&0u16);
        writer.write(&(seg_count * 2));
        writer.write(&params.search_range);
        writer.write(&params.entry_selector);
        writer.write(&params.range_shift);
        writer.write(&self.end_code);
        // reservedPad
        writer.write(&0u16);
        writer.write(&self.start_code);
        writer.write(&self.id_delta);
        // idRangeOffsets
        writer.write(&vec![0u16; self.start_code.len()]);
    }
}

impl FontWrite for Cmap12 {
    fn write_into(&self, writer: &mut TableWriter) {
        let length = 16 + 12 * self.groups.len() as u32;
        writer.write(&12u16);
        writer.write(&0u16);
        writer.write(&length);
        writer.write(&0u32);
        writer.write(&(self.groups.len() as u32));
        for (start, end, gid) in &self.groups {
            writer.write(start);
            writer.write(end);
            writer.write(gid);
        }
    }
}

impl FontWrite for CmapSubtable {
    fn write_into(&self, writer: &mut TableWriter) {
        match self {
            CmapSubtable::Format4(table) => table.write_into(writer),
            CmapSubtable::Format12(table) => table.write_into(writer),
        }
    }
}

impl FontWrite for Cmap {
    fn write_into(&self, writer: &mut TableWriter) {
        let subtables: Vec<_> = self
            .encodings
            .iter()
            .map(|(.., subtable)| crate::dump_table(subtable))
            .collect();
        writer.write(&0u16);
        writer.write(&(self.encodings.len() as u16));
        let mut offset = 4 + 8 * self.encodings.len() as u32;
        for ((platform_id, encoding_id, _), data) in self.encodings.iter().zip(&subtables) {
            writer.write(platform_id);
            writer.write(encoding_id);
            writer.write(&offset);
            offset += data.len() as u32;
        }
        for data in &subtables {
            writer.write_slice(data);
        }
    }
}
