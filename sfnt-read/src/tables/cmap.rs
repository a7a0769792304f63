//! The [cmap](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap) table

use sfnt_types::{GlyphId, Tag};

use crate::{font_data::FontData, read::FontRead, read::ReadError};

pub const TAG: Tag = Tag::new(b"cmap");

pub const PLATFORM_UNICODE: u16 = 0;
pub const PLATFORM_MACINTOSH: u16 = 1;
pub const PLATFORM_WINDOWS: u16 = 3;

const WINDOWS_UNICODE_BMP: u16 = 1;
const WINDOWS_UNICODE_FULL: u16 = 10;

/// A (platform, encoding) pair and the offset of its subtable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodingRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub subtable_offset: u32,
}

impl EncodingRecord {
    /// Whether the subtable is keyed by Unicode codepoints.
    pub fn is_unicode(&self) -> bool {
        match self.platform_id {
            PLATFORM_UNICODE => true,
            PLATFORM_WINDOWS => matches!(
                self.encoding_id,
                WINDOWS_UNICODE_BMP | WINDOWS_UNICODE_FULL
            ),
            _ => false,
        }
    }

    /// The largest codepoint the subtable can be trusted to map as Unicode.
    ///
    /// Mac Roman only agrees with Unicode below 0x80.
    pub fn max_codepoint(&self) -> u32 {
        if self.is_unicode() {
            char::MAX as u32
        } else {
            0x7F
        }
    }
}

/// Character to glyph mapping table.
#[derive(Clone, Debug)]
pub struct Cmap<'a> {
    data: FontData<'a>,
    records: Vec<EncodingRecord>,
}

impl<'a> FontRead<'a> for Cmap<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: u16 = cursor.read()?;
        if version != 0 {
            return Err(ReadError::InvalidVersion(version as u32));
        }
        let num_tables: u16 = cursor.read()?;
        let records = (0..num_tables)
            .map(|_| {
                Ok(EncodingRecord {
                    platform_id: cursor.read()?,
                    encoding_id: cursor.read()?,
                    subtable_offset: cursor.read()?,
                })
            })
            .collect::<Result<Vec<_>, ReadError>>()?;
        Ok(Cmap { data, records })
    }
}

impl<'a> Cmap<'a> {
    pub fn encoding_records(&self) -> &[EncodingRecord] {
        &self.records
    }

    pub fn subtable(&self, record: &EncodingRecord) -> Result<CmapSubtable<'a>, ReadError> {
        let data = self
            .data
            .split_off(record.subtable_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        CmapSubtable::read(data)
    }

    /// Choose the subtable with the widest Unicode coverage.
    ///
    /// Full repertoire format 12 subtables win over BMP-only format 4 ones;
    /// simpler formats are a last resort. Unreadable subtables are skipped.
    pub fn best_subtable(&self) -> Option<(EncodingRecord, CmapSubtable<'a>)> {
        let mut best: Option<(u8, EncodingRecord, CmapSubtable<'a>)> = None;
        for record in &self.records {
            let subtable = match self.subtable(record) {
                Ok(subtable) => subtable,
                Err(e) => {
                    log::warn!(
                        "skipping cmap subtable ({}, {}): {e}",
                        record.platform_id,
                        record.encoding_id
                    );
                    continue;
                }
            };
            let Some(rank) = subtable_rank(record, &subtable) else {
                continue;
            };
            if best.as_ref().is_none_or(|(best_rank, ..)| rank < *best_rank) {
                best = Some((rank, *record, subtable));
            }
        }
        let (_, record, subtable) = best?;
        log::debug!(
            "selected cmap subtable ({}, {}) format {}",
            record.platform_id,
            record.encoding_id,
            subtable.format()
        );
        Some((record, subtable))
    }
}

// lower is better; `None` for subtables that do not map Unicode
fn subtable_rank(record: &EncodingRecord, subtable: &CmapSubtable) -> Option<u8> {
    match (subtable, record.is_unicode()) {
        (CmapSubtable::Format12(_), true) => Some(0),
        (CmapSubtable::Format4(_), true) => Some(1),
        (CmapSubtable::Format6(_), true) => Some(2),
        (CmapSubtable::Format0(_), true) => Some(3),
        // usable for ASCII only, see `EncodingRecord::max_codepoint`
        (CmapSubtable::Format6(_) | CmapSubtable::Format0(_), false)
            if record.platform_id == PLATFORM_MACINTOSH =>
        {
            Some(4)
        }
        _ => None,
    }
}

/// A decoded cmap subtable.
#[derive(Clone, Copy, Debug)]
pub enum CmapSubtable<'a> {
    Format0(Cmap0<'a>),
    Format4(Cmap4<'a>),
    Format6(Cmap6<'a>),
    Format12(Cmap12<'a>),
    Unsupported(u16),
}

impl<'a> CmapSubtable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        Ok(match format {
            0 => CmapSubtable::Format0(Cmap0::read(data)?),
            4 => CmapSubtable::Format4(Cmap4::read(data)?),
            6 => CmapSubtable::Format6(Cmap6::read(data)?),
            12 => CmapSubtable::Format12(Cmap12::read(data)?),
            other => CmapSubtable::Unsupported(other),
        })
    }

    pub fn format(&self) -> u16 {
        match self {
            CmapSubtable::Format0(_) => 0,
            CmapSubtable::Format4(_) => 4,
            CmapSubtable::Format6(_) => 6,
            CmapSubtable::Format12(_) => 12,
            CmapSubtable::Unsupported(format) => *format,
        }
    }

    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId> {
        match self {
            CmapSubtable::Format0(table) => table.map_codepoint(codepoint),
            CmapSubtable::Format4(table) => table.map_codepoint(codepoint),
            CmapSubtable::Format6(table) => table.map_codepoint(codepoint),
            CmapSubtable::Format12(table) => table.map_codepoint(codepoint),
            CmapSubtable::Unsupported(_) => None,
        }
    }

    /// Call `f` with every (codepoint, glyph) pair mapped to a glyph other
    /// than `.notdef`, in increasing codepoint order.
    pub fn for_each_mapping(&self, mut f: impl FnMut(u32, GlyphId)) {
        match self {
            CmapSubtable::Format0(table) => table.for_each_mapping(&mut f),
            CmapSubtable::Format4(table) => table.for_each_mapping(&mut f),
            CmapSubtable::Format6(table) => table.for_each_mapping(&mut f),
            CmapSubtable::Format12(table) => table.for_each_mapping(&mut f),
            CmapSubtable::Unsupported(_) => (),
        }
    }
}

/// Format 0: byte encoding table.
#[derive(Clone, Copy, Debug)]
pub struct Cmap0<'a> {
    glyph_ids: &'a [u8],
}

impl<'a> Cmap0<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Cmap0 {
            glyph_ids: data.read_bytes(6..6 + 256)?,
        })
    }

    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId> {
        self.glyph_ids
            .get(codepoint as usize)
            .map(|gid| GlyphId::new(*gid as u16))
    }

    fn for_each_mapping(&self, f: &mut impl FnMut(u32, GlyphId)) {
        for (cp, gid) in self.glyph_ids.iter().enumerate() {
            if *gid != 0 {
                f(cp as u32, GlyphId::new(*gid as u16));
            }
        }
    }
}

/// Format 4: segment mapping to delta values.
#[derive(Clone, Copy, Debug)]
pub struct Cmap4<'a> {
    data: FontData<'a>,
    seg_count: usize,
}

impl<'a> Cmap4<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let seg_count_x2: u16 = data.read_at(6)?;
        if seg_count_x2 % 2 != 0 {
            return Err(ReadError::MalformedData("odd segCountX2 in cmap format 4"));
        }
        let seg_count = seg_count_x2 as usize / 2;
        let table = Cmap4 { data, seg_count };
        // the four parallel arrays must be present
        data.read_at::<u16>(table.id_range_offsets_start() + seg_count * 2 - 2)?;
        Ok(table)
    }

    fn end_codes_start(&self) -> usize {
        14
    }

    fn start_codes_start(&self) -> usize {
        self.end_codes_start() + self.seg_count * 2 + 2
    }

    fn id_deltas_start(&self) -> usize {
        self.start_codes_start() + self.seg_count * 2
    }

    fn id_range_offsets_start(&self) -> usize {
        self.id_deltas_start() + self.seg_count * 2
    }

    fn segment(&self, idx: usize) -> Result<(u16, u16, i16, u16), ReadError> {
        Ok((
            self.data.read_at(self.start_codes_start() + idx * 2)?,
            self.data.read_at(self.end_codes_start() + idx * 2)?,
            self.data.read_at(self.id_deltas_start() + idx * 2)?,
            self.data.read_at(self.id_range_offsets_start() + idx * 2)?,
        ))
    }

    fn lookup(&self, idx: usize, codepoint: u16) -> Result<u16, ReadError> {
        let (start, _, delta, range_offset) = self.segment(idx)?;
        if range_offset == 0 {
            return Ok(codepoint.wrapping_add(delta as u16));
        }
        // the offset is relative to the idRangeOffset entry itself
        let addr = self.id_range_offsets_start()
            + idx * 2
            + range_offset as usize
            + (codepoint - start) as usize * 2;
        let gid: u16 = self.data.read_at(addr)?;
        Ok(if gid == 0 {
            0
        } else {
            gid.wrapping_add(delta as u16)
        })
    }

    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId> {
        let codepoint: u16 = codepoint.try_into().ok()?;
        // find the first segment whose end code is >= codepoint
        let mut lo = 0;
        let mut hi = self.seg_count;
        while lo < hi {
            let mid = (lo + hi) / 2;
            let end: u16 = self.data.read_at(self.end_codes_start() + mid * 2).ok()?;
            if end < codepoint {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        if lo >= self.seg_count {
            return None;
        }
        let start: u16 = self.data.read_at(self.start_codes_start() + lo * 2).ok()?;
        if codepoint < start {
            return None;
        }
        self.lookup(lo, codepoint).ok().map(GlyphId::new)
    }

    fn for_each_mapping(&self, f: &mut impl FnMut(u32, GlyphId)) {
        for idx in 0..self.seg_count {
            let Ok((start, end, ..)) = self.segment(idx) else {
                return;
            };
            if start > end {
                continue;
            }
            for codepoint in start..=end {
                // 0xFFFF terminates the final segment and is never a character
                if codepoint == 0xFFFF {
                    break;
                }
                match self.lookup(idx, codepoint) {
                    Ok(0) => (),
                    Ok(gid) => f(codepoint as u32, GlyphId::new(gid)),
                    Err(_) => break,
                }
            }
        }
    }
}

/// Format 6: trimmed table mapping.
#[derive(Clone, Copy, Debug)]
pub struct Cmap6<'a> {
    data: FontData<'a>,
    first_code: u16,
    entry_count: u16,
}

impl<'a> Cmap6<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let first_code = data.read_at(6)?;
        let entry_count: u16 = data.read_at(8)?;
        data.read_bytes(10..10 + entry_count as usize * 2)?;
        Ok(Cmap6 {
            data,
            first_code,
            entry_count,
        })
    }

    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId> {
        let idx = codepoint.checked_sub(self.first_code as u32)?;
        if idx >= self.entry_count as u32 {
            return None;
        }
        self.data
            .read_at::<u16>(10 + idx as usize * 2)
            .ok()
            .map(GlyphId::new)
    }

    fn for_each_mapping(&self, f: &mut impl FnMut(u32, GlyphId)) {
        for idx in 0..self.entry_count as u32 {
            let codepoint = self.first_code as u32 + idx;
            match self.map_codepoint(codepoint) {
                Some(gid) if gid != GlyphId::NOTDEF => f(codepoint, gid),
                _ => (),
            }
        }
    }
}

/// Format 12: segmented coverage.
#[derive(Clone, Copy, Debug)]
pub struct Cmap12<'a> {
    groups: FontData<'a>,
    num_groups: usize,
}

impl<'a> Cmap12<'a> {
    const GROUP_LEN: usize = 12;

    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let num_groups = data.read_at::<u32>(12)? as usize;
        let len = num_groups
            .checked_mul(Self::GROUP_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        let groups = data.slice(16..16 + len).ok_or(ReadError::OutOfBounds)?;
        Ok(Cmap12 { groups, num_groups })
    }

    // (startCharCode, endCharCode, startGlyphID)
    fn group(&self, idx: usize) -> (u32, u32, u32) {
        let offset = idx * Self::GROUP_LEN;
        // in bounds: the slice was validated in `read`
        (
            self.groups.read_at(offset).unwrap_or_default(),
            self.groups.read_at(offset + 4).unwrap_or_default(),
            self.groups.read_at(offset + 8).unwrap_or_default(),
        )
    }

    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId> {
        let mut lo = 0;
        let mut hi = self.num_groups;
        while lo < hi {
            let mid = (lo + hi) / 2;
            let (start, end, start_glyph) = self.group(mid);
            if codepoint < start {
                hi = mid;
            } else if codepoint > end {
                lo = mid + 1;
            } else {
                return GlyphId::try_from(start_glyph.checked_add(codepoint - start)?).ok();
            }
        }
        None
    }

    fn for_each_mapping(&self, f: &mut impl FnMut(u32, GlyphId)) {
        for idx in 0..self.num_groups {
            let (start, end, start_glyph) = self.group(idx);
            if start > end || end > char::MAX as u32 {
                continue;
            }
            for codepoint in start..=end {
                let Some(gid) = start_glyph
                    .checked_add(codepoint - start)
                    .and_then(|gid| GlyphId::try_from(gid).ok())
                else {
                    break;
                };
                if gid != GlyphId::NOTDEF {
                    f(codepoint, gid);
                }
            }
        }
    }
}
