//! Font container formats.
//!
//! Each submodule unwraps one container into raw SFNT bytes. [`unwrap`]
//! sniffs the format and dispatches.

pub mod eot;
pub mod woff;
pub mod woff2;

use std::borrow::Cow;
use std::io::{self, Write};

use sfnt_types::{is_sfnt_version, Scalar, Tag};

use crate::{
    read::ReadError,
    tables::{
        directory::{checksum, round4, SearchParams, HEADER_LEN, RECORD_LEN},
        head,
    },
};

/// Upper bound for any declared decompressed or payload size.
pub const MAX_DECOMPRESSED_SIZE: u64 = 256 << 20;

pub const WOFF_SIGNATURE: u32 = u32::from_be_bytes(*b"wOFF");
pub const WOFF2_SIGNATURE: u32 = u32::from_be_bytes(*b"wOF2");
pub const TTC_SIGNATURE: u32 = u32::from_be_bytes(*b"ttcf");

/// The outer format of a font file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontFormat {
    /// TrueType or OpenType, not wrapped.
    Sfnt,
    Woff,
    Woff2,
    Eot,
}

impl FontFormat {
    /// Identify the format of `bytes` from its leading signature.
    pub fn detect(bytes: &[u8]) -> Option<FontFormat> {
        // EOT starts with a little-endian size, so look for its magic number
        // and version before trusting a leading signature
        let eot_magic = bytes
            .get(eot::MAGIC_OFFSET..eot::MAGIC_OFFSET + 2)
            .and_then(u16::read_le);
        let eot_version = bytes.get(8..12).and_then(u32::read_le);
        if eot_magic == Some(eot::MAGIC)
            && matches!(
                eot_version,
                Some(eot::VERSION_1_0 | eot::VERSION_2_1 | eot::VERSION_2_2)
            )
        {
            return Some(FontFormat::Eot);
        }
        match bytes.get(..4).and_then(u32::read_be)? {
            WOFF_SIGNATURE => Some(FontFormat::Woff),
            WOFF2_SIGNATURE => Some(FontFormat::Woff2),
            version if is_sfnt_version(version) => Some(FontFormat::Sfnt),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FontFormat::Sfnt => "SFNT",
            FontFormat::Woff => "WOFF",
            FontFormat::Woff2 => "WOFF2",
            FontFormat::Eot => "EOT",
        }
    }
}

impl std::fmt::Display for FontFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Unwrap any supported container, returning its format and SFNT bytes.
///
/// Raw SFNT input is borrowed; containers produce a new buffer.
pub fn unwrap(bytes: &[u8]) -> Result<(FontFormat, Cow<'_, [u8]>), ReadError> {
    let format = FontFormat::detect(bytes).ok_or(ReadError::InvalidFontData)?;
    let sfnt = match format {
        FontFormat::Sfnt => Cow::Borrowed(bytes),
        FontFormat::Woff => Cow::Owned(woff::decode(bytes)?),
        FontFormat::Woff2 => Cow::Owned(woff2::decode(bytes)?),
        FontFormat::Eot => Cow::Owned(eot::parse(bytes)?.1),
    };
    log::debug!("unwrapped {format} font to {} bytes of SFNT", sfnt.len());
    Ok((format, sfnt))
}

/// Lay out `tables` as an SFNT with a sorted directory, four byte aligned
/// table data and recomputed table checksums.
///
/// The `head` checksum adjustment is left as stored.
pub(crate) fn assemble_sfnt(flavor: u32, mut tables: Vec<(Tag, Vec<u8>)>) -> Vec<u8> {
    tables.sort_by_key(|(tag, _)| *tag);
    let num_tables = tables.len() as u16;
    let directory_len = HEADER_LEN + tables.len() * RECORD_LEN;
    let data_len: usize = tables.iter().map(|(_, data)| round4(data.len())).sum();

    let mut out = Vec::with_capacity(directory_len + data_len);
    let params = SearchParams::new(num_tables, RECORD_LEN as u16);
    flavor.write_be(&mut out);
    num_tables.write_be(&mut out);
    params.search_range.write_be(&mut out);
    params.entry_selector.write_be(&mut out);
    params.range_shift.write_be(&mut out);

    let mut offset = directory_len;
    for (tag, data) in &tables {
        tag.write_be(&mut out);
        table_checksum(*tag, data).write_be(&mut out);
        (offset as u32).write_be(&mut out);
        (data.len() as u32).write_be(&mut out);
        offset += round4(data.len());
    }
    for (_, data) in &tables {
        out.extend_from_slice(data);
        out.resize(round4(out.len()), 0);
    }
    out
}

/// The directory checksum of a table; for `head` the checksum adjustment is
/// treated as zero.
pub fn table_checksum(tag: Tag, data: &[u8]) -> u32 {
    let sum = checksum(data);
    if tag != head::TAG {
        return sum;
    }
    let adjustment_at = head::CHECKSUM_ADJUSTMENT_OFFSET;
    match data.get(adjustment_at..adjustment_at + 4).and_then(u32::read_be) {
        Some(adjustment) => sum.wrapping_sub(adjustment),
        None => sum,
    }
}

/// A writer that fails once more than a fixed number of bytes is written.
pub(crate) struct BoundedOutput(pub Vec<u8>, pub usize);

impl Write for BoundedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.1 < buf.len() {
            return Err(io::Error::new(
                io::ErrorKind::OutOfMemory,
                "decompressed data exceeds declared size",
            ));
        }
        self.1 -= buf.len();
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
