//! WOFF, WOFF2 and EOT wrappers for an assembled SFNT.

use std::io::Write;

use brotlic::CompressorWriter;
use flate2::{write::ZlibEncoder, Compression};
use sfnt_types::{Scalar, Tag};

use crate::{bebuffer::BeBuffer, sfnt};

struct TableRecord<'a> {
    tag: Tag,
    checksum: u32,
    data: &'a [u8],
}

// (flavor, tables in directory order)
fn split_tables(font: &[u8]) -> (u32, Vec<TableRecord<'_>>) {
    let read_u32 = |at: usize| u32::read_be(&font[at..at + 4]).unwrap_or_default();
    let flavor = read_u32(0);
    let num_tables = u16::read_be(&font[4..6]).unwrap_or_default() as usize;
    let tables = (0..num_tables)
        .map(|i| {
            let record = 12 + i * 16;
            let offset = read_u32(record + 8) as usize;
            let len = read_u32(record + 12) as usize;
            TableRecord {
                tag: Tag::read_be(&font[record..record + 4]).unwrap_or(Tag::new(b"    ")),
                checksum: read_u32(record + 4),
                data: &font[offset..offset + len],
            }
        })
        .collect();
    (flavor, tables)
}

/// Wrap `font` in WOFF 1.0.
///
/// Each table is zlib compressed unless that would not make it smaller.
pub fn woff(font: &[u8]) -> Vec<u8> {
    let (flavor, tables) = split_tables(font);
    let header_len = 44 + 20 * tables.len();
    let mut directory = BeBuffer::new();
    let mut data = Vec::new();
    for table in &tables {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        let compressed = encoder
            .write_all(table.data)
            .and_then(|_| encoder.finish())
            .unwrap_or_default();
        let stored: &[u8] = if !compressed.is_empty() && compressed.len() < table.data.len() {
            &compressed
        } else {
            table.data
        };
        directory = directory
            .push(table.tag)
            .push((header_len + data.len()) as u32)
            .push(stored.len() as u32)
            .push(table.data.len() as u32)
            .push(table.checksum);
        data.extend_from_slice(stored);
        data.resize(data.len().div_ceil(4) * 4, 0);
    }
    BeBuffer::new()
        .push(u32::from_be_bytes(*b"wOFF"))
        .push(flavor)
        .push((header_len + data.len()) as u32)
        .push(tables.len() as u16)
        .push(0u16) // reserved
        .push(font.len() as u32)
        .extend([1u16, 0]) // major, minor version
        .extend([0u32; 5]) // metadata and private blocks
        .extend_bytes(&directory)
        .extend_bytes(&data)
        .into_vec()
}

const WOFF2_KNOWN_TAGS: [&[u8; 4]; 13] = [
    b"cmap", b"head", b"hhea", b"hmtx", b"maxp", b"name", b"OS/2", b"post", b"cvt ", b"fpgm",
    b"glyf", b"loca", b"prep",
];

fn push_base128(mut buf: BeBuffer, value: u32) -> BeBuffer {
    let mut groups = vec![(value & 0x7F) as u8];
    let mut rest = value >> 7;
    while rest != 0 {
        groups.push((rest & 0x7F) as u8 | 0x80);
        rest >>= 7;
    }
    for byte in groups.into_iter().rev() {
        buf = buf.push(byte);
    }
    buf
}

/// Wrap `font` in WOFF 2.0 with every table null transformed.
pub fn woff2(font: &[u8]) -> Vec<u8> {
    let (flavor, tables) = split_tables(font);
    let mut directory = BeBuffer::new();
    let mut stream = Vec::new();
    for table in &tables {
        let known = WOFF2_KNOWN_TAGS
            .iter()
            .position(|tag| table.tag == **tag);
        // glyf and loca use transform version 3 for "no transform"
        let version: u8 = if matches!(&table.tag.to_be_bytes(), b"glyf" | b"loca") {
            3
        } else {
            0
        };
        directory = match known {
            Some(idx) => directory.push(idx as u8 | (version << 6)),
            None => directory.push(0x3F | (version << 6)).push(table.tag),
        };
        directory = push_base128(directory, table.data.len() as u32);
        stream.extend_from_slice(table.data);
    }
    let mut compressor = CompressorWriter::new(Vec::new());
    let compressed = compressor
        .write_all(&stream)
        .ok()
        .and_then(|_| compressor.into_inner().ok())
        .unwrap_or_default();

    let mut buf = BeBuffer::new()
        .push(u32::from_be_bytes(*b"wOF2"))
        .push(flavor)
        .push(0u32) // length, patched below
        .push(tables.len() as u16)
        .push(0u16) // reserved
        .push(font.len() as u32)
        .push(compressed.len() as u32)
        .extend([1u16, 0])
        .extend([0u32; 5])
        .extend_bytes(&directory)
        .extend_bytes(&compressed)
        .align_to(4);
    let len = buf.len() as u32;
    buf.write_at(8, len);
    buf.into_vec()
}

pub const EOT_VERSION_1_0: u32 = 0x00010000;
pub const EOT_VERSION_2_1: u32 = 0x00020001;
pub const EOT_VERSION_2_2: u32 = 0x00020002;
pub const EOT_FLAG_COMPRESSED: u32 = 0x0000_0004;
pub const EOT_FLAG_XOR_ENCRYPTED: u32 = 0x1000_0000;

/// A little-endian buffer, for the EOT header.
#[derive(Default)]
struct LeBuffer(Vec<u8>);

impl LeBuffer {
    fn push(mut self, item: impl Scalar) -> Self {
        item.write_le(&mut self.0);
        self
    }

    fn name(self, value: &str) -> Self {
        let bytes: Vec<u8> = value.encode_utf16().flat_map(u16::to_le_bytes).collect();
        let mut buf = self.push(bytes.len() as u16);
        buf.0.extend(bytes);
        buf
    }
}

/// Wrap `font` in Embedded OpenType `version` with the given `flags`.
///
/// The payload is XOR obfuscated when `flags` asks for it; the compression
/// flag is set as given but the payload is never actually compressed.
pub fn eot(font: &[u8], version: u32, flags: u32) -> Vec<u8> {
    let mut payload = font.to_vec();
    if flags & EOT_FLAG_XOR_ENCRYPTED != 0 {
        payload.iter_mut().for_each(|byte| *byte ^= 0x50);
    }
    let adjustment = sfnt::checksum_adjustment(font).unwrap_or_default();
    let mut header = LeBuffer::default()
        .push(0u32) // EOTSize, patched below
        .push(payload.len() as u32)
        .push(version)
        .push(flags);
    header.0.extend([2, 0, 5, 3, 0, 0, 0, 0, 0, 0]); // PANOSE
    header = header
        .push(1u8) // Charset: DEFAULT_CHARSET
        .push(0u8) // Italic
        .push(400u32) // Weight
        .push(0u16) // fsType
        .push(0x504Cu16) // MagicNumber
        .push(1u32)
        .push(0u32)
        .push(0u32)
        .push(0u32) // UnicodeRange
        .push(1u32)
        .push(0u32) // CodePageRange
        .push(adjustment)
        .push(0u32)
        .push(0u32)
        .push(0u32)
        .push(0u32) // Reserved
        .push(0u16) // Padding1
        .name("Sample Serif")
        .push(0u16)
        .name("Book")
        .push(0u16)
        .name("Version 1.000")
        .push(0u16)
        .name("Sample Serif Book");
    if version >= EOT_VERSION_2_1 {
        header = header.push(0u16).name("");
    }
    if version == EOT_VERSION_2_2 {
        header = header
            .push(0u32) // RootStringCheckSum
            .push(0u32) // EUDCCodePage
            .push(0u16) // Padding6
            .push(0u16) // SignatureSize
            .push(0u32) // EUDCFlags
            .push(0u32); // EUDCFontSize
    }
    let mut out = header.0;
    out.extend(payload);
    let len = (out.len() as u32).to_le_bytes();
    out[..4].copy_from_slice(&len);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_font;

    #[test]
    fn woff_header() {
        let font = sample_font::ttf();
        let woff = woff(&font);
        assert_eq!(&woff[..4], b"wOFF");
        assert_eq!(u32::read_be(&woff[8..12]), Some(woff.len() as u32));
        assert_eq!(u32::read_be(&woff[16..20]), Some(font.len() as u32));
    }

    #[test]
    fn woff2_header() {
        let woff2 = woff2(&sample_font::ttf());
        assert_eq!(&woff2[..4], b"wOF2");
        assert_eq!(u32::read_be(&woff2[8..12]), Some(woff2.len() as u32));
        assert_eq!(woff2.len() % 4, 0);
    }

    #[test]
    fn base128() {
        let buf = push_base128(BeBuffer::new(), 63);
        assert_eq!(&*buf, &[63]);
        let buf = push_base128(BeBuffer::new(), 0x3FFF + 1);
        assert_eq!(&*buf, &[0x81, 0x80, 0x00]);
    }

    #[test]
    fn eot_layout() {
        let font = sample_font::ttf();
        let eot = eot(&font, EOT_VERSION_2_2, EOT_FLAG_XOR_ENCRYPTED);
        assert_eq!(u32::read_le(&eot[..4]), Some(eot.len() as u32));
        assert_eq!(u16::read_le(&eot[34..36]), Some(0x504C));
        assert_eq!(eot[eot.len() - font.len()], font[0] ^ 0x50);
    }
}
