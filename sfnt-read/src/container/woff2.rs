//! [WOFF 2.0](https://www.w3.org/TR/WOFF2/) files
//!
//! Tables are stored in one Brotli stream. Only null-transformed tables are
//! supported: a transformed `glyf`/`loca` pair or `hmtx` is reported as
//! [`ReadError::Unsupported`].

use std::io::Cursor as IoCursor;

use sfnt_types::Tag;

use crate::{
    font_data::{Cursor, FontData},
    read::ReadError,
};

use super::{assemble_sfnt, BoundedOutput, MAX_DECOMPRESSED_SIZE, TTC_SIGNATURE, WOFF2_SIGNATURE};

pub const HEADER_LEN: usize = 48;

/// Tags addressable by the low six bits of a table entry's flags.
pub const KNOWN_TAGS: [Tag; 63] = [
    Tag::new(b"cmap"),
    Tag::new(b"head"),
    Tag::new(b"hhea"),
    Tag::new(b"hmtx"),
    Tag::new(b"maxp"),
    Tag::new(b"name"),
    Tag::new(b"OS/2"),
    Tag::new(b"post"),
    Tag::new(b"cvt "),
    Tag::new(b"fpgm"),
    Tag::new(b"glyf"),
    Tag::new(b"loca"),
    Tag::new(b"prep"),
    Tag::new(b"CFF "),
    Tag::new(b"VORG"),
    Tag::new(b"EBDT"),
    Tag::new(b"EBLC"),
    Tag::new(b"gasp"),
    Tag::new(b"hdmx"),
    Tag::new(b"kern"),
    Tag::new(b"LTSH"),
    Tag::new(b"PCLT"),
    Tag::new(b"VDMX"),
    Tag::new(b"vhea"),
    Tag::new(b"vmtx"),
    Tag::new(b"BASE"),
    Tag::new(b"GDEF"),
    Tag::new(b"GPOS"),
    Tag::new(b"GSUB"),
    Tag::new(b"EBSC"),
    Tag::new(b"JSTF"),
    Tag::new(b"MATH"),
    Tag::new(b"CBDT"),
    Tag::new(b"CBLC"),
    Tag::new(b"COLR"),
    Tag::new(b"CPAL"),
    Tag::new(b"SVG "),
    Tag::new(b"sbix"),
    Tag::new(b"acnt"),
    Tag::new(b"avar"),
    Tag::new(b"bdat"),
    Tag::new(b"bloc"),
    Tag::new(b"bsln"),
    Tag::new(b"cvar"),
    Tag::new(b"fdsc"),
    Tag::new(b"feat"),
    Tag::new(b"fmtx"),
    Tag::new(b"fvar"),
    Tag::new(b"gvar"),
    Tag::new(b"hsty"),
    Tag::new(b"just"),
    Tag::new(b"lcar"),
    Tag::new(b"mort"),
    Tag::new(b"morx"),
    Tag::new(b"opbd"),
    Tag::new(b"prop"),
    Tag::new(b"trak"),
    Tag::new(b"Zapf"),
    Tag::new(b"Silf"),
    Tag::new(b"Glat"),
    Tag::new(b"Gloc"),
    Tag::new(b"Feat"),
    Tag::new(b"Sill"),
];

/// Flag value indicating an explicit tag follows.
pub const ARBITRARY_TAG: u8 = 0x3F;

const GLYF: Tag = Tag::new(b"glyf");
const LOCA: Tag = Tag::new(b"loca");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TableEntry {
    tag: Tag,
    transform_version: u8,
    orig_length: u32,
    transform_length: Option<u32>,
}

impl TableEntry {
    // glyf and loca use version 3 for "no transform"; every other table
    // uses version 0
    fn is_transformed(&self) -> bool {
        if self.tag == GLYF || self.tag == LOCA {
            self.transform_version != 3
        } else {
            self.transform_version != 0
        }
    }

    fn stored_length(&self) -> u32 {
        self.transform_length.unwrap_or(self.orig_length)
    }
}

/// Decode a WOFF2 file to SFNT bytes.
pub fn decode(bytes: &[u8]) -> Result<Vec<u8>, ReadError> {
    let data = FontData::new(bytes);
    let mut cursor = data.cursor();
    let (flavor, compressed_len, entries) =
        read_header(&mut cursor, bytes.len()).map_err(ReadError::truncated)?;
    if let Some(entry) = entries.iter().find(|entry| entry.is_transformed()) {
        log::debug!(
            "{} uses WOFF2 transform version {}",
            entry.tag,
            entry.transform_version
        );
        return Err(ReadError::Unsupported("WOFF2 table transforms"));
    }

    let stream_start = cursor.position();
    let compressed = data
        .read_bytes(stream_start..stream_start + compressed_len as usize)
        .map_err(ReadError::truncated)?;
    let total: u64 = entries.iter().map(|e| e.stored_length() as u64).sum();
    let decompressed = decompress(compressed, total as usize)?;
    if decompressed.len() as u64 != total {
        log::warn!(
            "WOFF2 stream decoded to {} bytes, expected {total}",
            decompressed.len()
        );
        return Err(ReadError::InvalidFontData);
    }

    let mut offset = 0usize;
    let mut tables = Vec::with_capacity(entries.len());
    for entry in &entries {
        let len = entry.stored_length() as usize;
        tables.push((entry.tag, decompressed[offset..offset + len].to_vec()));
        offset += len;
    }
    Ok(assemble_sfnt(flavor, tables))
}

fn read_header<'a>(
    cursor: &mut Cursor<'a>,
    file_len: usize,
) -> Result<(u32, u32, Vec<TableEntry>), ReadError> {
    let signature: u32 = cursor.read()?;
    if signature != WOFF2_SIGNATURE {
        return Err(ReadError::InvalidMagic(signature));
    }
    let flavor: u32 = cursor.read()?;
    if flavor == TTC_SIGNATURE {
        return Err(ReadError::Unsupported("WOFF2 font collections"));
    }
    let length: u32 = cursor.read()?;
    if length as usize != file_len {
        log::warn!("WOFF2 length field {length} but file has {file_len} bytes");
        return Err(ReadError::InvalidFontData);
    }
    let num_tables: u16 = cursor.read()?;
    let reserved: u16 = cursor.read()?;
    if reserved != 0 {
        return Err(ReadError::MalformedData("WOFF2 reserved field is not zero"));
    }
    let total_sfnt_size: u32 = cursor.read()?;
    if total_sfnt_size as u64 > MAX_DECOMPRESSED_SIZE {
        return Err(ReadError::TooLarge(total_sfnt_size as u64));
    }
    let total_compressed_size: u32 = cursor.read()?;
    // version, metadata and private data blocks
    cursor.advance_by(HEADER_LEN - 24);

    let mut entries = Vec::with_capacity(num_tables as usize);
    let mut total = 0u64;
    for _ in 0..num_tables {
        let flags: u8 = cursor.read()?;
        let tag = match flags & 0x3F {
            ARBITRARY_TAG => cursor.read()?,
            idx => KNOWN_TAGS[idx as usize],
        };
        let transform_version = flags >> 6;
        let orig_length = read_base128(cursor)?;
        let mut entry = TableEntry {
            tag,
            transform_version,
            orig_length,
            transform_length: None,
        };
        if entry.is_transformed() {
            entry.transform_length = Some(read_base128(cursor)?);
        }
        total += entry.stored_length() as u64;
        if total > MAX_DECOMPRESSED_SIZE {
            return Err(ReadError::TooLarge(total));
        }
        entries.push(entry);
    }
    Ok((flavor, total_compressed_size, entries))
}

/// Read a `UIntBase128`: big-endian groups of seven bits, high bit set on
/// every byte but the last, at most five bytes, no leading zero groups.
pub fn read_base128(cursor: &mut Cursor) -> Result<u32, ReadError> {
    let mut value = 0u32;
    for i in 0..5 {
        let byte: u8 = cursor.read()?;
        if i == 0 && byte == 0x80 {
            return Err(ReadError::MalformedData("UIntBase128 has a leading zero"));
        }
        if value & 0xFE00_0000 != 0 {
            return Err(ReadError::MalformedData("UIntBase128 overflows"));
        }
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(ReadError::MalformedData("UIntBase128 is longer than five bytes"))
}

fn decompress(compressed: &[u8], expected_len: usize) -> Result<Vec<u8>, ReadError> {
    let mut input = IoCursor::new(compressed);
    let mut output = BoundedOutput(Vec::with_capacity(expected_len), expected_len);
    brotli_decompressor::BrotliDecompress(&mut input, &mut output).map_err(|e| {
        log::debug!("brotli: {e}");
        ReadError::Decompression("invalid brotli stream")
    })?;
    Ok(output.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use font_test_data::{bebuffer::BeBuffer, container, sample_font};

    #[test]
    fn round_trip_sample() {
        let ttf = sample_font::ttf();
        let woff2 = container::woff2(&ttf);
        assert!(woff2.len() < ttf.len());
        assert_eq!(decode(&woff2).unwrap(), ttf);
    }

    #[test]
    fn cff_flavor() {
        let otf = sample_font::otf();
        assert_eq!(decode(&container::woff2(&otf)).unwrap(), otf);
    }

    #[test]
    fn base128() {
        let read = |bytes: &[u8]| read_base128(&mut FontData::new(bytes).cursor());
        assert_eq!(read(&[0x3F]), Ok(63));
        assert_eq!(read(&[0x81, 0x00]), Ok(128));
        assert_eq!(read(&[0x8F, 0xFF, 0xFF, 0xFF, 0x7F]), Ok(u32::MAX));
        assert!(read(&[0x80, 0x01]).is_err());
        assert!(read(&[0x90, 0x80, 0x80, 0x80, 0x00]).is_err());
        assert!(read(&[0x81, 0x81, 0x81, 0x81, 0x81, 0x01]).is_err());
        assert_eq!(read(&[0x81]), Err(ReadError::OutOfBounds));
    }

    #[test]
    fn transformed_glyf_is_unsupported() {
        // a header with one table entry: glyf, transform version 0
        let body = BeBuffer::new().push(10u8).push(100u8).push(80u8);
        let len = HEADER_LEN + body.len();
        let buf = BeBuffer::new()
            .push(WOFF2_SIGNATURE)
            .push(sfnt_types::TT_SFNT_VERSION)
            .push(len as u32)
            .push(1u16)
            .push(0u16)
            .extend([0u32, 0])
            .extend([1u16, 0])
            .extend([0u32; 5])
            .extend(body.iter().copied());
        let err = decode(&buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn bad_signature() {
        let mut woff2 = container::woff2(&sample_font::ttf());
        woff2[3] = b'3';
        assert!(matches!(decode(&woff2), Err(ReadError::InvalidMagic(_))));
    }
}
