//! [WOFF 1.0](https://www.w3.org/TR/WOFF/) files

use std::io::Read;

use flate2::read::ZlibDecoder;
use sfnt_types::Tag;

use crate::{
    font_data::{Cursor, FontData},
    read::ReadError,
};

use super::{assemble_sfnt, table_checksum, MAX_DECOMPRESSED_SIZE, WOFF_SIGNATURE};

pub const HEADER_LEN: usize = 44;
pub const TABLE_ENTRY_LEN: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TableEntry {
    tag: Tag,
    offset: u32,
    comp_length: u32,
    orig_length: u32,
    orig_checksum: u32,
}

/// Decode a WOFF file to SFNT bytes.
pub fn decode(bytes: &[u8]) -> Result<Vec<u8>, ReadError> {
    let data = FontData::new(bytes);
    let mut cursor = data.cursor();
    let (flavor, entries) = read_header(&mut cursor, bytes.len()).map_err(ReadError::truncated)?;
    let mut tables = Vec::with_capacity(entries.len());
    for entry in entries {
        let start = entry.offset as usize;
        let compressed = data
            .read_bytes(start..start + entry.comp_length as usize)
            .map_err(ReadError::truncated)?;
        let table = inflate(&entry, compressed)?;
        let computed = table_checksum(entry.tag, &table);
        if computed != entry.orig_checksum {
            log::warn!(
                "{} checksum 0x{computed:08X} does not match declared 0x{:08X}",
                entry.tag,
                entry.orig_checksum
            );
        }
        tables.push((entry.tag, table));
    }
    Ok(assemble_sfnt(flavor, tables))
}

fn read_header(
    cursor: &mut Cursor,
    file_len: usize,
) -> Result<(u32, Vec<TableEntry>), ReadError> {
    let signature: u32 = cursor.read()?;
    if signature != WOFF_SIGNATURE {
        return Err(ReadError::InvalidMagic(signature));
    }
    let flavor: u32 = cursor.read()?;
    let length: u32 = cursor.read()?;
    if length as usize != file_len {
        log::warn!("WOFF length field {length} but file has {file_len} bytes");
        return Err(ReadError::InvalidFontData);
    }
    let num_tables: u16 = cursor.read()?;
    let reserved: u16 = cursor.read()?;
    if reserved != 0 {
        return Err(ReadError::MalformedData("WOFF reserved field is not zero"));
    }
    let total_sfnt_size: u32 = cursor.read()?;
    if total_sfnt_size as u64 > MAX_DECOMPRESSED_SIZE {
        return Err(ReadError::TooLarge(total_sfnt_size as u64));
    }
    // version, metadata and private data blocks
    cursor.advance_by(HEADER_LEN - 20);

    let entries = (0..num_tables)
        .map(|_| {
            Ok(TableEntry {
                tag: cursor.read()?,
                offset: cursor.read()?,
                comp_length: cursor.read()?,
                orig_length: cursor.read()?,
                orig_checksum: cursor.read()?,
            })
        })
        .collect::<Result<Vec<_>, ReadError>>()?;
    let total: u64 = entries.iter().map(|e| e.orig_length as u64).sum();
    if total > MAX_DECOMPRESSED_SIZE {
        return Err(ReadError::TooLarge(total));
    }
    Ok((flavor, entries))
}

fn inflate(entry: &TableEntry, compressed: &[u8]) -> Result<Vec<u8>, ReadError> {
    let expected = entry.orig_length;
    if entry.comp_length > expected {
        return Err(ReadError::MalformedData(
            "WOFF compressed length exceeds original length",
        ));
    }
    if entry.comp_length == expected {
        return Ok(compressed.to_vec());
    }
    let mut table = Vec::with_capacity(expected as usize);
    // read one byte past the declared size so that overlong data is caught
    ZlibDecoder::new(compressed)
        .take(expected as u64 + 1)
        .read_to_end(&mut table)
        .map_err(|_| ReadError::Decompression("invalid zlib stream"))?;
    if table.len() != expected as usize {
        return Err(ReadError::LengthMismatch {
            tag: entry.tag,
            expected,
            actual: table.len() as u32,
        });
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::{container, sample_font};

    #[test]
    fn round_trip_sample() {
        let ttf = sample_font::ttf();
        let woff = container::woff(&ttf);
        assert!(woff.len() < ttf.len());
        assert_eq!(decode(&woff).unwrap(), ttf);
    }

    #[test]
    fn wrong_length_field() {
        let mut woff = container::woff(&sample_font::ttf());
        woff.push(0);
        assert_eq!(decode(&woff), Err(ReadError::InvalidFontData));
    }

    #[test]
    fn truncated_header() {
        let woff = container::woff(&sample_font::ttf());
        assert_eq!(decode(&woff[..30]), Err(ReadError::InvalidFontData));
    }

    #[test]
    fn orig_length_mismatch() {
        let ttf = sample_font::ttf();
        let mut woff = container::woff(&ttf);
        let num_tables = u16::from_be_bytes([woff[12], woff[13]]) as usize;
        let read_u32 = |woff: &[u8], at: usize| {
            u32::from_be_bytes([woff[at], woff[at + 1], woff[at + 2], woff[at + 3]])
        };
        // bump origLength of the first compressed table
        let entry = (0..num_tables)
            .map(|i| HEADER_LEN + i * TABLE_ENTRY_LEN)
            .find(|&at| read_u32(&woff, at + 8) < read_u32(&woff, at + 12))
            .expect("sample font has a compressible table");
        let orig = read_u32(&woff, entry + 12);
        woff[entry + 12..entry + 16].copy_from_slice(&(orig + 8).to_be_bytes());
        let err = decode(&woff).unwrap_err();
        assert_eq!(
            err,
            ReadError::LengthMismatch {
                tag: Tag::new_checked(&woff[entry..entry + 4]).unwrap(),
                expected: orig + 8,
                actual: orig,
            }
        );
    }
}
