//! [Embedded OpenType](https://www.w3.org/Submission/EOT/) files
//!
//! EOT wraps an SFNT in a little-endian header describing the font. The
//! payload may be XOR obfuscated or MicroType Express compressed; only the
//! former is supported.

use crate::{
    font_data::{Cursor, FontData},
    read::ReadError,
    tables::{directory::TableDirectory, head},
    FontRead,
};

use super::MAX_DECOMPRESSED_SIZE;

pub const VERSION_1_0: u32 = 0x00010000;
pub const VERSION_2_1: u32 = 0x00020001;
pub const VERSION_2_2: u32 = 0x00020002;

/// `MagicNumber` must hold this value.
pub const MAGIC: u16 = 0x504C;
/// Byte offset of `MagicNumber`.
pub const MAGIC_OFFSET: usize = 34;

pub const FLAG_SUBSET: u32 = 0x0000_0001;
pub const FLAG_COMPRESSED: u32 = 0x0000_0004;
pub const FLAG_XOR_ENCRYPTED: u32 = 0x1000_0000;

const XOR_KEY: u8 = 0x50;

/// The decoded EOT header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EotHeader {
    pub eot_size: u32,
    pub font_data_size: u32,
    pub version: u32,
    pub flags: u32,
    pub panose: [u8; 10],
    pub charset: u8,
    pub italic: u8,
    pub weight: u32,
    pub fs_type: u16,
    pub unicode_range: [u32; 4],
    pub code_page_range: [u32; 2],
    pub checksum_adjustment: u32,
    pub family_name: String,
    pub style_name: String,
    pub version_name: String,
    pub full_name: String,
    /// Only present from version 2.1.
    pub root_string: String,
}

/// Parse an EOT file, returning its header and the embedded SFNT.
pub fn parse(bytes: &[u8]) -> Result<(EotHeader, Vec<u8>), ReadError> {
    let mut cursor = FontData::new(bytes).cursor();
    let (header, payload) = read_eot(&mut cursor).map_err(ReadError::truncated)?;
    if header.flags & FLAG_COMPRESSED != 0 {
        return Err(ReadError::Unsupported("EOT MTX compression"));
    }
    let mut payload = payload.to_vec();
    if header.flags & FLAG_XOR_ENCRYPTED != 0 {
        payload.iter_mut().for_each(|byte| *byte ^= XOR_KEY);
    }
    check_adjustment(&header, &payload);
    Ok((header, payload))
}

fn read_eot<'a>(cursor: &mut Cursor<'a>) -> Result<(EotHeader, &'a [u8]), ReadError> {
    let mut header = EotHeader {
        eot_size: cursor.read_le()?,
        font_data_size: cursor.read_le()?,
        version: cursor.read_le()?,
        ..Default::default()
    };
    if !matches!(header.version, VERSION_1_0 | VERSION_2_1 | VERSION_2_2) {
        return Err(ReadError::InvalidVersion(header.version));
    }
    if header.font_data_size as u64 > MAX_DECOMPRESSED_SIZE {
        return Err(ReadError::TooLarge(header.font_data_size as u64));
    }
    header.flags = cursor.read_le()?;
    header.panose.copy_from_slice(cursor.read_bytes(10)?);
    header.charset = cursor.read_le()?;
    header.italic = cursor.read_le()?;
    header.weight = cursor.read_le()?;
    header.fs_type = cursor.read_le()?;
    let magic: u16 = cursor.read_le()?;
    if magic != MAGIC {
        return Err(ReadError::InvalidMagic(magic as u32));
    }
    for range in header.unicode_range.iter_mut() {
        *range = cursor.read_le()?;
    }
    for range in header.code_page_range.iter_mut() {
        *range = cursor.read_le()?;
    }
    header.checksum_adjustment = cursor.read_le()?;
    // Reserved1..4 and Padding1
    cursor.advance_by(16 + 2);

    header.family_name = read_name(cursor)?;
    cursor.advance_by(2);
    header.style_name = read_name(cursor)?;
    cursor.advance_by(2);
    header.version_name = read_name(cursor)?;
    cursor.advance_by(2);
    header.full_name = read_name(cursor)?;

    if header.version >= VERSION_2_1 {
        // Padding5
        cursor.advance_by(2);
        header.root_string = read_name(cursor)?;
    }
    if header.version == VERSION_2_2 {
        // RootStringCheckSum, EUDCCodePage, Padding6
        cursor.advance_by(4 + 4 + 2);
        let signature_size: u16 = cursor.read_le()?;
        cursor.read_bytes(signature_size as usize)?;
        // EUDCFlags
        cursor.advance_by(4);
        let eudc_size: u32 = cursor.read_le()?;
        cursor.read_bytes(eudc_size as usize)?;
    }

    let payload = cursor.read_bytes(header.font_data_size as usize)?;
    if header.eot_size as usize != cursor.position() {
        log::warn!(
            "EOTSize is {} but the structure spans {} bytes",
            header.eot_size,
            cursor.position()
        );
    }
    Ok((header, payload))
}

// a u16 byte count followed by UTF-16LE text
fn read_name(cursor: &mut Cursor) -> Result<String, ReadError> {
    let size: u16 = cursor.read_le()?;
    let bytes = cursor.read_bytes(size as usize)?;
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    Ok(char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect())
}

fn check_adjustment(header: &EotHeader, payload: &[u8]) {
    let data = FontData::new(payload);
    let stored = TableDirectory::read(data).ok().and_then(|dir| {
        let record = dir.find(head::TAG)?;
        data.read_at::<u32>(record.offset as usize + head::CHECKSUM_ADJUSTMENT_OFFSET)
            .ok()
    });
    if let Some(stored) = stored {
        if stored != header.checksum_adjustment {
            log::warn!(
                "EOT checksum adjustment 0x{:08X} does not match head 0x{stored:08X}",
                header.checksum_adjustment
            );
        }
    }
}
