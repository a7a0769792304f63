//! raw font bytes

use std::ops::{Range, RangeBounds};

use sfnt_types::Scalar;

use crate::read::ReadError;

/// A reference to raw binary font data.
///
/// Every read is bounds checked; running off the end of the data is reported
/// as [`ReadError::OutOfBounds`] rather than a panic.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for sequentially reading values out of [`FontData`].
///
/// The position advances even when a read fails, so a failed read should
/// end parsing.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The data from `pos` to the end.
    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(FontData::new)
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(FontData::new)
    }

    /// Read a big-endian scalar at `offset`.
    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        self.bytes
            .get(offset..offset.checked_add(T::RAW_BYTE_LEN).ok_or(ReadError::OutOfBounds)?)
            .and_then(T::read_be)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Read a little-endian scalar at `offset`.
    pub fn read_le_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        self.bytes
            .get(offset..offset.checked_add(T::RAW_BYTE_LEN).ok_or(ReadError::OutOfBounds)?)
            .and_then(T::read_le)
            .ok_or(ReadError::OutOfBounds)
    }

    /// The bytes in `range`.
    pub fn read_bytes(&self, range: Range<usize>) -> Result<&'a [u8], ReadError> {
        self.bytes.get(range).ok_or(ReadError::OutOfBounds)
    }

    pub fn cursor(&self) -> Cursor<'a> {
        Cursor { pos: 0, data: *self }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn advance_by(&mut self, n_bytes: usize) {
        self.pos = self.pos.saturating_add(n_bytes);
    }

    /// Read a big-endian scalar and advance past it.
    pub fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let result = self.data.read_at(self.pos);
        self.advance_by(T::RAW_BYTE_LEN);
        result
    }

    /// Read a little-endian scalar and advance past it.
    pub fn read_le<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let result = self.data.read_le_at(self.pos);
        self.advance_by(T::RAW_BYTE_LEN);
        result
    }

    /// Read `len` raw bytes and advance past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        let end = self.pos.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        let result = self.data.read_bytes(self.pos..end);
        self.pos = end;
        result
    }

    /// The unread remainder of the data.
    pub fn remaining(&self) -> Option<FontData<'a>> {
        self.data.split_off(self.pos)
    }

    /// Returns an error if the cursor has moved past the end of the data.
    pub fn finish(self) -> Result<usize, ReadError> {
        if self.pos > self.data.len() {
            return Err(ReadError::OutOfBounds);
        }
        Ok(self.pos)
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}
