//! small utilities used in tests

use sfnt_types::Scalar;

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeBuffer(Vec<u8>);

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl Scalar) -> Self {
        item.write_be(&mut self.0);
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            item.write_be(&mut self.0);
        }
        self
    }

    /// Append raw bytes.
    pub fn extend_bytes(mut self, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(bytes);
        self
    }

    /// Zero pad to a multiple of `align` bytes.
    pub fn align_to(mut self, align: usize) -> Self {
        let padded = self.0.len().div_ceil(align) * align;
        self.0.resize(padded, 0);
        self
    }

    /// Overwrite a big-endian value previously written at `offset`.
    ///
    /// # Panics
    ///
    /// If the value does not fit in the buffer at `offset`.
    pub fn write_at(&mut self, offset: usize, item: impl Scalar) {
        let mut bytes = Vec::new();
        item.write_be(&mut bytes);
        self.0[offset..offset + bytes.len()].copy_from_slice(&bytes);
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<BeBuffer> for Vec<u8> {
    fn from(buf: BeBuffer) -> Self {
        buf.0
    }
}

/// Build a [`BeBuffer`] from a comma separated list of scalars.
#[macro_export]
macro_rules! be_buffer {
    ($($item:expr),* $(,)?) => {
        $crate::bebuffer::BeBuffer::new()$(.push($item))*
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_patch() {
        let mut buf = BeBuffer::new().push(1u16).push(-2i32).extend([3u8, 4]);
        assert_eq!(&*buf, &[0, 1, 0xff, 0xff, 0xff, 0xfe, 3, 4]);
        buf.write_at(0, 0x0a0bu16);
        assert_eq!(&buf[..2], &[0x0a, 0x0b]);
    }

    #[test]
    fn macro_and_alignment() {
        let buf = be_buffer! { 1u8, 2u16 }.align_to(4);
        assert_eq!(buf.into_vec(), vec![1, 0, 2, 0]);
    }
}
