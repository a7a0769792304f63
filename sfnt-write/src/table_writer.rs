use sfnt_types::{F2Dot14, Fixed, GlyphId, Scalar, Tag};

/// A type that that can be written out as part of a font file.
pub trait FontWrite {
    /// Write our big-endian encoding into this [TableWriter].
    fn write_into(&self, writer: &mut TableWriter);
}

/// A buffer that tables are serialized into.
#[derive(Clone, Debug, Default)]
pub struct TableWriter {
    data: Vec<u8>,
}

/// Serialize a table to bytes.
pub fn dump_table<T: FontWrite + ?Sized>(table: &T) -> Vec<u8> {
    let mut writer = TableWriter::default();
    table.write_into(&mut writer);
    writer.into_data()
}

impl TableWriter {
    /// Write raw bytes into this table.
    ///
    /// The caller is responsible for ensuring bytes are in big-endian order.
    #[inline]
    pub fn write_slice(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes)
    }

    #[inline]
    pub fn write<T: FontWrite + ?Sized>(&mut self, item: &T) {
        item.write_into(self)
    }

    /// Zero pad the data written so far to a multiple of `align` bytes.
    pub fn pad_to(&mut self, align: usize) {
        let padded = self.data.len().div_ceil(align) * align;
        self.data.resize(padded, 0);
    }

    /// Overwrite a value previously written at `offset`.
    ///
    /// Returns `false` if the value does not fit within the data written so
    /// far.
    pub fn write_at(&mut self, offset: usize, item: impl Scalar) -> bool {
        let mut bytes = Vec::new();
        item.write_be(&mut bytes);
        match self.data.get_mut(offset..offset + bytes.len()) {
            Some(target) => {
                target.copy_from_slice(&bytes);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

macro_rules! write_be_bytes {
    ($($ty:ty),*) => {
        $(
            impl FontWrite for $ty {
                #[inline]
                fn write_into(&self, writer: &mut TableWriter) {
                    Scalar::write_be(*self, &mut writer.data)
                }
            }
        )*
    };
}

write_be_bytes!(u8, i8, u16, i16, u32, i32, u64, i64, Tag, GlyphId, Fixed, F2Dot14);

impl<T: FontWrite> FontWrite for [T] {
    fn write_into(&self, writer: &mut TableWriter) {
        self.iter().for_each(|item| item.write_into(writer))
    }
}

impl<T: FontWrite> FontWrite for Vec<T> {
    fn write_into(&self, writer: &mut TableWriter) {
        self.as_slice().write_into(writer)
    }
}

impl<T: FontWrite> FontWrite for Option<T> {
    fn write_into(&self, writer: &mut TableWriter) {
        if let Some(item) = self {
            item.write_into(writer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_and_sequences() {
        let mut writer = TableWriter::default();
        writer.write(&0x0102u16);
        writer.write(&vec![-1i16, 2]);
        writer.write(&Tag::new(b"abcd"));
        writer.write(&None::<u32>);
        assert_eq!(
            writer.into_data(),
            [1, 2, 0xff, 0xff, 0, 2, b'a', b'b', b'c', b'd']
        );
    }

    #[test]
    fn pad_and_patch() {
        let mut writer = TableWriter::default();
        writer.write(&[1u8, 2, 3][..]);
        writer.pad_to(4);
        assert_eq!(writer.len(), 4);
        assert!(writer.write_at(2, 0xAABBu16));
        assert!(!writer.write_at(3, 0u16));
        assert_eq!(writer.into_data(), [1, 2, 0xAA, 0xBB]);
    }
}
