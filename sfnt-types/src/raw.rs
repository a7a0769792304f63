//! Decoding and encoding scalars in either byte order

/// A fixed-size value that can be read from and written to raw bytes.
///
/// Font data is overwhelmingly big-endian; the little-endian methods exist
/// for container formats such as EOT.
pub trait Scalar: Sized + Copy {
    /// The size of the encoded value, in bytes.
    const RAW_BYTE_LEN: usize;

    /// Attempt to decode big-endian bytes.
    ///
    /// Returns `None` if `bytes.len() != Self::RAW_BYTE_LEN`.
    fn read_be(bytes: &[u8]) -> Option<Self>;

    /// Attempt to decode little-endian bytes.
    ///
    /// Returns `None` if `bytes.len() != Self::RAW_BYTE_LEN`.
    fn read_le(bytes: &[u8]) -> Option<Self>;

    /// Append the big-endian encoding of this value.
    fn write_be(self, out: &mut Vec<u8>);

    /// Append the little-endian encoding of this value.
    fn write_le(self, out: &mut Vec<u8>);
}

macro_rules! int_scalar {
    ($($ty:ty),*) => {
        $(
            impl Scalar for $ty {
                const RAW_BYTE_LEN: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn read_be(bytes: &[u8]) -> Option<Self> {
                    bytes.try_into().ok().map(<$ty>::from_be_bytes)
                }

                #[inline]
                fn read_le(bytes: &[u8]) -> Option<Self> {
                    bytes.try_into().ok().map(<$ty>::from_le_bytes)
                }

                fn write_be(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_be_bytes());
                }

                fn write_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

int_scalar!(u8, i8, u16, i16, u32, i32, u64, i64);

/// Implement [`Scalar`] for a newtype wrapping an integer scalar.
macro_rules! newtype_scalar {
    ($name:ident, $inner:ty) => {
        impl $crate::raw::Scalar for $name {
            const RAW_BYTE_LEN: usize = <$inner as $crate::raw::Scalar>::RAW_BYTE_LEN;

            #[inline]
            fn read_be(bytes: &[u8]) -> Option<Self> {
                <$inner as $crate::raw::Scalar>::read_be(bytes).map(Self)
            }

            #[inline]
            fn read_le(bytes: &[u8]) -> Option<Self> {
                <$inner as $crate::raw::Scalar>::read_le(bytes).map(Self)
            }

            fn write_be(self, out: &mut Vec<u8>) {
                $crate::raw::Scalar::write_be(self.0, out)
            }

            fn write_le(self, out: &mut Vec<u8>) {
                $crate::raw::Scalar::write_le(self.0, out)
            }
        }
    };
}

pub(crate) use newtype_scalar;
