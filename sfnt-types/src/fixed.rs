//! fixed-point numerical types

macro_rules! fixed_impl {
    ($name:ident, $bits:literal, $fract_bits:literal, $ty:ty) => {
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[doc = concat!(stringify!($bits), "-bit signed fixed point number with ", stringify!($fract_bits), " bits of fraction.")]
        pub struct $name($ty);

        impl $name {
            pub const ZERO: Self = Self(0);
            pub const ONE: Self = Self(1 << $fract_bits);
            const SCALE: f64 = (1u32 << $fract_bits) as f64;

            /// Create from the raw bit pattern.
            pub const fn from_bits(bits: $ty) -> Self {
                Self(bits)
            }

            /// The raw bit pattern.
            pub const fn to_bits(self) -> $ty {
                self.0
            }

            /// Convert from a float, rounding to the nearest representable
            /// value and saturating at the type's bounds.
            pub fn from_f64(value: f64) -> Self {
                // `as` saturates for float to int conversions
                Self((value * Self::SCALE).round() as $ty)
            }

            pub fn to_f64(self) -> f64 {
                self.0 as f64 / Self::SCALE
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_f64())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_f64())
            }
        }

        crate::raw::newtype_scalar!($name, $ty);
    };
}

fixed_impl!(Fixed, 32, 16, i32);
fixed_impl!(F2Dot14, 16, 14, i16);
