//! Colors and the color spaces used for blending.
//!
//! Blending is only correct in a linear color space. Input colors and
//! output images are usually sRGB encoded, so a renderer converts colors
//! with [`ColorSpace::to_linear`] before compositing and back with
//! [`ColorSpace::from_linear`] afterwards. [`LinearColorSpace`] skips the
//! conversion; this is technically wrong for sRGB data but matches what
//! most viewers do.

use std::str::FromStr;

use thiserror::Error;

/// An 8-bit color with premultiplied alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    /// A color from premultiplied components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    /// A color from straight (not premultiplied) components.
    pub fn from_straight(r: u8, g: u8, b: u8, a: u8) -> Self {
        let premultiply = |c: u8| ((c as u32 * a as u32 + 127) / 255) as u8;
        Rgba::new(premultiply(r), premultiply(g), premultiply(b), a)
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
    ///
    /// The leading `#` is optional. The components are straight alpha and
    /// are premultiplied.
    pub fn from_hex(hex: &str) -> Result<Rgba, ColorParseError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(hex.to_owned()));
        }
        let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).unwrap_or_default();
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or_default();
        let [r, g, b, a] = match digits.len() {
            3 | 4 => {
                let mut components = [0xFF; 4];
                for (i, component) in components.iter_mut().take(digits.len()).enumerate() {
                    *component = nibble(i) * 0x11;
                }
                components
            }
            6 | 8 => {
                let mut components = [0xFF; 4];
                for (i, component) in components.iter_mut().take(digits.len() / 2).enumerate() {
                    *component = byte(2 * i);
                }
                components
            }
            len => return Err(ColorParseError::InvalidLength(len)),
        };
        Ok(Rgba::from_straight(r, g, b, a))
    }

    fn components(self) -> [f64; 3] {
        [self.r, self.g, self.b].map(|c| c as f64 / 255.0)
    }

    // divide out alpha, map each channel, premultiply and quantize again
    fn map_channels(self, f: impl Fn(f64) -> f64) -> Rgba {
        if self.a == 0 {
            return Rgba::TRANSPARENT;
        }
        let alpha = self.a as f64 / 255.0;
        let [r, g, b] = self
            .components()
            .map(|c| (f((c / alpha).clamp(0.0, 1.0)).clamp(0.0, 1.0) * alpha * 255.0 + 0.5) as u8);
        Rgba::new(r, g, b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgba::from_hex(s)
    }
}

/// An error encountered while parsing a hex color.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("expected 3, 4, 6 or 8 hex digits, found {0}")]
    InvalidLength(usize),
    #[error("invalid hex digit in {0:?}")]
    InvalidDigit(String),
}

/// A conversion between a color encoding and linear light.
pub trait ColorSpace {
    /// Convert a color in this space to linear light.
    fn to_linear(&self, color: Rgba) -> Rgba;

    /// Convert a color in linear light to this space.
    fn from_linear(&self, color: Rgba) -> Rgba;
}

/// The identity conversion: colors are assumed to be linear already.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinearColorSpace;

impl ColorSpace for LinearColorSpace {
    fn to_linear(&self, color: Rgba) -> Rgba {
        color
    }

    fn from_linear(&self, color: Rgba) -> Rgba {
        color
    }
}

/// Colors encoded with a pure power law.
///
/// A gamma of 2.2 approximates sRGB; 1.43 is a common choice for text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GammaColorSpace {
    pub gamma: f64,
}

impl ColorSpace for GammaColorSpace {
    fn to_linear(&self, color: Rgba) -> Rgba {
        color.map_channels(|c| c.powf(self.gamma))
    }

    fn from_linear(&self, color: Rgba) -> Rgba {
        color.map_channels(|c| c.powf(1.0 / self.gamma))
    }
}

/// The sRGB transfer functions of IEC 61966-2-1.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SrgbColorSpace;

impl ColorSpace for SrgbColorSpace {
    fn to_linear(&self, color: Rgba) -> Rgba {
        color.map_channels(|c| {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        })
    }

    fn from_linear(&self, color: Rgba) -> Rgba {
        color.map_channels(|c| {
            if c < 0.0031308 {
                12.92 * c
            } else {
                1.055 * c.powf(1.0 / 2.4) - 0.055
            }
        })
    }
}

/// A choice of [`ColorSpace`] that can be stored in settings.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorSpaceKind {
    #[default]
    Linear,
    Gamma(f64),
    Srgb,
}

impl ColorSpace for ColorSpaceKind {
    fn to_linear(&self, color: Rgba) -> Rgba {
        match *self {
            ColorSpaceKind::Linear => LinearColorSpace.to_linear(color),
            ColorSpaceKind::Gamma(gamma) => GammaColorSpace { gamma }.to_linear(color),
            ColorSpaceKind::Srgb => SrgbColorSpace.to_linear(color),
        }
    }

    fn from_linear(&self, color: Rgba) -> Rgba {
        match *self {
            ColorSpaceKind::Linear => LinearColorSpace.from_linear(color),
            ColorSpaceKind::Gamma(gamma) => GammaColorSpace { gamma }.from_linear(color),
            ColorSpaceKind::Srgb => SrgbColorSpace.from_linear(color),
        }
    }
}
