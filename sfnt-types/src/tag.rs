//! Four byte table identifiers

use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

/// A table tag, such as `glyf` or `OS/2`.
///
/// Tags read from fonts are not validated, since broken tags show up in the
/// wild and still need to round trip. Use [`Tag::new_checked`] when building
/// a tag from user input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Create a tag from four raw bytes, without validation.
    pub const fn new(bytes: &[u8; 4]) -> Tag {
        Tag(*bytes)
    }

    /// Create a tag from one to four printable ASCII bytes.
    ///
    /// Short input is padded with trailing spaces, so `b"cvt"` becomes
    /// `cvt `. Leading spaces and non-space bytes following a space are
    /// rejected.
    pub fn new_checked(src: &[u8]) -> Result<Tag, InvalidTag> {
        if src.is_empty() || src.len() > 4 {
            return Err(InvalidTag::InvalidLength(src.len()));
        }
        let mut raw = [b' '; 4];
        let mut seen_space = false;
        for (pos, byte) in src.iter().copied().enumerate() {
            match byte {
                b' ' if pos == 0 => return Err(InvalidTag::InvalidByte { pos, byte }),
                b' ' => seen_space = true,
                0..=0x1F | 0x7F.. => return Err(InvalidTag::InvalidByte { pos, byte }),
                _ if seen_space => return Err(InvalidTag::ByteAfterSpace { pos }),
                _ => (),
            }
            raw[pos] = byte;
        }
        Ok(Tag(raw))
    }

    /// Create a tag from its big-endian `u32` representation.
    pub const fn from_u32(src: u32) -> Tag {
        Tag(src.to_be_bytes())
    }

    /// The big-endian `u32` representation of this tag.
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// The raw bytes of this tag.
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }
}

/// An error returned by [`Tag::new_checked`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidTag {
    /// The input was empty or longer than four bytes.
    InvalidLength(usize),
    /// A byte outside of printable ASCII, or a leading space.
    InvalidByte { pos: usize, byte: u8 },
    /// A non-space byte after a space.
    ByteAfterSpace { pos: usize },
}

impl std::error::Error for InvalidTag {}

impl Display for InvalidTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidTag::InvalidLength(len) => write!(f, "tag has invalid length {len}"),
            InvalidTag::InvalidByte { pos, byte } => {
                write!(f, "tag has invalid byte 0x{byte:02X} at {pos}")
            }
            InvalidTag::ByteAfterSpace { pos } => {
                write!(f, "tag has non-space byte after a space at {pos}")
            }
        }
    }
}

impl FromStr for Tag {
    type Err = InvalidTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::new_checked(s.as_bytes())
    }
}

impl PartialEq<[u8; 4]> for Tag {
    fn eq(&self, other: &[u8; 4]) -> bool {
        &self.0 == other
    }
}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            if (0x20..=0x7E).contains(&byte) {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "{{0x{byte:02X}}}")?;
            }
        }
        Ok(())
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl crate::raw::Scalar for Tag {
    const RAW_BYTE_LEN: usize = 4;

    fn read_be(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Tag)
    }

    // tags are byte strings; there is no little-endian form
    fn read_le(bytes: &[u8]) -> Option<Self> {
        Self::read_be(bytes)
    }

    fn write_be(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0)
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Tag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Tag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_tags() {
        assert_eq!(Tag::new_checked(b"cvt"), Ok(Tag::new(b"cvt ")));
        assert_eq!("OS/2".parse::<Tag>(), Ok(Tag::new(b"OS/2")));
    }

    #[test]
    fn rejects_bad_tags() {
        assert_eq!(Tag::new_checked(b""), Err(InvalidTag::InvalidLength(0)));
        assert_eq!(Tag::new_checked(b"hello"), Err(InvalidTag::InvalidLength(5)));
        assert_eq!(
            Tag::new_checked(b" abc"),
            Err(InvalidTag::InvalidByte { pos: 0, byte: b' ' })
        );
        assert_eq!(
            Tag::new_checked(b"a bc"),
            Err(InvalidTag::ByteAfterSpace { pos: 2 })
        );
        assert_eq!(
            Tag::new_checked(&[b'a', 0x7F]),
            Err(InvalidTag::InvalidByte { pos: 1, byte: 0x7F })
        );
    }

    #[test]
    fn u32_conversion() {
        let tag = Tag::from_u32(0x676C7966);
        assert_eq!(tag, Tag::new(b"glyf"));
        assert_eq!(tag.to_u32(), 0x676C7966);
    }

    #[test]
    fn display_escapes_unprintable() {
        assert_eq!(Tag::new(b"head").to_string(), "head");
        assert_eq!(Tag::new(&[b'a', 0, b'b', b'c']).to_string(), "a{0x00}bc");
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serde_as_string() {
        let tag = Tag::new(b"cmap");
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, "\"cmap\"");
        let back: Tag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tag);
    }
}
