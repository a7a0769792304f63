//! The [glyf](https://learn.microsoft.com/en-us/typography/opentype/spec/glyf) table

use sfnt_types::{BoundingBox, F2Dot14, GlyphId, Tag};

use crate::{font_data::FontData, read::ReadError};

pub const TAG: Tag = Tag::new(b"glyf");

/// Size of the glyph header (numberOfContours and the bounding box).
pub const GLYPH_HEADER_LEN: usize = 10;

/// Flags for points in a simple glyph.
mod point_flags {
    pub const ON_CURVE: u8 = 0x01;
    pub const X_SHORT: u8 = 0x02;
    pub const Y_SHORT: u8 = 0x04;
    pub const REPEAT: u8 = 0x08;
    pub const X_SAME_OR_POSITIVE: u8 = 0x10;
    pub const Y_SAME_OR_POSITIVE: u8 = 0x20;
}

/// A point in a simple glyph, in font units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyfPoint {
    pub x: i32,
    pub y: i32,
    pub on_curve: bool,
}

/// An outline in the `glyf` table.
#[derive(Clone, Copy, Debug)]
pub enum Glyph<'a> {
    Simple(SimpleGlyph<'a>),
    Composite(CompositeGlyph<'a>),
}

impl<'a> Glyph<'a> {
    /// Parse the glyph record in `data`, which must not be empty.
    pub fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let num_contours: i16 = data.read_at(0)?;
        data.read_at::<i16>(GLYPH_HEADER_LEN - 2)?;
        if num_contours >= 0 {
            Ok(Glyph::Simple(SimpleGlyph {
                data,
                num_contours: num_contours as u16,
            }))
        } else {
            Ok(Glyph::Composite(CompositeGlyph { data }))
        }
    }

    pub fn bounding_box(&self) -> BoundingBox<i16> {
        let data = match self {
            Glyph::Simple(glyph) => glyph.data,
            Glyph::Composite(glyph) => glyph.data,
        };
        // the header was bounds checked in `read`
        BoundingBox {
            x_min: data.read_at(2).unwrap_or_default(),
            y_min: data.read_at(4).unwrap_or_default(),
            x_max: data.read_at(6).unwrap_or_default(),
            y_max: data.read_at(8).unwrap_or_default(),
        }
    }
}

/// A glyph made of its own contours.
#[derive(Clone, Copy, Debug)]
pub struct SimpleGlyph<'a> {
    data: FontData<'a>,
    num_contours: u16,
}

impl<'a> SimpleGlyph<'a> {
    pub fn num_contours(&self) -> usize {
        self.num_contours as usize
    }

    /// The number of points, from the last contour end point.
    pub fn num_points(&self) -> Result<usize, ReadError> {
        if self.num_contours == 0 {
            return Ok(0);
        }
        let last: u16 = self
            .data
            .read_at(GLYPH_HEADER_LEN + (self.num_contours as usize - 1) * 2)?;
        Ok(last as usize + 1)
    }

    /// The index of the last point in each contour.
    pub fn end_points(&self) -> Result<Vec<u16>, ReadError> {
        let mut cursor = self.data.split_off(GLYPH_HEADER_LEN).unwrap_or_default().cursor();
        let ends = (0..self.num_contours)
            .map(|_| cursor.read::<u16>())
            .collect::<Result<Vec<_>, _>>()?;
        if ends.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(ReadError::MalformedData("contour end points decrease"));
        }
        Ok(ends)
    }

    pub fn instructions(&self) -> Result<&'a [u8], ReadError> {
        let start = GLYPH_HEADER_LEN + self.num_contours as usize * 2;
        let len: u16 = self.data.read_at(start)?;
        self.data.read_bytes(start + 2..start + 2 + len as usize)
    }

    /// Decode all points, with coordinates made absolute.
    pub fn points(&self) -> Result<Vec<GlyfPoint>, ReadError> {
        use point_flags::*;

        let ends = self.end_points()?;
        let num_points = ends.last().map(|end| *end as usize + 1).unwrap_or(0);
        let instructions_start = GLYPH_HEADER_LEN + ends.len() * 2;
        let instructions_len: u16 = self.data.read_at(instructions_start)?;
        let mut cursor = self
            .data
            .split_off(instructions_start + 2 + instructions_len as usize)
            .ok_or(ReadError::OutOfBounds)?
            .cursor();

        let mut flags = Vec::with_capacity(num_points);
        while flags.len() < num_points {
            let flag: u8 = cursor.read()?;
            flags.push(flag);
            if flag & REPEAT != 0 {
                let count: u8 = cursor.read()?;
                let count = (count as usize).min(num_points - flags.len());
                flags.extend(std::iter::repeat_n(flag, count));
            }
        }

        let mut points = Vec::with_capacity(num_points);
        let mut x = 0i32;
        for flag in &flags {
            x += read_delta(&mut cursor, *flag, X_SHORT, X_SAME_OR_POSITIVE)?;
            points.push(GlyfPoint {
                x,
                y: 0,
                on_curve: flag & ON_CURVE != 0,
            });
        }
        let mut y = 0i32;
        for (point, flag) in points.iter_mut().zip(&flags) {
            y += read_delta(&mut cursor, *flag, Y_SHORT, Y_SAME_OR_POSITIVE)?;
            point.y = y;
        }
        Ok(points)
    }
}

fn read_delta(
    cursor: &mut crate::font_data::Cursor,
    flag: u8,
    short_bit: u8,
    same_bit: u8,
) -> Result<i32, ReadError> {
    Ok(match (flag & short_bit != 0, flag & same_bit != 0) {
        (true, true) => cursor.read::<u8>()? as i32,
        (true, false) => -(cursor.read::<u8>()? as i32),
        (false, true) => 0,
        (false, false) => cursor.read::<i16>()? as i32,
    })
}

/// Flags describing one component of a composite glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositeFlags(u16);

impl CompositeFlags {
    pub const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
    pub const ARGS_ARE_XY_VALUES: u16 = 0x0002;
    pub const ROUND_XY_TO_GRID: u16 = 0x0004;
    pub const WE_HAVE_A_SCALE: u16 = 0x0008;
    pub const MORE_COMPONENTS: u16 = 0x0020;
    pub const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
    pub const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
    pub const WE_HAVE_INSTRUCTIONS: u16 = 0x0100;
    pub const USE_MY_METRICS: u16 = 0x0200;
    pub const OVERLAP_COMPOUND: u16 = 0x0400;
    pub const SCALED_COMPONENT_OFFSET: u16 = 0x0800;
    pub const UNSCALED_COMPONENT_OFFSET: u16 = 0x1000;

    const KNOWN: u16 = 0x1FFF & !0x0010;

    pub const fn from_bits(bits: u16) -> Self {
        CompositeFlags(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, flag: u16) -> bool {
        self.0 & flag == flag
    }
}

/// How a component is positioned relative to the glyph built so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Offset { x: i32, y: i32 },
    /// Align point `component` of the component with point `base` of the
    /// glyph assembled so far.
    Point { base: u16, component: u16 },
}

/// The 2x2 linear part of a component transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub xx: f64,
    pub yx: f64,
    pub xy: f64,
    pub yy: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            xx: 1.0,
            yx: 0.0,
            xy: 0.0,
            yy: 1.0,
        }
    }
}

impl Transform {
    pub fn is_identity(&self) -> bool {
        *self == Transform::default()
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.xx * x + self.xy * y, self.yx * x + self.yy * y)
    }
}

/// One component of a composite glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Component {
    pub flags: CompositeFlags,
    pub glyph: GlyphId,
    /// Byte offset of the glyph index within the composite glyph record.
    pub glyph_offset: usize,
    pub anchor: Anchor,
    pub transform: Transform,
}

/// A glyph assembled from transformed references to other glyphs.
#[derive(Clone, Copy, Debug)]
pub struct CompositeGlyph<'a> {
    data: FontData<'a>,
}

impl<'a> CompositeGlyph<'a> {
    pub fn components(&self) -> ComponentIter<'a> {
        ComponentIter {
            data: self.data,
            pos: GLYPH_HEADER_LEN,
            done: false,
        }
    }
}

/// Iterator over the components of a composite glyph.
///
/// Yields at most one error, then stops.
#[derive(Clone, Debug)]
pub struct ComponentIter<'a> {
    data: FontData<'a>,
    pos: usize,
    done: bool,
}

impl ComponentIter<'_> {
    fn read_component(&mut self) -> Result<Component, ReadError> {
        let mut cursor = self
            .data
            .split_off(self.pos)
            .ok_or(ReadError::OutOfBounds)?
            .cursor();
        let flags = CompositeFlags(cursor.read()?);
        if flags.0 & !CompositeFlags::KNOWN != 0 {
            log::warn!("unknown composite flags 0x{:04X}", flags.0);
        }
        let glyph_offset = self.pos + 2;
        let glyph: GlyphId = cursor.read()?;
        let words = flags.contains(CompositeFlags::ARG_1_AND_2_ARE_WORDS);
        let anchor = if flags.contains(CompositeFlags::ARGS_ARE_XY_VALUES) {
            let (x, y) = if words {
                (cursor.read::<i16>()? as i32, cursor.read::<i16>()? as i32)
            } else {
                (cursor.read::<i8>()? as i32, cursor.read::<i8>()? as i32)
            };
            Anchor::Offset { x, y }
        } else {
            let (base, component) = if words {
                (cursor.read::<u16>()?, cursor.read::<u16>()?)
            } else {
                (cursor.read::<u8>()? as u16, cursor.read::<u8>()? as u16)
            };
            Anchor::Point { base, component }
        };
        let mut transform = Transform::default();
        let mut f2dot14 = || cursor.read::<F2Dot14>().map(F2Dot14::to_f64);
        if flags.contains(CompositeFlags::WE_HAVE_A_SCALE) {
            let scale = f2dot14()?;
            transform.xx = scale;
            transform.yy = scale;
        } else if flags.contains(CompositeFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            transform.xx = f2dot14()?;
            transform.yy = f2dot14()?;
        } else if flags.contains(CompositeFlags::WE_HAVE_A_TWO_BY_TWO) {
            transform.xx = f2dot14()?;
            transform.yx = f2dot14()?;
            transform.xy = f2dot14()?;
            transform.yy = f2dot14()?;
        }
        self.pos += cursor.position();
        Ok(Component {
            flags,
            glyph,
            glyph_offset,
            anchor,
            transform,
        })
    }
}

impl Iterator for ComponentIter<'_> {
    type Item = Result<Component, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.read_component();
        match &result {
            Ok(component) => {
                self.done = !component.flags.contains(CompositeFlags::MORE_COMPONENTS)
            }
            Err(_) => self.done = true,
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::bebuffer::BeBuffer;

    fn simple_triangle() -> BeBuffer {
        BeBuffer::new()
            .extend([1i16, 0, 0, 100, 100])
            // endPtsOfContours
            .push(2u16)
            // no instructions
            .push(0u16)
            // on-curve with 16-bit deltas; off-curve with a short positive
            // x and unchanged y; on-curve with short negative deltas
            .extend([0x01u8, 0x02 | 0x10 | 0x20, 0x01 | 0x02 | 0x04])
            .push(0i16)
            .extend([100u8, 50])
            .push(0i16)
            .push(100u8)
    }

    #[test]
    fn simple_points() {
        let buf = simple_triangle();
        let Glyph::Simple(glyph) = Glyph::read(FontData::new(&buf)).unwrap() else {
            panic!("expected a simple glyph");
        };
        assert_eq!(glyph.end_points().unwrap(), [2]);
        assert_eq!(glyph.num_points().unwrap(), 3);
        assert_eq!(
            glyph.points().unwrap(),
            [
                GlyfPoint {
                    x: 0,
                    y: 0,
                    on_curve: true
                },
                GlyfPoint {
                    x: 100,
                    y: 0,
                    on_curve: false
                },
                GlyfPoint {
                    x: 50,
                    y: -100,
                    on_curve: true
                },
            ]
        );
    }

    #[test]
    fn repeated_flags() {
        let buf = BeBuffer::new()
            .extend([1i16, 0, 0, 0, 0])
            .push(3u16)
            .push(0u16)
            // four on-curve points with x/y unchanged, via repeat
            .extend([0x01u8 | 0x08 | 0x10 | 0x20, 3]);
        let Glyph::Simple(glyph) = Glyph::read(FontData::new(&buf)).unwrap() else {
            panic!("expected a simple glyph");
        };
        let points = glyph.points().unwrap();
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.on_curve && p.x == 0 && p.y == 0));
    }

    #[test]
    fn truncated_coordinates() {
        let buf = BeBuffer::new()
            .extend([1i16, 0, 0, 0, 0])
            .push(1u16)
            .push(0u16)
            .extend([0x01u8, 0x01]);
        let Glyph::Simple(glyph) = Glyph::read(FontData::new(&buf)).unwrap() else {
            panic!("expected a simple glyph");
        };
        assert_eq!(glyph.points(), Err(ReadError::OutOfBounds));
    }

    #[test]
    fn composite_components() {
        let buf = BeBuffer::new()
            .extend([-1i16, 0, 0, 0, 0])
            // offset by bytes, with a uniform scale
            .push(
                CompositeFlags::ARGS_ARE_XY_VALUES
                    | CompositeFlags::WE_HAVE_A_SCALE
                    | CompositeFlags::MORE_COMPONENTS,
            )
            .push(7u16)
            .extend([10i8, -20])
            .push(F2Dot14::from_f64(0.5))
            // point anchored, word arguments, 2x2
            .push(CompositeFlags::ARG_1_AND_2_ARE_WORDS | CompositeFlags::WE_HAVE_A_TWO_BY_TWO)
            .push(9u16)
            .extend([3u16, 1])
            .extend([0x4000u16, 0, 0, 0xC000]);
        let Glyph::Composite(glyph) = Glyph::read(FontData::new(&buf)).unwrap() else {
            panic!("expected a composite glyph");
        };
        let components = glyph
            .components()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].glyph, GlyphId::new(7));
        assert_eq!(components[0].glyph_offset, 12);
        assert_eq!(components[0].anchor, Anchor::Offset { x: 10, y: -20 });
        assert_eq!(components[0].transform.xx, 0.5);
        assert_eq!(components[0].transform.yy, 0.5);
        assert_eq!(components[1].glyph, GlyphId::new(9));
        assert_eq!(components[1].glyph_offset, 20);
        assert_eq!(
            components[1].anchor,
            Anchor::Point {
                base: 3,
                component: 1
            }
        );
        assert_eq!(components[1].transform.yy, -1.0);
    }

    #[test]
    fn composite_truncated() {
        let buf = BeBuffer::new()
            .extend([-1i16, 0, 0, 0, 0])
            .push(CompositeFlags::ARG_1_AND_2_ARE_WORDS)
            .push(7u16)
            .push(1u16);
        let Glyph::Composite(glyph) = Glyph::read(FontData::new(&buf)).unwrap() else {
            panic!("expected a composite glyph");
        };
        let mut iter = glyph.components();
        assert_eq!(iter.next(), Some(Err(ReadError::OutOfBounds)));
        assert_eq!(iter.next(), None);
    }
}
