//! Encoding glyf records

use sfnt_types::BoundingBox;

use crate::bebuffer::BeBuffer;

const ON_CURVE: u8 = 0x01;
const X_SHORT: u8 = 0x02;
const Y_SHORT: u8 = 0x04;
const REPEAT: u8 = 0x08;
const X_SAME_OR_POSITIVE: u8 = 0x10;
const Y_SAME_OR_POSITIVE: u8 = 0x20;

pub const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
pub const ARGS_ARE_XY_VALUES: u16 = 0x0002;
pub const ROUND_XY_TO_GRID: u16 = 0x0004;
pub const WE_HAVE_A_SCALE: u16 = 0x0008;
pub const MORE_COMPONENTS: u16 = 0x0020;
pub const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
pub const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
pub const USE_MY_METRICS: u16 = 0x0200;
pub const SCALED_COMPONENT_OFFSET: u16 = 0x0800;
pub const UNSCALED_COMPONENT_OFFSET: u16 = 0x1000;

/// A point of a simple glyph: `(x, y, on_curve)`.
pub type Point = (i16, i16, bool);

/// The bounding box of `contours`, or `None` if there are no points.
pub fn bounding_box(contours: &[Vec<Point>]) -> Option<BoundingBox<i16>> {
    let mut points = contours.iter().flatten();
    let &(x, y, _) = points.next()?;
    let mut bbox = BoundingBox::from_point(x, y);
    for &(x, y, _) in points {
        bbox.add_point(x, y);
    }
    Some(bbox)
}

// the flag bits and the encoded delta for one coordinate
fn flag_and_delta(delta: i16, short: u8, same_or_positive: u8) -> (u8, Option<Vec<u8>>) {
    match delta {
        0 => (same_or_positive, None),
        -255..=-1 => (short, Some(vec![delta.unsigned_abs() as u8])),
        1..=255 => (short | same_or_positive, Some(vec![delta as u8])),
        _ => (0, Some(delta.to_be_bytes().to_vec())),
    }
}

/// Encode a simple glyph with no instructions, padded to an even length.
///
/// A glyph without points encodes as an empty record.
pub fn simple_glyph(contours: &[Vec<Point>]) -> Vec<u8> {
    let Some(bbox) = bounding_box(contours) else {
        return Vec::new();
    };
    let mut buf = BeBuffer::new()
        .push(contours.len() as i16)
        .extend([bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max]);
    let mut end = 0u16;
    for contour in contours {
        end += contour.len() as u16;
        buf = buf.push(end - 1);
    }
    // instructionLength
    buf = buf.push(0u16);

    let (mut last_x, mut last_y) = (0i16, 0i16);
    let mut flags = Vec::new();
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for &(x, y, on_curve) in contours.iter().flatten() {
        let (x_flag, x_data) = flag_and_delta(x - last_x, X_SHORT, X_SAME_OR_POSITIVE);
        let (y_flag, y_data) = flag_and_delta(y - last_y, Y_SHORT, Y_SAME_OR_POSITIVE);
        (last_x, last_y) = (x, y);
        flags.push(x_flag | y_flag | if on_curve { ON_CURVE } else { 0 });
        xs.extend(x_data.unwrap_or_default());
        ys.extend(y_data.unwrap_or_default());
    }
    let mut packed = Vec::new();
    let mut i = 0;
    while i < flags.len() {
        let flag = flags[i];
        let run = flags[i..]
            .iter()
            .take(256)
            .take_while(|next| **next == flag)
            .count();
        // a single repeat costs as much as writing the flag twice
        if run > 2 {
            packed.extend([flag | REPEAT, (run - 1) as u8]);
        } else {
            packed.extend(std::iter::repeat_n(flag, run));
        }
        i += run;
    }
    buf.extend_bytes(&packed)
        .extend_bytes(&xs)
        .extend_bytes(&ys)
        .align_to(2)
        .into_vec()
}

/// The linear part of a component transform, as stored in the record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ComponentScale {
    Uniform(f64),
    XY(f64, f64),
    /// `[xx, yx, xy, yy]`
    TwoByTwo([f64; 4]),
}

/// One component of a composite glyph.
///
/// The component is positioned by `(dx, dy)` unless `points` is set, in
/// which case `(base, component)` point numbers are aligned instead.
#[derive(Clone, Copy, Debug)]
pub struct ComponentSpec {
    pub glyph: u16,
    pub dx: i16,
    pub dy: i16,
    /// Additional flags; the argument, scale and continuation flags are
    /// computed.
    pub flags: u16,
    pub scale: Option<ComponentScale>,
    pub points: Option<(u16, u16)>,
}

impl ComponentSpec {
    pub fn offset(glyph: u16, dx: i16, dy: i16) -> Self {
        ComponentSpec {
            glyph,
            dx,
            dy,
            flags: 0,
            scale: None,
            points: None,
        }
    }

    /// A component aligning its point `component` with point `base` of the
    /// glyph so far.
    pub fn anchored(glyph: u16, base: u16, component: u16) -> Self {
        ComponentSpec {
            points: Some((base, component)),
            ..ComponentSpec::offset(glyph, 0, 0)
        }
    }
}

fn f2dot14(value: f64) -> i16 {
    (value * 16384.0).round() as i16
}

/// Encode a composite glyph with the given bounding box.
pub fn composite_glyph(bbox: BoundingBox<i16>, components: &[ComponentSpec]) -> Vec<u8> {
    let mut buf = BeBuffer::new()
        .push(-1i16)
        .extend([bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max]);
    for (i, component) in components.iter().enumerate() {
        let mut flags = component.flags | ARG_1_AND_2_ARE_WORDS;
        if component.points.is_none() {
            flags |= ARGS_ARE_XY_VALUES;
        }
        if i + 1 < components.len() {
            flags |= MORE_COMPONENTS;
        }
        flags |= match component.scale {
            None => 0,
            Some(ComponentScale::Uniform(_)) => WE_HAVE_A_SCALE,
            Some(ComponentScale::XY(..)) => WE_HAVE_AN_X_AND_Y_SCALE,
            Some(ComponentScale::TwoByTwo(_)) => WE_HAVE_A_TWO_BY_TWO,
        };
        buf = buf.push(flags).push(component.glyph);
        buf = match component.points {
            Some((base, point)) => buf.push(base).push(point),
            None => buf.push(component.dx).push(component.dy),
        };
        buf = match component.scale {
            None => buf,
            Some(ComponentScale::Uniform(scale)) => buf.push(f2dot14(scale)),
            Some(ComponentScale::XY(x, y)) => buf.push(f2dot14(x)).push(f2dot14(y)),
            Some(ComponentScale::TwoByTwo(m)) => buf.extend(m.map(f2dot14)),
        };
    }
    buf.align_to(2).into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_short_and_long_deltas() {
        let glyph = simple_glyph(&[vec![(0, 0, true), (300, 0, true), (300, -20, false)]]);
        // header, one end point, instruction length
        let flags_at = 10 + 2 + 2;
        assert_eq!(
            &glyph[flags_at..flags_at + 3],
            &[
                ON_CURVE | X_SAME_OR_POSITIVE | Y_SAME_OR_POSITIVE,
                ON_CURVE | Y_SAME_OR_POSITIVE,
                X_SAME_OR_POSITIVE | Y_SHORT
            ]
        );
        // x: one long delta; y: one short delta
        assert_eq!(&glyph[flags_at + 3..flags_at + 6], &[0x01, 0x2c, 20]);
    }

    #[test]
    fn repeats_runs() {
        let square = vec![(0, 0, true), (0, 0, true), (0, 0, true), (0, 0, true)];
        let glyph = simple_glyph(&[square]);
        let flag = ON_CURVE | X_SAME_OR_POSITIVE | Y_SAME_OR_POSITIVE;
        assert_eq!(&glyph[14..16], &[flag | REPEAT, 3]);
    }

    #[test]
    fn component_arguments() {
        let glyph = composite_glyph(
            BoundingBox::default(),
            &[
                ComponentSpec {
                    scale: Some(ComponentScale::Uniform(0.5)),
                    ..ComponentSpec::offset(4, 10, -10)
                },
                ComponentSpec::anchored(5, 2, 0),
            ],
        );
        let flags = ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES | MORE_COMPONENTS | WE_HAVE_A_SCALE;
        assert_eq!(&glyph[10..12], &flags.to_be_bytes());
        // scale follows the two word arguments
        assert_eq!(&glyph[18..20], &0x2000u16.to_be_bytes());
        // point numbers, not offsets
        assert_eq!(&glyph[20..22], &ARG_1_AND_2_ARE_WORDS.to_be_bytes());
        assert_eq!(&glyph[24..28], &[0, 2, 0, 0]);
        assert_eq!(glyph.len(), 28);
    }

    #[test]
    fn empty_glyph() {
        assert!(simple_glyph(&[]).is_empty());
    }
}
