//! A small font with known metrics.
//!
//! "Sample Serif Book" has 141 glyphs laid out like a classic Mac glyph
//! order: printable ASCII starts at glyph 3 (space), so `A`, `B` and `C` are
//! glyphs 36, 37 and 38. Glyph 131 (`Á`) is a composite of `A` and the acute
//! accent at glyph 140. Glyph 139 spans the whole font bounding box.
//!
//! [`ttf`] has TrueType outlines; [`otf`] is the same font with an opaque
//! `CFF ` table in place of `glyf` and `loca`.

use sfnt_types::{BoundingBox, Tag, CFF_SFNT_VERSION, TT_SFNT_VERSION};

use crate::{
    be_buffer,
    bebuffer::BeBuffer,
    cmap,
    glyf::{self, ComponentSpec, Point},
    sfnt,
};

pub const NUM_GLYPHS: u16 = 141;
pub const UNITS_PER_EM: u16 = 2048;
pub const ASCENDER: i16 = 1901;
pub const DESCENDER: i16 = -483;
pub const LINE_GAP: i16 = 0;
pub const CAP_HEIGHT: i16 = 1493;
pub const X_HEIGHT: i16 = 1024;
pub const WEIGHT_CLASS: u16 = 400;
pub const BOUNDING_BOX: BoundingBox<i16> = BoundingBox {
    x_min: -1576,
    y_min: -710,
    x_max: 4312,
    y_max: 2272,
};

pub const FAMILY_NAME: &str = "Sample Serif";
pub const STYLE_NAME: &str = "Book";
pub const FULL_NAME: &str = "Sample Serif Book";
pub const VERSION_STRING: &str = "Version 1.000";

pub const SPACE_GID: u16 = 3;
pub const A_GID: u16 = 36;
pub const A_ACUTE_GID: u16 = 131;
pub const WIDE_GID: u16 = 139;
pub const ACUTE_GID: u16 = 140;
/// Offset of the accent within [`A_ACUTE_GID`].
pub const ACUTE_OFFSET: (i16, i16) = (200, 100);

/// Glyphs from [`WIDE_GID`] on share the last long horizontal metric.
pub const NUMBER_OF_H_METRICS: u16 = 139;

/// Codepoint ranges mapped by the font.
pub const CHAR_RANGES: &[cmap::CharRange] = &[
    (' ', '~', SPACE_GID),
    ('\u{B4}', '\u{B4}', ACUTE_GID),
    ('\u{C1}', '\u{C1}', A_ACUTE_GID),
    // MATHEMATICAL BOLD CAPITAL A, to force a format 12 subtable
    ('\u{1D400}', '\u{1D400}', A_GID),
];

const GASP: Tag = Tag::new(b"gasp");

/// The font with TrueType outlines.
pub fn ttf() -> Vec<u8> {
    ttf_with(&[], Vec::new())
}

/// The TrueType font with the `glyf` records of `glyphs` and the whole of
/// `tables` replaced.
///
/// Glyph records must have an even length; those built by [`glyf`] do.
pub fn ttf_with(glyphs: &[(u16, Vec<u8>)], tables: Vec<(Tag, Vec<u8>)>) -> Vec<u8> {
    let (glyf, loca) = glyf_and_loca(glyphs);
    let mut all: Vec<_> = common_tables(maxp_v1())
        .into_iter()
        .chain([
            (Tag::new(b"glyf"), glyf),
            (Tag::new(b"loca"), loca),
            (GASP, be_buffer! { 1u16, 1u16, 0xFFFFu16, 0x000Fu16 }.into_vec()),
        ])
        .collect();
    for (tag, data) in tables {
        all.retain(|(existing, _)| *existing != tag);
        all.push((tag, data));
    }
    sfnt::assemble(TT_SFNT_VERSION, all)
}

/// The same font with CFF outlines.
///
/// The `CFF ` table is a bare header; nothing in it is meant to be drawn.
pub fn otf() -> Vec<u8> {
    let maxp = be_buffer! { 0x00005000u32, NUM_GLYPHS }.into_vec();
    let cff = be_buffer! { 1u8, 0u8, 4u8, 1u8, 0u16, 0u16, 0u16, 0u16 }.into_vec();
    let tables = common_tables(maxp)
        .into_iter()
        .chain([(Tag::new(b"CFF "), cff)])
        .collect();
    sfnt::assemble(CFF_SFNT_VERSION, tables)
}

fn common_tables(maxp: Vec<u8>) -> Vec<(Tag, Vec<u8>)> {
    vec![
        (Tag::new(b"head"), head()),
        (Tag::new(b"hhea"), hhea()),
        (Tag::new(b"maxp"), maxp),
        (Tag::new(b"OS/2"), os2()),
        (Tag::new(b"hmtx"), hmtx()),
        (Tag::new(b"cmap"), cmap::cmap_table(CHAR_RANGES).into_vec()),
        (Tag::new(b"name"), name()),
        (Tag::new(b"post"), post()),
    ]
}

/// The contours of every simple glyph; composites and empty glyphs have
/// none.
pub fn contours(gid: u16) -> Vec<Vec<Point>> {
    match gid {
        0 => vec![
            vec![(100, 0, true), (100, 1400, true), (1100, 1400, true), (1100, 0, true)],
            vec![(200, 100, true), (1000, 100, true), (1000, 1300, true), (200, 1300, true)],
        ],
        1..=SPACE_GID | A_ACUTE_GID => Vec::new(),
        WIDE_GID => {
            let b = BOUNDING_BOX;
            vec![vec![
                (b.x_min, b.y_min, true),
                (b.x_min, b.y_max, false),
                ((b.x_min + b.x_max) / 2, b.y_max, true),
                (b.x_max, b.y_max, false),
                (b.x_max, b.y_min, true),
            ]]
        }
        ACUTE_GID => vec![vec![
            (300, 1500, true),
            (550, 1800, true),
            (750, 1800, true),
            (700, 1650, false),
            (500, 1500, true),
        ]],
        _ => {
            let (l, r, t) = generic_extents(gid);
            let b = if gid % 5 == 0 { -400 } else { 0 };
            let mid = l + (r - l) / 2;
            let mut contours = vec![vec![
                (l, b, true),
                (l, t, false),
                (mid, t, true),
                (r, t, false),
                (r, b, true),
            ]];
            if gid % 3 == 0 {
                contours.push(vec![
                    (l + 100, b + 150, true),
                    (r - 100, b + 150, true),
                    (r - 100, t / 2, true),
                    (l + 100, t / 2, true),
                ]);
            }
            contours
        }
    }
}

// left, right and top of the generated glyphs
fn generic_extents(gid: u16) -> (i16, i16, i16) {
    let g = gid as i16;
    let l = 40 + (g % 7) * 10;
    let r = l + 500 + (g % 13) * 40;
    let t = 1000 + (g % 11) * 45;
    (l, r, t)
}

fn composite_bbox() -> BoundingBox<i16> {
    let base = glyf::bounding_box(&contours(A_GID)).unwrap_or_default();
    let accent = glyf::bounding_box(&contours(ACUTE_GID)).unwrap_or_default();
    let (dx, dy) = ACUTE_OFFSET;
    base.union(BoundingBox {
        x_min: accent.x_min + dx,
        y_min: accent.y_min + dy,
        x_max: accent.x_max + dx,
        y_max: accent.y_max + dy,
    })
}

/// The `(advance, left side bearing)` of `gid`.
pub fn h_metric(gid: u16) -> (u16, i16) {
    match gid {
        0 => (1200, 100),
        1 | 2 => (0, 0),
        SPACE_GID => (512, 0),
        A_ACUTE_GID => h_metric(A_GID),
        WIDE_GID | ACUTE_GID => {
            let lsb = glyf::bounding_box(&contours(gid)).map_or(0, |bbox| bbox.x_min);
            (h_metric(NUMBER_OF_H_METRICS - 1).0, lsb)
        }
        _ => {
            let (l, r, _) = generic_extents(gid);
            ((r + 40) as u16, l)
        }
    }
}

fn glyf_and_loca(replaced: &[(u16, Vec<u8>)]) -> (Vec<u8>, Vec<u8>) {
    let mut glyf = Vec::new();
    let mut loca = BeBuffer::new().push(0u16);
    for gid in 0..NUM_GLYPHS {
        let record = if let Some((_, record)) = replaced.iter().find(|(g, _)| *g == gid) {
            record.clone()
        } else if gid == A_ACUTE_GID {
            let (dx, dy) = ACUTE_OFFSET;
            glyf::composite_glyph(
                composite_bbox(),
                &[
                    ComponentSpec {
                        flags: glyf::USE_MY_METRICS,
                        ..ComponentSpec::offset(A_GID, 0, 0)
                    },
                    ComponentSpec {
                        flags: glyf::ROUND_XY_TO_GRID,
                        ..ComponentSpec::offset(ACUTE_GID, dx, dy)
                    },
                ],
            )
        } else {
            glyf::simple_glyph(&contours(gid))
        };
        glyf.extend(record);
        // short offsets, stored halved
        loca = loca.push((glyf.len() / 2) as u16);
    }
    (glyf, loca.into_vec())
}

fn head() -> Vec<u8> {
    let b = BOUNDING_BOX;
    be_buffer! {
        1u16, 0u16,             // version
        0x00010000u32,          // fontRevision
        0u32,                   // checkSumAdjustment
        0x5F0F3CF5u32,          // magicNumber
        0x000Bu16,              // flags
        UNITS_PER_EM,
        0x00000000_DA8A_3B80i64, // created
        0x00000000_DA8A_3B80i64, // modified
        b.x_min, b.y_min, b.x_max, b.y_max,
        0u16,                   // macStyle
        8u16,                   // lowestRecPPEM
        2i16,                   // fontDirectionHint
        0i16,                   // indexToLocFormat
        0i16                    // glyphDataFormat
    }
    .into_vec()
}

fn hhea() -> Vec<u8> {
    let advance_max = (0..NUM_GLYPHS).map(|gid| h_metric(gid).0).max().unwrap_or(0);
    be_buffer! {
        1u16, 0u16,
        ASCENDER,
        DESCENDER,
        LINE_GAP,
        advance_max,
        BOUNDING_BOX.x_min,     // minLeftSideBearing
        0i16,                   // minRightSideBearing
        BOUNDING_BOX.x_max,     // xMaxExtent
        1i16, 0i16, 0i16,       // caret slope rise, run, offset
        0i16, 0i16, 0i16, 0i16, // reserved
        0i16,                   // metricDataFormat
        NUMBER_OF_H_METRICS
    }
    .into_vec()
}

fn maxp_v1() -> Vec<u8> {
    let simple = (0..NUM_GLYPHS).map(contours);
    let max_points = simple
        .clone()
        .map(|c| c.iter().map(Vec::len).sum::<usize>())
        .max()
        .unwrap_or(0) as u16;
    let max_contours = simple.map(|c| c.len()).max().unwrap_or(0) as u16;
    let composite_points = [A_GID, ACUTE_GID]
        .into_iter()
        .flat_map(contours)
        .map(|contour| contour.len())
        .sum::<usize>() as u16;
    be_buffer! {
        0x00010000u32,
        NUM_GLYPHS,
        max_points,
        max_contours,
        composite_points,       // maxCompositePoints
        3u16,                   // maxCompositeContours
        2u16,                   // maxZones
        0u16, 0u16, 0u16, 0u16, 0u16, 0u16,
        2u16,                   // maxComponentElements
        1u16                    // maxComponentDepth
    }
    .into_vec()
}

fn os2() -> Vec<u8> {
    be_buffer! {
        4u16,                   // version
        1000i16,                // xAvgCharWidth
        WEIGHT_CLASS,
        5u16,                   // usWidthClass
        0u16,                   // fsType
        // subscript and superscript size and offset, strikeout
        1331i16, 1229i16, 0i16, 154i16,
        1331i16, 1229i16, 0i16, 716i16,
        102i16, 530i16,
        0i16                    // sFamilyClass
    }
    .extend([0u8; 10]) // panose
    .extend([1u32, 0, 0, 0]) // ulUnicodeRange
    .extend_bytes(b"NONE")
    .extend([
        0x0040u16, // fsSelection: REGULAR
        0x0020,    // usFirstCharIndex
        0xFFFF,    // usLastCharIndex
    ])
    .extend([ASCENDER, DESCENDER, LINE_GAP])
    .extend([BOUNDING_BOX.y_max as u16, BOUNDING_BOX.y_min.unsigned_abs()])
    .extend([1u32, 0]) // ulCodePageRange
    .extend([X_HEIGHT, CAP_HEIGHT])
    .extend([0u16, 0x20, 0]) // default char, break char, max context
    .into_vec()
}

fn hmtx() -> Vec<u8> {
    let mut buf = BeBuffer::new();
    for gid in 0..NUM_GLYPHS {
        let (advance, lsb) = h_metric(gid);
        if gid < NUMBER_OF_H_METRICS {
            buf = buf.push(advance);
        }
        buf = buf.push(lsb);
    }
    buf.into_vec()
}

fn name() -> Vec<u8> {
    let windows = [
        (1u16, FAMILY_NAME),
        (2, STYLE_NAME),
        (4, FULL_NAME),
        (5, VERSION_STRING),
    ];
    // one Mac Roman family name, sorted before the Windows records
    let mut records = vec![(1u16, 0u16, 0u16, 1u16, FAMILY_NAME.as_bytes().to_vec())];
    for (name_id, value) in windows {
        let utf16 = value.encode_utf16().flat_map(u16::to_be_bytes).collect();
        records.push((3, 1, 0x409, name_id, utf16));
    }
    let count = records.len() as u16;
    let mut buf = be_buffer! { 0u16, count, 6 + 12 * count };
    let mut storage = Vec::new();
    for (platform, encoding, language, name_id, bytes) in &records {
        buf = buf
            .extend([*platform, *encoding, *language, *name_id])
            .push(bytes.len() as u16)
            .push(storage.len() as u16);
        storage.extend_from_slice(bytes);
    }
    buf.extend_bytes(&storage).into_vec()
}

fn post() -> Vec<u8> {
    be_buffer! {
        0x00030000u32,          // version 3.0
        0u32,                   // italicAngle
        -150i16,                // underlinePosition
        100i16,                 // underlineThickness
        0u32,                   // isFixedPitch
        0u32, 0u32, 0u32, 0u32  // memory usage
    }
    .into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_is_sorted() {
        let font = ttf();
        let num_tables = u16::from_be_bytes([font[4], font[5]]) as usize;
        let tags: Vec<_> = (0..num_tables)
            .map(|i| &font[12 + i * 16..16 + i * 16])
            .collect();
        assert_eq!(num_tables, 11);
        assert!(tags.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn table_sizes() {
        let font = ttf();
        let len = |tag: &[u8; 4]| sfnt::table_data(&font, Tag::new(tag)).map(<[u8]>::len);
        assert_eq!(len(b"head"), Some(54));
        assert_eq!(len(b"hhea"), Some(36));
        assert_eq!(len(b"maxp"), Some(32));
        assert_eq!(len(b"OS/2"), Some(96));
        assert_eq!(len(b"post"), Some(32));
        assert_eq!(len(b"loca"), Some(2 * (NUM_GLYPHS as usize + 1)));
        assert_eq!(
            len(b"hmtx"),
            Some(4 * NUMBER_OF_H_METRICS as usize + 2 * 2)
        );
    }

    #[test]
    fn wide_glyph_matches_head_bbox() {
        assert_eq!(
            glyf::bounding_box(&contours(WIDE_GID)),
            Some(BOUNDING_BOX)
        );
    }

    #[test]
    fn glyf_fits_short_loca() {
        let (glyf, loca) = glyf_and_loca(&[]);
        assert!(glyf.len() < 0x20000);
        assert_eq!(glyf.len() % 2, 0);
        assert_eq!(&loca[..2], &[0, 0]);
    }

    #[test]
    fn replaced_glyphs_and_tables() {
        let square = glyf::simple_glyph(&[vec![(0, 0, true), (0, 10, true), (10, 10, true)]]);
        let gasp = vec![0, 1, 0, 0];
        let font = ttf_with(&[(5, square.clone())], vec![(GASP, gasp.clone())]);
        assert_eq!(sfnt::table_data(&font, GASP), Some(&gasp[..]));
        let glyf = sfnt::table_data(&font, Tag::new(b"glyf")).unwrap();
        let loca = sfnt::table_data(&font, Tag::new(b"loca")).unwrap();
        let offset = |gid: usize| u16::from_be_bytes([loca[gid * 2], loca[gid * 2 + 1]]) as usize * 2;
        assert_eq!(&glyf[offset(5)..offset(6)], &square[..]);
    }

    #[test]
    fn otf_has_no_glyf() {
        let font = otf();
        assert_eq!(&font[..4], b"OTTO");
        assert!(sfnt::table_data(&font, Tag::new(b"glyf")).is_none());
        assert_eq!(sfnt::table_data(&font, Tag::new(b"maxp")).map(<[u8]>::len), Some(6));
    }
}
