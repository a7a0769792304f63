use font_test_data::{container, sample_font};
use pretty_assertions::assert_eq;
use rstest::rstest;
use sfnt_read::{parse_font, types::GlyphId};
use sfnt_write::{subset, subset_with_options, write, SubsetOptions};

fn gids(raw: &[u16]) -> Vec<GlyphId> {
    raw.iter().copied().map(GlyphId::new).collect()
}

#[test]
fn composite_dependency_is_appended() {
    let _ = env_logger::builder().is_test(true).try_init();
    let font = parse_font(&sample_font::ttf()).unwrap();
    let (bytes, retained) = subset(&font, &gids(&[0, 3, 6, 36, 37, 38, 55, 131])).unwrap();
    assert_eq!(retained.len(), 9);
    assert_eq!(retained.last(), Some(&GlyphId::new(140)));

    let subset = parse_font(&bytes).unwrap();
    assert_eq!(subset.num_glyphs(), 9);
    assert_eq!(subset.glyph_index('A'), GlyphId::new(3));
    assert_eq!(subset.glyph_index('B'), GlyphId::new(4));
    assert_eq!(subset.glyph_index('C'), GlyphId::new(5));
    assert_eq!(subset.glyph_index(' '), GlyphId::new(1));
    assert_eq!(subset.glyph_index('D'), GlyphId::NOTDEF);
    // the accent is reachable from the composite only
    assert_eq!(subset.glyph_index('\u{B4}'), GlyphId::new(8));
    assert_eq!(subset.units_per_em(), 2048);
    assert_eq!(subset.family_name().as_deref(), Some("Sample Serif"));
}

#[test]
fn composite_outline_survives() {
    let font = parse_font(&sample_font::ttf()).unwrap();
    let (bytes, _) = subset(&font, &gids(&[131])).unwrap();
    let subset = parse_font(&bytes).unwrap();
    let original = font.outline(GlyphId::new(131)).unwrap();
    let subsetted = subset.outline(GlyphId::new(1)).unwrap();
    assert_eq!(subsetted.points, original.points);
    assert_eq!(subsetted.contour_ends, original.contour_ends);
}

#[test]
fn hints_can_be_dropped() {
    let font = parse_font(&sample_font::ttf()).unwrap();
    let options = SubsetOptions {
        drop_hints: true,
        ..Default::default()
    };
    let (bytes, _) = subset_with_options(&font, &gids(&[36]), &options).unwrap();
    let subset = parse_font(&bytes).unwrap();
    assert_eq!(
        subset.outline(GlyphId::new(1)).unwrap().points,
        font.outline(GlyphId::new(36)).unwrap().points
    );
}

#[rstest]
#[case::ttf(sample_font::ttf())]
#[case::woff(container::woff(&sample_font::ttf()))]
#[case::woff2(container::woff2(&sample_font::ttf()))]
#[case::eot(container::eot(&sample_font::ttf(), container::EOT_VERSION_2_2, 0))]
fn write_preserves_mappings(#[case] input: Vec<u8>) {
    let font = parse_font(&input).unwrap();
    let written = parse_font(&write(&font)).unwrap();
    for c in " AZaz~\u{B4}\u{C1}\u{1D400}\u{2603}".chars() {
        assert_eq!(written.glyph_index(c), font.glyph_index(c), "{c:?}");
    }
    assert_eq!(written.data(), &sample_font::ttf()[..]);
}
