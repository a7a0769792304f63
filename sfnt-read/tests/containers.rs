//! Every container format of the sample font must report the same metrics.

use font_test_data::{container, sample_font};
use pretty_assertions::assert_eq;
use rstest::rstest;
use sfnt_read::{parse_font, types::GlyphId, ErrorKind, FontFormat};

#[derive(Clone, Copy, Debug)]
enum Wrapper {
    Ttf,
    Otf,
    Woff,
    Woff2,
    Eot,
    EotXor,
}

fn wrapped(wrapper: Wrapper) -> Vec<u8> {
    let ttf = sample_font::ttf();
    match wrapper {
        Wrapper::Ttf => ttf,
        Wrapper::Otf => sample_font::otf(),
        Wrapper::Woff => container::woff(&ttf),
        Wrapper::Woff2 => container::woff2(&ttf),
        Wrapper::Eot => container::eot(&ttf, container::EOT_VERSION_2_1, 0),
        Wrapper::EotXor => container::eot(
            &ttf,
            container::EOT_VERSION_2_2,
            container::EOT_FLAG_XOR_ENCRYPTED,
        ),
    }
}

#[rstest]
#[case::ttf(Wrapper::Ttf, FontFormat::Sfnt)]
#[case::otf(Wrapper::Otf, FontFormat::Sfnt)]
#[case::woff(Wrapper::Woff, FontFormat::Woff)]
#[case::woff2(Wrapper::Woff2, FontFormat::Woff2)]
#[case::eot(Wrapper::Eot, FontFormat::Eot)]
#[case::eot_xor(Wrapper::EotXor, FontFormat::Eot)]
fn same_metrics(#[case] wrapper: Wrapper, #[case] format: FontFormat) {
    let _ = env_logger::builder().is_test(true).try_init();
    let font = parse_font(&wrapped(wrapper)).unwrap();
    assert_eq!(font.format(), format);
    assert_eq!(font.units_per_em(), 2048);
    assert_eq!(font.ascender(), 1901);
    assert_eq!(font.descender(), -483);
    assert_eq!(font.line_gap(), 0);
    assert_eq!(font.cap_height(), Some(1493));
    assert_eq!(font.x_height(), Some(1024));
    let bbox = font.bounding_box();
    assert_eq!(
        (bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max),
        (-1576, -710, 4312, 2272)
    );
    assert_eq!(font.num_glyphs(), sample_font::NUM_GLYPHS);
    assert_eq!(font.glyph_index('A'), GlyphId::new(36));
    assert_eq!(font.family_name().as_deref(), Some("Sample Serif"));
}

#[rstest]
#[case::woff(Wrapper::Woff)]
#[case::woff2(Wrapper::Woff2)]
#[case::eot(Wrapper::Eot)]
#[case::eot_xor(Wrapper::EotXor)]
fn unwraps_to_original(#[case] wrapper: Wrapper) {
    let font = parse_font(&wrapped(wrapper)).unwrap();
    assert_eq!(font.data(), &sample_font::ttf()[..]);
}

#[test]
fn outlines_survive_containers() {
    let ttf = parse_font(&sample_font::ttf()).unwrap();
    let woff2 = parse_font(&wrapped(Wrapper::Woff2)).unwrap();
    for gid in [0, 36, 131, 139] {
        let gid = GlyphId::new(gid);
        assert_eq!(ttf.outline(gid).unwrap(), woff2.outline(gid).unwrap());
    }
}

#[test]
fn corrupted_eot_magic() {
    let mut eot = wrapped(Wrapper::Eot);
    eot[34] ^= 0xFF;
    let err = parse_font(&eot).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFontData);
}

#[test]
fn compressed_eot_is_unsupported() {
    let eot = container::eot(
        &sample_font::ttf(),
        container::EOT_VERSION_1_0,
        container::EOT_FLAG_COMPRESSED,
    );
    let err = parse_font(&eot).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

#[test]
fn garbage_is_not_a_font() {
    let err = parse_font(b"definitely not a font file").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFontData);
}

#[test]
fn truncated_woff() {
    let woff = wrapped(Wrapper::Woff);
    let err = parse_font(&woff[..woff.len() / 2]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFontData);
}
