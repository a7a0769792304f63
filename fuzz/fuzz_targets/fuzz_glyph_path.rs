#![no_main]
use std::error::Error;

use libfuzzer_sys::{
    arbitrary::{self, Arbitrary, Unstructured},
    fuzz_target,
};
use sfnt_read::parse_font;
use sfnt_types::GlyphId;
use vector_path::{glyph_path, FlattenEvent, RenderSettings};

#[derive(Arbitrary, Debug)]
struct FuzzerRequest {
    gid: u16,
    size: u8,
    scale: u8,
}

fn do_glyph_things(request: &FuzzerRequest, data: &[u8]) -> Result<(), Box<dyn Error>> {
    let font = parse_font(data)?;
    let gid = GlyphId::new(request.gid % font.num_glyphs().max(1));
    let path = glyph_path(&font, gid, request.size as f64)?;
    let settings = RenderSettings {
        scale: request.scale as f64 / 16.0,
        ..Default::default()
    };
    let mut events = Vec::<FlattenEvent>::new();
    settings.flatten(&path, &mut events);
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let Ok(request) = FuzzerRequest::arbitrary(&mut unstructured) else {
        return;
    };
    let _ = do_glyph_things(&request, unstructured.take_rest());
});
