#![no_main]
use std::error::Error;

use libfuzzer_sys::{
    arbitrary::{self, Arbitrary, Unstructured},
    fuzz_target,
};
use sfnt_read::{parse_font, Sfnt};
use sfnt_types::GlyphId;

#[derive(Arbitrary, Debug)]
struct FuzzerRequest {
    glyphs: Vec<u16>,
}

fn do_subset_things(request: &FuzzerRequest, data: &[u8]) -> Result<(), Box<dyn Error>> {
    let font = parse_font(data)?;
    let glyphs: Vec<_> = request.glyphs.iter().copied().map(GlyphId::new).collect();
    let (bytes, _) = sfnt_write::subset(&font, &glyphs)?;
    // a subset must always be readable again
    if let Err(e) = Sfnt::parse(bytes) {
        panic!("subset is not a valid font: {e}");
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let Ok(request) = FuzzerRequest::arbitrary(&mut unstructured) else {
        return;
    };
    let _ = do_subset_things(&request, unstructured.take_rest());
});
