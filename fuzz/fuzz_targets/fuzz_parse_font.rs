#![no_main]
use std::error::Error;

use libfuzzer_sys::fuzz_target;
use sfnt_read::parse_font;

fn do_metadata_things(data: &[u8]) -> Result<(), Box<dyn Error>> {
    let font = parse_font(data)?;
    let _ = font.units_per_em();
    let _ = font.bounding_box();
    let _ = font.family_name();
    let _ = font.full_name();
    let _ = font.cap_height();
    let _ = font.table_tags().count();
    let mut mapped = 0usize;
    font.for_each_mapping(|_, _| mapped += 1);
    for ch in ['A', ' ', '\u{1D400}'] {
        let gid = font.glyph_index(ch);
        let _ = font.h_metric(gid);
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = do_metadata_things(data);
});
