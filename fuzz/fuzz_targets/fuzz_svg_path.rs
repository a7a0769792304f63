#![no_main]
use libfuzzer_sys::fuzz_target;
use vector_path::{flatten, Path, SegmentedPath};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(path) = Path::from_svg(text) else {
        return;
    };
    let mut points = SegmentedPath::default();
    flatten(&path, &mut points, 4.0);
    if !path.points().iter().all(|v| v.is_finite()) {
        return;
    }
    // printing and parsing again must succeed
    let printed = path.to_svg();
    if let Err(e) = Path::from_svg(&printed) {
        panic!("{printed:?} does not parse: {e}");
    }
});
