//! Rewriting glyf records for a subset

use sfnt_read::{
    tables::glyf::{CompositeFlags, Glyph, GLYPH_HEADER_LEN},
    FontData, ReadError,
};
use sfnt_types::GlyphId;

use super::{Plan, SubsetError};

/// Copy one glyph record, remapping component glyph ids.
///
/// With `drop_hints` the TrueType instructions are removed. The result is
/// padded to an even length so that it can be addressed by a short `loca`.
pub(crate) fn subset_glyph(
    data: &[u8],
    plan: &Plan,
    drop_hints: bool,
) -> Result<Vec<u8>, SubsetError> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let mut out = match Glyph::read(FontData::new(data))? {
        Glyph::Simple(glyph) if drop_hints => {
            let instructions_at = GLYPH_HEADER_LEN + glyph.num_contours() * 2;
            let instructions = glyph.instructions()?;
            let mut out = data[..instructions_at].to_vec();
            out.extend_from_slice(&[0, 0]);
            out.extend_from_slice(&data[instructions_at + 2 + instructions.len()..]);
            out
        }
        Glyph::Simple(_) => data.to_vec(),
        Glyph::Composite(glyph) => {
            let mut out = data.to_vec();
            let mut end = data.len();
            for component in glyph.components() {
                let component = component?;
                let new_gid = plan
                    .new_gid(component.glyph)
                    .ok_or(ReadError::GlyphOutOfRange(component.glyph))?;
                write_u16(&mut out, component.glyph_offset, new_gid.to_u16())?;
                if drop_hints {
                    let flags_at = component.glyph_offset - 2;
                    let flags = component.flags.bits() & !CompositeFlags::WE_HAVE_INSTRUCTIONS;
                    write_u16(&mut out, flags_at, flags)?;
                    end = component_end(component.glyph_offset, component.flags);
                }
            }
            // instructions follow the last component
            out.truncate(end);
            out
        }
    };
    if out.len() % 2 != 0 {
        out.push(0);
    }
    Ok(out)
}

// the offset just past a component record whose glyph index is at `glyph_offset`
fn component_end(glyph_offset: usize, flags: CompositeFlags) -> usize {
    let args = if flags.contains(CompositeFlags::ARG_1_AND_2_ARE_WORDS) {
        4
    } else {
        2
    };
    let transform = if flags.contains(CompositeFlags::WE_HAVE_A_SCALE) {
        2
    } else if flags.contains(CompositeFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
        4
    } else if flags.contains(CompositeFlags::WE_HAVE_A_TWO_BY_TWO) {
        8
    } else {
        0
    };
    glyph_offset + 2 + args + transform
}

fn write_u16(data: &mut [u8], offset: usize, value: u16) -> Result<(), SubsetError> {
    data.get_mut(offset..offset + 2)
        .ok_or(ReadError::OutOfBounds)?
        .copy_from_slice(&value.to_be_bytes());
    Ok(())
}

/// The glyphs referenced as components by the record in `data`.
pub(crate) fn component_glyphs(data: &[u8]) -> Result<Vec<GlyphId>, ReadError> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    match Glyph::read(FontData::new(data))? {
        Glyph::Simple(_) => Ok(Vec::new()),
        Glyph::Composite(glyph) => glyph
            .components()
            .map(|component| component.map(|component| component.glyph))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::glyf::{composite_glyph, simple_glyph, ComponentSpec, ROUND_XY_TO_GRID};
    use sfnt_types::BoundingBox;

    fn plan(glyphs: &[u16]) -> Plan {
        Plan::from_glyphs(glyphs.iter().copied().map(GlyphId::new).collect())
    }

    fn with_instructions(glyph: &[u8], num_contours: usize, instructions: &[u8]) -> Vec<u8> {
        let at = GLYPH_HEADER_LEN + num_contours * 2;
        let mut out = glyph[..at].to_vec();
        out.extend_from_slice(&(instructions.len() as u16).to_be_bytes());
        out.extend_from_slice(instructions);
        out.extend_from_slice(&glyph[at + 2..]);
        out
    }

    #[test]
    fn remaps_components() {
        let bbox = BoundingBox::from_point(0, 0);
        let record = composite_glyph(
            bbox,
            &[
                ComponentSpec::offset(36, 0, 0),
                ComponentSpec {
                    flags: ROUND_XY_TO_GRID,
                    ..ComponentSpec::offset(140, 200, 100)
                },
            ],
        );
        let plan = plan(&[0, 140, 36]);
        let subset = subset_glyph(&record, &plan, false).unwrap();
        assert_eq!(
            component_glyphs(&subset).unwrap(),
            [GlyphId::new(2), GlyphId::new(1)]
        );
        assert_eq!(subset.len(), record.len());
    }

    #[test]
    fn missing_component_is_an_error() {
        let record = composite_glyph(
            BoundingBox::from_point(0, 0),
            &[ComponentSpec::offset(7, 0, 0)],
        );
        assert!(subset_glyph(&record, &plan(&[0]), false).is_err());
    }

    #[test]
    fn strips_simple_instructions() {
        let glyph = simple_glyph(&[vec![(0, 0, true), (10, 0, true), (10, 10, true)]]);
        let hinted = with_instructions(&glyph, 1, &[0xB0, 0x01, 0x2F]);
        let stripped = subset_glyph(&hinted, &plan(&[0]), true).unwrap();
        assert_eq!(stripped, glyph);
        let kept = subset_glyph(&hinted, &plan(&[0]), false).unwrap();
        assert_eq!(&kept[..hinted.len()], &hinted[..]);
        assert_eq!(kept.len() % 2, 0);
    }

    #[test]
    fn strips_composite_instructions() {
        let record = composite_glyph(
            BoundingBox::from_point(0, 0),
            &[ComponentSpec {
                flags: CompositeFlags::WE_HAVE_INSTRUCTIONS,
                ..ComponentSpec::offset(3, 5, 5)
            }],
        );
        let mut hinted = record.clone();
        hinted.extend_from_slice(&[0, 2, 0xB0, 0x01]);
        let stripped = subset_glyph(&hinted, &plan(&[0, 3]), true).unwrap();
        assert_eq!(stripped.len(), record.len());
        let flags = u16::from_be_bytes([stripped[10], stripped[11]]);
        assert_eq!(flags & CompositeFlags::WE_HAVE_INSTRUCTIONS, 0);
        assert_eq!(component_glyphs(&stripped).unwrap(), [GlyphId::new(1)]);
    }

    #[test]
    fn empty_glyph() {
        assert!(subset_glyph(&[], &plan(&[0]), true).unwrap().is_empty());
        assert!(component_glyphs(&[]).unwrap().is_empty());
    }
}
