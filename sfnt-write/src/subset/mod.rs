//! Subsetting a TrueType font to a set of glyphs
//!
//! The retained glyphs are renumbered: `.notdef` first, then the requested
//! glyphs in the order given, then any glyphs pulled in as components of
//! composite glyphs, in the order they are discovered. Tables indexed by
//! glyph id are rewritten; tables that do not depend on glyph ids are
//! copied; everything else is dropped.

mod glyf;

use std::collections::HashMap;

use sfnt_read::{
    tables::{cmap, glyf as read_glyf, head, hhea, hmtx, loca, maxp, name, os2, post},
    ReadError, Sfnt,
};
use sfnt_types::{GlyphId, Tag};
use thiserror::Error;

use crate::{
    tables::{cmap::Cmap, hmtx::Hmtx, loca::Loca},
    FontBuilder,
};

const CVT: Tag = Tag::new(b"cvt ");
const FPGM: Tag = Tag::new(b"fpgm");
const PREP: Tag = Tag::new(b"prep");
const GASP: Tag = Tag::new(b"gasp");

/// Tables that are copied unchanged.
const PASSTHROUGH_TABLES: &[Tag] = &[os2::TAG, name::TAG, CVT, FPGM, PREP, GASP];
/// Tables only meaningful together with glyph instructions.
const HINTING_TABLES: &[Tag] = &[CVT, FPGM, PREP];

const POST_VERSION_3: u32 = 0x00030000;
const HHEA_ADVANCE_WIDTH_MAX_OFFSET: usize = 10;

#[derive(Debug, Error)]
pub enum SubsetError {
    #[error("Invalid input gid {0}")]
    InvalidGid(GlyphId),

    #[error("Subsetting is not supported for {0}")]
    Unsupported(&'static str),

    #[error("Subsetting table '{0}' failed")]
    SubsetTableError(Tag),

    #[error("Error reading font data: {0}")]
    ReadError(#[from] ReadError),
}

/// Settings for [`subset_with_options`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubsetOptions {
    /// Remove TrueType instructions along with `cvt `, `fpgm` and `prep`.
    pub drop_hints: bool,
    /// Tables to leave out of the output even if they could be kept.
    pub drop_tables: Vec<Tag>,
}

/// The mapping between glyph ids of the source font and the subset.
#[derive(Clone, Debug, Default)]
pub(crate) struct Plan {
    /// Source glyph ids, in subset order.
    glyphs: Vec<GlyphId>,
    new_gids: HashMap<GlyphId, GlyphId>,
}

impl Plan {
    fn new(font: &Sfnt, requested: &[GlyphId]) -> Result<Self, SubsetError> {
        let num_glyphs = font.num_glyphs();
        if let Some(gid) = requested.iter().find(|gid| gid.to_u16() >= num_glyphs) {
            return Err(SubsetError::InvalidGid(*gid));
        }
        let mut plan = Plan::default();
        plan.insert(GlyphId::NOTDEF);
        requested.iter().for_each(|gid| plan.insert(*gid));

        if font.table_data(read_glyf::TAG).is_some() {
            // glyphs appended while walking are visited in turn
            let mut next = 0;
            while let Some(gid) = plan.glyphs.get(next).copied() {
                for component in glyf::component_glyphs(font.glyph_data(gid)?)? {
                    if component.to_u16() >= num_glyphs {
                        return Err(ReadError::GlyphOutOfRange(component).into());
                    }
                    plan.insert(component);
                }
                next += 1;
            }
        }
        log::debug!("retaining {} of {num_glyphs} glyphs", plan.glyphs.len());
        Ok(plan)
    }

    #[cfg(test)]
    pub(crate) fn from_glyphs(glyphs: Vec<GlyphId>) -> Self {
        let mut plan = Plan::default();
        glyphs.into_iter().for_each(|gid| plan.insert(gid));
        plan
    }

    fn insert(&mut self, gid: GlyphId) {
        let next = GlyphId::new(self.glyphs.len() as u16);
        if let std::collections::hash_map::Entry::Vacant(entry) = self.new_gids.entry(gid) {
            entry.insert(next);
            self.glyphs.push(gid);
        }
    }

    pub(crate) fn new_gid(&self, old: GlyphId) -> Option<GlyphId> {
        self.new_gids.get(&old).copied()
    }

    fn num_glyphs(&self) -> u16 {
        self.glyphs.len() as u16
    }
}

/// Subset `font` to `glyphs` with default options.
///
/// Returns the new font and the source glyph id of each glyph in it.
pub fn subset(font: &Sfnt, glyphs: &[GlyphId]) -> Result<(Vec<u8>, Vec<GlyphId>), SubsetError> {
    subset_with_options(font, glyphs, &SubsetOptions::default())
}

/// Subset `font` to `glyphs`.
///
/// Returns the new font and the source glyph id of each glyph in it.
pub fn subset_with_options(
    font: &Sfnt,
    glyphs: &[GlyphId],
    options: &SubsetOptions,
) -> Result<(Vec<u8>, Vec<GlyphId>), SubsetError> {
    if font.is_cff() {
        return Err(SubsetError::Unsupported("CFF outlines"));
    }
    let plan = Plan::new(font, glyphs)?;
    let mut builder = FontBuilder::new().with_sfnt_version(font.sfnt_version());

    let index_to_loc_format = match font.table_data(read_glyf::TAG) {
        Some(_) => {
            let (glyf, loca) = subset_glyf_loca(font, &plan, options.drop_hints)?;
            builder.add_raw(read_glyf::TAG, glyf);
            builder.add_table(loca::TAG, &loca);
            loca.format().index_to_loc_format()
        }
        None => font.head().index_to_loc_format,
    };
    builder.add_raw(head::TAG, subset_head(font, index_to_loc_format)?);
    builder.add_raw(maxp::TAG, subset_maxp(font, &plan)?);

    let hmtx = font.table_data(hmtx::TAG).map(|_| subset_hmtx(font, &plan));
    builder.add_raw(hhea::TAG, subset_hhea(font, hmtx.as_ref())?);
    if let Some(hmtx) = &hmtx {
        builder.add_table(hmtx::TAG, hmtx);
    }
    builder.add_table(cmap::TAG, &subset_cmap(font, &plan)?);
    if let Some(post) = subset_post(font) {
        builder.add_raw(post::TAG, post);
    }

    for tag in font.table_tags() {
        if builder.contains(tag) {
            continue;
        }
        if !PASSTHROUGH_TABLES.contains(&tag) {
            log::debug!("dropping '{tag}': it cannot be subset");
            continue;
        }
        if options.drop_hints && HINTING_TABLES.contains(&tag) {
            log::debug!("dropping hinting table '{tag}'");
            continue;
        }
        if let Some(data) = font.table_data(tag) {
            builder.add_raw(tag, data.as_bytes());
        }
    }
    for tag in &options.drop_tables {
        if builder.remove(*tag).is_some() {
            log::debug!("dropping '{tag}' as requested");
        }
    }
    Ok((builder.build(), plan.glyphs))
}

/// The glyphs `text` maps to in `font`, skipping unmapped characters.
pub fn glyphs_for_text(font: &Sfnt, text: &str) -> Vec<GlyphId> {
    text.chars()
        .map(|c| font.glyph_index(c))
        .filter(|gid| *gid != GlyphId::NOTDEF)
        .collect()
}

fn subset_glyf_loca(
    font: &Sfnt,
    plan: &Plan,
    drop_hints: bool,
) -> Result<(Vec<u8>, Loca), SubsetError> {
    let mut glyf = Vec::new();
    let mut offsets = Vec::with_capacity(plan.glyphs.len() + 1);
    offsets.push(0);
    for gid in &plan.glyphs {
        let record = glyf::subset_glyph(font.glyph_data(*gid)?, plan, drop_hints)?;
        glyf.extend_from_slice(&record);
        offsets.push(glyf.len() as u32);
    }
    Ok((glyf, Loca::new(offsets)))
}

fn table_copy(font: &Sfnt, tag: Tag, min_len: usize) -> Result<Vec<u8>, SubsetError> {
    font.table_data(tag)
        .map(|data| data.as_bytes().to_vec())
        .filter(|data| data.len() >= min_len)
        .ok_or(SubsetError::SubsetTableError(tag))
}

fn put_u16(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

fn subset_head(font: &Sfnt, index_to_loc_format: i16) -> Result<Vec<u8>, SubsetError> {
    let at = head::INDEX_TO_LOC_FORMAT_OFFSET;
    let mut head = table_copy(font, head::TAG, at + 2)?;
    put_u16(&mut head, at, index_to_loc_format as u16);
    Ok(head)
}

fn subset_maxp(font: &Sfnt, plan: &Plan) -> Result<Vec<u8>, SubsetError> {
    let at = maxp::NUM_GLYPHS_OFFSET;
    let mut maxp = table_copy(font, maxp::TAG, at + 2)?;
    put_u16(&mut maxp, at, plan.num_glyphs());
    Ok(maxp)
}

fn subset_hmtx(font: &Sfnt, plan: &Plan) -> Hmtx {
    Hmtx::all_long(
        plan.glyphs
            .iter()
            .map(|gid| font.h_metric(*gid).unwrap_or_default())
            .collect(),
    )
}

fn subset_hhea(font: &Sfnt, hmtx: Option<&Hmtx>) -> Result<Vec<u8>, SubsetError> {
    let at = hhea::NUMBER_OF_H_METRICS_OFFSET;
    let mut hhea = table_copy(font, hhea::TAG, at + 2)?;
    if let Some(hmtx) = hmtx {
        put_u16(&mut hhea, at, hmtx.number_of_h_metrics());
        put_u16(
            &mut hhea,
            HHEA_ADVANCE_WIDTH_MAX_OFFSET,
            hmtx.advance_width_max(),
        );
    }
    Ok(hhea)
}

fn subset_cmap(font: &Sfnt, plan: &Plan) -> Result<Cmap, SubsetError> {
    let mut mappings = Vec::new();
    font.for_each_mapping(|codepoint, gid| {
        if let (Some(ch), Some(new_gid)) = (char::from_u32(codepoint), plan.new_gid(gid)) {
            mappings.push((ch, new_gid));
        }
    });
    Cmap::from_mappings(mappings).map_err(|e| {
        log::warn!("{e}");
        SubsetError::SubsetTableError(cmap::TAG)
    })
}

// glyph names are not kept, so any version becomes 3
fn subset_post(font: &Sfnt) -> Option<Vec<u8>> {
    let data = font.table_data(post::TAG)?;
    let mut post = data.as_bytes().get(..post::VERSION_3_LEN)?.to_vec();
    post[..4].copy_from_slice(&POST_VERSION_3.to_be_bytes());
    Some(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::sample_font;
    use pretty_assertions::assert_eq;
    use sfnt_read::parse_font;

    fn gids(raw: &[u16]) -> Vec<GlyphId> {
        raw.iter().copied().map(GlyphId::new).collect()
    }

    fn sample() -> Sfnt {
        parse_font(&sample_font::ttf()).unwrap()
    }

    #[test]
    fn plan_order() {
        let font = sample();
        let plan = Plan::new(&font, &gids(&[131, 3, 0, 3])).unwrap();
        assert_eq!(plan.glyphs, gids(&[0, 131, 3, 36, 140]));
        assert_eq!(plan.new_gid(GlyphId::new(140)), Some(GlyphId::new(4)));
        assert_eq!(plan.new_gid(GlyphId::new(7)), None);
    }

    #[test]
    fn out_of_range_request() {
        let font = sample();
        let err = subset(&font, &gids(&[3, 141])).unwrap_err();
        assert!(matches!(err, SubsetError::InvalidGid(gid) if gid == GlyphId::new(141)));
    }

    #[test]
    fn cff_is_unsupported() {
        let font = parse_font(&sample_font::otf()).unwrap();
        assert!(matches!(
            subset(&font, &gids(&[3])),
            Err(SubsetError::Unsupported(_))
        ));
    }

    #[test]
    fn rewritten_tables() {
        let font = sample();
        let (bytes, _) = subset(&font, &gids(&[36, 131])).unwrap();
        let subset = parse_font(&bytes).unwrap();
        assert_eq!(subset.num_glyphs(), 4);
        assert_eq!(subset.hhea().number_of_h_metrics, 4);
        assert_eq!(subset.head().index_to_loc_format, 0);
        assert_eq!(subset.post().map(|post| post.version), Some(POST_VERSION_3));
        assert_eq!(subset.glyph_index('A'), GlyphId::new(1));
        assert_eq!(subset.glyph_index('\u{C1}'), GlyphId::new(2));
        assert_eq!(subset.glyph_index('B'), GlyphId::NOTDEF);
        for (new, old) in [(1, 36), (2, 131), (3, 140)] {
            assert_eq!(
                subset.h_metric(GlyphId::new(new)),
                font.h_metric(GlyphId::new(old))
            );
            assert_eq!(
                subset.outline(GlyphId::new(new)).unwrap().points,
                font.outline(GlyphId::new(old)).unwrap().points
            );
        }
    }

    #[test]
    fn table_selection() {
        let font = sample();
        let options = SubsetOptions {
            drop_hints: false,
            drop_tables: vec![name::TAG],
        };
        let (bytes, _) = subset_with_options(&font, &gids(&[36]), &options).unwrap();
        let tags: Vec<_> = parse_font(&bytes).unwrap().table_tags().collect();
        assert!(tags.contains(&GASP));
        assert!(tags.contains(&os2::TAG));
        assert!(!tags.contains(&name::TAG));
    }

    #[test]
    fn text_to_glyphs() {
        let font = sample();
        assert_eq!(glyphs_for_text(&font, "AB\u{C1}\u{2603}"), gids(&[36, 37, 131]));
    }
}
