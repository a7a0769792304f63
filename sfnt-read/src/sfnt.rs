//! An owned, parsed font.

use sfnt_types::{BoundingBox, GlyphId, Tag, CFF_SFNT_VERSION};

use crate::{
    container::{self, table_checksum, FontFormat},
    font_data::FontData,
    outline::{self, GlyphOutline},
    read::{FontRead, ReadError},
    tables::{
        cmap::{self, Cmap, CmapSubtable, EncodingRecord},
        directory::{TableDirectory, TableRecord},
        glyf::{self, Glyph},
        head::{self, Head},
        hhea::{self, Hhea},
        hmtx::{self, Hmtx, LongMetric},
        loca::{self, Loca},
        maxp::{self, Maxp},
        name::{self, Name},
        os2::{self, Os2},
        post::{self, Post},
    },
};

/// A font decoded from any supported container.
///
/// The raw SFNT bytes are owned; the small fixed-size tables are parsed up
/// front and everything else is read on demand.
#[derive(Clone, Debug)]
pub struct Sfnt {
    data: Vec<u8>,
    format: FontFormat,
    directory: TableDirectory,
    head: Head,
    hhea: Hhea,
    maxp: Maxp,
    os2: Option<Os2>,
    post: Option<Post>,
    cmap_record: Option<EncodingRecord>,
}

impl Sfnt {
    /// Detect the container of `bytes`, unwrap it and parse the result.
    pub fn from_container(bytes: &[u8]) -> Result<Self, ReadError> {
        let (format, sfnt) = container::unwrap(bytes)?;
        let mut font = Sfnt::parse(sfnt.into_owned())?;
        font.format = format;
        Ok(font)
    }

    /// Parse raw SFNT bytes.
    pub fn parse(data: Vec<u8>) -> Result<Self, ReadError> {
        let directory = TableDirectory::read(FontData::new(&data))?;
        verify_checksums(&data, &directory);
        let required = |tag: Tag| -> Result<FontData<'_>, ReadError> {
            let record = directory.find(tag).ok_or(ReadError::TableIsMissing(tag))?;
            data.get(record.range())
                .map(FontData::new)
                .ok_or(ReadError::OutOfBounds)
        };
        let optional = |tag: Tag| {
            let record = directory.find(tag)?;
            data.get(record.range()).map(FontData::new)
        };

        let head = Head::read(required(head::TAG)?)?;
        let hhea = Hhea::read(required(hhea::TAG)?)?;
        let maxp = Maxp::read(required(maxp::TAG)?)?;
        let cmap = Cmap::read(required(cmap::TAG)?)?;
        let cmap_record = match cmap.best_subtable() {
            Some((record, _)) => Some(record),
            None => {
                log::warn!("no usable Unicode cmap subtable");
                None
            }
        };
        let os2 = optional(os2::TAG).map(Os2::read).transpose()?;
        let post = match optional(post::TAG).map(Post::read) {
            Some(Err(e)) => {
                log::warn!("ignoring unreadable post table: {e}");
                None
            }
            other => other.transpose()?,
        };
        Ok(Sfnt {
            format: FontFormat::Sfnt,
            directory,
            head,
            hhea,
            maxp,
            os2,
            post,
            cmap_record,
            data,
        })
    }

    /// The container this font was decoded from.
    pub fn format(&self) -> FontFormat {
        self.format
    }

    /// The decoded SFNT bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn directory(&self) -> &TableDirectory {
        &self.directory
    }

    pub fn sfnt_version(&self) -> u32 {
        self.directory.sfnt_version
    }

    /// True for OpenType fonts with CFF outlines.
    pub fn is_cff(&self) -> bool {
        self.directory.sfnt_version == CFF_SFNT_VERSION
    }

    /// The data of the table with `tag`, if present.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'_>> {
        self.directory
            .find(tag)
            .and_then(|record| self.data.get(record.range()))
            .map(FontData::new)
    }

    /// Tags of every table, in directory order.
    pub fn table_tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.directory.records().iter().map(|record| record.tag)
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    pub fn hhea(&self) -> &Hhea {
        &self.hhea
    }

    pub fn maxp(&self) -> &Maxp {
        &self.maxp
    }

    pub fn os2(&self) -> Option<&Os2> {
        self.os2.as_ref()
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    pub fn units_per_em(&self) -> u16 {
        self.head.units_per_em
    }

    pub fn bounding_box(&self) -> BoundingBox<i16> {
        self.head.bounding_box
    }

    pub fn ascender(&self) -> i16 {
        self.hhea.ascender
    }

    pub fn descender(&self) -> i16 {
        self.hhea.descender
    }

    pub fn line_gap(&self) -> i16 {
        self.hhea.line_gap
    }

    /// Cap height from `OS/2` version 2 or later.
    pub fn cap_height(&self) -> Option<i16> {
        self.os2.as_ref().and_then(|os2| os2.cap_height)
    }

    /// x-height from `OS/2` version 2 or later.
    pub fn x_height(&self) -> Option<i16> {
        self.os2.as_ref().and_then(|os2| os2.x_height)
    }

    pub fn weight_class(&self) -> Option<u16> {
        self.os2.as_ref().map(|os2| os2.weight_class)
    }

    pub fn num_glyphs(&self) -> u16 {
        self.maxp.num_glyphs
    }

    fn hmtx(&self) -> Option<Hmtx<'_>> {
        let data = self.table_data(hmtx::TAG)?;
        Hmtx::new(data, self.hhea.number_of_h_metrics, self.maxp.num_glyphs)
            .map_err(|e| log::warn!("unreadable hmtx: {e}"))
            .ok()
    }

    /// Horizontal metrics of `gid`, if the font has `hmtx` and the glyph
    /// exists.
    pub fn h_metric(&self, gid: GlyphId) -> Option<LongMetric> {
        if gid.to_u16() >= self.num_glyphs() {
            return None;
        }
        self.hmtx()?.metric(gid).ok()
    }

    pub fn advance_width(&self, gid: GlyphId) -> Option<u16> {
        self.h_metric(gid).map(|metric| metric.advance)
    }

    fn name(&self) -> Option<Name<'_>> {
        Name::read(self.table_data(name::TAG)?).ok()
    }

    pub fn family_name(&self) -> Option<String> {
        self.name()?.string(name::FAMILY_NAME)
    }

    pub fn full_name(&self) -> Option<String> {
        self.name()?.string(name::FULL_NAME)
    }

    /// A string from the `name` table, by name id.
    pub fn name_string(&self, name_id: u16) -> Option<String> {
        self.name()?.string(name_id)
    }

    // the selected subtable and the largest codepoint it maps
    fn cmap_subtable(&self) -> Option<(CmapSubtable<'_>, u32)> {
        let record = self.cmap_record?;
        let cmap = Cmap::read(self.table_data(cmap::TAG)?).ok()?;
        let subtable = cmap.subtable(&record).ok()?;
        Some((subtable, record.max_codepoint()))
    }

    /// The glyph for `c`, or [`GlyphId::NOTDEF`] if it is not mapped.
    pub fn glyph_index(&self, c: char) -> GlyphId {
        self.cmap_subtable()
            .filter(|(_, max)| c as u32 <= *max)
            .and_then(|(subtable, _)| subtable.map_codepoint(c as u32))
            .unwrap_or(GlyphId::NOTDEF)
    }

    /// Call `f` with each codepoint and glyph of the selected cmap subtable.
    ///
    /// A non-Unicode (Mac Roman) subtable only contributes ASCII codepoints.
    pub fn for_each_mapping(&self, mut f: impl FnMut(u32, GlyphId)) {
        if let Some((subtable, max)) = self.cmap_subtable() {
            subtable.for_each_mapping(|cp, gid| {
                if cp <= max {
                    f(cp, gid)
                }
            });
        }
    }

    /// The raw `glyf` record of `gid`. Empty glyphs yield an empty slice.
    pub fn glyph_data(&self, gid: GlyphId) -> Result<&[u8], ReadError> {
        if gid.to_u16() >= self.num_glyphs() {
            return Err(ReadError::GlyphOutOfRange(gid));
        }
        if self.is_cff() {
            return Err(ReadError::Unsupported("CFF outlines"));
        }
        let loca_data = self
            .table_data(loca::TAG)
            .ok_or(ReadError::TableIsMissing(loca::TAG))?;
        let glyf_data = self
            .table_data(glyf::TAG)
            .ok_or(ReadError::TableIsMissing(glyf::TAG))?;
        let loca = Loca::read(loca_data, self.head.index_to_loc_format)?;
        let range = loca.glyph_range(gid)?;
        glyf_data.read_bytes(range)
    }

    /// The parsed `glyf` record of `gid`, or `None` for an empty glyph.
    pub fn glyph(&self, gid: GlyphId) -> Result<Option<Glyph<'_>>, ReadError> {
        let data = self.glyph_data(gid)?;
        if data.is_empty() {
            return Ok(None);
        }
        Glyph::read(FontData::new(data)).map(Some)
    }

    /// Resolve the outline of `gid` with composites expanded.
    ///
    /// `depth` is the nesting level of the request; callers start at zero.
    pub fn contour(&self, gid: GlyphId, depth: u32) -> Result<GlyphOutline, ReadError> {
        outline::load(self, gid, depth)
    }

    /// The outline of `gid`. Equivalent to `contour(gid, 0)`.
    pub fn outline(&self, gid: GlyphId) -> Result<GlyphOutline, ReadError> {
        self.contour(gid, 0)
    }
}

fn verify_checksums(data: &[u8], directory: &TableDirectory) {
    for TableRecord {
        tag,
        checksum,
        offset,
        length,
    } in directory.records()
    {
        let start = *offset as usize;
        // checksums cover the padding up to the next four byte boundary
        let padded_end = (start + *length as usize + 3) & !3;
        let Some(table) = data.get(start..padded_end.min(data.len())) else {
            continue;
        };
        let computed = table_checksum(*tag, table);
        if computed != *checksum {
            log::warn!("{tag} checksum 0x{computed:08X} does not match directory 0x{checksum:08X}");
        }
    }
}
