//!  A builder for top-level font objects

use std::borrow::Cow;
use std::collections::BTreeMap;

use sfnt_read::{
    tables::{
        directory::{checksum, round4, SearchParams, HEADER_LEN, RECORD_LEN},
        head,
    },
    Sfnt,
};
use sfnt_types::{Tag, TT_SFNT_VERSION};

use crate::table_writer::{FontWrite, TableWriter};

/// The whole font checksum is this value when `checkSumAdjustment` is right.
const CHECKSUM_MAGIC: u32 = 0xB1B0AFBA;

/// Build a font from some set of tables.
#[derive(Debug, Clone)]
pub struct FontBuilder<'a> {
    sfnt_version: u32,
    tables: BTreeMap<Tag, Cow<'a, [u8]>>,
}

impl Default for FontBuilder<'_> {
    fn default() -> Self {
        FontBuilder {
            sfnt_version: TT_SFNT_VERSION,
            tables: BTreeMap::new(),
        }
    }
}

impl<'a> FontBuilder<'a> {
    /// Create a new builder to compile a binary font
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `sfntVersion` written to the table directory.
    pub fn with_sfnt_version(mut self, sfnt_version: u32) -> Self {
        self.sfnt_version = sfnt_version;
        self
    }

    /// Serialize `table` and add it under `tag`.
    pub fn add_table<T: FontWrite + ?Sized>(&mut self, tag: Tag, table: &T) -> &mut Self {
        self.add_raw(tag, crate::dump_table(table))
    }

    /// A builder method to add raw data for the provided tag
    pub fn add_raw(&mut self, tag: Tag, data: impl Into<Cow<'a, [u8]>>) -> &mut Self {
        self.tables.insert(tag, data.into());
        self
    }

    /// Remove a table, returning its data if it was present.
    pub fn remove(&mut self, tag: Tag) -> Option<Cow<'a, [u8]>> {
        self.tables.remove(&tag)
    }

    /// Copy each table from the source font if it does not already exist
    pub fn copy_missing_tables(&mut self, font: &'a Sfnt) -> &mut Self {
        for record in font.directory().records() {
            let tag = record.tag;
            if !self.tables.contains_key(&tag) {
                if let Some(data) = font.table_data(tag) {
                    self.add_raw(tag, data.as_bytes());
                } else {
                    log::warn!("data for '{tag}' is malformed");
                }
            }
        }
        self
    }

    /// Returns `true` if the builder contains a table with this tag.
    pub fn contains(&self, tag: Tag) -> bool {
        self.tables.contains_key(&tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.tables.keys().copied()
    }

    /// Assemble all the tables into a binary font file with a [Table Directory].
    ///
    /// Tables are sorted by tag and padded to four bytes. If there is a
    /// `head` table its `checkSumAdjustment` is recomputed.
    ///
    /// [Table Directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
    pub fn build(&mut self) -> Vec<u8> {
        if let Some(head) = self.tables.get_mut(&head::TAG) {
            zero_checksum_adjustment(head);
        }
        let num_tables = self.tables.len() as u16;
        let params = SearchParams::new(num_tables, RECORD_LEN as u16);

        let mut writer = TableWriter::default();
        writer.write(&self.sfnt_version);
        writer.write(&num_tables);
        writer.write(&params.search_range);
        writer.write(&params.entry_selector);
        writer.write(&params.range_shift);

        let mut position = HEADER_LEN + self.tables.len() * RECORD_LEN;
        let mut head_position = None;
        for (tag, data) in &self.tables {
            if *tag == head::TAG {
                head_position = Some(position);
            }
            writer.write(tag);
            writer.write(&checksum(data));
            writer.write(&(position as u32));
            writer.write(&(data.len() as u32));
            position += round4(data.len());
        }
        for data in self.tables.values() {
            writer.write_slice(data);
            writer.pad_to(4);
        }
        let mut data = writer.into_data();
        if let Some(position) = head_position {
            let adjustment = CHECKSUM_MAGIC.wrapping_sub(checksum(&data));
            let at = position + head::CHECKSUM_ADJUSTMENT_OFFSET;
            if let Some(field) = data.get_mut(at..at + 4) {
                field.copy_from_slice(&adjustment.to_be_bytes());
            }
        }
        data
    }
}

fn zero_checksum_adjustment(head: &mut Cow<[u8]>) {
    let range = head::CHECKSUM_ADJUSTMENT_OFFSET..head::CHECKSUM_ADJUSTMENT_OFFSET + 4;
    if head.get(range.clone()).is_some_and(|field| field != [0; 4]) {
        head.to_mut()[range].fill(0);
    }
}

/// Re-serialize every table of `font` into a new file.
///
/// The table directory, padding and checksums are rebuilt; table contents
/// are copied unchanged apart from `head.checkSumAdjustment`.
pub fn write(font: &Sfnt) -> Vec<u8> {
    FontBuilder::new()
        .with_sfnt_version(font.sfnt_version())
        .copy_missing_tables(font)
        .build()
}
