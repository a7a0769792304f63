//! Writing and subsetting SFNT fonts.
//!
//! [`FontBuilder`] assembles table data into a font file, computing the
//! table directory and checksums. [`write`] re-serializes a parsed
//! [`Sfnt`](sfnt_read::Sfnt), and [`subset`] produces a font containing only
//! the requested glyphs.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod font_builder;
mod subset;
mod table_writer;
pub mod tables;

pub use font_builder::{write, FontBuilder};
pub use subset::{glyphs_for_text, subset, subset_with_options, SubsetError, SubsetOptions};
pub use table_writer::{dump_table, FontWrite, TableWriter};

/// Public re-export of the sfnt-read crate.
pub extern crate sfnt_read as read;
/// Public re-export of the sfnt-types crate.
pub extern crate sfnt_types as types;
