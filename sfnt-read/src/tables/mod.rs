//! Parsers for the tables this crate understands.

pub mod cmap;
pub mod directory;
pub mod glyf;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod loca;
pub mod maxp;
pub mod name;
pub mod os2;
pub mod post;
