//! Serializable versions of the tables the subsetter rewrites.

pub mod cmap;
pub mod hmtx;
pub mod loca;
