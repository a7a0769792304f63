//! Vector paths and their reduction to polylines
//!
//! A [`Path`] is a sequence of drawing commands (lines, quadratic and cubic
//! beziers, elliptical arcs) over a flat buffer of coordinates. Paths are
//! built with a [`PathBuilder`], parsed from SVG path data, or generated by
//! the helpers in [`shapes`] and (with the `glyphs` feature) from the
//! outlines of a font.
//!
//! Rendering backends consume paths through the [`Flattener`] trait:
//! [`flatten`] replaces every curve with straight segments that stay within
//! half a device pixel of the true curve.
//!
//! ```
//! use vector_path::{flatten, Path, SegmentedPath};
//!
//! let path: Path = "M0 0Q10 10 20 0z".parse().unwrap();
//! let mut points = SegmentedPath::default();
//! flatten(&path, &mut points, 1.0);
//! assert_eq!(&points.points[..2], &[0.0, 0.0]);
//! ```

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod builder;
pub mod color;
mod flatten;
#[cfg(feature = "glyphs")]
mod glyph;
mod matrix;
mod path;
mod polyline;
mod settings;
pub mod shapes;
mod svg;
mod tracer;

pub use builder::PathBuilder;
pub use color::{ColorSpace, ColorSpaceKind, Rgba};
pub use flatten::{
    flatten, BoundsFlattener, DemuxFlattener, FlattenEvent, Flattener, SegmentedPath, Transformer,
};
#[cfg(feature = "glyphs")]
pub use glyph::{glyph_path, text_path};
pub use matrix::Matrix;
pub use path::{Arc, Command, Path, PathEl, Point, Segments};
pub use polyline::{FillRule, Polyline};
pub use settings::RenderSettings;
pub use svg::PathParseError;
pub use tracer::{tolerance, trace_arc, trace_cubic, trace_quad, MAX_ARC_STEPS, MAX_SUBDIVISIONS};

/// Public re-export of the sfnt-types crate.
pub extern crate sfnt_types as types;
