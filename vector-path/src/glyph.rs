//! Paths from font glyph outlines.
//!
//! Font units are scaled to `size / unitsPerEm` and the y axis is flipped,
//! so a glyph drawn at the origin sits on the baseline with its ascent in
//! negative y, matching the coordinate system of SVG and most rasterizers.

use sfnt_read::{types::GlyphId, OutlinePen, ReadError, Sfnt};

use crate::{builder::PathBuilder, matrix::Matrix, path::Path};

impl OutlinePen for PathBuilder {
    fn move_to(&mut self, x: f64, y: f64) {
        PathBuilder::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        PathBuilder::line_to(self, x, y);
    }

    fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64) {
        PathBuilder::quad_to(self, cx0, cy0, x, y);
    }

    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64) {
        PathBuilder::cubic_to(self, cx0, cy0, cx1, cy1, x, y);
    }

    fn close(&mut self) {
        PathBuilder::close(self);
    }
}

/// A pen that maps every point through a matrix before passing it on.
struct TransformPen<'a, T> {
    inner: &'a mut T,
    matrix: Matrix,
}

impl<T: OutlinePen> OutlinePen for TransformPen<'_, T> {
    fn move_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.matrix.transform(x, y);
        self.inner.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.matrix.transform(x, y);
        self.inner.line_to(x, y);
    }

    fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64) {
        let (cx0, cy0) = self.matrix.transform(cx0, cy0);
        let (x, y) = self.matrix.transform(x, y);
        self.inner.quad_to(cx0, cy0, x, y);
    }

    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64) {
        let (cx0, cy0) = self.matrix.transform(cx0, cy0);
        let (cx1, cy1) = self.matrix.transform(cx1, cy1);
        let (x, y) = self.matrix.transform(x, y);
        self.inner.curve_to(cx0, cy0, cx1, cy1, x, y);
    }

    fn close(&mut self) {
        self.inner.close();
    }
}

fn em_scale(font: &Sfnt, size: f64) -> f64 {
    // unitsPerEm is validated non-zero when the head table is parsed
    size / font.units_per_em() as f64
}

fn draw_glyph(
    font: &Sfnt,
    gid: GlyphId,
    matrix: Matrix,
    builder: &mut PathBuilder,
) -> Result<(), ReadError> {
    let outline = font.outline(gid)?;
    outline.draw(&mut TransformPen {
        inner: builder,
        matrix,
    });
    Ok(())
}

/// The outline of glyph `gid` at `size` path units per em.
///
/// Fonts with CFF outlines return [`ReadError::Unsupported`].
pub fn glyph_path(font: &Sfnt, gid: GlyphId, size: f64) -> Result<Path, ReadError> {
    let scale = em_scale(font, size);
    let mut builder = PathBuilder::new();
    draw_glyph(font, gid, Matrix::scale(scale, -scale), &mut builder)?;
    let path = builder.build();
    log::trace!("glyph {gid} at size {size}: {} commands", path.len());
    Ok(path)
}

/// The outlines of the glyphs for `text` on a single baseline starting at
/// the origin.
///
/// Each character is mapped through the font's `cmap` and advanced by its
/// horizontal metric. There is no shaping, kerning or line breaking;
/// unmapped characters draw the `.notdef` glyph.
pub fn text_path(font: &Sfnt, text: &str, size: f64) -> Result<Path, ReadError> {
    let scale = em_scale(font, size);
    let mut builder = PathBuilder::new();
    let mut x = 0.0;
    for ch in text.chars() {
        let gid = font.glyph_index(ch);
        let matrix = Matrix::scale(scale, -scale).then_translate(x, 0.0);
        draw_glyph(font, gid, matrix, &mut builder)?;
        x += font.advance_width(gid).unwrap_or_default() as f64 * scale;
    }
    Ok(builder.build())
}
