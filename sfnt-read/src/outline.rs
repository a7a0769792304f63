//! Glyph outlines with composites resolved.

use sfnt_types::GlyphId;

use crate::{
    read::ReadError,
    sfnt::Sfnt,
    tables::glyf::{Anchor, Component, CompositeFlags, Glyph},
};

/// Maximum nesting of composite glyphs.
pub const MAX_COMPOSITE_DEPTH: u32 = 64;

/// Maximum number of components expanded while resolving one glyph,
/// counting every reference at every level.
pub const MAX_COMPONENTS: usize = 4096;

/// Maximum number of points in a resolved outline.
pub const MAX_OUTLINE_POINTS: usize = 1 << 16;

/// Interface for accepting a sequence of path commands.
pub trait OutlinePen {
    /// Emit a command to begin a new subpath at (x, y).
    fn move_to(&mut self, x: f64, y: f64);

    /// Emit a line segment from the current point to (x, y).
    fn line_to(&mut self, x: f64, y: f64);

    /// Emit a quadratic bezier segment from the current point with a control
    /// point at (cx0, cy0) and ending at (x, y).
    fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64);

    /// Emit a cubic bezier segment from the current point with control
    /// points at (cx0, cy0) and (cx1, cy1) and ending at (x, y).
    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64);

    /// Emit a command to close the current subpath.
    fn close(&mut self);
}

/// A point of a TrueType outline, in font units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OutlinePoint {
    pub x: f64,
    pub y: f64,
    pub on_curve: bool,
}

impl OutlinePoint {
    fn midpoint(self, other: OutlinePoint) -> OutlinePoint {
        OutlinePoint {
            x: (self.x + other.x) * 0.5,
            y: (self.y + other.y) * 0.5,
            on_curve: true,
        }
    }
}

/// The contours of a glyph, with any components transformed into place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphOutline {
    pub glyph_id: GlyphId,
    pub points: Vec<OutlinePoint>,
    /// Index one past the last point of each contour.
    pub contour_ends: Vec<usize>,
}

impl GlyphOutline {
    fn new(glyph_id: GlyphId) -> Self {
        GlyphOutline {
            glyph_id,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over the points of each contour.
    pub fn contours(&self) -> impl Iterator<Item = &[OutlinePoint]> + '_ {
        let starts = std::iter::once(0).chain(self.contour_ends.iter().copied());
        starts
            .zip(self.contour_ends.iter().copied())
            .map(|(start, end)| &self.points[start..end])
    }

    /// Draw every contour as closed quadratic splines.
    ///
    /// Consecutive off-curve points have an implied on-curve point halfway
    /// between them. A contour that starts off-curve begins at its last point
    /// when that is on-curve, else at the implied midpoint.
    pub fn draw(&self, pen: &mut impl OutlinePen) {
        for contour in self.contours() {
            draw_contour(contour, pen);
        }
    }

    fn append_component(
        &mut self,
        component: &Component,
        child: GlyphOutline,
    ) -> Result<(), ReadError> {
        let transform = component.transform;
        let mut points: Vec<_> = child
            .points
            .iter()
            .map(|point| {
                let (x, y) = transform.apply(point.x, point.y);
                OutlinePoint { x, y, ..*point }
            })
            .collect();
        let (dx, dy) = match component.anchor {
            Anchor::Offset { x, y } => {
                let (x, y) = (x as f64, y as f64);
                let scaled = component
                    .flags
                    .contains(CompositeFlags::SCALED_COMPONENT_OFFSET)
                    && !component
                        .flags
                        .contains(CompositeFlags::UNSCALED_COMPONENT_OFFSET);
                if scaled {
                    transform.apply(x, y)
                } else {
                    (x, y)
                }
            }
            Anchor::Point { base, component } => {
                let (Some(base), Some(attach)) = (
                    self.points.get(base as usize),
                    points.get(component as usize),
                ) else {
                    return Err(ReadError::MalformedData(
                        "component anchor point out of range",
                    ));
                };
                (base.x - attach.x, base.y - attach.y)
            }
        };
        if dx != 0.0 || dy != 0.0 {
            for point in &mut points {
                point.x += dx;
                point.y += dy;
            }
        }
        let base = self.points.len();
        self.points.extend(points);
        self.contour_ends
            .extend(child.contour_ends.iter().map(|end| end + base));
        Ok(())
    }
}

// Work done so far for a single resolution. Shared glyphs are counted
// once per reference, so a small font cannot expand exponentially.
struct Budget {
    root: GlyphId,
    components: usize,
    points: usize,
}

pub(crate) fn load(font: &Sfnt, gid: GlyphId, depth: u32) -> Result<GlyphOutline, ReadError> {
    let mut budget = Budget {
        root: gid,
        components: 0,
        points: 0,
    };
    load_with_budget(font, gid, depth, &mut budget)
}

fn load_with_budget(
    font: &Sfnt,
    gid: GlyphId,
    depth: u32,
    budget: &mut Budget,
) -> Result<GlyphOutline, ReadError> {
    if depth > MAX_COMPOSITE_DEPTH {
        return Err(ReadError::CompositeTooDeep(gid));
    }
    let mut outline = GlyphOutline::new(gid);
    match font.glyph(gid)? {
        None => {}
        Some(Glyph::Simple(glyph)) => {
            budget.points += glyph.num_points()?;
            if budget.points > MAX_OUTLINE_POINTS {
                log::warn!("glyph {} exceeds {MAX_OUTLINE_POINTS} points", budget.root);
                return Err(ReadError::CompositeTooLarge(budget.root));
            }
            outline.points = glyph
                .points()?
                .into_iter()
                .map(|point| OutlinePoint {
                    x: point.x as f64,
                    y: point.y as f64,
                    on_curve: point.on_curve,
                })
                .collect();
            outline.contour_ends = glyph
                .end_points()?
                .into_iter()
                .map(|end| end as usize + 1)
                .collect();
        }
        Some(Glyph::Composite(glyph)) => {
            for component in glyph.components() {
                let component = component?;
                budget.components += 1;
                if budget.components > MAX_COMPONENTS {
                    log::warn!("glyph {} exceeds {MAX_COMPONENTS} components", budget.root);
                    return Err(ReadError::CompositeTooLarge(budget.root));
                }
                let child = load_with_budget(font, component.glyph, depth + 1, budget)?;
                outline.append_component(&component, child)?;
            }
        }
    }
    Ok(outline)
}

fn draw_contour(points: &[OutlinePoint], pen: &mut impl OutlinePen) {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return;
    };
    let (start, rest) = if first.on_curve {
        (first, &points[1..])
    } else if last.on_curve {
        (last, &points[..points.len() - 1])
    } else {
        (last.midpoint(first), points)
    };
    pen.move_to(start.x, start.y);
    let mut pending: Option<OutlinePoint> = None;
    for &point in rest {
        match (pending, point.on_curve) {
            (None, true) => pen.line_to(point.x, point.y),
            (None, false) => pending = Some(point),
            (Some(control), true) => {
                pen.quad_to(control.x, control.y, point.x, point.y);
                pending = None;
            }
            (Some(control), false) => {
                let mid = control.midpoint(point);
                pen.quad_to(control.x, control.y, mid.x, mid.y);
                pending = Some(point);
            }
        }
    }
    if let Some(control) = pending {
        pen.quad_to(control.x, control.y, start.x, start.y);
    }
    pen.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::{
        glyf::{self as test_glyf, ComponentScale, ComponentSpec},
        sample_font,
    };
    use pretty_assertions::assert_eq;
    use sfnt_types::BoundingBox;

    #[derive(Clone, Debug, PartialEq)]
    enum Cmd {
        Move(f64, f64),
        Line(f64, f64),
        Quad(f64, f64, f64, f64),
        Curve(f64, f64, f64, f64, f64, f64),
        Close,
    }

    impl OutlinePen for Vec<Cmd> {
        fn move_to(&mut self, x: f64, y: f64) {
            self.push(Cmd::Move(x, y));
        }

        fn line_to(&mut self, x: f64, y: f64) {
            self.push(Cmd::Line(x, y));
        }

        fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64) {
            self.push(Cmd::Quad(cx0, cy0, x, y));
        }

        fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64) {
            self.push(Cmd::Curve(cx0, cy0, cx1, cy1, x, y));
        }

        fn close(&mut self) {
            self.push(Cmd::Close);
        }
    }

    fn pt(x: f64, y: f64, on_curve: bool) -> OutlinePoint {
        OutlinePoint { x, y, on_curve }
    }

    fn outline(points: Vec<OutlinePoint>) -> GlyphOutline {
        GlyphOutline {
            glyph_id: GlyphId::NOTDEF,
            contour_ends: vec![points.len()],
            points,
        }
    }

    #[test]
    fn implied_midpoints() {
        let glyph = outline(vec![
            pt(0.0, 0.0, true),
            pt(10.0, 0.0, false),
            pt(10.0, 10.0, false),
            pt(0.0, 10.0, true),
        ]);
        let mut cmds = Vec::new();
        glyph.draw(&mut cmds);
        assert_eq!(
            cmds,
            [
                Cmd::Move(0.0, 0.0),
                Cmd::Quad(10.0, 0.0, 10.0, 5.0),
                Cmd::Quad(10.0, 10.0, 0.0, 10.0),
                Cmd::Close,
            ]
        );
    }

    #[test]
    fn starts_off_curve() {
        let glyph = outline(vec![pt(0.0, 0.0, false), pt(10.0, 0.0, true)]);
        let mut cmds = Vec::new();
        glyph.draw(&mut cmds);
        assert_eq!(
            cmds,
            [Cmd::Move(10.0, 0.0), Cmd::Quad(0.0, 0.0, 10.0, 0.0), Cmd::Close]
        );
    }

    #[test]
    fn all_off_curve() {
        let glyph = outline(vec![
            pt(0.0, 0.0, false),
            pt(10.0, 0.0, false),
            pt(10.0, 10.0, false),
            pt(0.0, 10.0, false),
        ]);
        let mut cmds = Vec::new();
        glyph.draw(&mut cmds);
        assert_eq!(
            cmds,
            [
                Cmd::Move(0.0, 5.0),
                Cmd::Quad(0.0, 0.0, 5.0, 0.0),
                Cmd::Quad(10.0, 0.0, 10.0, 5.0),
                Cmd::Quad(10.0, 10.0, 5.0, 10.0),
                Cmd::Quad(0.0, 10.0, 0.0, 5.0),
                Cmd::Close,
            ]
        );
    }

    #[test]
    fn simple_glyph() {
        let font = Sfnt::parse(sample_font::ttf()).unwrap();
        let outline = font.outline(GlyphId::new(36)).unwrap();
        assert_eq!(outline.glyph_id, GlyphId::new(36));
        assert!(!outline.is_empty());
        assert_eq!(outline.contour_ends.last(), Some(&outline.points.len()));
    }

    #[test]
    fn empty_glyph() {
        let font = Sfnt::parse(sample_font::ttf()).unwrap();
        let outline = font.outline(GlyphId::new(3)).unwrap();
        assert!(outline.is_empty());
        assert_eq!(outline.contours().count(), 0);
    }

    #[test]
    fn composite_glyph() {
        let font = Sfnt::parse(sample_font::ttf()).unwrap();
        let base = font.outline(GlyphId::new(36)).unwrap();
        let accent = font.outline(GlyphId::new(140)).unwrap();
        let composite = font.outline(GlyphId::new(131)).unwrap();
        assert_eq!(
            composite.contours().count(),
            base.contours().count() + accent.contours().count()
        );
        assert_eq!(&composite.points[..base.points.len()], &base.points[..]);
        // the accent is shifted, not transformed
        let shifted = &composite.points[base.points.len()..];
        let dx = shifted[0].x - accent.points[0].x;
        let dy = shifted[0].y - accent.points[0].y;
        assert!(dy > 0.0);
        for (moved, orig) in shifted.iter().zip(&accent.points) {
            assert_eq!(moved.x - orig.x, dx);
            assert_eq!(moved.y - orig.y, dy);
        }
    }

    #[test]
    fn depth_limit() {
        let font = Sfnt::parse(sample_font::ttf()).unwrap();
        assert!(font
            .contour(GlyphId::new(131), MAX_COMPOSITE_DEPTH - 1)
            .is_ok());
        assert_eq!(
            font.contour(GlyphId::new(131), MAX_COMPOSITE_DEPTH),
            Err(ReadError::CompositeTooDeep(GlyphId::new(36)))
        );
    }

    #[test]
    fn out_of_range() {
        let font = Sfnt::parse(sample_font::ttf()).unwrap();
        let err = font.outline(GlyphId::new(1000)).unwrap_err();
        assert_eq!(err, ReadError::GlyphOutOfRange(GlyphId::new(1000)));
        assert_eq!(err.kind(), crate::ErrorKind::Glyph);
    }

    // a 100 x 200 rectangle with its corner at the origin
    fn rectangle() -> Vec<u8> {
        test_glyf::simple_glyph(&[vec![
            (0, 0, true),
            (100, 0, true),
            (100, 200, true),
            (0, 200, true),
        ]])
    }

    fn composite(components: &[ComponentSpec]) -> Vec<u8> {
        test_glyf::composite_glyph(BoundingBox::default(), components)
    }

    fn font_with(glyphs: Vec<(u16, Vec<u8>)>) -> Sfnt {
        Sfnt::parse(sample_font::ttf_with(&glyphs, Vec::new())).unwrap()
    }

    // the rectangle placed by `component` as glyph 2
    fn placed(component: ComponentSpec) -> Vec<(f64, f64)> {
        let font = font_with(vec![(1, rectangle()), (2, composite(&[component]))]);
        let outline = font.outline(GlyphId::new(2)).unwrap();
        assert_eq!(outline.contour_ends, [4]);
        outline.points.iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn uniform_scale() {
        let component = ComponentSpec {
            scale: Some(ComponentScale::Uniform(0.5)),
            ..ComponentSpec::offset(1, 10, 20)
        };
        assert_eq!(
            placed(component),
            [(10.0, 20.0), (60.0, 20.0), (60.0, 120.0), (10.0, 120.0)]
        );
    }

    #[test]
    fn x_and_y_scale() {
        let component = ComponentSpec {
            scale: Some(ComponentScale::XY(1.5, 0.5)),
            ..ComponentSpec::offset(1, 0, 0)
        };
        assert_eq!(
            placed(component),
            [(0.0, 0.0), (150.0, 0.0), (150.0, 100.0), (0.0, 100.0)]
        );
    }

    #[test]
    fn two_by_two_rotation() {
        // a quarter turn counterclockwise: (x, y) -> (-y, x)
        let component = ComponentSpec {
            scale: Some(ComponentScale::TwoByTwo([0.0, 1.0, -1.0, 0.0])),
            ..ComponentSpec::offset(1, 300, 0)
        };
        assert_eq!(
            placed(component),
            [(300.0, 0.0), (300.0, 100.0), (100.0, 100.0), (100.0, 0.0)]
        );
    }

    #[test]
    fn scaled_component_offset() {
        let scaled = ComponentSpec {
            flags: test_glyf::SCALED_COMPONENT_OFFSET,
            scale: Some(ComponentScale::Uniform(0.5)),
            ..ComponentSpec::offset(1, 10, 20)
        };
        assert_eq!(
            placed(scaled),
            [(5.0, 10.0), (55.0, 10.0), (55.0, 110.0), (5.0, 110.0)]
        );
        // when both are set the offset is not scaled
        let both = ComponentSpec {
            flags: test_glyf::SCALED_COMPONENT_OFFSET | test_glyf::UNSCALED_COMPONENT_OFFSET,
            ..scaled
        };
        let unscaled = ComponentSpec {
            flags: test_glyf::UNSCALED_COMPONENT_OFFSET,
            ..scaled
        };
        let expected = [(10.0, 20.0), (60.0, 20.0), (60.0, 120.0), (10.0, 120.0)];
        assert_eq!(placed(both), expected);
        assert_eq!(placed(unscaled), expected);
    }

    #[test]
    fn anchored_points() {
        // point 1 of a half size rectangle meets point 2 of a full size one
        let font = font_with(vec![
            (1, rectangle()),
            (
                2,
                composite(&[
                    ComponentSpec::offset(1, 0, 0),
                    ComponentSpec {
                        scale: Some(ComponentScale::Uniform(0.5)),
                        ..ComponentSpec::anchored(1, 2, 1)
                    },
                ]),
            ),
        ]);
        let outline = font.outline(GlyphId::new(2)).unwrap();
        assert_eq!(outline.contour_ends, [4, 8]);
        let points: Vec<_> = outline.points.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(
            &points[4..],
            [(50.0, 200.0), (100.0, 200.0), (100.0, 300.0), (50.0, 300.0)]
        );
        assert_eq!(points[2], points[5]);
    }

    #[test]
    fn anchor_out_of_range() {
        let expected = Err(ReadError::MalformedData("component anchor point out of range"));
        // no base points yet
        let font = font_with(vec![
            (1, rectangle()),
            (2, composite(&[ComponentSpec::anchored(1, 0, 0)])),
        ]);
        assert_eq!(font.outline(GlyphId::new(2)), expected);
        // the rectangle has no point 4
        let font = font_with(vec![
            (1, rectangle()),
            (
                2,
                composite(&[
                    ComponentSpec::offset(1, 0, 0),
                    ComponentSpec::anchored(1, 0, 4),
                ]),
            ),
        ]);
        assert_eq!(font.outline(GlyphId::new(2)), expected);
    }

    // glyph k references glyph k + 1 twice for k in 1..=levels; the last
    // glyph is a rectangle
    fn doubling_chain(levels: u16) -> Sfnt {
        let mut glyphs: Vec<_> = (1..=levels)
            .map(|gid| {
                let child = ComponentSpec::offset(gid + 1, 0, 0);
                (gid, composite(&[child, child]))
            })
            .collect();
        glyphs.push((levels + 1, rectangle()));
        font_with(glyphs)
    }

    #[test]
    fn exponential_composite_is_rejected() {
        let font = doubling_chain(20);
        let err = font.outline(GlyphId::new(1)).unwrap_err();
        assert_eq!(err, ReadError::CompositeTooLarge(GlyphId::new(1)));
        assert_eq!(err.kind(), crate::ErrorKind::Glyph);
        // the rest of the font is unaffected
        assert!(font.outline(GlyphId::new(sample_font::A_GID)).is_ok());
    }

    #[test]
    fn shared_components_within_budget() {
        // 2 + 4 + ... + 1024 components, 1024 rectangles
        let font = doubling_chain(10);
        let outline = font.outline(GlyphId::new(1)).unwrap();
        assert_eq!(outline.points.len(), 4096);
        assert_eq!(outline.contour_ends.len(), 1024);
    }

    #[test]
    fn point_budget() {
        let big = test_glyf::simple_glyph(&[vec![(0, 0, true); 10_000]]);
        let refs = |count| composite(&vec![ComponentSpec::offset(1, 0, 0); count]);
        let font = font_with(vec![(1, big), (2, refs(6)), (3, refs(7))]);
        assert_eq!(font.outline(GlyphId::new(2)).unwrap().points.len(), 60_000);
        assert_eq!(
            font.outline(GlyphId::new(3)),
            Err(ReadError::CompositeTooLarge(GlyphId::new(3)))
        );
    }
}
