// SPDX-License-Identifier: MIT
//
// Viewport projection: cutting world-space polygons down to the terminal.
//
// The visible region is the rectangle `[0, width] × [0, height]` in cell
// units. A polygon boundary is walked edge by edge and each edge is
// classified against the four boundary half-planes with the parametric
// (Liang–Barsky) entry/exit values per axis. From those the walker emits:
//
//   - the literal boundary intersection where an edge enters or leaves,
//   - the edge's end vertex when it ends inside,
//   - a rectangle corner where the boundary wraps around the rectangle
//     while outside it, either by turning through a corner region or by
//     crossing the region diagonally past a corner.
//
// Corner vertices keep the clipped polygon closed around the visible part
// of the shape, so a polygon enclosing the whole screen comes out as the
// screen rectangle. The output can contain zero-width runs along the
// border. Those never contain a cell centre and are left in place.
//
// The output keeps the input's orientation. Projection runs the walker
// twice with the same classification: once to count, once to fill an
// exactly-sized vector.

use ar_geom::maths::{Coord, Real};
use ar_geom::{Bounded, Transform};
use ar_term::terminal::Size;

// ─── CellRect ────────────────────────────────────────────────────────────────

/// An inclusive rectangle of terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRect {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

impl CellRect {
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.right as u32 - self.left as u32 + 1
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.bottom as u32 - self.top as u32 + 1
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        self.left <= x && x <= self.right && self.top <= y && y <= self.bottom
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (u16, u16)> {
        let (left, right) = (self.left, self.right);
        (self.top..=self.bottom).flat_map(move |y| (left..=right).map(move |x| (x, y)))
    }
}

/// The cells a shape may cover once `transform` places it in world space,
/// clamped to a terminal of `size`.
///
/// The four corners of the shape's local bounds are transformed, the
/// minimum is floored and the maximum ceiled. `None` when the bounds have
/// no area or nothing of the box lands on screen.
#[must_use]
pub fn bounding_rect<B: Bounded + ?Sized>(
    shape: &B,
    transform: &Transform,
    size: Size,
) -> Option<CellRect> {
    let bounds = shape.local_bounds();
    if bounds.is_empty() {
        return None;
    }
    let corners = bounds
        .corners()
        .map(|c| transform.apply_transform(c));
    vertex_bounds(&corners, size)
}

/// The cells spanned by `vertices`, clamped to a terminal of `size`.
#[must_use]
pub fn vertex_bounds(vertices: &[Coord], size: Size) -> Option<CellRect> {
    let (&first, rest) = vertices.split_first()?;
    let (min, max) = rest
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    let (left, right) = cell_span(min.x, max.x, size.cols)?;
    let (top, bottom) = cell_span(min.y, max.y, size.rows)?;
    Some(CellRect {
        left,
        top,
        right,
        bottom,
    })
}

/// `[floor(min), ceil(max)]` clamped to `0..len`.
fn cell_span(min: Real, max: Real, len: u16) -> Option<(u16, u16)> {
    if len == 0 || min.is_nan() || max.is_nan() || min > max {
        return None;
    }
    if max < 0.0 || min >= Real::from(len) {
        return None;
    }

    let last = Real::from(len - 1);
    let lo = min.floor().clamp(0.0, last);
    let hi = max.ceil().clamp(0.0, last);

    // Both are whole numbers in 0..len.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let span = (lo as u16, hi as u16);
    Some(span)
}

// ─── Viewport ────────────────────────────────────────────────────────────────

/// The visible rectangle `[0, width] × [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: Real,
    pub height: Real,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: Real, height: Real) -> Self {
        Self { width, height }
    }

    /// The viewport covering every cell of a terminal of `size`.
    #[must_use]
    pub fn from_size(size: Size) -> Self {
        Self::new(Real::from(size.cols), Real::from(size.rows))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether `p` lies in the rectangle, border included.
    #[must_use]
    pub fn contains(&self, p: Coord) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// Clip the closed polygon `polygon` (world space, no repeated
    /// terminator) to the viewport.
    ///
    /// A polygon entirely inside comes back unchanged. One entirely on the
    /// far side of any border comes back empty.
    #[must_use]
    pub fn project(&self, polygon: &[Coord]) -> Vec<Coord> {
        if polygon.is_empty() || self.is_empty() {
            return Vec::new();
        }
        if polygon.iter().all(|&p| self.contains(p)) {
            return polygon.to_vec();
        }
        if self.beyond_one_border(polygon) {
            return Vec::new();
        }

        let mut count = 0;
        self.walk(polygon, |_| count += 1);

        let mut out = Vec::with_capacity(count);
        self.walk(polygon, |p| out.push(p));
        debug_assert_eq!(out.len(), count, "projection passes disagree");

        log::trace!("projected {} vertices into {}", polygon.len(), out.len());
        out
    }

    fn beyond_one_border(&self, polygon: &[Coord]) -> bool {
        polygon.iter().all(|p| p.x < 0.0)
            || polygon.iter().all(|p| p.x > self.width)
            || polygon.iter().all(|p| p.y < 0.0)
            || polygon.iter().all(|p| p.y > self.height)
    }

    fn walk(&self, polygon: &[Coord], mut emit: impl FnMut(Coord)) {
        let n = polygon.len();
        for i in 0..n {
            self.clip_edge(polygon[i], polygon[(i + 1) % n], &mut emit);
        }
    }

    /// Emit whatever edge `a → b` contributes, `a` itself excluded (it was
    /// emitted as the previous edge's end).
    fn clip_edge(&self, a: Coord, b: Coord, emit: &mut impl FnMut(Coord)) {
        let (w, h) = (self.width, self.height);
        let d = b - a;

        // The border the edge enters through and the one it leaves through,
        // per axis.
        let (x_in, x_out) = if d.x > 0.0 || (d.x == 0.0 && a.x > w) {
            (0.0, w)
        } else {
            (w, 0.0)
        };
        let (y_in, y_out) = if d.y > 0.0 || (d.y == 0.0 && a.y > h) {
            (0.0, h)
        } else {
            (h, 0.0)
        };

        let t_out_x = exit_param(a.x, d.x, x_out, w);
        let t_out_y = exit_param(a.y, d.y, y_out, h);
        let (t_out1, t_out2) = if t_out_x < t_out_y {
            (t_out_x, t_out_y)
        } else {
            (t_out_y, t_out_x)
        };

        if t_out2 <= 0.0 {
            return;
        }

        let t_in_x = entry_param(a.x, d.x, x_in);
        let t_in_y = entry_param(a.y, d.y, y_in);
        let t_in2 = t_in_x.max(t_in_y);

        if t_out1 < t_in2 {
            // Never visible. Passing diagonally by a corner still drags the
            // boundary around it.
            if 0.0 < t_out1 && t_out1 <= 1.0 {
                if t_in_x < t_in_y {
                    emit(Coord::new(x_out, y_in));
                } else {
                    emit(Coord::new(x_in, y_out));
                }
            }
        } else if 0.0 < t_out1 && t_in2 <= 1.0 {
            if 0.0 < t_in2 {
                if t_in_x > t_in_y {
                    emit(Coord::new(x_in, d.y.mul_add(t_in_x, a.y)));
                } else {
                    emit(Coord::new(d.x.mul_add(t_in_y, a.x), y_in));
                }
            }
            if t_out1 < 1.0 {
                if t_out_x < t_out_y {
                    emit(Coord::new(x_out, d.y.mul_add(t_out_x, a.y)));
                } else {
                    emit(Coord::new(d.x.mul_add(t_out_y, a.x), y_out));
                }
            } else {
                emit(b);
            }
        }

        // Turning through a corner region.
        if t_out2 <= 1.0 {
            emit(Coord::new(x_out, y_out));
        }
    }
}

/// Parameter at which the edge crosses the exit border on one axis. An
/// edge with no extent on this axis never exits (`+∞`) if it runs within
/// `0..=len`, and is never inside (`-∞`) otherwise.
fn exit_param(start: Real, delta: Real, border: Real, len: Real) -> Real {
    if delta != 0.0 {
        (border - start) / delta
    } else if (0.0..=len).contains(&start) {
        Real::INFINITY
    } else {
        Real::NEG_INFINITY
    }
}

fn entry_param(start: Real, delta: Real, border: Real) -> Real {
    if delta == 0.0 {
        Real::NEG_INFINITY
    } else {
        (border - start) / delta
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use ar_geom::Quad;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn pts(raw: &[(Real, Real)]) -> Vec<Coord> {
        raw.iter().map(|&(x, y)| Coord::new(x, y)).collect()
    }

    fn square(x: Real, y: Real, side: Real) -> Vec<Coord> {
        pts(&[(x, y), (x + side, y), (x + side, y + side), (x, y + side)])
    }

    // ── Projection ──────────────────────────────────────────────────────

    #[test]
    fn inside_square_is_unchanged() {
        let vp = Viewport::new(10.0, 10.0);
        let sq = square(2.0, 2.0, 4.0);
        assert_eq!(vp.project(&sq), sq);
    }

    #[test]
    fn square_touching_the_border_is_unchanged() {
        let vp = Viewport::new(10.0, 10.0);
        let sq = square(0.0, 0.0, 10.0);
        assert_eq!(vp.project(&sq), sq);
    }

    #[test]
    fn outside_square_is_empty() {
        let vp = Viewport::new(10.0, 10.0);
        assert!(vp.project(&square(20.0, 2.0, 4.0)).is_empty());
        assert!(vp.project(&square(-8.0, -8.0, 4.0)).is_empty());
        assert!(vp.project(&square(3.0, 11.0, 2.0)).is_empty());
    }

    #[test]
    fn overlapping_square_is_cut_at_the_border() {
        let vp = Viewport::new(10.0, 10.0);
        let clipped = vp.project(&square(5.0, 5.0, 10.0));
        assert_eq!(
            clipped,
            pts(&[(10.0, 5.0), (10.0, 10.0), (5.0, 10.0), (5.0, 5.0)])
        );
    }

    #[test]
    fn enclosing_square_becomes_the_viewport() {
        let vp = Viewport::new(10.0, 10.0);
        let clipped = vp.project(&square(-5.0, -5.0, 20.0));
        assert_eq!(
            clipped,
            pts(&[(10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)])
        );
    }

    #[test]
    fn corner_overlap_gains_the_corner_vertex() {
        let vp = Viewport::new(8.0, 6.0);
        let clipped = vp.project(&square(-3.0, -3.0, 6.0));
        assert_eq!(
            clipped,
            pts(&[(3.0, 0.0), (3.0, 3.0), (0.0, 3.0), (0.0, 0.0)])
        );
    }

    #[test]
    fn diagonal_past_a_corner_emits_it() {
        // Edge from the left region to the region below, clear of the
        // rectangle, passes the bottom-left corner.
        let vp = Viewport::new(10.0, 10.0);
        let mut out = Vec::new();
        vp.clip_edge(
            Coord::new(-10.0, 5.0),
            Coord::new(5.0, 20.0),
            &mut |p| out.push(p),
        );
        assert_eq!(out, vec![Coord::new(0.0, 10.0)]);
    }

    #[test]
    fn empty_inputs() {
        assert!(Viewport::new(10.0, 10.0).project(&[]).is_empty());
        assert!(Viewport::new(0.0, 10.0).project(&square(1.0, 1.0, 2.0)).is_empty());
    }

    // ── Bounds ──────────────────────────────────────────────────────────

    #[test]
    fn bounding_rect_of_identity_quad() {
        let quad = Quad::new(Coord::new(1.0, 1.0), Coord::new(2.0, 3.0));
        let rect = bounding_rect(&quad, &Transform::new(), Size::new(10, 10)).unwrap();
        assert_eq!(
            rect,
            CellRect {
                left: 1,
                top: 1,
                right: 3,
                bottom: 4
            }
        );
        assert_eq!(rect.width(), 3);
        assert_eq!(rect.height(), 4);
    }

    #[test]
    fn bounding_rect_floors_and_ceils() {
        let quad = Quad::new(Coord::new(1.5, 0.2), Coord::new(1.0, 1.0));
        let rect = bounding_rect(&quad, &Transform::new(), Size::new(10, 10)).unwrap();
        assert_eq!(
            rect,
            CellRect {
                left: 1,
                top: 0,
                right: 3,
                bottom: 2
            }
        );
    }

    #[test]
    fn bounding_rect_clamps_on_all_sides() {
        let quad = Quad::new(Coord::new(-2.0, -2.0), Coord::new(4.0, 4.0));
        let transform = Transform::new()
            .with_scale(Coord::new(10.0, 10.0))
            .with_rotation(0.3);
        let rect = bounding_rect(&quad, &transform, Size::new(12, 7)).unwrap();
        assert_eq!(
            rect,
            CellRect {
                left: 0,
                top: 0,
                right: 11,
                bottom: 6
            }
        );
    }

    #[test]
    fn bounding_rect_of_degenerate_quad_is_none() {
        let size = Size::new(10, 10);
        let point = Quad::new(Coord::new(1.5, 1.5), Coord::ZERO);
        assert!(bounding_rect(&point, &Transform::new(), size).is_none());
        let line = Quad::new(Coord::new(3.5, 0.0), Coord::new(0.0, 10.0));
        assert!(bounding_rect(&line, &Transform::new(), size).is_none());
    }

    #[test]
    fn bounding_rect_off_screen_is_none() {
        let quad = Quad::new(Coord::new(12.0, 0.0), Coord::new(3.0, 3.0));
        assert!(bounding_rect(&quad, &Transform::new(), Size::new(10, 10)).is_none());
        let quad = Quad::new(Coord::new(-5.0, 2.0), Coord::new(3.0, 3.0));
        assert!(bounding_rect(&quad, &Transform::new(), Size::new(10, 10)).is_none());
    }

    #[test]
    fn vertex_bounds_needs_vertices_and_area() {
        assert!(vertex_bounds(&[], Size::new(5, 5)).is_none());
        assert!(vertex_bounds(&square(1.0, 1.0, 1.0), Size::new(0, 5)).is_none());
    }

    #[test]
    fn cell_rect_cells_are_row_major() {
        let rect = CellRect {
            left: 2,
            top: 5,
            right: 3,
            bottom: 6,
        };
        let cells: Vec<_> = rect.cells().collect();
        assert_eq!(cells, vec![(2, 5), (3, 5), (2, 6), (3, 6)]);
        assert!(rect.contains(3, 6));
        assert!(!rect.contains(4, 6));
    }

    // ── Properties ──────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn projection_stays_in_bounds(
            w in 1u16..40,
            h in 1u16..40,
            raw in prop::collection::vec((-60.0f64..60.0, -60.0f64..60.0), 1..8),
        ) {
            let vp = Viewport::from_size(Size::new(w, h));
            let polygon = pts(&raw);
            let e = 1e-9;
            for p in vp.project(&polygon) {
                prop_assert!(p.x >= -e && p.x <= vp.width + e, "x out of bounds: {p:?}");
                prop_assert!(p.y >= -e && p.y <= vp.height + e, "y out of bounds: {p:?}");
            }
        }
    }
}
