use std::cmp::Ordering;

use crate::error::{GeometryError, Result};
use crate::geometry::curve::Curve;
use crate::math::tolerance::Tolerance;
use crate::math::{compare_points, Point2};

use super::fill::{Fill, Windings};

slotmap::new_key_type! {
    /// Unique identifier for a monotone segment in the sweep arena.
    pub struct MonoId;
}

/// Identifier shared by all segments known to lie on one underlying curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrajectoryId(pub(crate) u32);

/// Position of an input curve within its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurveRef {
    /// Index of the contour within the operand.
    pub contour: usize,
    /// Index of the curve within the contour.
    pub curve: usize,
}

/// Lifecycle of a monotone segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonoState {
    /// Takes part in the sweep.
    Live,
    /// Replaced by its children.
    Split,
    /// Merged into a coincident segment.
    Absorbed,
}

/// A split position on a monotone segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cut {
    /// Parameter on the segment's curve.
    pub param: f64,
    /// Point the children share, after snapping.
    pub point: Point2,
}

/// An x-monotone piece of an input curve with its winding bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonoSegment {
    /// The geometry, running from `enter` to `leave`.
    pub curve: Curve,
    pub is_primary: bool,
    /// Winding contribution to the segment's own operand.
    pub this_winding: i32,
    /// Winding contribution to the other operand, gained by merging.
    pub that_winding: i32,
    pub origin: CurveRef,
    pub parent: Option<MonoId>,
    pub trajectory: TrajectoryId,
    pub is_vertical: bool,
    /// `true` if the input curve runs from `leave` to `enter`.
    pub transposed: bool,
    pub enter: Point2,
    pub leave: Point2,
    pub fill: Option<Fill>,
    pub state: MonoState,
}

impl MonoSegment {
    /// Orients a monotone, already reduced piece.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooTiny`] if the ends of the piece coincide.
    pub fn from_piece(
        piece: Curve,
        is_primary: bool,
        origin: CurveRef,
        trajectory: TrajectoryId,
        tol: &Tolerance,
    ) -> Result<Self> {
        let (start, end) = (piece.start(), piece.end());
        let order = compare_points(&start, &end, tol.epsilon);
        if order == Ordering::Equal {
            return Err(GeometryError::TooTiny {
                x0: start.x,
                y0: start.y,
                x1: end.x,
                y1: end.y,
            }
            .into());
        }
        let transposed = order == Ordering::Greater;
        let curve = if transposed { piece.reversed() } else { piece };
        let (enter, leave) = (curve.start(), curve.end());
        Ok(Self {
            curve,
            is_primary,
            this_winding: if transposed { 1 } else { -1 },
            that_winding: 0,
            origin,
            parent: None,
            trajectory,
            is_vertical: (leave.x - enter.x).abs() <= tol.epsilon,
            transposed,
            enter,
            leave,
            fill: None,
            state: MonoState::Live,
        })
    }

    /// Winding contributions split by operand.
    #[must_use]
    pub fn windings(&self) -> Windings {
        if self.is_primary {
            Windings::new(self.this_winding, self.that_winding)
        } else {
            Windings::new(self.that_winding, self.this_winding)
        }
    }

    fn set_windings(&mut self, w: Windings) {
        if self.is_primary {
            self.this_winding = w.primary;
            self.that_winding = w.secondary;
        } else {
            self.this_winding = w.secondary;
            self.that_winding = w.primary;
        }
    }

    /// Adds the windings of a coincident segment to this one.
    pub fn absorb(&mut self, other: &Self) {
        self.set_windings(self.windings() + other.windings());
    }

    /// Parameter of the point with abscissa `x`. Vertical segments answer
    /// with their enter parameter.
    #[must_use]
    pub fn param_at_x(&self, x: f64, tol: &Tolerance) -> f64 {
        let (t0, _) = self.curve.domain();
        if self.is_vertical {
            return t0;
        }
        self.curve.param_at_monotone(x, |p| p.x, tol)
    }

    /// Height of the segment at abscissa `x`, clamped to its ends. Vertical
    /// segments report the height of their enter point.
    #[must_use]
    pub fn y_at(&self, x: f64, tol: &Tolerance) -> f64 {
        if self.is_vertical || x <= self.enter.x {
            return self.enter.y;
        }
        if x >= self.leave.x {
            return self.leave.y;
        }
        if let Curve::LineSegment(_) = self.curve {
            let s = (x - self.enter.x) / (self.leave.x - self.enter.x);
            return self.enter.y + s * (self.leave.y - self.enter.y);
        }
        self.curve.point_at(self.param_at_x(x, tol)).y
    }

    /// Splits at interior cuts.
    ///
    /// Cuts outside the open domain or within the point tolerance of an end
    /// or of a previous cut are ignored. Returns the children ordered from
    /// enter to leave, sharing the cut points exactly, or an empty list when
    /// no cut applies. Children inherit everything except `parent`, `fill`
    /// and `state`.
    #[must_use]
    pub fn split(&self, cuts: &[Cut], tol: &Tolerance) -> Vec<Self> {
        let (t0, t1) = self.curve.domain();
        let (lo, hi) = self.curve.param_range();
        let near = self.curve.point_tolerance(tol);
        let mut cuts: Vec<Cut> = cuts
            .iter()
            .copied()
            .filter(|c| c.param > lo && c.param < hi)
            .filter(|c| (c.point - self.enter).norm() > near && (c.point - self.leave).norm() > near)
            .collect();
        if t1 >= t0 {
            cuts.sort_by(|a, b| a.param.total_cmp(&b.param));
        } else {
            cuts.sort_by(|a, b| b.param.total_cmp(&a.param));
        }
        cuts.dedup_by(|next, prev| (next.point - prev.point).norm() <= near);
        if cuts.is_empty() {
            return Vec::new();
        }

        let last = Cut {
            param: t1,
            point: self.leave,
        };
        let mut from = Cut {
            param: t0,
            point: self.enter,
        };
        let mut children = Vec::with_capacity(cuts.len() + 1);
        for cut in cuts.into_iter().chain(std::iter::once(last)) {
            children.push(Self {
                curve: self.curve.sub_curve(from.param, cut.param),
                enter: from.point,
                leave: cut.point,
                parent: None,
                fill: None,
                state: MonoState::Live,
                ..*self
            });
            from = cut;
        }
        children
    }
}

/// Cuts a curve into monotone segments.
///
/// The curve is split where it turns back in x (along its line when it is
/// collinear) and at the node of a looping cubic, and every piece is
/// reduced. Pieces collapsing to a point are dropped.
///
/// # Errors
///
/// Returns [`GeometryError::TooTiny`] for a piece whose ends coincide
/// without collapsing.
pub fn decompose(
    curve: &Curve,
    is_primary: bool,
    origin: CurveRef,
    trajectory: TrajectoryId,
    tol: &Tolerance,
) -> Result<Vec<MonoSegment>> {
    let mut cuts = curve.direction_extrema(tol);
    if let Curve::Cubic(c) = curve {
        if let Some((s, t)) = c.self_intersection(tol.time_epsilon) {
            cuts.extend([s, t]);
        }
    }
    let mut out = Vec::new();
    for piece in curve.split_at(&cuts) {
        let piece = piece.reduce(tol).curve;
        if let Curve::Point(p) = piece {
            tracing::trace!(x = p.x, y = p.y, "dropping collapsed piece");
            continue;
        }
        out.push(MonoSegment::from_piece(piece, is_primary, origin, trajectory, tol)?);
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::curve::{Arc, CubicBezier, QuadraticBezier};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn origin() -> CurveRef {
        CurveRef { contour: 0, curve: 0 }
    }

    fn pieces(curve: &Curve) -> Vec<MonoSegment> {
        decompose(curve, true, origin(), TrajectoryId(0), &Tolerance::default()).unwrap()
    }

    #[test]
    fn segments_are_oriented_left_to_right() {
        let forward = pieces(&Curve::segment(p(0.0, 0.0), p(4.0, 0.0)));
        assert_eq!(forward.len(), 1);
        assert!(!forward[0].transposed);
        assert_eq!(forward[0].this_winding, -1);

        let backward = pieces(&Curve::segment(p(4.0, 4.0), p(0.0, 4.0)));
        assert!(backward[0].transposed);
        assert_eq!(backward[0].this_winding, 1);
        assert_eq!(backward[0].enter, p(0.0, 4.0));
        assert_eq!(backward[0].curve.start(), p(0.0, 4.0));
    }

    #[test]
    fn vertical_segments_run_bottom_to_top() {
        let up = pieces(&Curve::segment(p(4.0, 0.0), p(4.0, 4.0)));
        assert!(up[0].is_vertical);
        assert_eq!(up[0].this_winding, -1);
        let down = pieces(&Curve::segment(p(0.0, 4.0), p(0.0, 0.0)));
        assert!(down[0].is_vertical);
        assert!(down[0].transposed);
        assert_eq!(down[0].enter, p(0.0, 0.0));
        assert_eq!(down[0].this_winding, 1);
    }

    #[test]
    fn circle_splits_into_halves() {
        let circle = Curve::Arc(Arc::full(p(0.0, 0.0), 1.0, 1.0, 0.0).unwrap());
        let halves = pieces(&circle);
        assert_eq!(halves.len(), 2);
        for half in &halves {
            assert_abs_diff_eq!(half.enter.x, -1.0, epsilon = 1e-9);
            assert_abs_diff_eq!(half.leave.x, 1.0, epsilon = 1e-9);
        }
        // The upper half runs right to left on the circle.
        let upper = halves.iter().find(|m| m.curve.point_at(0.5 * (m.curve.domain().0 + m.curve.domain().1)).y > 0.0);
        assert!(upper.unwrap().transposed);
    }

    #[test]
    fn folded_collinear_curve_becomes_segments() {
        let folded = Curve::Quadratic(QuadraticBezier::new(p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0)));
        let segs = pieces(&folded);
        assert_eq!(segs.len(), 2);
        assert!(segs.iter().all(|m| m.curve.kind() == crate::geometry::curve::CurveKind::LineSegment));
        assert_eq!(segs[0].this_winding + segs[1].this_winding, 0);
    }

    #[test]
    fn looping_cubic_is_cut_at_its_node() {
        let looped = CubicBezier::new(p(0.0, 0.0), p(3.0, 3.0), p(-1.0, 3.0), p(2.0, 0.0));
        let (s, _) = looped.self_intersection(1e-6).unwrap();
        let node = looped.point_at(s);
        let segs = pieces(&Curve::Cubic(looped));
        let ends_at_node = segs
            .iter()
            .filter(|m| (m.enter - node).norm() < 1e-9 || (m.leave - node).norm() < 1e-9)
            .count();
        assert_eq!(ends_at_node, 4);
    }

    #[test]
    fn split_preserves_ends_and_windings() {
        let tol = Tolerance::default();
        let mono = pieces(&Curve::segment(p(0.0, 0.0), p(4.0, 2.0)))[0];
        let children = mono.split(
            &[
                Cut { param: 0.75, point: p(3.0, 1.5) },
                Cut { param: 0.25, point: p(1.0, 0.5) },
                Cut { param: 1.0, point: p(4.0, 2.0) },
            ],
            &tol,
        );
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].enter, mono.enter);
        assert_eq!(children[2].leave, mono.leave);
        for pair in children.windows(2) {
            assert_eq!(pair[0].leave, pair[1].enter);
        }
        assert!(children.iter().all(|c| c.this_winding == mono.this_winding));
        assert!(children.iter().all(|c| c.trajectory == mono.trajectory));
    }

    #[test]
    fn split_of_reversed_arc_follows_traversal() {
        let tol = Tolerance::default();
        let upper = Curve::Arc(Arc::circular(p(0.0, 0.0), 1.0, 0.0, std::f64::consts::PI).unwrap());
        let mono = pieces(&upper)[0];
        assert!(mono.transposed);
        let top = p(0.0, 1.0);
        let children = mono.split(&[Cut { param: std::f64::consts::FRAC_PI_2, point: top }], &tol);
        assert_eq!(children.len(), 2);
        assert_abs_diff_eq!(children[0].enter.x, -1.0, epsilon = 1e-9);
        assert_eq!(children[0].leave, top);
        assert_abs_diff_eq!(children[1].leave.x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn absorb_swaps_operands() {
        let mut a = pieces(&Curve::segment(p(0.0, 0.0), p(1.0, 0.0)))[0];
        let mut b = decompose(
            &Curve::segment(p(0.0, 0.0), p(1.0, 0.0)),
            false,
            origin(),
            TrajectoryId(1),
            &Tolerance::default(),
        )
        .unwrap()[0];
        b.this_winding = 1;
        a.absorb(&b);
        assert_eq!(a.windings(), Windings::new(-1, 1));
        assert_eq!(a.that_winding, 1);
    }

    #[test]
    fn height_along_a_parabola() {
        let tol = Tolerance::default();
        let mono = pieces(&Curve::Quadratic(QuadraticBezier::new(p(0.0, 0.0), p(1.0, 2.0), p(2.0, 0.0))))[0];
        assert_abs_diff_eq!(mono.y_at(1.0, &tol), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(mono.y_at(0.5, &tol), 0.75, epsilon = 1e-9);
        assert_abs_diff_eq!(mono.y_at(-1.0, &tol), 0.0, epsilon = 1e-12);
    }
}
