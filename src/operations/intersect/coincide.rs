use std::f64::consts::TAU;

use crate::error::Result;
use crate::geometry::curve::{Arc, Curve};
use crate::math::angle::param_in_span;
use crate::math::tolerance::Tolerance;
use crate::math::Point2;

/// A shared piece of two curves on the same trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Overlap {
    /// A common sub-curve running along the first curve. `range_a` and
    /// `range_b` hold the parameters of its start and end on each curve.
    Segment {
        curve: Curve,
        range_a: (f64, f64),
        range_b: (f64, f64),
    },
    /// A single shared point, where the curves only meet end to end.
    Point {
        point: Point2,
        param_a: f64,
        param_b: f64,
    },
}

impl Overlap {
    /// The same overlap seen from the other curve.
    #[must_use]
    pub fn swapped(self) -> Self {
        match self {
            Self::Segment {
                curve,
                range_a,
                range_b,
            } => Self::Segment {
                curve,
                range_a: range_b,
                range_b: range_a,
            },
            Self::Point {
                point,
                param_a,
                param_b,
            } => Self::Point {
                point,
                param_a: param_b,
                param_b: param_a,
            },
        }
    }
}

/// How an interval `b` lies relative to an interval `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalRelation {
    Disjoint,
    /// Only an end of one meets an end of the other.
    Touching,
    /// `a` contains `b`.
    Contains,
    /// `b` contains `a`.
    ContainedBy,
    /// `b` covers the start of `a`.
    OverlapStart,
    /// `b` covers the end of `a`.
    OverlapEnd,
}

/// Classifies `b` against `a`; both are `(lo, hi)` with `lo <= hi`.
#[must_use]
pub fn classify_intervals(a: (f64, f64), b: (f64, f64), eps: f64) -> IntervalRelation {
    if b.1 < a.0 - eps || b.0 > a.1 + eps {
        return IntervalRelation::Disjoint;
    }
    if b.1 <= a.0 + eps || b.0 >= a.1 - eps {
        return IntervalRelation::Touching;
    }
    if b.0 >= a.0 - eps && b.1 <= a.1 + eps {
        IntervalRelation::Contains
    } else if a.0 >= b.0 - eps && a.1 <= b.1 + eps {
        IntervalRelation::ContainedBy
    } else if b.0 < a.0 {
        IntervalRelation::OverlapStart
    } else {
        IntervalRelation::OverlapEnd
    }
}

/// Overlaps of two curves already known to share a trajectory.
pub(super) fn overlaps(first: &Curve, second: &Curve, tol: &Tolerance) -> Result<Vec<Overlap>> {
    match (first, second) {
        (Curve::Point(p), Curve::Point(_)) => Ok(vec![Overlap::Point {
            point: *p,
            param_a: 0.0,
            param_b: 0.0,
        }]),
        (Curve::Arc(a), Curve::Arc(b)) => Ok(arc_overlaps(a, b, tol)),
        _ => polynomial_overlaps(first, second, tol),
    }
}

fn polynomial_overlaps(first: &Curve, second: &Curve, tol: &Tolerance) -> Result<Vec<Overlap>> {
    let eps = tol.time_epsilon;
    let map = |p: &Point2| -> Result<Option<f64>> { Ok(first.trajectory_params(p, tol)?.into_iter().next()) };
    let (Some(u0), Some(u1)) = (map(&second.start())?, map(&second.end())?) else {
        return Ok(Vec::new());
    };
    let b = (u0.min(u1), u0.max(u1));
    let param_b = |p: &Point2, fallback: f64| -> Result<f64> {
        Ok(second
            .params_of_point(p, tol)?
            .into_iter()
            .next()
            .unwrap_or(fallback))
    };
    match classify_intervals((0.0, 1.0), b, eps) {
        IntervalRelation::Disjoint => Ok(Vec::new()),
        IntervalRelation::Touching => {
            let t = if b.1 <= eps { 0.0 } else { 1.0 };
            let point = first.point_at(t);
            let fallback = if (u0 - t).abs() <= eps { 0.0 } else { 1.0 };
            Ok(vec![Overlap::Point {
                point,
                param_a: t,
                param_b: param_b(&point, fallback)?,
            }])
        }
        _ => {
            let (s, e) = (b.0.max(0.0), b.1.min(1.0));
            let curve = first.sub_curve(s, e);
            // Second-curve params interpolate its own domain along the mapped interval.
            let along = |t: f64| if u1 == u0 { 0.0 } else { (t - u0) / (u1 - u0) };
            let range_b = (
                param_b(&curve.start(), along(s).clamp(0.0, 1.0))?,
                param_b(&curve.end(), along(e).clamp(0.0, 1.0))?,
            );
            Ok(vec![Overlap::Segment {
                curve,
                range_a: (s, e),
                range_b,
            }])
        }
    }
}

/// Arcs on one ellipse differ in eccentric angle by a constant offset, so
/// the second span maps into the first's angle frame as an interval that
/// may wrap around the seam.
fn arc_overlaps(a: &Arc, b: &Arc, tol: &Tolerance) -> Vec<Overlap> {
    let eps = tol.angle_epsilon;
    let Some(theta) = a.angle_of(&b.start()) else {
        return Vec::new();
    };
    let offset = theta - b.start_angle();
    let (a_lo, a_hi) = a.param_range();
    let (b_lo, b_hi) = b.param_range();
    let (mut lo, mut hi) = (b_lo + offset, b_hi + offset);
    let k = ((a_lo - eps - lo) / TAU).ceil();
    lo += k * TAU;
    hi += k * TAU;

    let a_curve = Curve::Arc(*a);
    let forward = a.end_angle() >= a.start_angle();
    let to_b = |t: f64| param_in_span(t - offset, b.start_angle(), b.end_angle(), eps).unwrap_or(t - offset);
    let mut out = Vec::new();
    for shift in [0.0, -TAU] {
        let piece = (lo + shift, hi + shift);
        match classify_intervals((a_lo, a_hi), piece, eps) {
            IntervalRelation::Disjoint => {}
            IntervalRelation::Touching => {
                let t = if piece.1 <= a_lo + eps { a_lo } else { a_hi };
                out.push(Overlap::Point {
                    point: a.point_at(t),
                    param_a: t,
                    param_b: to_b(t - shift),
                });
            }
            _ => {
                let (s, e) = (piece.0.max(a_lo), piece.1.min(a_hi));
                let (s, e) = if forward { (s, e) } else { (e, s) };
                out.push(Overlap::Segment {
                    curve: a_curve.sub_curve(s, e),
                    range_a: (s, e),
                    range_b: (to_b(s - shift), to_b(e - shift)),
                });
            }
        }
    }
    drop_covered_points(out, tol)
}

/// Removes shared points that are already an end of a shared segment or a
/// repeat of an earlier point.
fn drop_covered_points(overlaps: Vec<Overlap>, tol: &Tolerance) -> Vec<Overlap> {
    let mut kept: Vec<Overlap> = Vec::new();
    let segments: Vec<(Point2, Point2)> = overlaps
        .iter()
        .filter_map(|o| match o {
            Overlap::Segment { curve, .. } => Some((curve.start(), curve.end())),
            Overlap::Point { .. } => None,
        })
        .collect();
    for o in overlaps {
        if let Overlap::Point { point, .. } = o {
            let on_segment = segments
                .iter()
                .any(|(s, e)| tol.points_equal(s, &point) || tol.points_equal(e, &point));
            let repeated = kept
                .iter()
                .any(|k| matches!(k, Overlap::Point { point: q, .. } if tol.points_equal(q, &point)));
            if on_segment || repeated {
                continue;
            }
        }
        kept.push(o);
    }
    kept
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::curve::QuadraticBezier;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn interval_cases() {
        let a = (0.0, 1.0);
        let eps = 1e-9;
        assert_eq!(classify_intervals(a, (2.0, 3.0), eps), IntervalRelation::Disjoint);
        assert_eq!(classify_intervals(a, (1.0, 3.0), eps), IntervalRelation::Touching);
        assert_eq!(classify_intervals(a, (0.2, 0.8), eps), IntervalRelation::Contains);
        assert_eq!(classify_intervals(a, (0.0, 1.0), eps), IntervalRelation::Contains);
        assert_eq!(classify_intervals(a, (-1.0, 2.0), eps), IntervalRelation::ContainedBy);
        assert_eq!(classify_intervals(a, (-1.0, 0.5), eps), IntervalRelation::OverlapStart);
        assert_eq!(classify_intervals(a, (0.5, 1.5), eps), IntervalRelation::OverlapEnd);
    }

    #[test]
    fn collinear_segments_partial_overlap() {
        let tol = Tolerance::default();
        let a = Curve::segment(p(0.0, 0.0), p(2.0, 0.0));
        let b = Curve::segment(p(3.0, 0.0), p(1.0, 0.0));
        let out = overlaps(&a, &b, &tol).unwrap();
        assert_eq!(out.len(), 1);
        let Overlap::Segment { curve, range_a, range_b } = out[0] else {
            panic!("expected a segment overlap");
        };
        assert_abs_diff_eq!(range_a.0, 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(range_a.1, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(range_b.0, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(range_b.1, 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!((curve.start() - p(1.0, 0.0)).norm(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!((curve.end() - p(2.0, 0.0)).norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn segments_meeting_end_to_end() {
        let tol = Tolerance::default();
        let a = Curve::segment(p(0.0, 0.0), p(1.0, 1.0));
        let b = Curve::segment(p(1.0, 1.0), p(2.0, 2.0));
        let out = overlaps(&a, &b, &tol).unwrap();
        assert_eq!(
            out,
            vec![Overlap::Point {
                point: p(1.0, 1.0),
                param_a: 1.0,
                param_b: 0.0
            }]
        );
    }

    #[test]
    fn sub_curve_of_parabola() {
        let tol = Tolerance::default();
        let q = QuadraticBezier::new(p(0.0, 0.0), p(1.0, 2.0), p(2.0, 0.0));
        let a = Curve::Quadratic(q);
        let b = Curve::Quadratic(q.sub_curve(0.25, 0.75));
        let out = overlaps(&a, &b, &tol).unwrap();
        let Overlap::Segment { range_a, range_b, .. } = out[0] else {
            panic!("expected a segment overlap");
        };
        assert_abs_diff_eq!(range_a.0, 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(range_a.1, 0.75, epsilon = 1e-6);
        assert_abs_diff_eq!(range_b.0, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(range_b.1, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn arcs_across_the_seam_overlap_twice() {
        let tol = Tolerance::default();
        // Three quarters of the circle against a half circle straddling both of
        // its ends.
        let a = Arc::circular(p(0.0, 0.0), 1.0, 0.0, 1.5 * PI).unwrap();
        let b = Arc::circular(p(0.0, 0.0), 1.0, PI, 2.0 * PI + FRAC_PI_2).unwrap();
        let out = arc_overlaps(&a, &b, &tol);
        let mut ranges: Vec<(f64, f64)> = out
            .iter()
            .map(|o| match o {
                Overlap::Segment { range_a, .. } => *range_a,
                Overlap::Point { param_a, .. } => (*param_a, *param_a),
            })
            .collect();
        ranges.sort_by(|x, y| x.0.total_cmp(&y.0));
        assert_eq!(ranges.len(), 2);
        assert_abs_diff_eq!(ranges[0].0, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ranges[0].1, FRAC_PI_2, epsilon = 1e-9);
        assert_abs_diff_eq!(ranges[1].0, PI, epsilon = 1e-9);
        assert_abs_diff_eq!(ranges[1].1, 1.5 * PI, epsilon = 1e-9);
    }

    #[test]
    fn identical_full_circles_overlap_once() {
        let tol = Tolerance::default();
        let a = Arc::full(p(1.0, 1.0), 2.0, 2.0, 0.0).unwrap();
        let out = arc_overlaps(&a, &a, &tol);
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], Overlap::Segment { .. }));
    }
}
