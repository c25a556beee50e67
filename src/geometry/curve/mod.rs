mod arc;
mod cubic;
mod line;
mod line_segment;
mod quadratic;

pub use arc::Arc;
pub use cubic::CubicBezier;
pub use line::{Line, Ray};
pub use line_segment::LineSegment;
pub use quadratic::QuadraticBezier;

use nalgebra::Rotation2;

use crate::error::{GeometryError, Result};
use crate::math::bezout::implicitize;
use crate::math::bivariate::Bivariate;
use crate::math::polynomial::Polynomial;
use crate::math::tolerance::Tolerance;
use crate::math::{Point2, Vector2};

use super::bbox::BoundingBox;

/// Bisection steps used to invert a monotone coordinate.
const BISECTION_STEPS: usize = 64;

/// The variant of a [`Curve`], ordered from simplest to most complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CurveKind {
    Point,
    LineSegment,
    Quadratic,
    Cubic,
    Arc,
}

/// A bounded 2D curve primitive.
///
/// Segments and Béziers are parametrized over `[0, 1]`; arcs over their
/// eccentric-angle span. A `Point` is the collapsed form of any primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Point(Point2),
    LineSegment(LineSegment),
    Quadratic(QuadraticBezier),
    Cubic(CubicBezier),
    Arc(Arc),
}

/// The simplest form of a curve with the same image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reduction {
    /// The reduced curve.
    pub curve: Curve,
    /// `true` if parameters of the reduced curve differ from the original's.
    pub reparametrized: bool,
}

impl From<LineSegment> for Curve {
    fn from(c: LineSegment) -> Self {
        Self::LineSegment(c)
    }
}

impl From<QuadraticBezier> for Curve {
    fn from(c: QuadraticBezier) -> Self {
        Self::Quadratic(c)
    }
}

impl From<CubicBezier> for Curve {
    fn from(c: CubicBezier) -> Self {
        Self::Cubic(c)
    }
}

impl From<Arc> for Curve {
    fn from(c: Arc) -> Self {
        Self::Arc(c)
    }
}

impl Curve {
    /// Shorthand for a straight segment.
    #[must_use]
    pub fn segment(start: Point2, end: Point2) -> Self {
        Self::LineSegment(LineSegment::new(start, end))
    }

    #[must_use]
    pub fn kind(&self) -> CurveKind {
        match self {
            Self::Point(_) => CurveKind::Point,
            Self::LineSegment(_) => CurveKind::LineSegment,
            Self::Quadratic(_) => CurveKind::Quadratic,
            Self::Cubic(_) => CurveKind::Cubic,
            Self::Arc(_) => CurveKind::Arc,
        }
    }

    #[must_use]
    pub fn start(&self) -> Point2 {
        match self {
            Self::Point(p) => *p,
            Self::LineSegment(c) => *c.start(),
            Self::Quadratic(c) => *c.start(),
            Self::Cubic(c) => *c.start(),
            Self::Arc(c) => c.start(),
        }
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        match self {
            Self::Point(p) => *p,
            Self::LineSegment(c) => *c.end(),
            Self::Quadratic(c) => *c.end(),
            Self::Cubic(c) => *c.end(),
            Self::Arc(c) => c.end(),
        }
    }

    /// Parameter values of the start and end points.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Arc(c) => (c.start_angle(), c.end_angle()),
            _ => (0.0, 1.0),
        }
    }

    /// Domain as `(min, max)`.
    #[must_use]
    pub fn param_range(&self) -> (f64, f64) {
        let (a, b) = self.domain();
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        match self {
            Self::Point(p) => *p,
            Self::LineSegment(c) => c.point_at(t),
            Self::Quadratic(c) => c.point_at(t),
            Self::Cubic(c) => c.point_at(t),
            Self::Arc(c) => c.point_at(t),
        }
    }

    /// First, second and third derivatives with respect to the parameter.
    #[must_use]
    pub fn derivatives(&self, t: f64) -> [Vector2; 3] {
        match self {
            Self::Point(_) => [Vector2::zeros(); 3],
            Self::LineSegment(c) => [c.vector(), Vector2::zeros(), Vector2::zeros()],
            Self::Quadratic(c) => c.derivatives(t),
            Self::Cubic(c) => c.derivatives(t),
            Self::Arc(c) => c.derivatives(t),
        }
    }

    /// Power-basis coefficients of `x(t)` and `y(t)` for polynomial curves.
    #[must_use]
    pub fn polynomial(&self) -> Option<(Polynomial, Polynomial)> {
        match self {
            Self::LineSegment(c) => Some(c.polynomial()),
            Self::Quadratic(c) => Some(c.polynomial()),
            Self::Cubic(c) => Some(c.polynomial()),
            Self::Point(_) | Self::Arc(_) => None,
        }
    }

    /// Implicit equation of the curve's trajectory.
    ///
    /// Lines and ellipses use their closed forms; Béziers are implicitized
    /// through the Bézout resultant. `None` for points and zero-length
    /// segments.
    #[must_use]
    pub fn implicit(&self) -> Option<Bivariate> {
        match self {
            Self::Point(_) => None,
            Self::LineSegment(c) => Line::new(*c.start(), c.vector()).ok().map(|l| l.implicit()),
            Self::Quadratic(c) => {
                let (x, y) = c.polynomial();
                Some(implicitize(&x, &y, 2))
            }
            Self::Cubic(c) => {
                let (x, y) = c.polynomial();
                Some(implicitize(&x, &y, 3))
            }
            Self::Arc(c) => Some(c.implicit()),
        }
    }

    /// Checks that all coordinates are finite.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidCoordinate`] for NaN or infinite
    /// coordinates and the arc validation errors of [`Arc::validate`].
    pub fn validate(&self) -> Result<()> {
        let finite = |pts: &[Point2]| pts.iter().all(|p| p.x.is_finite() && p.y.is_finite());
        let ok = match self {
            Self::Point(p) => finite(&[*p]),
            Self::LineSegment(c) => finite(&[*c.start(), *c.end()]),
            Self::Quadratic(c) => finite(&c.points()),
            Self::Cubic(c) => finite(&c.points()),
            Self::Arc(c) => return c.validate(),
        };
        if ok {
            Ok(())
        } else {
            Err(GeometryError::InvalidCoordinate(self.kind_name()).into())
        }
    }

    fn kind_name(&self) -> &'static str {
        match self.kind() {
            CurveKind::Point => "point",
            CurveKind::LineSegment => "line segment",
            CurveKind::Quadratic => "quadratic bezier",
            CurveKind::Cubic => "cubic bezier",
            CurveKind::Arc => "arc",
        }
    }

    /// Tight axis-aligned bounding box.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        let tol = Tolerance::default();
        let mut pts = vec![self.start(), self.end()];
        match self {
            Self::Point(_) | Self::LineSegment(_) => {}
            Self::Arc(c) => pts.extend(c.extreme_points(tol.angle_epsilon)),
            Self::Quadratic(_) | Self::Cubic(_) => {
                for dir in [Vector2::x(), Vector2::y()] {
                    pts.extend(self.extrema_along(&dir, &tol).into_iter().map(|t| self.point_at(t)));
                }
            }
        }
        let s = self.start();
        BoundingBox::from_points(&pts).unwrap_or(BoundingBox { min: s, max: s })
    }

    /// Distance within which a point is considered to lie on this curve.
    #[must_use]
    pub fn point_tolerance(&self, tol: &Tolerance) -> f64 {
        let bbox = self.bounding_box();
        let size = bbox.width().hypot(bbox.height());
        tol.epsilon.max(tol.time_epsilon * size.max(1.0))
    }

    /// The same curve traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        match self {
            Self::Point(p) => Self::Point(*p),
            Self::LineSegment(c) => Self::LineSegment(c.reversed()),
            Self::Quadratic(c) => Self::Quadratic(c.reversed()),
            Self::Cubic(c) => Self::Cubic(c.reversed()),
            Self::Arc(c) => Self::Arc(c.reversed()),
        }
    }

    /// Rotated by `angle` radians about `pivot`.
    #[must_use]
    pub fn rotated(&self, pivot: &Point2, angle: f64) -> Self {
        let r = Rotation2::new(angle);
        let f = |p: &Point2| pivot + r * (p - pivot);
        match self {
            Self::Point(p) => Self::Point(f(p)),
            Self::LineSegment(c) => Self::LineSegment(c.map(f)),
            Self::Quadratic(c) => Self::Quadratic(c.map(f)),
            Self::Cubic(c) => Self::Cubic(c.map(f)),
            Self::Arc(c) => Self::Arc(c.rotated(pivot, angle)),
        }
    }

    /// Translated by `v`.
    #[must_use]
    pub fn translated(&self, v: &Vector2) -> Self {
        let f = |p: &Point2| p + v;
        match self {
            Self::Point(p) => Self::Point(f(p)),
            Self::LineSegment(c) => Self::LineSegment(c.map(f)),
            Self::Quadratic(c) => Self::Quadratic(c.map(f)),
            Self::Cubic(c) => Self::Cubic(c.map(f)),
            Self::Arc(c) => Self::Arc(c.translated(v)),
        }
    }

    /// The part of the curve between parameters `t0` and `t1`, running from
    /// `t0` to `t1`.
    #[must_use]
    pub fn sub_curve(&self, t0: f64, t1: f64) -> Self {
        match self {
            Self::Point(p) => Self::Point(*p),
            Self::LineSegment(c) => Self::LineSegment(c.sub_segment(t0, t1)),
            Self::Quadratic(c) => Self::Quadratic(c.sub_curve(t0, t1)),
            Self::Cubic(c) => Self::Cubic(c.sub_curve(t0, t1)),
            Self::Arc(c) => Self::Arc(c.sub_arc(t0, t1)),
        }
    }

    /// Splits at the given parameters, keeping direction.
    ///
    /// Parameters outside the open domain are ignored; pieces are returned in
    /// traversal order and share their end points exactly.
    #[must_use]
    pub fn split_at(&self, params: &[f64]) -> Vec<Self> {
        let (t0, t1) = self.domain();
        let (lo, hi) = self.param_range();
        let mut cuts: Vec<f64> = params
            .iter()
            .copied()
            .filter(|t| *t > lo && *t < hi)
            .collect();
        cuts.sort_by(f64::total_cmp);
        cuts.dedup();
        if t1 < t0 {
            cuts.reverse();
        }
        let bounds: Vec<f64> = std::iter::once(t0)
            .chain(cuts)
            .chain(std::iter::once(t1))
            .collect();
        bounds
            .windows(2)
            .map(|w| self.sub_curve(w[0], w[1]))
            .collect()
    }

    /// Parameters (ascending, excluding the end points) at which the
    /// coordinate along `dir` is extremal.
    #[must_use]
    pub fn extrema_along(&self, dir: &Vector2, tol: &Tolerance) -> Vec<f64> {
        match self {
            Self::Point(_) | Self::LineSegment(_) => Vec::new(),
            Self::Arc(c) => c.extrema_along(dir, tol.angle_epsilon),
            Self::Quadratic(_) | Self::Cubic(_) => {
                let Some((x, y)) = self.polynomial() else {
                    return Vec::new();
                };
                let d = &x.derivative().scale(dir.x) + &y.derivative().scale(dir.y);
                if d.max_abs() <= tol.epsilon {
                    return Vec::new();
                }
                let roots = match d.real_roots(tol) {
                    Ok(roots) => roots,
                    Err(err) => {
                        tracing::warn!(%err, "extrema search failed");
                        return Vec::new();
                    }
                };
                roots
                    .into_iter()
                    .map(|r| r.value)
                    .filter(|t| *t > tol.time_epsilon && *t < 1.0 - tol.time_epsilon)
                    .collect()
            }
        }
    }

    /// Parameters at which the curve turns back in `x`, or, for curves lying
    /// on a line, along that line.
    #[must_use]
    pub fn direction_extrema(&self, tol: &Tolerance) -> Vec<f64> {
        if self.is_collinear(tol.epsilon) {
            match self.chord_direction() {
                Some(dir) => self.extrema_along(&dir, tol),
                None => Vec::new(),
            }
        } else {
            self.extrema_along(&Vector2::x(), tol)
        }
    }

    /// Returns `true` if the curve's image lies on a line within `eps`.
    #[must_use]
    pub fn is_collinear(&self, eps: f64) -> bool {
        match self {
            Self::Point(_) | Self::LineSegment(_) => true,
            Self::Quadratic(c) => c.is_collinear(eps),
            Self::Cubic(c) => c.is_collinear(eps),
            Self::Arc(c) => c.radius_x() <= eps || c.radius_y() <= eps,
        }
    }

    /// Direction from the start to the farthest defining point.
    fn chord_direction(&self) -> Option<Vector2> {
        let s = self.start();
        let pts: Vec<Point2> = match self {
            Self::Point(_) => return None,
            Self::LineSegment(c) => vec![*c.end()],
            Self::Quadratic(c) => c.points().to_vec(),
            Self::Cubic(c) => c.points().to_vec(),
            Self::Arc(c) => {
                let r = Rotation2::new(c.rotation());
                let axis = if c.radius_x() >= c.radius_y() {
                    Vector2::x()
                } else {
                    Vector2::y()
                };
                return Some(r * axis);
            }
        };
        pts.iter()
            .map(|p| p - s)
            .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))
            .filter(|v| v.norm_squared() > 0.0)
    }

    /// One step of degeneracy reduction, or `None` if the curve is already
    /// in its simplest form.
    #[must_use]
    pub fn degenerate(&self, tol: &Tolerance) -> Option<Self> {
        let eps = tol.epsilon;
        let all_coincide = |pts: &[Point2]| pts.iter().all(|p| tol.points_equal(p, &pts[0]));
        match self {
            Self::Point(_) => None,
            Self::LineSegment(c) => {
                tol.points_equal(c.start(), c.end()).then_some(Self::Point(*c.start()))
            }
            Self::Quadratic(c) => {
                if all_coincide(&c.points()) {
                    Some(Self::Point(*c.start()))
                } else if c.is_collinear(eps) {
                    Some(self.image_segment(tol))
                } else {
                    None
                }
            }
            Self::Cubic(c) => {
                if all_coincide(&c.points()) {
                    Some(Self::Point(*c.start()))
                } else if let Some(q) = c.as_quadratic(eps) {
                    Some(Self::Quadratic(q))
                } else if c.is_collinear(eps) {
                    Some(self.image_segment(tol))
                } else {
                    None
                }
            }
            Self::Arc(c) => {
                let span = (c.end_angle() - c.start_angle()).abs();
                if (c.radius_x() <= eps && c.radius_y() <= eps) || span <= tol.angle_epsilon {
                    Some(Self::Point(c.start()))
                } else if c.radius_x() <= eps || c.radius_y() <= eps {
                    Some(self.image_segment(tol))
                } else {
                    None
                }
            }
        }
    }

    /// Applies [`Curve::degenerate`] until the curve no longer changes.
    #[must_use]
    pub fn reduce(&self, tol: &Tolerance) -> Reduction {
        let mut curve = *self;
        let mut reparametrized = false;
        while let Some(next) = curve.degenerate(tol) {
            let exact = curve.kind() == CurveKind::Cubic && next.kind() == CurveKind::Quadratic;
            reparametrized |= !exact;
            curve = next;
        }
        Reduction {
            curve,
            reparametrized,
        }
    }

    /// The segment spanning the image of a curve lying on a line, oriented
    /// along the curve's overall direction.
    fn image_segment(&self, tol: &Tolerance) -> Self {
        let Some(dir) = self.chord_direction() else {
            return Self::Point(self.start());
        };
        let dir = dir.normalize();
        let origin = self.start();
        let mut pts = vec![self.start(), self.end()];
        pts.extend(self.extrema_along(&dir, tol).into_iter().map(|t| self.point_at(t)));
        let proj = |p: &Point2| (p - origin).dot(&dir);
        let min = pts.iter().copied().min_by(|a, b| proj(a).total_cmp(&proj(b)));
        let max = pts.iter().copied().max_by(|a, b| proj(a).total_cmp(&proj(b)));
        let (Some(min), Some(max)) = (min, max) else {
            return Self::Point(origin);
        };
        if tol.points_equal(&min, &max) {
            return Self::Point(min);
        }
        let forward = proj(&self.end()) - proj(&self.start());
        let starts_low = if forward.abs() > tol.epsilon {
            forward > 0.0
        } else {
            (self.start() - min).norm() <= (self.start() - max).norm()
        };
        if starts_low {
            Self::segment(min, max)
        } else {
            Self::segment(max, min)
        }
    }

    /// Parameters at which the curve passes through `p`.
    ///
    /// Multi-valued only at the node of a self-intersecting cubic (and the
    /// seam of a full-turn arc is reported once).
    ///
    /// # Errors
    ///
    /// Returns [`IntersectionError::RootFinding`](crate::error::IntersectionError::RootFinding) if projecting onto a
    /// polynomial curve fails.
    pub fn params_of_point(&self, p: &Point2, tol: &Tolerance) -> Result<Vec<f64>> {
        let dist = self.point_tolerance(tol);
        match self {
            Self::Point(q) => Ok(if (p - q).norm() <= dist {
                vec![0.0]
            } else {
                Vec::new()
            }),
            Self::Arc(c) => Ok(c
                .param_of_point(p, dist, tol.angle_epsilon)
                .into_iter()
                .collect()),
            _ => self.projection_params(p, dist, true, tol),
        }
    }

    /// Parameters of `p` on the curve's unbounded trajectory.
    ///
    /// Arc angles are returned in `[lo, lo + 2π)` where `lo` is the low end of
    /// the span.
    ///
    /// # Errors
    ///
    /// See [`Curve::params_of_point`].
    pub fn trajectory_params(&self, p: &Point2, tol: &Tolerance) -> Result<Vec<f64>> {
        let dist = self.point_tolerance(tol);
        match self {
            Self::Point(q) => Ok(if (p - q).norm() <= dist {
                vec![0.0]
            } else {
                Vec::new()
            }),
            Self::Arc(c) => {
                let Some(theta) = c.angle_of(p) else {
                    return Ok(Vec::new());
                };
                if (c.point_at(theta) - p).norm() > dist {
                    return Ok(Vec::new());
                }
                let (lo, _) = c.param_range();
                let k = ((lo - tol.angle_epsilon - theta) / std::f64::consts::TAU).ceil();
                Ok(vec![theta + k * std::f64::consts::TAU])
            }
            _ => self.projection_params(p, dist, false, tol),
        }
    }

    /// Local minima of the distance to `p` that lie within `dist` of it.
    fn projection_params(&self, p: &Point2, dist: f64, bounded: bool, tol: &Tolerance) -> Result<Vec<f64>> {
        let Some((x, y)) = self.polynomial() else {
            return Ok(Vec::new());
        };
        let dx = &x - &Polynomial::constant(p.x);
        let dy = &y - &Polynomial::constant(p.y);
        let g = &(&dx * &x.derivative()) + &(&dy * &y.derivative());
        let mut candidates: Vec<f64> = g.real_roots(tol)?.into_iter().map(|r| r.value).collect();
        if bounded {
            candidates.extend([0.0, 1.0]);
            candidates.retain(|t| *t >= -tol.time_epsilon && *t <= 1.0 + tol.time_epsilon);
            for t in &mut candidates {
                *t = t.clamp(0.0, 1.0);
            }
        }
        candidates.retain(|t| (self.point_at(*t) - p).norm() <= dist);
        candidates.sort_by(f64::total_cmp);

        // Keep the closest representative of each cluster.
        let mut out: Vec<f64> = Vec::new();
        for t in candidates {
            match out.last_mut() {
                Some(last) if (t - *last).abs() <= tol.time_epsilon => {
                    let d_last = (self.point_at(*last) - p).norm();
                    let d_new = (self.point_at(t) - p).norm();
                    if d_new < d_last {
                        *last = t;
                    }
                }
                _ => out.push(t),
            }
        }
        Ok(out)
    }

    /// Parameter at which `coord(point_at(t)) == value`, assuming `coord` is
    /// monotone along the curve. Clamped to the domain.
    #[must_use]
    pub fn param_at_monotone(&self, value: f64, coord: impl Fn(&Point2) -> f64, tol: &Tolerance) -> f64 {
        let (mut a, mut b) = self.domain();
        let fa = coord(&self.point_at(a)) - value;
        let fb = coord(&self.point_at(b)) - value;
        if fa.abs() <= tol.epsilon * 1e-3 {
            return a;
        }
        if fb.abs() <= tol.epsilon * 1e-3 {
            return b;
        }
        if fa.signum() == fb.signum() {
            return if fa.abs() < fb.abs() { a } else { b };
        }
        let increasing = fb > fa;
        for _ in 0..BISECTION_STEPS {
            let m = 0.5 * (a + b);
            let fm = coord(&self.point_at(m)) - value;
            if fm == 0.0 {
                return m;
            }
            if (fm < 0.0) == increasing {
                a = m;
            } else {
                b = m;
            }
        }
        0.5 * (a + b)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn kinds_are_ordered() {
        assert!(CurveKind::Point < CurveKind::LineSegment);
        assert!(CurveKind::Cubic < CurveKind::Arc);
    }

    #[test]
    fn zero_length_segment_degenerates_to_point() {
        let tol = Tolerance::default();
        let c = Curve::segment(p(1.0, 1.0), p(1.0, 1.0));
        assert_eq!(c.degenerate(&tol), Some(Curve::Point(p(1.0, 1.0))));
    }

    #[test]
    fn collinear_quadratic_spans_its_image() {
        let tol = Tolerance::default();
        // Overshoots to x = 1.8 then comes back to x = 1.
        let c = Curve::Quadratic(QuadraticBezier::new(p(0.0, 0.0), p(3.0, 0.0), p(1.0, 0.0)));
        let r = c.reduce(&tol);
        assert!(r.reparametrized);
        let Curve::LineSegment(seg) = r.curve else {
            panic!("expected a segment, got {:?}", r.curve);
        };
        assert!((seg.start() - p(0.0, 0.0)).norm() < 1e-9);
        assert!((seg.end() - p(1.8, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn elevated_cubic_keeps_parametrization() {
        let tol = Tolerance::default();
        let c = Curve::Cubic(CubicBezier::new(p(0.0, 0.0), p(2.0, 4.0), p(4.0, 4.0), p(6.0, 0.0)));
        let r = c.reduce(&tol);
        assert_eq!(r.curve.kind(), CurveKind::Quadratic);
        assert!(!r.reparametrized);
    }

    #[test]
    fn arc_degeneracies() {
        let tol = Tolerance::default();
        let point = Curve::Arc(Arc::new(p(1.0, 1.0), 0.0, 0.0, 0.0, 0.0, 1.0).unwrap());
        assert_eq!(point.reduce(&tol).curve.kind(), CurveKind::Point);
        let empty_span = Curve::Arc(Arc::circular(p(0.0, 0.0), 1.0, 0.5, 0.5).unwrap());
        assert_eq!(empty_span.reduce(&tol).curve.kind(), CurveKind::Point);
        let flat = Curve::Arc(Arc::new(p(0.0, 0.0), 2.0, 0.0, 0.0, 0.0, PI).unwrap());
        let r = flat.reduce(&tol).curve;
        assert_eq!(r.kind(), CurveKind::LineSegment);
        assert!((r.start() - p(2.0, 0.0)).norm() < 1e-9);
        assert!((r.end() - p(-2.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn split_keeps_direction_and_shares_endpoints() {
        let arc = Curve::Arc(Arc::circular(p(0.0, 0.0), 1.0, PI, 0.0).unwrap());
        let pieces = arc.split_at(&[FRAC_PI_2, 4.0]);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].end(), pieces[1].start());
        assert!((pieces[0].start() - p(-1.0, 0.0)).norm() < 1e-12);
        assert!((pieces[1].end() - p(1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn cubic_node_has_two_params() {
        let tol = Tolerance::default();
        let cubic = CubicBezier::new(p(0.0, 0.0), p(3.0, 3.0), p(-1.0, 3.0), p(2.0, 0.0));
        let (s, t) = cubic.self_intersection(tol.time_epsilon).unwrap();
        let node = cubic.point_at(s);
        let params = Curve::Cubic(cubic).params_of_point(&node, &tol).unwrap();
        assert_eq!(params.len(), 2);
        assert!((params[0] - s).abs() < 1e-6);
        assert!((params[1] - t).abs() < 1e-6);
    }

    #[test]
    fn params_of_point_off_curve_is_empty() {
        let tol = Tolerance::default();
        let c = Curve::segment(p(0.0, 0.0), p(2.0, 2.0));
        assert!(c.params_of_point(&p(1.0, 0.0), &tol).unwrap().is_empty());
        assert!(c.params_of_point(&p(3.0, 3.0), &tol).unwrap().is_empty());
        let t = c.trajectory_params(&p(3.0, 3.0), &tol).unwrap();
        assert_eq!(t.len(), 1);
        assert!((t[0] - 1.5).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_includes_extrema() {
        let c = Curve::Quadratic(QuadraticBezier::new(p(0.0, 0.0), p(1.0, 2.0), p(2.0, 0.0)));
        let bbox = c.bounding_box();
        assert!((bbox.max.y - 1.0).abs() < 1e-9);
        let circle = Curve::Arc(Arc::full(p(0.0, 0.0), 2.0, 1.0, 0.0).unwrap());
        let bbox = circle.bounding_box();
        assert!((bbox.min.x + 2.0).abs() < 1e-9);
        assert!((bbox.max.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_nan() {
        let c = Curve::segment(p(f64::NAN, 0.0), p(1.0, 1.0));
        assert!(c.validate().is_err());
        assert!(Curve::segment(p(0.0, 0.0), p(1.0, 1.0)).validate().is_ok());
    }

    #[test]
    fn monotone_inversion() {
        let tol = Tolerance::default();
        let c = Curve::Arc(Arc::circular(p(0.0, 0.0), 1.0, PI, 0.0).unwrap());
        let t = c.param_at_monotone(0.0, |q| q.x, &tol);
        assert!((t - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn rotation_about_pivot() {
        let c = Curve::segment(p(1.0, 0.0), p(2.0, 0.0)).rotated(&p(1.0, 0.0), FRAC_PI_2);
        assert!((c.end() - p(1.0, 1.0)).norm() < 1e-12);
    }
}
