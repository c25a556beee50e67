use crate::math::polynomial::Polynomial;
use crate::math::{cross, Point2, Vector2};

use super::quadratic::{collinear, QuadraticBezier};

/// A cubic Bézier arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    start: Point2,
    control1: Point2,
    control2: Point2,
    end: Point2,
}

impl CubicBezier {
    #[must_use]
    pub fn new(start: Point2, control1: Point2, control2: Point2, end: Point2) -> Self {
        Self {
            start,
            control1,
            control2,
            end,
        }
    }

    #[must_use]
    pub fn start(&self) -> &Point2 {
        &self.start
    }

    #[must_use]
    pub fn control1(&self) -> &Point2 {
        &self.control1
    }

    #[must_use]
    pub fn control2(&self) -> &Point2 {
        &self.control2
    }

    #[must_use]
    pub fn end(&self) -> &Point2 {
        &self.end
    }

    #[must_use]
    pub fn points(&self) -> [Point2; 4] {
        [self.start, self.control1, self.control2, self.end]
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let u = 1.0 - t;
        Point2::from(
            self.start.coords * (u * u * u)
                + self.control1.coords * (3.0 * u * u * t)
                + self.control2.coords * (3.0 * u * t * t)
                + self.end.coords * (t * t * t),
        )
    }

    /// Power-basis vectors `[a, b, c, d]` of `a t³ + b t² + c t + d`.
    #[must_use]
    pub fn power_basis(&self) -> [Vector2; 4] {
        let p0 = self.start.coords;
        let p1 = self.control1.coords;
        let p2 = self.control2.coords;
        let p3 = self.end.coords;
        [
            p3 - p2 * 3.0 + p1 * 3.0 - p0,
            (p2 - p1 * 2.0 + p0) * 3.0,
            (p1 - p0) * 3.0,
            p0,
        ]
    }

    /// First, second and third derivatives at `t`.
    #[must_use]
    pub fn derivatives(&self, t: f64) -> [Vector2; 3] {
        let [a, b, c, _] = self.power_basis();
        [
            a * (3.0 * t * t) + b * (2.0 * t) + c,
            a * (6.0 * t) + b * 2.0,
            a * 6.0,
        ]
    }

    /// Power-basis coefficients of `x(t)` and `y(t)`.
    #[must_use]
    pub fn polynomial(&self) -> (Polynomial, Polynomial) {
        let [a, b, c, d] = self.power_basis();
        (
            Polynomial::new(vec![d.x, c.x, b.x, a.x]),
            Polynomial::new(vec![d.y, c.y, b.y, a.y]),
        )
    }

    /// The part of the curve between `t0` and `t1` (reversed if `t1 < t0`).
    #[must_use]
    pub fn sub_curve(&self, t0: f64, t1: f64) -> Self {
        let from = self.point_at(t0);
        let to = self.point_at(t1);
        let d = QuadraticBezier::new(
            Point2::from(self.control1 - self.start),
            Point2::from(self.control2 - self.control1),
            Point2::from(self.end - self.control2),
        );
        let dt = t1 - t0;
        let control1 = from + d.point_at(t0).coords * dt;
        let control2 = to - d.point_at(t1).coords * dt;
        Self::new(from, control1, control2, to)
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.control2, self.control1, self.start)
    }

    /// Applies `f` to every control point.
    #[must_use]
    pub fn map(&self, f: impl Fn(&Point2) -> Point2) -> Self {
        Self::new(f(&self.start), f(&self.control1), f(&self.control2), f(&self.end))
    }

    /// Returns `true` if all control points lie on one line within `eps`.
    #[must_use]
    pub fn is_collinear(&self, eps: f64) -> bool {
        collinear(&self.points(), eps)
    }

    /// The quadratic this cubic is a degree elevation of, if the cubic term
    /// vanishes within `eps`. The parametrization is unchanged.
    #[must_use]
    pub fn as_quadratic(&self, eps: f64) -> Option<QuadraticBezier> {
        let [a, ..] = self.power_basis();
        if a.norm() > eps {
            return None;
        }
        let control = Point2::from((self.control1.coords * 3.0 - self.start.coords) * 0.5);
        Some(QuadraticBezier::new(self.start, control, self.end))
    }

    /// Parameter pair `(s, t)`, `s < t`, at which the curve crosses itself
    /// inside `[0, 1]`.
    #[must_use]
    pub fn self_intersection(&self, time_eps: f64) -> Option<(f64, f64)> {
        let [a, b, c, _] = self.power_basis();
        let a_len2 = a.norm_squared();
        let a_cross_b = cross(&a, &b);
        let scale = a_len2.max(b.norm_squared()).max(c.norm_squared());
        if a_len2 <= scale * 1e-24 || a_cross_b.abs() <= scale * 1e-12 {
            return None;
        }
        let sigma = -cross(&a, &c) / a_cross_b;
        let pi = sigma * sigma + (b.dot(&a) * sigma + c.dot(&a)) / a_len2;
        let disc = sigma * sigma - 4.0 * pi;
        if disc <= 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let s = 0.5 * (sigma - sq);
        let t = 0.5 * (sigma + sq);
        let inside = |u: f64| u >= -time_eps && u <= 1.0 + time_eps;
        if t - s <= time_eps || !inside(s) || !inside(t) {
            return None;
        }
        Some((s.clamp(0.0, 1.0), t.clamp(0.0, 1.0)))
    }
}
