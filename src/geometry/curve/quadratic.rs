use crate::math::polynomial::Polynomial;
use crate::math::{cross, Point2, Vector2};

/// A quadratic Bézier arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    start: Point2,
    control: Point2,
    end: Point2,
}

impl QuadraticBezier {
    #[must_use]
    pub fn new(start: Point2, control: Point2, end: Point2) -> Self {
        Self {
            start,
            control,
            end,
        }
    }

    #[must_use]
    pub fn start(&self) -> &Point2 {
        &self.start
    }

    #[must_use]
    pub fn control(&self) -> &Point2 {
        &self.control
    }

    #[must_use]
    pub fn end(&self) -> &Point2 {
        &self.end
    }

    #[must_use]
    pub fn points(&self) -> [Point2; 3] {
        [self.start, self.control, self.end]
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let u = 1.0 - t;
        Point2::from(
            self.start.coords * (u * u) + self.control.coords * (2.0 * u * t) + self.end.coords * (t * t),
        )
    }

    /// First, second and third derivatives at `t`.
    #[must_use]
    pub fn derivatives(&self, t: f64) -> [Vector2; 3] {
        let a = self.control - self.start;
        let b = self.end - self.control;
        [(a + (b - a) * t) * 2.0, (b - a) * 2.0, Vector2::zeros()]
    }

    /// Power-basis coefficients of `x(t)` and `y(t)`.
    #[must_use]
    pub fn polynomial(&self) -> (Polynomial, Polynomial) {
        let c1 = (self.control - self.start) * 2.0;
        let c2 = self.start.coords - self.control.coords * 2.0 + self.end.coords;
        (
            Polynomial::new(vec![self.start.x, c1.x, c2.x]),
            Polynomial::new(vec![self.start.y, c1.y, c2.y]),
        )
    }

    /// The part of the curve between `t0` and `t1` (reversed if `t1 < t0`).
    #[must_use]
    pub fn sub_curve(&self, t0: f64, t1: f64) -> Self {
        let from = self.point_at(t0);
        let to = self.point_at(t1);
        let a = self.control - self.start;
        let b = self.end - self.control;
        let control = from + (a + (b - a) * t0) * (t1 - t0);
        Self::new(from, control, to)
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.control, self.start)
    }

    /// Applies `f` to every control point.
    #[must_use]
    pub fn map(&self, f: impl Fn(&Point2) -> Point2) -> Self {
        Self::new(f(&self.start), f(&self.control), f(&self.end))
    }

    /// Returns `true` if all control points lie on one line within `eps`.
    #[must_use]
    pub fn is_collinear(&self, eps: f64) -> bool {
        collinear(&self.points(), eps)
    }
}

/// Returns `true` if every point lies within `eps` of the line through the
/// first point and the point farthest from it.
pub(super) fn collinear(points: &[Point2], eps: f64) -> bool {
    let Some(origin) = points.first() else {
        return true;
    };
    let far = points
        .iter()
        .map(|p| p - origin)
        .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()));
    let Some(far) = far else {
        return true;
    };
    let len = far.norm();
    if len <= eps {
        return true;
    }
    points
        .iter()
        .all(|p| (cross(&far, &(p - origin)) / len).abs() <= eps)
}
