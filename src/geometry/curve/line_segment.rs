use crate::math::polynomial::Polynomial;
use crate::math::{Point2, Vector2};

/// A straight segment `P(t) = start + t (end - start)`, `t ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    start: Point2,
    end: Point2,
}

impl LineSegment {
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn start(&self) -> &Point2 {
        &self.start
    }

    #[must_use]
    pub fn end(&self) -> &Point2 {
        &self.end
    }

    /// `end - start`.
    #[must_use]
    pub fn vector(&self) -> Vector2 {
        self.end - self.start
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.vector().norm()
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.start + self.vector() * t
    }

    /// Power-basis coefficients of `x(t)` and `y(t)`.
    #[must_use]
    pub fn polynomial(&self) -> (Polynomial, Polynomial) {
        let d = self.vector();
        (
            Polynomial::linear(self.start.x, d.x),
            Polynomial::linear(self.start.y, d.y),
        )
    }

    /// Unbounded parameter of the orthogonal projection of `p`.
    ///
    /// Zero for a zero-length segment.
    #[must_use]
    pub fn project(&self, p: &Point2) -> f64 {
        let d = self.vector();
        let len2 = d.norm_squared();
        if len2 == 0.0 {
            return 0.0;
        }
        (p - self.start).dot(&d) / len2
    }

    /// The part of the segment between `t0` and `t1` (reversed if `t1 < t0`).
    #[must_use]
    pub fn sub_segment(&self, t0: f64, t1: f64) -> Self {
        Self::new(self.point_at(t0), self.point_at(t1))
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// Applies `f` to both endpoints.
    #[must_use]
    pub fn map(&self, f: impl Fn(&Point2) -> Point2) -> Self {
        Self::new(f(&self.start), f(&self.end))
    }
}
