use crate::error::{GeometryError, Result};
use crate::math::bivariate::Bivariate;
use crate::math::tolerance::Tolerance;
use crate::math::{cross, Point2, Vector2, TOLERANCE};

use super::Curve;

/// An infinite line defined by an origin point and a unit direction.
///
/// The parametric form is: `P(t) = origin + t * direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    origin: Point2,
    direction: Vector2,
}

impl Line {
    /// Creates a new line from an origin and direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length or not finite.
    pub fn new(origin: Point2, direction: Vector2) -> Result<Self> {
        let len = direction.norm();
        if !len.is_finite() || len < TOLERANCE {
            return Err(GeometryError::Degenerate("line direction is zero-length".into()).into());
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    /// Line through two points, or `None` when they coincide.
    #[must_use]
    pub fn through(p: Point2, q: Point2) -> Option<Self> {
        let line = Self::new(p, q - p).ok();
        if line.is_none() {
            tracing::warn!(x = p.x, y = p.y, "two points are the same, cannot form a line");
        }
        line
    }

    /// The vertical line `x = x0`, directed upwards.
    #[must_use]
    pub fn vertical(x0: f64) -> Self {
        Self {
            origin: Point2::new(x0, 0.0),
            direction: Vector2::y(),
        }
    }

    #[must_use]
    pub fn origin(&self) -> &Point2 {
        &self.origin
    }

    #[must_use]
    pub fn direction(&self) -> &Vector2 {
        &self.direction
    }

    /// Evaluates the line at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.origin + self.direction * t
    }

    /// Parameter of the orthogonal projection of `p`.
    #[must_use]
    pub fn project(&self, p: &Point2) -> f64 {
        (p - self.origin).dot(&self.direction)
    }

    /// Signed distance of `p`, positive on the left.
    #[must_use]
    pub fn signed_distance(&self, p: &Point2) -> f64 {
        cross(&self.direction, &(p - self.origin))
    }

    /// Implicit form `a x + b y + c = 0` with `(a, b)` the left normal.
    #[must_use]
    pub fn implicit(&self) -> Bivariate {
        let n = Vector2::new(-self.direction.y, self.direction.x);
        Bivariate::linear(-n.dot(&self.origin.coords), n.x, n.y)
    }
}

/// A half-line used to count boundary crossings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Point2,
    direction: Vector2,
}

impl Ray {
    /// Creates a ray from an origin and direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length or not finite.
    pub fn new(origin: Point2, direction: Vector2) -> Result<Self> {
        let line = Line::new(origin, direction)?;
        Ok(Self {
            origin,
            direction: line.direction,
        })
    }

    /// The ray from `origin` towards `+x`.
    #[must_use]
    pub fn horizontal(origin: Point2) -> Self {
        Self {
            origin,
            direction: Vector2::x(),
        }
    }

    #[must_use]
    pub fn origin(&self) -> &Point2 {
        &self.origin
    }

    #[must_use]
    pub fn direction(&self) -> &Vector2 {
        &self.direction
    }

    /// Signed number of times `curve` crosses the ray, counter-clockwise
    /// crossings counting positive.
    ///
    /// The curve is rotated into the ray frame and cut into pieces monotone
    /// across the ray; each piece covers a half-open span so shared
    /// endpoints are counted once.
    #[must_use]
    pub fn crossings(&self, curve: &Curve, tol: &Tolerance) -> i32 {
        let angle = self.direction.y.atan2(self.direction.x);
        let local = curve.rotated(&self.origin, -angle);
        let y0 = self.origin.y;
        let x0 = self.origin.x;

        let mut count = 0;
        for piece in local.split_at(&local.extrema_along(&Vector2::y(), tol)) {
            let a = piece.start();
            let b = piece.end();
            if (b.y - a.y).abs() <= tol.epsilon {
                continue;
            }
            let (lo, hi) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
            if y0 < lo || y0 >= hi {
                continue;
            }
            let t = piece.param_at_monotone(y0, |p| p.y, tol);
            if piece.point_at(t).x > x0 {
                count += if b.y > a.y { 1 } else { -1 };
            }
        }
        count
    }
}
