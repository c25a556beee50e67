use std::f64::consts::TAU;

use nalgebra::Rotation2;

use crate::error::{GeometryError, Result};
use crate::math::angle::{param_in_span, params_in_span};
use crate::math::bivariate::Bivariate;
use crate::math::polynomial::Polynomial;
use crate::math::{Point2, Vector2};

/// An elliptical arc.
///
/// Points are `center + R(rotation) · (radius_x cos θ, radius_y sin θ)` for
/// the eccentric angle `θ` running from `start_angle` to `end_angle`. The span
/// may decrease (clockwise arcs) and covers at most one full turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    center: Point2,
    radius_x: f64,
    radius_y: f64,
    rotation: f64,
    start_angle: f64,
    end_angle: f64,
}

impl Arc {
    /// Creates a new elliptical arc.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the ellipse
    /// * `radius_x`, `radius_y` - Semi-axes (non-negative)
    /// * `rotation` - Rotation of the `x` semi-axis in radians
    /// * `start_angle`, `end_angle` - Eccentric angle span in radians
    ///
    /// # Errors
    ///
    /// Returns an error if a value is not finite, a radius is negative, or
    /// the span exceeds a full turn.
    pub fn new(
        center: Point2,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<Self> {
        let arc = Self {
            center,
            radius_x,
            radius_y,
            rotation,
            start_angle,
            end_angle,
        };
        arc.validate()?;
        Ok(arc)
    }

    /// A circular arc.
    ///
    /// # Errors
    ///
    /// See [`Arc::new`].
    pub fn circular(center: Point2, radius: f64, start_angle: f64, end_angle: f64) -> Result<Self> {
        Self::new(center, radius, radius, 0.0, start_angle, end_angle)
    }

    /// A full counter-clockwise ellipse starting at angle zero.
    ///
    /// # Errors
    ///
    /// See [`Arc::new`].
    pub fn full(center: Point2, radius_x: f64, radius_y: f64, rotation: f64) -> Result<Self> {
        Self::new(center, radius_x, radius_y, rotation, 0.0, TAU)
    }

    /// Checks that every value is finite, radii are non-negative and the span
    /// covers at most one full turn.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidCoordinate`] or
    /// [`GeometryError::ParameterOutOfRange`].
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.center.x,
            self.center.y,
            self.radius_x,
            self.radius_y,
            self.rotation,
            self.start_angle,
            self.end_angle,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::InvalidCoordinate("arc").into());
        }
        if self.radius_x < 0.0 || self.radius_y < 0.0 {
            return Err(GeometryError::Degenerate("arc radius must be non-negative".into()).into());
        }
        let span = self.end_angle - self.start_angle;
        if span.abs() > TAU * (1.0 + 1e-12) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "arc span",
                value: span,
                min: -TAU,
                max: TAU,
            }
            .into());
        }
        Ok(())
    }

    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    #[must_use]
    pub fn radius_x(&self) -> f64 {
        self.radius_x
    }

    #[must_use]
    pub fn radius_y(&self) -> f64 {
        self.radius_y
    }

    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    #[must_use]
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    /// Returns `true` if the arc covers a full turn within `eps`.
    #[must_use]
    pub fn is_full(&self, eps: f64) -> bool {
        ((self.end_angle - self.start_angle).abs() - TAU).abs() <= eps
    }

    fn frame(&self) -> Rotation2<f64> {
        Rotation2::new(self.rotation)
    }

    #[must_use]
    pub fn point_at(&self, theta: f64) -> Point2 {
        self.center + self.frame() * Vector2::new(self.radius_x * theta.cos(), self.radius_y * theta.sin())
    }

    #[must_use]
    pub fn start(&self) -> Point2 {
        self.point_at(self.start_angle)
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        self.point_at(self.end_angle)
    }

    /// First, second and third derivatives with respect to `θ`.
    #[must_use]
    pub fn derivatives(&self, theta: f64) -> [Vector2; 3] {
        let r = self.frame();
        let (s, c) = theta.sin_cos();
        let (rx, ry) = (self.radius_x, self.radius_y);
        [
            r * Vector2::new(-rx * s, ry * c),
            r * Vector2::new(-rx * c, -ry * s),
            r * Vector2::new(rx * s, -ry * c),
        ]
    }

    /// The eccentric angle of `p` relative to the ellipse frame (any
    /// representative). `None` at the center or with a zero radius.
    #[must_use]
    pub fn angle_of(&self, p: &Point2) -> Option<f64> {
        if self.radius_x == 0.0 || self.radius_y == 0.0 {
            return None;
        }
        let local = self.frame().inverse() * (p - self.center);
        if local.norm() == 0.0 {
            return None;
        }
        Some((local.y / self.radius_y).atan2(local.x / self.radius_x))
    }

    /// Parameter of `p` on the arc, if it lies on the arc within `dist`.
    #[must_use]
    pub fn param_of_point(&self, p: &Point2, dist: f64, angle_eps: f64) -> Option<f64> {
        self.params_of_point(p, dist, angle_eps).into_iter().next()
    }

    /// Every parameter of `p` on the arc (two on the seam of a full turn).
    #[must_use]
    pub fn params_of_point(&self, p: &Point2, dist: f64, angle_eps: f64) -> Vec<f64> {
        let Some(theta) = self.angle_of(p) else {
            return Vec::new();
        };
        if (self.point_at(theta) - p).norm() > dist {
            return Vec::new();
        }
        params_in_span(theta, self.start_angle, self.end_angle, angle_eps)
    }

    /// Angles inside the span at which the coordinate along `dir` is
    /// extremal, ascending and excluding the endpoints.
    #[must_use]
    pub fn extrema_along(&self, dir: &Vector2, angle_eps: f64) -> Vec<f64> {
        let local = self.frame().inverse() * dir;
        let (rx, ry) = (self.radius_x, self.radius_y);
        if rx == 0.0 && ry == 0.0 {
            return Vec::new();
        }
        let theta0 = (ry * local.y).atan2(rx * local.x);
        let (lo, hi) = self.param_range();
        let mut out: Vec<f64> = [theta0, theta0 + std::f64::consts::PI]
            .into_iter()
            .flat_map(|a| params_in_span(a, lo, hi, angle_eps))
            .filter(|t| *t > lo + angle_eps && *t < hi - angle_eps)
            .collect();
        out.sort_by(f64::total_cmp);
        out.dedup_by(|a, b| (*a - *b).abs() <= angle_eps);
        out
    }

    /// Span as `(min, max)`.
    #[must_use]
    pub fn param_range(&self) -> (f64, f64) {
        if self.start_angle <= self.end_angle {
            (self.start_angle, self.end_angle)
        } else {
            (self.end_angle, self.start_angle)
        }
    }

    /// Maps an angle onto the span, if it falls inside it.
    #[must_use]
    pub fn wrap_into_span(&self, theta: f64, angle_eps: f64) -> Option<f64> {
        param_in_span(theta, self.start_angle, self.end_angle, angle_eps)
    }

    /// The same ellipse restricted to `[t0, t1]` (reversed if `t1 < t0`).
    #[must_use]
    pub fn sub_arc(&self, t0: f64, t1: f64) -> Self {
        Self {
            start_angle: t0,
            end_angle: t1,
            ..*self
        }
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        self.sub_arc(self.end_angle, self.start_angle)
    }

    /// Rotated by `angle` about `pivot`.
    #[must_use]
    pub fn rotated(&self, pivot: &Point2, angle: f64) -> Self {
        let r = Rotation2::new(angle);
        Self {
            center: pivot + r * (self.center - pivot),
            rotation: self.rotation + angle,
            ..*self
        }
    }

    /// Translated by `v`.
    #[must_use]
    pub fn translated(&self, v: &Vector2) -> Self {
        Self {
            center: self.center + v,
            ..*self
        }
    }

    /// Implicit equation of the full ellipse:
    /// `ry² u² + rx² v² - rx² ry² = 0` in the rotated frame `(u, v)`.
    #[must_use]
    pub fn implicit(&self) -> Bivariate {
        let (s, c) = self.rotation.sin_cos();
        let (cx, cy) = (self.center.x, self.center.y);
        let u = Bivariate::linear(-c * cx - s * cy, c, s);
        let v = Bivariate::linear(s * cx - c * cy, -s, c);
        let rx2 = self.radius_x * self.radius_x;
        let ry2 = self.radius_y * self.radius_y;
        let uu = (&u * &u).scale(ry2);
        let vv = (&v * &v).scale(rx2);
        &(&uu + &vv) - &Bivariate::constant(rx2 * ry2)
    }

    /// Rational half-angle parametrization `(X(τ), Y(τ), W(τ))` with
    /// `τ = tan(θ/2)`, so that `point = (X/W, Y/W)`.
    #[must_use]
    pub fn half_angle_polynomials(&self) -> (Polynomial, Polynomial, Polynomial) {
        let (s, c) = self.rotation.sin_cos();
        let (rx, ry) = (self.radius_x, self.radius_y);
        let (cx, cy) = (self.center.x, self.center.y);
        // cos θ = (1 - τ²) / W, sin θ = 2τ / W, W = 1 + τ²
        let x = Polynomial::new(vec![cx + rx * c, -2.0 * ry * s, cx - rx * c]);
        let y = Polynomial::new(vec![cy + rx * s, 2.0 * ry * c, cy - rx * s]);
        let w = Polynomial::new(vec![1.0, 0.0, 1.0]);
        (x, y, w)
    }

    /// Points at which the coordinate extremes of the arc are attained.
    #[must_use]
    pub fn extreme_points(&self, angle_eps: f64) -> Vec<Point2> {
        let mut pts = vec![self.start(), self.end()];
        for dir in [Vector2::x(), Vector2::y()] {
            pts.extend(self.extrema_along(&dir, angle_eps).into_iter().map(|t| self.point_at(t)));
        }
        pts
    }
}
