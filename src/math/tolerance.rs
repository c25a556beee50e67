use super::{Point2, TOLERANCE};

/// Numeric tolerances used by intersection and sweep computations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Coordinate comparisons.
    pub epsilon: f64,
    /// Parametric comparisons and root clustering.
    pub time_epsilon: f64,
    /// Angle comparisons.
    pub angle_epsilon: f64,
    /// Implicit-coefficient comparisons.
    pub coefficient_epsilon: f64,
    /// Largest imaginary part for which a complex root is considered real.
    pub complex_epsilon: f64,
    /// Half-angle root clustering.
    pub trigonometric_epsilon: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            epsilon: TOLERANCE,
            time_epsilon: 1e-6,
            angle_epsilon: 1e-6,
            coefficient_epsilon: 1e-6,
            complex_epsilon: 1e-6,
            trigonometric_epsilon: 1e-6,
        }
    }
}

impl Tolerance {
    /// Sets the coordinate epsilon.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the parametric epsilon.
    #[must_use]
    pub fn with_time_epsilon(mut self, time_epsilon: f64) -> Self {
        self.time_epsilon = time_epsilon;
        self
    }

    /// Sets the angle epsilon.
    #[must_use]
    pub fn with_angle_epsilon(mut self, angle_epsilon: f64) -> Self {
        self.angle_epsilon = angle_epsilon;
        self
    }

    /// Sets the implicit-coefficient epsilon.
    #[must_use]
    pub fn with_coefficient_epsilon(mut self, coefficient_epsilon: f64) -> Self {
        self.coefficient_epsilon = coefficient_epsilon;
        self
    }

    /// Sets the complex-root epsilon.
    #[must_use]
    pub fn with_complex_epsilon(mut self, complex_epsilon: f64) -> Self {
        self.complex_epsilon = complex_epsilon;
        self
    }

    /// Sets the half-angle clustering epsilon.
    #[must_use]
    pub fn with_trigonometric_epsilon(mut self, trigonometric_epsilon: f64) -> Self {
        self.trigonometric_epsilon = trigonometric_epsilon;
        self
    }

    /// Returns `true` if two points coincide within `epsilon`.
    #[must_use]
    pub fn points_equal(&self, a: &Point2, b: &Point2) -> bool {
        equal(a.x, b.x, self.epsilon) && equal(a.y, b.y, self.epsilon)
    }

    /// Returns `true` if two angles are equal modulo a full turn.
    #[must_use]
    pub fn angles_equal(&self, a: f64, b: f64) -> bool {
        let d = super::angle::normalize(a - b);
        d < self.angle_epsilon || std::f64::consts::TAU - d < self.angle_epsilon
    }
}

/// Returns `true` if `a` and `b` differ by at most `eps`.
#[must_use]
pub fn equal(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Returns `true` if `x` lies in `[lo, hi]` widened by `eps` (bounds in any order).
#[must_use]
pub fn between(x: f64, lo: f64, hi: f64, eps: f64) -> bool {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    x >= lo - eps && x <= hi + eps
}

/// Returns `true` if `x` lies strictly inside `(lo, hi)` shrunk by `eps`.
#[must_use]
pub fn strictly_between(x: f64, lo: f64, hi: f64, eps: f64) -> bool {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    x > lo + eps && x < hi - eps
}

/// Sign of `a` with a dead zone of `eps` around zero.
#[must_use]
pub fn sign(a: f64, eps: f64) -> i32 {
    if a > eps {
        1
    } else if a < -eps {
        -1
    } else {
        0
    }
}

/// Compares two implicit-coefficient vectors up to a common scale factor.
///
/// Each vector is scaled by its largest magnitude, then both are divided by
/// the entry at the first index that is non-negligible in both, and compared
/// elementwise.
#[must_use]
pub fn compare_implicit_coefficients(a: &[f64], b: &[f64], eps: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let (Some(a), Some(b)) = (scale_up(a), scale_up(b)) else {
        // At least one side is identically zero.
        return a.iter().all(|c| c.abs() <= eps) && b.iter().all(|c| c.abs() <= eps);
    };

    let pivot = a
        .iter()
        .zip(&b)
        .position(|(x, y)| x.abs() > eps && y.abs() > eps);
    let Some(pivot) = pivot else {
        return a.iter().all(|c| c.abs() <= eps) && b.iter().all(|c| c.abs() <= eps);
    };

    // A leading entry that vanishes exactly on one side only cannot be
    // rescaled away.
    let leading = a
        .iter()
        .zip(&b)
        .position(|(x, y)| x.abs() > eps || y.abs() > eps)
        .unwrap_or(pivot);
    if (a[leading] == 0.0) != (b[leading] == 0.0) {
        return false;
    }

    let pa = a[pivot];
    let pb = b[pivot];
    a.iter()
        .zip(&b)
        .all(|(x, y)| equal(x / pa, y / pb, eps))
}

/// Divides a vector by its largest magnitude entry. `None` if all zero.
fn scale_up(c: &[f64]) -> Option<Vec<f64>> {
    let max = c.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    if max == 0.0 || !max.is_finite() {
        return None;
    }
    Some(c.iter().map(|x| x / max).collect())
}
