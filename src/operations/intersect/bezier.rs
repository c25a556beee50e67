use crate::error::Result;
use crate::geometry::curve::Curve;
use crate::math::tolerance::Tolerance;

use super::solve::polynomial_into_implicit;
use super::Intersection;

pub(super) fn quadratic_quadratic(a: &Curve, b: &Curve, tol: &Tolerance, extended: bool) -> Result<Vec<Intersection>> {
    polynomial_into_implicit(a, b, tol, extended)
}

/// The cubic is substituted into the conic, keeping the composed degree at six.
pub(super) fn quadratic_cubic(quad: &Curve, cubic: &Curve, tol: &Tolerance, extended: bool) -> Result<Vec<Intersection>> {
    let records = polynomial_into_implicit(cubic, quad, tol, extended)?;
    Ok(records.into_iter().map(Intersection::swapped).collect())
}

pub(super) fn cubic_cubic(a: &Curve, b: &Curve, tol: &Tolerance, extended: bool) -> Result<Vec<Intersection>> {
    polynomial_into_implicit(a, b, tol, extended)
}

/// The Bézier is substituted into the ellipse equation.
pub(super) fn bezier_arc(bezier: &Curve, arc: &Curve, tol: &Tolerance, extended: bool) -> Result<Vec<Intersection>> {
    polynomial_into_implicit(bezier, arc, tol, extended)
}
